//! Display frame composition.
//!
//! Pure text-side of the display path: formats the elapsed count as a
//! fixed-width right-justified numeral and bundles it with the style the
//! panel adapter needs (origin, colors, letter spacing). The panel itself
//! lives behind [`DisplayPort`](crate::app::ports::DisplayPort); whether
//! the frame swap is atomic is the adapter's responsibility.

use core::fmt::Write as _;

use heapless::String;

use crate::config::TimerConfig;

/// Minimum character positions for the numeral (space-padded).
pub const COUNT_WIDTH: usize = 5;

/// Formatted numeral. Sized for any u32 (10 digits) plus padding slack.
pub type CountText = String<12>;

/// Format `value` right-justified in at least [`COUNT_WIDTH`] positions.
///
/// Pure and idempotent: output depends only on `value`.
pub fn format_count(value: u32) -> CountText {
    let mut s = CountText::new();
    // Cannot overflow the capacity: u32 is at most 10 digits.
    let _ = write!(s, "{value:>COUNT_WIDTH$}");
    s
}

/// Style applied to every frame; derived from config once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStyle {
    pub origin_x: i32,
    pub origin_y: i32,
    pub fg: (u8, u8, u8),
    pub bg: (u8, u8, u8),
    pub letter_spacing: i32,
}

impl FrameStyle {
    pub fn from_config(config: &TimerConfig) -> Self {
        Self {
            origin_x: config.text_origin_x,
            origin_y: config.text_origin_y,
            fg: config.fg_color,
            bg: config.bg_color,
            letter_spacing: config.letter_spacing,
        }
    }
}

/// One frame to draw: text plus style. Transient — rebuilt every tick,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    pub text: CountText,
    pub style: FrameStyle,
}

impl DisplayFrame {
    pub fn new(value: u32, style: FrameStyle) -> Self {
        Self {
            text: format_count(value),
            style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_space_padded_to_five() {
        assert_eq!(format_count(0).as_str(), "    0");
        assert_eq!(format_count(7).as_str(), "    7");
        assert_eq!(format_count(42).as_str(), "   42");
        assert_eq!(format_count(999).as_str(), "  999");
        assert_eq!(format_count(12345).as_str(), "12345");
    }

    #[test]
    fn wide_values_not_clipped() {
        assert_eq!(format_count(4_294_967_295).as_str(), "4294967295");
    }

    #[test]
    fn formatting_is_idempotent() {
        let a = format_count(360);
        let b = format_count(360);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "  360");
    }

    #[test]
    fn frame_carries_configured_style() {
        let cfg = TimerConfig::default();
        let style = FrameStyle::from_config(&cfg);
        let frame = DisplayFrame::new(3, style);
        assert_eq!(frame.text.as_str(), "    3");
        assert_eq!(frame.style.fg, (255, 255, 0));
        assert_eq!(frame.style.bg, (0, 0, 0));
        assert_eq!(frame.style.letter_spacing, 0);
    }
}
