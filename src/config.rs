//! System configuration parameters
//!
//! All tunable parameters for the gym timer. Values can be overridden by
//! pointing the binary at a JSON file; otherwise the defaults below match
//! the reference hardware (64x64 panel, wood-block sample, buttons on the
//! SPI header pins).

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which way the counter moves on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountDirection {
    /// Count up from `start_value`, wrapping at `display_wrap_seconds`.
    Up,
    /// Count down from `start_value`, clamping at zero.
    Down,
}

/// What a button press does. The two source behaviors (restart vs
/// acknowledge-only) are both valid uses, so each button picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    /// Re-arm the interval timer and reset the counter.
    Restart,
    /// Log the press without touching the timer.
    LogOnly,
}

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    // --- Interval ---
    /// Tick period in milliseconds (timer initial delay and repeat).
    pub tick_interval_ms: u32,
    /// Counter wraps back to 0 at this bound (count-up only).
    pub display_wrap_seconds: u32,
    /// Counter direction.
    pub direction: CountDirection,
    /// Counter value after a reset (0 for count-up, the full span for
    /// count-down).
    pub start_value: u32,

    // --- Display ---
    /// Panel rows (pixels).
    pub panel_rows: u32,
    /// Panel columns (pixels).
    pub panel_cols: u32,
    /// PWM bit depth (1 is enough for a two-color numeral).
    pub panel_pwm_bits: u8,
    /// Text origin, x (pixels from left).
    pub text_origin_x: i32,
    /// Text baseline row, y (pixels from panel top; the draw primitive
    /// anchors text at its baseline).
    pub text_origin_y: i32,
    /// Foreground color (R, G, B).
    pub fg_color: (u8, u8, u8),
    /// Background color (R, G, B).
    pub bg_color: (u8, u8, u8),
    /// Extra pixels between glyphs.
    pub letter_spacing: i32,
    /// Path to the BDF font file.
    pub font_path: String,

    // --- Audio ---
    /// ALSA PCM device name.
    pub pcm_device: String,
    /// Sample rate (Hz).
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Container header bytes to strip from the cue asset.
    pub cue_header_bytes: usize,
    /// Cap on frames written per play; `None` plays the whole buffer.
    pub cue_frames_limit: Option<usize>,
    /// Path to the PCM cue asset.
    pub cue_path: String,

    // --- Input ---
    /// Primary button GPIO (BCM numbering).
    pub primary_button_pin: u8,
    /// What the primary button does.
    pub primary_button_action: ButtonAction,
    /// Auxiliary button GPIO (BCM numbering).
    pub aux_button_pin: u8,
    /// What the auxiliary button does.
    pub aux_button_action: ButtonAction,
    /// Minimum interval between accepted edges (milliseconds).
    pub debounce_ms: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            // Interval
            tick_interval_ms: 1000,
            display_wrap_seconds: 1000,
            direction: CountDirection::Up,
            start_value: 0,

            // Display
            panel_rows: 64,
            panel_cols: 64,
            panel_pwm_bits: 1,
            text_origin_x: 0,
            text_origin_y: 10, // gohufont-11 baseline
            fg_color: (255, 255, 0),
            bg_color: (0, 0, 0),
            letter_spacing: 0,
            font_path: "fonts/gohufont-11.bdf".into(),

            // Audio
            pcm_device: "default".into(),
            sample_rate: 44100,
            channels: 2,
            cue_header_bytes: 44,
            cue_frames_limit: None,
            cue_path: "Korg-M3R-High-Wood-Block.wav".into(),

            // Input
            primary_button_pin: 10, // MOSI
            primary_button_action: ButtonAction::Restart,
            aux_button_pin: 9, // MISO
            aux_button_action: ButtonAction::LogOnly,
            debounce_ms: 50,
        }
    }
}

impl TimerConfig {
    /// Range-check every field. Called once at startup; an `Err` here
    /// aborts initialization before any timer is armed.
    pub fn validate(&self) -> Result<(), Error> {
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick interval must be non-zero"));
        }
        if self.display_wrap_seconds == 0 {
            return Err(Error::Config("display wrap bound must be non-zero"));
        }
        if self.start_value >= self.display_wrap_seconds {
            return Err(Error::Config("start value must be below the wrap bound"));
        }
        if self.panel_rows == 0 || self.panel_cols == 0 {
            return Err(Error::Config("panel geometry must be non-zero"));
        }
        if self.channels == 0 {
            return Err(Error::Config("channel count must be non-zero"));
        }
        if self.sample_rate == 0 {
            return Err(Error::Config("sample rate must be non-zero"));
        }
        if self.primary_button_pin == self.aux_button_pin {
            return Err(Error::Config("button pins must be distinct"));
        }
        if self.debounce_ms >= self.tick_interval_ms {
            return Err(Error::Config("debounce must be shorter than one tick"));
        }
        Ok(())
    }

    /// Load from a JSON file, falling back to an error the caller can
    /// report. Absent file and parse failure are both fatal at startup.
    pub fn from_json_file(path: &str) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)
            .map_err(|_| Error::Resource(crate::error::ResourceError::NotFound(path.into())))?;
        let cfg: Self = serde_json::from_str(&raw)
            .map_err(|_| Error::Resource(crate::error::ResourceError::Unparsable(path.into())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Tick period as seconds.
    pub fn tick_secs(&self) -> f32 {
        self.tick_interval_ms as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = TimerConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.tick_interval_ms, 1000);
        assert_eq!(c.display_wrap_seconds, 1000);
        assert_eq!(c.direction, CountDirection::Up);
        assert_eq!(c.cue_header_bytes, 44);
    }

    #[test]
    fn serde_roundtrip() {
        let c = TimerConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: TimerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.tick_interval_ms, c2.tick_interval_ms);
        assert_eq!(c.fg_color, c2.fg_color);
        assert_eq!(c.primary_button_action, c2.primary_button_action);
        assert_eq!(c.cue_frames_limit, c2.cue_frames_limit);
    }

    #[test]
    fn zero_tick_interval_rejected() {
        let c = TimerConfig {
            tick_interval_ms: 0,
            ..TimerConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn zero_wrap_bound_rejected() {
        let c = TimerConfig {
            display_wrap_seconds: 0,
            ..TimerConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn start_value_above_wrap_rejected() {
        let c = TimerConfig {
            start_value: 1000,
            ..TimerConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn duplicate_pins_rejected() {
        let c = TimerConfig {
            primary_button_pin: 9,
            aux_button_pin: 9,
            ..TimerConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn zero_geometry_rejected() {
        let c = TimerConfig {
            panel_rows: 0,
            ..TimerConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn debounce_must_fit_inside_tick() {
        let c = TimerConfig {
            debounce_ms: 1000,
            ..TimerConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn missing_config_file_is_resource_error() {
        let err = TimerConfig::from_json_file("/nonexistent/gymtimer.json").unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }
}
