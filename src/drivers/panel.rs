//! LED matrix panel adapter.
//!
//! Implements [`DisplayPort`] over the `rpi-led-matrix` bindings. Frames
//! are composed on an offscreen canvas and presented with a vsync'd
//! swap, so the viewer never sees a partially drawn numeral.
//!
//! The BDF font is loaded once at startup; an unloadable font is fatal
//! before any timer is armed.

use std::path::Path;

use log::{info, warn};
use rpi_led_matrix::{LedCanvas, LedColor, LedFont, LedMatrix, LedMatrixOptions};

use crate::app::ports::DisplayPort;
use crate::config::TimerConfig;
use crate::display::DisplayFrame;
use crate::error::{DeviceError, Error, ResourceError};

fn color(rgb: (u8, u8, u8)) -> LedColor {
    LedColor {
        red: rgb.0,
        green: rgb.1,
        blue: rgb.2,
    }
}

pub struct MatrixPanel {
    matrix: LedMatrix,
    font: LedFont,
    /// Offscreen canvas; always `Some` between calls, taken during a swap.
    offscreen: Option<LedCanvas>,
    width: u32,
    height: u32,
}

impl MatrixPanel {
    /// Initialize the matrix and load the font.
    pub fn open(config: &TimerConfig) -> Result<Self, Error> {
        let mut options = LedMatrixOptions::new();
        options.set_rows(config.panel_rows);
        options.set_cols(config.panel_cols);
        // 1 PWM bit is enough for the two-color numeral and keeps the
        // refresh fast.
        if let Err(e) = options.set_pwm_bits(config.panel_pwm_bits) {
            warn!("pwm bits {} rejected: {}", config.panel_pwm_bits, e);
            return Err(Error::Config("invalid panel PWM bit depth"));
        }

        let matrix = LedMatrix::new(Some(options), None).map_err(|e| {
            warn!("matrix init failed: {}", e);
            Error::Device(DeviceError::DisplayWriteFailed)
        })?;

        let font = LedFont::new(Path::new(&config.font_path))
            .map_err(|_| ResourceError::Unparsable(config.font_path.clone()))?;

        let offscreen = matrix.offscreen_canvas();
        info!(
            "panel ready ({}x{}), font '{}'",
            config.panel_cols, config.panel_rows, config.font_path
        );
        Ok(Self {
            matrix,
            font,
            offscreen: Some(offscreen),
            width: config.panel_cols,
            height: config.panel_rows,
        })
    }

    fn swap(&mut self, canvas: LedCanvas) {
        self.offscreen = Some(self.matrix.swap(canvas));
    }
}

impl DisplayPort for MatrixPanel {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw(&mut self, frame: &DisplayFrame) -> Result<(), DeviceError> {
        let Some(mut canvas) = self.offscreen.take() else {
            return Err(DeviceError::DisplayWriteFailed);
        };
        canvas.fill(&color(frame.style.bg));
        canvas.draw_text(
            &self.font,
            frame.text.as_str(),
            frame.style.origin_x,
            frame.style.origin_y,
            &color(frame.style.fg),
            frame.style.letter_spacing,
            false,
        );
        self.swap(canvas);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DeviceError> {
        let Some(mut canvas) = self.offscreen.take() else {
            return Err(DeviceError::DisplayWriteFailed);
        };
        canvas.fill(&color((0, 0, 0)));
        self.swap(canvas);
        Ok(())
    }
}
