//! ALSA playback adapter.
//!
//! Implements [`CuePort`] over the `alsa` crate: opens the configured
//! PCM device once at startup (interleaved S16, configured rate and
//! channel count), then on each play prepares the device — which also
//! recovers any prior underrun state — and writes the cue's frames.
//!
//! The cue is a fraction of a second long, so a play completes well
//! within one tick period; no drain is issued between plays.

use alsa::pcm::{Access, Format, HwParams, PCM};
use alsa::{Direction, ValueOr};
use log::{info, warn};

use crate::app::ports::CuePort;
use crate::config::TimerConfig;
use crate::error::{DeviceError, Error};

pub struct AlsaCuePlayer {
    pcm: Option<PCM>,
    channels: u16,
}

impl AlsaCuePlayer {
    /// Open and parameterize the playback device.
    /// Fatal at startup: a device that cannot be opened aborts init.
    pub fn open(config: &TimerConfig) -> Result<Self, Error> {
        let pcm = PCM::new(&config.pcm_device, Direction::Playback, false).map_err(|e| {
            warn!("cannot open PCM device '{}': {}", config.pcm_device, e);
            Error::Device(DeviceError::AudioSetupFailed)
        })?;

        {
            let hwp = HwParams::any(&pcm).map_err(setup_err)?;
            hwp.set_access(Access::RWInterleaved).map_err(setup_err)?;
            hwp.set_format(Format::s16()).map_err(setup_err)?;
            hwp.set_channels(u32::from(config.channels))
                .map_err(setup_err)?;
            hwp.set_rate(config.sample_rate, ValueOr::Nearest)
                .map_err(setup_err)?;
            pcm.hw_params(&hwp).map_err(setup_err)?;
        }

        info!(
            "PCM device '{}' ready ({} Hz, {} ch)",
            config.pcm_device, config.sample_rate, config.channels
        );
        Ok(Self {
            pcm: Some(pcm),
            channels: config.channels,
        })
    }
}

fn setup_err(e: alsa::Error) -> Error {
    warn!("PCM parameter setup failed: {}", e);
    Error::Device(DeviceError::AudioSetupFailed)
}

impl CuePort for AlsaCuePlayer {
    fn play(&mut self, samples: &[i16]) -> Result<(), DeviceError> {
        let Some(pcm) = self.pcm.as_ref() else {
            return Err(DeviceError::AudioWriteFailed);
        };

        // prepare() resets a device left in the underrun state by the
        // tail of the previous cue.
        pcm.prepare().map_err(|e| {
            warn!("PCM prepare failed: {}", e);
            DeviceError::AudioWriteFailed
        })?;

        let io = pcm.io_i16().map_err(|e| {
            warn!("PCM io handle failed: {}", e);
            DeviceError::AudioWriteFailed
        })?;

        let frames = io.writei(samples).map_err(|e| {
            warn!("PCM write failed: {}", e);
            DeviceError::AudioWriteFailed
        })?;

        let expected = samples.len() / self.channels as usize;
        if frames < expected {
            warn!("PCM short write: {} of {} frames", frames, expected);
        }
        Ok(())
    }

    fn close(&mut self) {
        // Idempotent: the handle is dropped at most once.
        if let Some(pcm) = self.pcm.take() {
            if let Err(e) = pcm.drain() {
                warn!("PCM drain on close failed: {}", e);
            }
            info!("PCM device closed");
        }
    }
}

impl Drop for AlsaCuePlayer {
    fn drop(&mut self) {
        self.close();
    }
}
