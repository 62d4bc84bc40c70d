// NativeContext: owns the long-lived native state behind the JNI surface.
//
// Replaces the old pattern of loose globals (stream pointer, FreeType face)
// with a single container: the audio session slot follows the host lifecycle
// (created on resume, dropped on pause) and the glyph slot holds the most
// recently rasterized character for the metric queries.

use std::sync::{Mutex, MutexGuard};

use log::info;

use crate::audio::{AudioSession, SessionState};
use crate::config::AppConfig;
use crate::error::{
    log_audio_error, log_font_error, log_sound_error, AudioError, FontError, NativeError,
};
use crate::font::{self, GlyphRaster};
use crate::sound;

pub struct NativeContext {
    /// Audio session; present between host resume and pause
    session: Mutex<Option<AudioSession>>,
    /// Most recently rasterized glyph, queried by the metric accessors
    glyph: Mutex<Option<GlyphRaster>>,
    config: AppConfig,
}

impl NativeContext {
    pub fn new() -> Self {
        Self::with_config(AppConfig::load())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            session: Mutex::new(None),
            glyph: Mutex::new(None),
            config,
        }
    }

    /// Host resume hook: create the session if needed and start its stream.
    pub fn start_audio(&self) -> Result<(), AudioError> {
        let mut guard = self.lock_session()?;
        let session = guard
            .get_or_insert_with(|| AudioSession::with_default_backend(self.config.audio.clone()));
        session.start()
    }

    /// Host pause hook: stop the stream and destroy the session.
    ///
    /// Safe to call when no session exists.
    pub fn stop_audio(&self) -> Result<(), AudioError> {
        let mut guard = self.lock_session()?;
        if let Some(session) = guard.take() {
            session.stop()?;
            info!("audio session destroyed");
        }
        Ok(())
    }

    /// Replace the session's pending clip, creating the session if the host
    /// supplies data before resuming audio.
    pub fn set_audio_data(&self, samples: &[f32]) -> Result<(), AudioError> {
        let mut guard = self.lock_session()?;
        let session = guard
            .get_or_insert_with(|| AudioSession::with_default_backend(self.config.audio.clone()));
        session.set_audio_data(samples)
    }

    /// Decode a sound file held in memory and hand it to the audio session.
    pub fn load_audio(&self, file_bytes: &[u8]) -> Result<(), NativeError> {
        let clip = sound::decode_wav(file_bytes).map_err(|err| {
            log_sound_error(&err, "load_audio");
            err
        })?;
        self.set_audio_data(&clip.samples).map_err(|err| {
            log_audio_error(&err, "load_audio");
            err
        })?;
        Ok(())
    }

    /// Lifecycle state of the audio session, Closed when none exists.
    pub fn audio_state(&self) -> Result<SessionState, AudioError> {
        match self.lock_session()?.as_ref() {
            Some(session) => session.state(),
            None => Ok(SessionState::Closed),
        }
    }

    /// Rasterize one character and keep it for the metric queries.
    /// Returns the coverage bitmap.
    pub fn load_glyph(
        &self,
        font_bytes: &[u8],
        ch: char,
        size_px: u32,
    ) -> Result<Vec<u8>, FontError> {
        let raster = font::rasterize_glyph(font_bytes, ch, size_px).map_err(|err| {
            log_font_error(&err, "load_glyph");
            err
        })?;
        let bitmap = raster.bitmap.clone();
        *self.lock_glyph()? = Some(raster);
        Ok(bitmap)
    }

    /// Drop the currently held glyph.
    pub fn free_glyph(&self) -> Result<(), FontError> {
        *self.lock_glyph()? = None;
        Ok(())
    }

    pub fn glyph_bearing_x(&self) -> Result<i32, FontError> {
        self.with_glyph(|g| g.bearing_x)
    }

    pub fn glyph_bearing_y(&self) -> Result<i32, FontError> {
        self.with_glyph(|g| g.bearing_y)
    }

    pub fn glyph_advance(&self) -> Result<i32, FontError> {
        self.with_glyph(|g| g.advance)
    }

    pub fn glyph_width(&self) -> Result<i32, FontError> {
        self.with_glyph(|g| g.width)
    }

    pub fn glyph_height(&self) -> Result<i32, FontError> {
        self.with_glyph(|g| g.height)
    }

    fn with_glyph<T>(&self, f: impl FnOnce(&GlyphRaster) -> T) -> Result<T, FontError> {
        match self.lock_glyph()?.as_ref() {
            Some(glyph) => Ok(f(glyph)),
            None => {
                let err = FontError::NoGlyphLoaded;
                log_font_error(&err, "glyph_metric");
                Err(err)
            }
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Option<AudioSession>>, AudioError> {
        self.session.lock().map_err(|_| {
            let err = AudioError::LockPoisoned {
                component: "native_context.session".to_string(),
            };
            log_audio_error(&err, "lock_session");
            err
        })
    }

    fn lock_glyph(&self) -> Result<MutexGuard<'_, Option<GlyphRaster>>, FontError> {
        self.glyph.lock().map_err(|_| {
            let err = FontError::LockPoisoned;
            log_font_error(&err, "lock_glyph");
            err
        })
    }
}

impl Default for NativeContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_audio_without_session_is_noop() {
        let ctx = NativeContext::with_config(AppConfig::default());
        ctx.stop_audio().unwrap();
        assert_eq!(ctx.audio_state().unwrap(), SessionState::Closed);
    }

    #[test]
    fn test_set_audio_data_creates_idle_session() {
        let ctx = NativeContext::with_config(AppConfig::default());

        ctx.set_audio_data(&[0.1, 0.2]).unwrap();

        // Session exists but its stream was never started
        assert_eq!(ctx.audio_state().unwrap(), SessionState::Closed);
    }

    #[test]
    fn test_glyph_metrics_require_loaded_glyph() {
        let ctx = NativeContext::with_config(AppConfig::default());

        assert!(matches!(
            ctx.glyph_bearing_x(),
            Err(FontError::NoGlyphLoaded)
        ));
        assert!(matches!(ctx.glyph_advance(), Err(FontError::NoGlyphLoaded)));
    }

    #[test]
    fn test_load_glyph_with_invalid_font_fails() {
        let ctx = NativeContext::with_config(AppConfig::default());

        let result = ctx.load_glyph(b"not a font", 'A', 32);
        assert!(matches!(result, Err(FontError::FaceParse { .. })));

        // Nothing was stored
        assert!(matches!(ctx.glyph_width(), Err(FontError::NoGlyphLoaded)));
    }

    #[test]
    fn test_free_glyph_clears_slot() {
        let ctx = NativeContext::with_config(AppConfig::default());
        // Slot is already empty; freeing is still fine
        ctx.free_glyph().unwrap();
        assert!(matches!(ctx.glyph_height(), Err(FontError::NoGlyphLoaded)));
    }

    #[test]
    fn test_load_audio_rejects_garbage_bytes() {
        let ctx = NativeContext::with_config(AppConfig::default());

        let result = ctx.load_audio(b"not a wav");
        assert!(matches!(result, Err(NativeError::Sound(_))));
    }

    #[test]
    fn test_load_audio_accepts_wav_without_starting_stream() {
        use hound::{SampleFormat, WavSpec, WavWriter};
        use std::io::Cursor;

        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut bytes = Vec::new();
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
        for s in [0.5_f32, -0.5] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let ctx = NativeContext::with_config(AppConfig::default());
        ctx.load_audio(&bytes).unwrap();

        assert_eq!(ctx.audio_state().unwrap(), SessionState::Closed);
    }
}
