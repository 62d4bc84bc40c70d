// Error types for the native bridge
//
// This module defines custom error types for audio, font, and sound-file
// operations, providing structured error handling with numeric codes suitable
// for reporting across the JNI boundary.

mod assets;
mod audio;

pub use assets::{
    log_font_error, log_sound_error, FontError, FontErrorCodes, SoundError, SoundErrorCodes,
};
pub use audio::{log_audio_error, AudioError, AudioErrorCodes};

use std::fmt;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages from
/// custom error types, enabling consistent error handling across the FFI
/// boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Top-level error for operations that cross domains (e.g. decoding a sound
/// file and handing it to the audio session).
#[derive(Debug, Clone, PartialEq)]
pub enum NativeError {
    Audio(AudioError),
    Font(FontError),
    Sound(SoundError),
}

impl ErrorCode for NativeError {
    fn code(&self) -> i32 {
        match self {
            NativeError::Audio(err) => err.code(),
            NativeError::Font(err) => err.code(),
            NativeError::Sound(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            NativeError::Audio(err) => err.message(),
            NativeError::Font(err) => err.message(),
            NativeError::Sound(err) => err.message(),
        }
    }
}

impl From<AudioError> for NativeError {
    fn from(err: AudioError) -> Self {
        NativeError::Audio(err)
    }
}

impl From<FontError> for NativeError {
    fn from(err: FontError) -> Self {
        NativeError::Font(err)
    }
}

impl From<SoundError> for NativeError {
    fn from(err: SoundError) -> Self {
        NativeError::Sound(err)
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeError::Audio(err) => write!(f, "{}", err),
            NativeError::Font(err) => write!(f, "{}", err),
            NativeError::Sound(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for NativeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_error_delegates_codes() {
        let err: NativeError = AudioError::AlreadyStarted.into();
        assert_eq!(err.code(), AudioErrorCodes::ALREADY_STARTED);

        let err: NativeError = FontError::NoGlyphLoaded.into();
        assert_eq!(err.code(), FontErrorCodes::NO_GLYPH_LOADED);

        let err: NativeError = SoundError::DecodeFailed {
            reason: "truncated header".to_string(),
        }
        .into();
        assert_eq!(err.code(), SoundErrorCodes::DECODE_FAILED);
    }
}
