// Font and sound-file error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Font error code constants shared with the managed side
///
/// Error code range: 2001-2004
pub struct FontErrorCodes {}

impl FontErrorCodes {
    /// Font bytes could not be parsed into a face
    pub const FACE_PARSE: i32 = 2001;

    /// The face has no glyph for the requested character
    pub const GLYPH_MISSING: i32 = 2002;

    /// A glyph metric was queried before any glyph was loaded
    pub const NO_GLYPH_LOADED: i32 = 2003;

    /// Glyph slot mutex was poisoned
    pub const LOCK_POISONED: i32 = 2004;
}

/// Sound-file error code constants shared with the managed side
///
/// Error code range: 3001-3002
pub struct SoundErrorCodes {}

impl SoundErrorCodes {
    /// File bytes could not be decoded
    pub const DECODE_FAILED: i32 = 3001;

    /// File decoded but uses an unsupported sample format
    pub const UNSUPPORTED_FORMAT: i32 = 3002;
}

/// Log a font error with structured context
pub fn log_font_error(err: &FontError, context: &str) {
    error!(
        "Font error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Log a sound-file error with structured context
pub fn log_sound_error(err: &SoundError, context: &str) {
    error!(
        "Sound error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Font rasterization errors
#[derive(Debug, Clone, PartialEq)]
pub enum FontError {
    /// Font bytes could not be parsed into a face
    FaceParse { reason: String },

    /// The face has no glyph for the requested character
    GlyphMissing { ch: char },

    /// A glyph metric was queried before any glyph was loaded
    NoGlyphLoaded,

    /// Glyph slot mutex was poisoned
    LockPoisoned,
}

impl ErrorCode for FontError {
    fn code(&self) -> i32 {
        match self {
            FontError::FaceParse { .. } => FontErrorCodes::FACE_PARSE,
            FontError::GlyphMissing { .. } => FontErrorCodes::GLYPH_MISSING,
            FontError::NoGlyphLoaded => FontErrorCodes::NO_GLYPH_LOADED,
            FontError::LockPoisoned => FontErrorCodes::LOCK_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            FontError::FaceParse { reason } => {
                format!("Failed to parse font face: {}", reason)
            }
            FontError::GlyphMissing { ch } => {
                format!("Font has no glyph for character {:?}", ch)
            }
            FontError::NoGlyphLoaded => {
                "No glyph loaded. Call loadCharacter() first.".to_string()
            }
            FontError::LockPoisoned => "Lock poisoned on glyph slot".to_string(),
        }
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FontError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for FontError {}

/// Sound-file decoding errors
#[derive(Debug, Clone, PartialEq)]
pub enum SoundError {
    /// File bytes could not be decoded
    DecodeFailed { reason: String },

    /// File decoded but uses an unsupported sample format
    UnsupportedFormat { format: String },
}

impl ErrorCode for SoundError {
    fn code(&self) -> i32 {
        match self {
            SoundError::DecodeFailed { .. } => SoundErrorCodes::DECODE_FAILED,
            SoundError::UnsupportedFormat { .. } => SoundErrorCodes::UNSUPPORTED_FORMAT,
        }
    }

    fn message(&self) -> String {
        match self {
            SoundError::DecodeFailed { reason } => {
                format!("Failed to decode sound file: {}", reason)
            }
            SoundError::UnsupportedFormat { format } => {
                format!("Unsupported sample format: {}", format)
            }
        }
    }
}

impl fmt::Display for SoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SoundError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SoundError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_error_codes() {
        assert_eq!(
            FontError::FaceParse {
                reason: "test".to_string()
            }
            .code(),
            FontErrorCodes::FACE_PARSE
        );
        assert_eq!(
            FontError::GlyphMissing { ch: 'x' }.code(),
            FontErrorCodes::GLYPH_MISSING
        );
        assert_eq!(
            FontError::NoGlyphLoaded.code(),
            FontErrorCodes::NO_GLYPH_LOADED
        );
        assert_eq!(FontError::LockPoisoned.code(), FontErrorCodes::LOCK_POISONED);
    }

    #[test]
    fn test_sound_error_codes() {
        assert_eq!(
            SoundError::DecodeFailed {
                reason: "test".to_string()
            }
            .code(),
            SoundErrorCodes::DECODE_FAILED
        );
        assert_eq!(
            SoundError::UnsupportedFormat {
                format: "Int 64-bit".to_string()
            }
            .code(),
            SoundErrorCodes::UNSUPPORTED_FORMAT
        );
    }

    #[test]
    fn test_error_messages() {
        let err = FontError::GlyphMissing { ch: 'q' };
        assert!(err.message().contains('q'));

        let err = SoundError::UnsupportedFormat {
            format: "Int 64-bit".to_string(),
        };
        assert!(err.message().contains("Int 64-bit"));
    }
}
