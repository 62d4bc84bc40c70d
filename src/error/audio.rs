// Audio error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Audio error code constants shared with the managed side
///
/// These constants provide a single source of truth for the numeric codes
/// surfaced across the JNI boundary.
///
/// Error code range: 1001-1006
pub struct AudioErrorCodes {}

impl AudioErrorCodes {
    /// Stream builder/open call did not return success
    pub const STREAM_OPEN_FAILED: i32 = 1001;

    /// Stream opened but the subsystem rejected the start request
    pub const STREAM_START_FAILED: i32 = 1002;

    /// Stream close reported a non-success code
    pub const STREAM_CLOSE_FAILED: i32 = 1003;

    /// Hardware stream disconnected or errored asynchronously
    pub const ASYNC_STREAM_ERROR: i32 = 1004;

    /// Session was already started
    pub const ALREADY_STARTED: i32 = 1005;

    /// Mutex was poisoned
    pub const LOCK_POISONED: i32 = 1006;
}

/// Log an audio error with structured context
///
/// Logs the failing operation name, the numeric code, and the underlying
/// subsystem diagnostic converted to text.
pub fn log_audio_error(err: &AudioError, context: &str) {
    error!(
        "Audio error in {}: code={}, component=AudioSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Audio-related errors
///
/// These cover the session lifecycle (open/start/close) and asynchronous
/// stream failures delivered by the subsystem's error callbacks. All of them
/// are local to the audio session; none terminate the host process.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Builder/open call did not return success; the session stays Closed
    StreamOpenFailed { reason: String },

    /// Start requested but the subsystem rejected it; the half-open stream
    /// is closed before this error is returned
    StreamStartFailed { reason: String },

    /// Close reported a non-success code; the handle is released regardless
    StreamCloseFailed { reason: String },

    /// Delivered via the before/after-close callbacks when the hardware
    /// stream disconnects (e.g. device unplugged)
    AsyncStreamError { reason: String },

    /// start() called while the session is not Closed
    AlreadyStarted,

    /// Session mutex was poisoned
    LockPoisoned { component: String },
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::StreamOpenFailed { .. } => AudioErrorCodes::STREAM_OPEN_FAILED,
            AudioError::StreamStartFailed { .. } => AudioErrorCodes::STREAM_START_FAILED,
            AudioError::StreamCloseFailed { .. } => AudioErrorCodes::STREAM_CLOSE_FAILED,
            AudioError::AsyncStreamError { .. } => AudioErrorCodes::ASYNC_STREAM_ERROR,
            AudioError::AlreadyStarted => AudioErrorCodes::ALREADY_STARTED,
            AudioError::LockPoisoned { .. } => AudioErrorCodes::LOCK_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            AudioError::StreamOpenFailed { reason } => {
                format!("Failed to open audio stream: {}", reason)
            }
            AudioError::StreamStartFailed { reason } => {
                format!("Failed to start audio stream: {}", reason)
            }
            AudioError::StreamCloseFailed { reason } => {
                format!("Failed to close audio stream: {}", reason)
            }
            AudioError::AsyncStreamError { reason } => {
                format!("Audio stream failed asynchronously: {}", reason)
            }
            AudioError::AlreadyStarted => {
                "Audio session already started. Call stop() first.".to_string()
            }
            AudioError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AudioError {}
