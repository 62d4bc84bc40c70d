//! Stream backend abstractions over the platform audio subsystems.
//!
//! The session never subclasses a subsystem type; it registers a [Renderer]
//! and a [StreamMonitor] with whichever [StreamBackend] it was constructed
//! with. Tests drive the same lifecycle through a mock backend.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::audio::renderer::Renderer;
use crate::config::AudioConfig;
use crate::error::AudioError;

/// Flags shared between the session and the subsystem's error callbacks.
///
/// `erroring` is raised by the before-close callback (while the stream handle
/// is still valid) so the renderer switches to emitting silence.
/// `detached` is raised by the after-close callback, once the subsystem has
/// already torn the stream down, so the control thread knows to drop the dead
/// handle on its next start/stop instead of closing it again.
#[derive(Clone)]
pub struct StreamMonitor {
    pub erroring: Arc<AtomicBool>,
    pub detached: Arc<AtomicBool>,
}

impl StreamMonitor {
    pub fn new() -> Self {
        Self {
            erroring: Arc::new(AtomicBool::new(false)),
            detached: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for StreamMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Properties of an opened stream, reported back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channel_count: usize,
    /// Granted buffer size in frames, where the subsystem reports one.
    /// Informational only; the grant is not validated against the request.
    pub buffer_frames: Option<i32>,
}

/// Capability interface implemented by platform audio backends.
///
/// `start` opens an exclusive low-latency float stream, applies the buffer
/// size policy, and requests the stream to run; on any failure it must leave
/// no half-open stream behind. `stop` is idempotent and must drain the
/// real-time callback before returning.
pub trait StreamBackend: Send {
    fn start(
        &mut self,
        config: &AudioConfig,
        renderer: Renderer,
        monitor: StreamMonitor,
    ) -> Result<StreamInfo, AudioError>;

    fn stop(&mut self) -> Result<(), AudioError>;
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "android")] {
        mod oboe;
        pub use self::oboe::OboeBackend;

        /// Platform backend for the current target.
        pub fn default_backend() -> Box<dyn StreamBackend> {
            Box::new(OboeBackend::new())
        }
    } else {
        mod cpal;
        pub use self::cpal::CpalBackend;

        /// Platform backend for the current target.
        pub fn default_backend() -> Box<dyn StreamBackend> {
            Box::new(CpalBackend::new())
        }
    }
}
