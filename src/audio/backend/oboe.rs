// Oboe-backed playback stream (Android)
//
// Configures the subsystem for exclusive low-latency float output and
// registers the renderer as the data callback. The buffer size is requested
// as a multiple of the device burst; the grant is logged but not validated.

use log::{debug, error, warn};
use oboe::{
    AudioOutputCallback, AudioOutputStreamSafe, AudioStream, AudioStreamAsync, AudioStreamBase,
    AudioStreamBuilder, DataCallbackResult, Output, PerformanceMode, SharingMode, Usage,
};
use std::sync::atomic::Ordering;

use crate::audio::renderer::Renderer;
use crate::config::AudioConfig;
use crate::error::AudioError;

use super::{StreamBackend, StreamInfo, StreamMonitor};

pub struct OboeBackend {
    stream: Option<AudioStreamAsync<Output, SessionCallback>>,
    monitor: Option<StreamMonitor>,
}

impl OboeBackend {
    pub fn new() -> Self {
        Self {
            stream: None,
            monitor: None,
        }
    }
}

impl Default for OboeBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Callback registered with the oboe stream.
///
/// `on_audio_ready` runs on the real-time audio thread and delegates straight
/// to the renderer. The error callbacks only flip shared atomics; oboe
/// delivers them off the real-time thread, and any reopening is left to the
/// control thread.
struct SessionCallback {
    renderer: Renderer,
    monitor: StreamMonitor,
}

impl AudioOutputCallback for SessionCallback {
    type FrameType = (f32, oboe::Mono);

    fn on_audio_ready(
        &mut self,
        _stream: &mut dyn AudioOutputStreamSafe,
        frames: &mut [f32],
    ) -> DataCallbackResult {
        // Real-time thread: no allocations, locks, or blocking
        self.renderer.render(frames);
        DataCallbackResult::Continue
    }

    fn on_error_before_close(
        &mut self,
        _stream: &mut dyn AudioOutputStreamSafe,
        error: oboe::Error,
    ) {
        // Stream handle is still valid here; flag the renderer to emit
        // silence until the control thread reopens the session
        self.monitor.erroring.store(true, Ordering::Release);
        error!("audio stream error before close: {:?}", error);
    }

    fn on_error_after_close(
        &mut self,
        _stream: &mut dyn AudioOutputStreamSafe,
        error: oboe::Error,
    ) {
        // Subsystem already tore the stream down; the control thread drops
        // the dead handle on its next start/stop
        self.monitor.detached.store(true, Ordering::Release);
        error!("audio stream error after close: {:?}", error);
    }
}

impl StreamBackend for OboeBackend {
    fn start(
        &mut self,
        config: &AudioConfig,
        renderer: Renderer,
        monitor: StreamMonitor,
    ) -> Result<StreamInfo, AudioError> {
        // The callback frame type fixes the stream to mono; a config asking
        // for more channels would silently desync the renderer's interleaving
        if config.channel_count != 1 {
            return Err(AudioError::StreamOpenFailed {
                reason: format!(
                    "unsupported channel count {} (stream opens mono)",
                    config.channel_count
                ),
            });
        }

        let callback = SessionCallback {
            renderer,
            monitor: monitor.clone(),
        };

        let mut stream = AudioStreamBuilder::default()
            .set_performance_mode(PerformanceMode::LowLatency)
            .set_sharing_mode(SharingMode::Exclusive)
            .set_usage(Usage::Game)
            .set_direction::<Output>()
            .set_sample_rate(config.sample_rate as i32)
            .set_channel_count::<oboe::Mono>()
            .set_format::<f32>()
            .set_callback(callback)
            .open_stream()
            .map_err(|e| AudioError::StreamOpenFailed {
                reason: format!("{:?}", e),
            })?;

        let burst = stream.get_frames_per_burst();
        let requested = burst * config.burst_multiplier as i32;
        match stream.set_buffer_size_in_frames(requested) {
            Ok(granted) => debug!(
                "buffer size set to {} frames ({} requested, burst {})",
                granted, requested, burst
            ),
            Err(e) => warn!("set_buffer_size_in_frames({}) failed: {:?}", requested, e),
        }

        if let Err(e) = stream.start() {
            // Never leave a half-open stream reachable from later calls
            if let Err(close_err) = stream.close() {
                warn!("closing stream after failed start: {:?}", close_err);
            }
            return Err(AudioError::StreamStartFailed {
                reason: format!("{:?}", e),
            });
        }

        let info = StreamInfo {
            sample_rate: stream.get_sample_rate() as u32,
            channel_count: config.channel_count,
            buffer_frames: Some(stream.get_buffer_size_in_frames()),
        };

        self.stream = Some(stream);
        self.monitor = Some(monitor);

        Ok(info)
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };
        let monitor = self.monitor.take();

        // If the subsystem already closed the stream asynchronously there is
        // nothing left to stop; just release the handle.
        if monitor
            .map(|m| m.detached.load(Ordering::Acquire))
            .unwrap_or(false)
        {
            debug!("stream already closed by subsystem; releasing handle");
            return Ok(());
        }

        if let Err(e) = stream.stop() {
            warn!("stopping audio stream failed: {:?}", e);
        }

        // The handle is released when `stream` drops, success or not
        stream.close().map_err(|e| AudioError::StreamCloseFailed {
            reason: format!("{:?}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::exchange::SampleExchange;
    use std::sync::atomic::AtomicU64;
    use std::sync::Arc;

    #[test]
    fn test_start_rejects_non_mono_config() {
        let config = AudioConfig {
            channel_count: 2,
            ..AudioConfig::default()
        };
        let monitor = StreamMonitor::new();
        let (_sender, receiver) = SampleExchange::new(config.exchange_depth);
        let renderer = Renderer::new(
            receiver,
            Vec::new(),
            config.channel_count,
            Arc::clone(&monitor.erroring),
            Arc::new(AtomicU64::new(0)),
        );

        let mut backend = OboeBackend::new();
        let err = backend.start(&config, renderer, monitor).unwrap_err();
        assert!(matches!(err, AudioError::StreamOpenFailed { .. }));
    }
}
