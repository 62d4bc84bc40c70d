// cpal-backed playback stream (desktop)
//
// cpal's Stream is not Send, so the stream lives on a dedicated worker thread
// for its whole lifetime; start() blocks until the worker reports whether the
// stream opened, and stop() signals the worker and joins it, which drops the
// stream and drains the data callback.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, error, warn};
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::thread;

use crate::audio::renderer::Renderer;
use crate::config::AudioConfig;
use crate::error::AudioError;

use super::{StreamBackend, StreamInfo, StreamMonitor};

pub struct CpalBackend {
    worker: Option<Worker>,
}

struct Worker {
    shutdown_tx: mpsc::Sender<()>,
    join: thread::JoinHandle<()>,
}

impl CpalBackend {
    pub fn new() -> Self {
        Self { worker: None }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open_stream(
    config: &AudioConfig,
    mut renderer: Renderer,
    monitor: StreamMonitor,
) -> Result<cpal::Stream, AudioError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| AudioError::StreamOpenFailed {
            reason: "No default output device found".to_string(),
        })?;

    let stream_config = cpal::StreamConfig {
        channels: config.channel_count as u16,
        sample_rate: cpal::SampleRate(config.sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let err_fn = move |err| {
        // cpal reports stream errors on its own thread; flag the session so
        // the renderer emits silence and the control thread can reopen
        monitor.erroring.store(true, Ordering::Release);
        monitor.detached.store(true, Ordering::Release);
        error!("output stream error: {}", err);
    };

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                renderer.render(data);
            },
            err_fn,
            None,
        )
        .map_err(|e| AudioError::StreamOpenFailed {
            reason: format!("{:?}", e),
        })?;

    stream.play().map_err(|e| AudioError::StreamStartFailed {
        reason: format!("{:?}", e),
    })?;

    Ok(stream)
}

impl StreamBackend for CpalBackend {
    fn start(
        &mut self,
        config: &AudioConfig,
        renderer: Renderer,
        monitor: StreamMonitor,
    ) -> Result<StreamInfo, AudioError> {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let thread_config = config.clone();

        let join = thread::Builder::new()
            .name("cpal-audio".to_string())
            .spawn(move || {
                let stream = match open_stream(&thread_config, renderer, monitor) {
                    Ok(stream) => {
                        let _ = ready_tx.send(Ok(()));
                        stream
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };

                // Park until stop() signals or the backend is dropped
                let _ = shutdown_rx.recv();
                drop(stream);
                debug!("cpal worker thread exiting");
            })
            .map_err(|e| AudioError::StreamOpenFailed {
                reason: format!("failed to spawn audio worker: {}", e),
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                self.worker = Some(Worker { shutdown_tx, join });
                Ok(StreamInfo {
                    sample_rate: config.sample_rate,
                    channel_count: config.channel_count,
                    buffer_frames: None,
                })
            }
            Ok(Err(err)) => {
                // Worker exits on its own after reporting the failure
                let _ = join.join();
                Err(err)
            }
            Err(_) => {
                let _ = join.join();
                Err(AudioError::StreamOpenFailed {
                    reason: "audio worker exited before reporting readiness".to_string(),
                })
            }
        }
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        let _ = worker.shutdown_tx.send(());
        if worker.join.join().is_err() {
            warn!("cpal worker thread panicked during shutdown");
            return Err(AudioError::StreamCloseFailed {
                reason: "audio worker panicked".to_string(),
            });
        }
        Ok(())
    }
}
