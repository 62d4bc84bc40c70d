//! AudioSession - exclusive playback stream lifecycle and clip control.
//!
//! One session owns one hardware playback stream through a [StreamBackend].
//! Control operations (start/stop/set_audio_data) run on the host's main
//! thread and serialize on a single mutex guarding the stream handle and
//! state; that mutex is never acquired on the real-time audio thread. Frame
//! production happens in [Renderer], fed through the lock-free clip exchange.
//!
//! Lifecycle: the host creates the session on resume and drops it on pause;
//! it can be started and stopped any number of times in between.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use crate::config::AudioConfig;
use crate::error::{log_audio_error, AudioError};

use super::backend::{StreamBackend, StreamInfo, StreamMonitor};
use super::exchange::{Clip, ClipSender, SampleExchange};
use super::renderer::Renderer;

/// Lifecycle state of the audio session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No stream exists
    Closed,
    /// Stream opened but not yet running (transient within start())
    Open,
    /// Stream running; the real-time callback is being invoked
    Started,
    /// Stop requested but the stream not yet released (transient within stop())
    Stopped,
    /// The subsystem reported an asynchronous stream error; the renderer
    /// emits silence until the control thread stops and reopens
    Erroring,
}

struct SessionInner {
    state: SessionState,
    backend: Box<dyn StreamBackend>,
    /// Control side of the clip exchange while a stream lives
    sender: Option<ClipSender>,
    monitor: Option<StreamMonitor>,
    info: Option<StreamInfo>,
    /// Master copy of the pending clip; reseeds the renderer on restart
    pending: Clip,
}

pub struct AudioSession {
    /// Guards the stream handle and state; control threads only
    inner: Mutex<SessionInner>,
    config: AudioConfig,
    frames_rendered: Arc<AtomicU64>,
}

impl AudioSession {
    /// Create a session with an explicit backend (dependency injection).
    pub fn new(config: AudioConfig, backend: Box<dyn StreamBackend>) -> Self {
        Self {
            inner: Mutex::new(SessionInner {
                state: SessionState::Closed,
                backend,
                sender: None,
                monitor: None,
                info: None,
                pending: Clip::new(),
            }),
            config,
            frames_rendered: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a session backed by the platform audio subsystem.
    pub fn with_default_backend(config: AudioConfig) -> Self {
        Self::new(config, super::backend::default_backend())
    }

    /// Open and start the playback stream.
    ///
    /// Only valid while Closed. On any failure the error is logged and
    /// returned, the session remains safely Closed, and no stream handle is
    /// retained.
    pub fn start(&self) -> Result<(), AudioError> {
        let mut inner = self.lock_inner()?;
        Self::reap_async_errors(&mut inner);

        if inner.state != SessionState::Closed {
            let err = AudioError::AlreadyStarted;
            log_audio_error(&err, "start");
            return Err(err);
        }

        let (sender, receiver) = SampleExchange::new(self.config.exchange_depth);
        let monitor = StreamMonitor::new();
        let renderer = Renderer::new(
            receiver,
            inner.pending.clone(),
            self.config.channel_count,
            Arc::clone(&monitor.erroring),
            Arc::clone(&self.frames_rendered),
        );

        inner.state = SessionState::Open;
        match inner.backend.start(&self.config, renderer, monitor.clone()) {
            Ok(stream_info) => {
                info!(
                    "audio stream started: {} Hz, {} channel(s), buffer {:?} frames",
                    stream_info.sample_rate, stream_info.channel_count, stream_info.buffer_frames
                );
                inner.sender = Some(sender);
                inner.monitor = Some(monitor);
                inner.info = Some(stream_info);
                inner.state = SessionState::Started;
                Ok(())
            }
            Err(err) => {
                inner.state = SessionState::Closed;
                log_audio_error(&err, "start");
                Err(err)
            }
        }
    }

    /// Stop and release the playback stream.
    ///
    /// Idempotent: calling on an already-closed session is a no-op. A close
    /// failure is logged and surfaced, but the handle is released and the
    /// session ends Closed regardless.
    pub fn stop(&self) -> Result<(), AudioError> {
        let mut inner = self.lock_inner()?;
        Self::reap_async_errors(&mut inner);

        if inner.state == SessionState::Closed {
            return Ok(());
        }

        inner.state = SessionState::Stopped;
        let result = inner.backend.stop();

        inner.sender = None;
        inner.monitor = None;
        inner.info = None;
        inner.state = SessionState::Closed;
        debug!("audio stream closed");

        if let Err(err) = result {
            log_audio_error(&err, "stop");
            return Err(err);
        }
        Ok(())
    }

    /// Replace the pending clip.
    ///
    /// May be called at any time, including while Started. The clip reaches
    /// the renderer through the lock-free exchange; the real-time side never
    /// waits on this call.
    pub fn set_audio_data(&self, samples: &[f32]) -> Result<(), AudioError> {
        let mut inner = self.lock_inner()?;
        inner.pending = samples.to_vec();

        let clip = inner.pending.clone();
        if let Some(sender) = inner.sender.as_mut() {
            if !sender.send(clip) {
                debug!("clip handoff ring full; renderer not draining");
            }
        }
        Ok(())
    }

    /// Current lifecycle state, folding in asynchronous stream errors.
    pub fn state(&self) -> Result<SessionState, AudioError> {
        let mut inner = self.lock_inner()?;
        Self::reap_async_errors(&mut inner);
        Ok(inner.state)
    }

    /// Properties of the running stream, if any.
    pub fn stream_info(&self) -> Result<Option<StreamInfo>, AudioError> {
        Ok(self.lock_inner()?.info)
    }

    /// Total frames produced by the real-time callback since creation.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered.load(Ordering::Relaxed)
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, SessionInner>, AudioError> {
        self.inner.lock().map_err(|_| {
            let err = AudioError::LockPoisoned {
                component: "audio_session".to_string(),
            };
            log_audio_error(&err, "lock_inner");
            err
        })
    }

    /// Fold asynchronous error-callback flags into the session state.
    ///
    /// After-close means the subsystem already released the stream: tell the
    /// backend to drop the dead handle and become Closed so the control
    /// thread can reopen. Before-close alone marks the session Erroring; the
    /// renderer is already emitting silence via the shared flag.
    fn reap_async_errors(inner: &mut SessionInner) {
        let (erroring, detached) = match inner.monitor.as_ref() {
            Some(monitor) => (
                monitor.erroring.load(Ordering::Acquire),
                monitor.detached.load(Ordering::Acquire),
            ),
            None => return,
        };

        if detached {
            log_audio_error(
                &AudioError::AsyncStreamError {
                    reason: "stream closed by subsystem".to_string(),
                },
                "stream_disconnect",
            );
            let _ = inner.backend.stop();
            inner.sender = None;
            inner.monitor = None;
            inner.info = None;
            inner.state = SessionState::Closed;
        } else if erroring && inner.state == SessionState::Started {
            inner.state = SessionState::Erroring;
        }
    }
}
