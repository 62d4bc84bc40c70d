// Real-time clip renderer
//
// Everything invoked from the subsystem's data callback lives here. The
// render path performs no heap allocation, takes no locks, and touches only
// the SPSC rings and shared atomics, so it completes within the buffer's
// time budget on every invocation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::exchange::{Clip, ClipReceiver};

/// Fills the subsystem's output buffers from the current clip.
///
/// Owned by the audio thread once the stream is running. The control thread
/// communicates with it exclusively through the clip exchange and the shared
/// atomic flags.
pub struct Renderer {
    receiver: ClipReceiver,
    /// Current clip; empty means silence
    clip: Clip,
    /// Read position within `clip`, in samples
    position: usize,
    channel_count: usize,
    /// Raised by the before-close error callback; forces silence
    erroring: Arc<AtomicBool>,
    /// Total frames produced, for diagnostics
    frames_rendered: Arc<AtomicU64>,
}

impl Renderer {
    pub fn new(
        receiver: ClipReceiver,
        initial_clip: Clip,
        channel_count: usize,
        erroring: Arc<AtomicBool>,
        frames_rendered: Arc<AtomicU64>,
    ) -> Self {
        assert!(channel_count > 0, "channel_count must be greater than 0");
        Self {
            receiver,
            clip: initial_clip,
            position: 0,
            channel_count,
            erroring,
            frames_rendered,
        }
    }

    /// Produce exactly `output.len()` interleaved samples.
    ///
    /// With no clip (or while the stream is erroring) the output is silence.
    /// A clip shorter than the requested region is read cyclically, wrapping
    /// the read index modulo the clip length for seamless looped playback.
    pub fn render(&mut self, output: &mut [f32]) {
        // Adopt the newest queued clip and ship the old one off this thread
        if let Some(next) = self.receiver.poll() {
            let displaced = std::mem::replace(&mut self.clip, next);
            self.receiver.retire(displaced);
            self.position = 0;
        }

        if self.clip.is_empty() || self.erroring.load(Ordering::Acquire) {
            output.fill(0.0);
        } else {
            let len = self.clip.len();
            for sample in output.iter_mut() {
                *sample = self.clip[self.position];
                self.position += 1;
                if self.position == len {
                    self.position = 0;
                }
            }
        }

        self.frames_rendered
            .fetch_add((output.len() / self.channel_count) as u64, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::exchange::SampleExchange;

    fn test_renderer(initial: Clip, channel_count: usize) -> (crate::audio::ClipSender, Renderer) {
        let (tx, rx) = SampleExchange::new(4);
        let renderer = Renderer::new(
            rx,
            initial,
            channel_count,
            Arc::new(AtomicBool::new(false)),
            Arc::new(AtomicU64::new(0)),
        );
        (tx, renderer)
    }

    #[test]
    fn test_empty_clip_renders_silence() {
        let (_tx, mut renderer) = test_renderer(Vec::new(), 1);

        let mut output = [0.7_f32; 256];
        renderer.render(&mut output);

        assert!(output.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_short_clip_wraps_cyclically() {
        // Clip of length 3, asked for 8 samples: wrap at index 3 back to 0
        let (_tx, mut renderer) = test_renderer(vec![0.1, 0.2, 0.3], 1);

        let mut output = [0.0_f32; 8];
        renderer.render(&mut output);

        assert_eq!(&output[..3], &[0.1, 0.2, 0.3]);
        assert_eq!(output[3], 0.1);
        assert_eq!(&output[4..6], &[0.2, 0.3]);
    }

    #[test]
    fn test_two_sample_clip_four_mono_frames() {
        let (_tx, mut renderer) = test_renderer(vec![0.5, -0.5], 1);

        let mut output = [0.0_f32; 4];
        renderer.render(&mut output);

        assert_eq!(output, [0.5, -0.5, 0.5, -0.5]);
    }

    #[test]
    fn test_position_persists_across_callbacks() {
        let (_tx, mut renderer) = test_renderer(vec![0.1, 0.2, 0.3], 1);

        let mut first = [0.0_f32; 2];
        renderer.render(&mut first);
        assert_eq!(first, [0.1, 0.2]);

        let mut second = [0.0_f32; 2];
        renderer.render(&mut second);
        assert_eq!(second, [0.3, 0.1]);
    }

    #[test]
    fn test_clip_replacement_resets_position() {
        let (mut tx, mut renderer) = test_renderer(vec![0.1, 0.2, 0.3, 0.4], 1);

        let mut output = [0.0_f32; 2];
        renderer.render(&mut output);
        assert_eq!(output, [0.1, 0.2]);

        assert!(tx.send(vec![0.9, 0.8]));

        renderer.render(&mut output);
        assert_eq!(output, [0.9, 0.8]);
    }

    #[test]
    fn test_erroring_flag_forces_silence() {
        let (tx, rx) = SampleExchange::new(4);
        let erroring = Arc::new(AtomicBool::new(false));
        let mut renderer = Renderer::new(
            rx,
            vec![0.5, 0.5],
            1,
            Arc::clone(&erroring),
            Arc::new(AtomicU64::new(0)),
        );
        drop(tx);

        let mut output = [0.0_f32; 4];
        renderer.render(&mut output);
        assert_eq!(output, [0.5, 0.5, 0.5, 0.5]);

        erroring.store(true, Ordering::Release);
        renderer.render(&mut output);
        assert!(output.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_frame_accounting_respects_channel_count() {
        let (tx, rx) = SampleExchange::new(4);
        let frames = Arc::new(AtomicU64::new(0));
        let mut renderer = Renderer::new(
            rx,
            vec![0.1, 0.2],
            2,
            Arc::new(AtomicBool::new(false)),
            Arc::clone(&frames),
        );
        drop(tx);

        // 8 interleaved stereo samples = 4 frames
        let mut output = [0.0_f32; 8];
        renderer.render(&mut output);

        assert_eq!(frames.load(Ordering::Relaxed), 4);
    }
}
