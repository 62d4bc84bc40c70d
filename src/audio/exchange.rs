// SampleExchange - lock-free clip handoff between control and audio threads
//
// Two SPSC ring buffers connect the two pre-existing execution contexts:
// - incoming: control thread pushes replacement clips, the renderer adopts
//   the newest one at the start of its next callback
// - retired: the renderer pushes displaced clips, the control thread drops
//   them on its side
//
// Clips travel as whole Vec<f32> values, so the renderer can never observe a
// half-written buffer, and the audio thread never allocates or frees heap
// memory. Push/pop are wait-free with bounded execution time.

use rtrb::{Consumer, Producer, RingBuffer};

/// Default capacity of the incoming handoff ring.
pub const DEFAULT_EXCHANGE_DEPTH: usize = 8;

/// Interleaved f32 sample clip.
pub type Clip = Vec<f32>;

/// Control-thread side of the exchange.
pub struct ClipSender {
    incoming: Producer<Clip>,
    retired: Consumer<Clip>,
}

/// Audio-thread side of the exchange.
pub struct ClipReceiver {
    incoming: Consumer<Clip>,
    retired: Producer<Clip>,
}

/// Factory for the paired exchange endpoints.
pub struct SampleExchange;

impl SampleExchange {
    /// Create a connected sender/receiver pair.
    ///
    /// The retired ring holds one slot more than the incoming ring: the
    /// renderer can displace at most `depth` queued clips plus the one it
    /// currently owns before the sender drains again.
    ///
    /// # Panics
    /// Panics if `depth` is 0.
    pub fn new(depth: usize) -> (ClipSender, ClipReceiver) {
        assert!(depth > 0, "exchange depth must be greater than 0");

        let (incoming_tx, incoming_rx) = RingBuffer::new(depth);
        let (retired_tx, retired_rx) = RingBuffer::new(depth + 1);

        (
            ClipSender {
                incoming: incoming_tx,
                retired: retired_rx,
            },
            ClipReceiver {
                incoming: incoming_rx,
                retired: retired_tx,
            },
        )
    }
}

impl ClipSender {
    /// Queue a replacement clip for the renderer.
    ///
    /// Displaced clips shipped back by the renderer are dropped here, on the
    /// control thread. Returns false if the incoming ring is full (the
    /// renderer is not draining, e.g. the stream has stalled).
    pub fn send(&mut self, clip: Clip) -> bool {
        while self.retired.pop().is_ok() {}
        self.incoming.push(clip).is_ok()
    }
}

impl ClipReceiver {
    /// Adopt the newest queued clip, retiring any clips it skipped past.
    ///
    /// Wait-free; called from the real-time callback.
    pub fn poll(&mut self) -> Option<Clip> {
        let mut newest = None;
        while let Ok(clip) = self.incoming.pop() {
            if let Some(displaced) = newest.replace(clip) {
                let _ = self.retired.push(displaced);
            }
        }
        newest
    }

    /// Ship a displaced clip back to the control thread for disposal.
    ///
    /// The retired ring is sized so this cannot fill while the sender keeps
    /// draining; if it does fill anyway the clip is dropped in place as a
    /// last resort.
    pub fn retire(&mut self, clip: Clip) {
        let _ = self.retired.push(clip);
    }
}
