// Audio module - real-time playback session for the managed engine

pub mod backend;
pub mod exchange;
pub mod renderer;
pub mod session;

// Re-export commonly used types for convenience
pub use backend::{StreamBackend, StreamInfo, StreamMonitor};
pub use exchange::{Clip, ClipReceiver, ClipSender, SampleExchange, DEFAULT_EXCHANGE_DEPTH};
pub use renderer::Renderer;
pub use session::{AudioSession, SessionState};
