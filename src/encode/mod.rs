//! Frame sinks: memory, PNG sequences and MP4 via system `ffmpeg`.

/// MP4 encoding through a spawned `ffmpeg`.
pub mod ffmpeg;
/// Sink trait and the in-process sinks.
pub mod sink;
