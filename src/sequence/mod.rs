//! Sequential stroke reveal driven by a cooperative timer loop.

/// Timer loop, clocks and the one-call `run_sequence` entry point.
pub mod event_loop;
/// Per-run state machine.
pub mod run;
