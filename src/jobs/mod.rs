//! Polling try-on jobs until they reach a terminal status.

mod poll;

pub use poll::{BatchSource, JobPoller, JobSource, PollConfig};
