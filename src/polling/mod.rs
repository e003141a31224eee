//! Polling module
//!
//! Waits for asynchronous server-side operations to reach a terminal state.
//!
//! # Overview
//!
//! A `PollPolicy` describes a geometric backoff schedule (initial interval,
//! growth multiplier, ceiling) and an overall wall-clock timeout. The policy
//! runs a caller supplied refresh action until a stopping predicate holds or
//! the timeout elapses. Timeout is reported as `Ok(false)`, never as an error.

mod engine;
mod types;

pub use engine::{Refreshable, StatusResource};
pub use types::{
    is_terminal_state, is_terminal_state_with, Intervals, PollPolicy, TERMINAL_STATES,
};
