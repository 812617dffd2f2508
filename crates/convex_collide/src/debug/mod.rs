//! Debug module for inspecting query internals
//!
//! Recording is opt-in and per call: pass a [`QueryTrace`] to the
//! `*_recorded` query methods, or `&mut ()` to record nothing.

pub mod query_trace;

pub use query_trace::{QueryRecorder, QueryTrace, QueryKind, GjkStep, RayCastStep, MprPortal, PenetrationContext};
