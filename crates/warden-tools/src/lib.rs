//! Tooling primitives for deterministic guard AI.
//!
//! Lightweight and engine-agnostic: events are recorded during simulation and rendered later by
//! whatever tooling wants them (CLI dumps, tests, inspectors).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink, Tracer, VecTraceSink};
