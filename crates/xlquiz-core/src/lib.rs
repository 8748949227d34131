//! xlquiz-core — Question bank, grading engine, and interview session state.
//!
//! This crate holds everything that is deterministic about an interview:
//! the fixed question bank, the per-question keyword rules, the hands-on
//! table validator, and the session state machine that turns answers into
//! a report and an exportable transcript.

pub mod bank;
pub mod config;
pub mod confidence;
pub mod error;
pub mod feedback;
pub mod grading;
pub mod report;
pub mod session;
pub mod table;
