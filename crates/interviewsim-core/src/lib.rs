//! interviewsim-core — Question bank, answer scoring, and session aggregation.
//!
//! This crate defines the data model, the scoring strategies, and the session
//! logic that the rest of interviewsim builds on.

pub mod bank;
pub mod error;
pub mod history;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod session;
pub mod traits;
