//! Student profile intake: education stage, stream, interests.

pub mod handlers;
pub mod models;
pub mod validation;
