//! Internal generation handlers: prompt in, validated JSON payload out.
//! All model calls go through `llm_client`; no direct Gemini calls here.

pub mod defaults;
pub mod handlers;
pub mod parse;
