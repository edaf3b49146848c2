pub mod fallback;
pub mod handlers;
pub mod insights;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod requester;
pub mod service;
pub mod session;
