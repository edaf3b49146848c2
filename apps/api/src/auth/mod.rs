//! Email + password accounts with opaque, server-side session tokens.
//!
//! `login`/`register` issue a token (cookie `sb_session` and response body);
//! protected handlers take a `CurrentUser`, which restores the identity from
//! the token on every request. `logout` revokes the token.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod sessions;
