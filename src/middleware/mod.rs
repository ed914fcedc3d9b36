//! Request extractors: bearer-token authentication and validated JSON/query input.

pub mod auth;
pub mod extract;
