//! # Authentication Module
//!
//! Opaque session tokens, password hashing, and the middleware that guards
//! every protected endpoint.

pub mod middleware;
pub mod models;
pub mod password;
pub mod session;
