// # Routes Module
//
// - HTTP route handlers, grouped by API area.
// - Each area exposes a `create_*_routes` function that is merged in `server.rs`.
// - Protected routes carry the `AuthMiddleware` layer themselves.

/// Health check endpoint
pub mod health;

/// Login and logout
pub mod auth;

/// Registration and current-user profile
pub mod users;

/// Contact CRUD and search
pub mod contacts;

/// Enveloped JSON/query extractors
pub mod extract;
