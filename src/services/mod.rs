//! # Services Module
//!
//! Business logic behind the HTTP handlers.

pub mod contact_query;
pub mod contacts;
pub mod pagination;
pub mod users;
pub mod validation;

pub use contacts::ContactService;
pub use users::UserService;
