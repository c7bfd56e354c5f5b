#![doc = "The `tasklock` library crate."]
#![doc = ""]
#![doc = "This crate contains the session authority (registration, login, token refresh"]
#![doc = "and revocation), the per-user task store with encrypted descriptions, the"]
#![doc = "storage traits behind both, routing configuration and error handling."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the server."]

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod store;
pub mod tasks;

pub use crate::auth::SessionAuthority;
pub use crate::error::AppError;
pub use crate::tasks::TaskStore;
