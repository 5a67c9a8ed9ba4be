#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, password hashing, bearer-token issuing and"]
#![doc = "verification, identity resolution, owner-scoped task storage, routing configuration,"]
#![doc = "and error handling for the TaskVault service. The binary (`main.rs`) wires these"]
#![doc = "together into an `HttpServer`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
