pub mod api;
pub mod auth;
pub mod config;
pub mod docs;
pub mod error;
pub mod gateway;
pub mod model;
pub mod routes;
pub mod services;
pub mod util;

pub use config::Config;
pub use error::{Error, Result};
