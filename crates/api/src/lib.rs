//! Typed application documents for the Stevedore scheduler API
//!
//! The scheduler's wire format splits every secret across two loosely
//! coupled JSON maps: `env` carries a marker object naming the secret next
//! to the plain string values, and `secrets` carries the source the value
//! is fetched from. This crate joins that pair into a single coherent model
//! on decode, where each [`Secret`] knows both the variable exposing it and
//! its source, then splits the model back apart on encode. All other
//! document fields pass through unchanged.
//!
//! # Example
//!
//! ```
//! use stevedore_api::{Application, EnvValue};
//!
//! # fn main() -> stevedore_api::Result<()> {
//! let mut app = Application::new("/orders/api");
//! app.add_env("DATABASE_NAME", "orders")
//!     .add_secret("DATABASE_PASSWORD", "db-pass", "vault/prod/db");
//!
//! let wire = app.to_json()?;
//! let decoded = Application::from_json(&wire)?;
//!
//! assert_eq!(decoded, app);
//! assert_eq!(
//!     decoded.env_value("DATABASE_PASSWORD"),
//!     Some(&EnvValue::SecretRef("db-pass".to_string()))
//! );
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod environment;
pub mod error;
mod wire;

pub use application::Application;
pub use environment::{EnvValue, Secret};
pub use error::{Error, Result};
