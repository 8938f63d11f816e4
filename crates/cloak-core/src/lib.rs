//! Cloak Core: configuration, error types and the entity taxonomy.

pub mod config;
pub mod error;
pub mod taxonomy;

pub use config::{CloakConfig, ModelNames};
pub use error::{Error, Result};
pub use taxonomy::EntityType;
