//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults (testnet deployment)
//!     → loader.rs (optional TOML file)
//!     → loader.rs (environment overlay, injectable lookup)
//!     → validation.rs (semantic checks, at process start)
//!     → TrustConfig (immutable)
//!     → shared via Arc to the skill and the HTTP surface
//! ```
//!
//! # Design Decisions
//! - Config is built once; nothing below this layer reads the environment
//! - All fields have defaults except the signing key
//! - A missing signing key is only an error when a signed action runs

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env, load_config, ConfigError, EnvWarning};
pub use schema::{
    BlockchainConfig, ContractsConfig, LogFormat, ObservabilityConfig, ServerConfig, SigningKey,
    TrustConfig,
};
pub use validation::{validate_config, ValidationError};
