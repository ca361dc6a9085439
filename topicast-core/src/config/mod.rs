//! Configuration management for Topicast
//!
//! Settings are layered: built-in defaults, then the first TOML file found
//! (`topicast.toml` or `config.toml` in `.`, `./config` and the user config
//! directory), then `TOPICAST_*` environment variables.
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use topicast_core::config::ConfigLoader;
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct Settings {
//!     topic: String,
//! }
//!
//! let settings: Settings = ConfigLoader::new()
//!     .with_string_key("topic")
//!     .load()
//!     .expect("Failed to load configuration");
//! ```

pub mod loader;

pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
