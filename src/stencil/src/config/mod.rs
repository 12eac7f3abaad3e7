//! User configuration loading.
//!
//! The user config is an optional TOML file providing default context
//! values, the replay directory, extra template extensions and an
//! alternative manifest template.

mod user_config;

pub use user_config::{UserConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
