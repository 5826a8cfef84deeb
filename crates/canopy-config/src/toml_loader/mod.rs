//! TOML config file loading.

mod loader;
mod paths;

#[cfg(test)]
mod tests;

pub use loader::{from_toml_str, load_default, load_from_path};
pub use paths::default_config_path;
