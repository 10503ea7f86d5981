//! # Emit Configuration
//!
//! Caller overrides for the emitter. Every field has a default from
//! `config::constants`, so a partial JSON document is enough:
//!
//! ```rust
//! use go_emit::EmitConfig;
//!
//! let config: EmitConfig = serde_json::from_str(r#"{ "parallel": false }"#).unwrap();
//! assert_eq!(config.extension, "go");
//! assert!(!config.parallel);
//! ```

use config::constants::{DEFAULT_PACKAGE_NAME, TARGET_EXTENSION};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// File extension of emitted files, without the dot
    pub extension: String,
    /// Package clause for classes declared without a package
    pub default_package: String,
    /// Build units and render classes on the rayon thread pool
    pub parallel: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            extension: TARGET_EXTENSION.to_string(),
            default_package: DEFAULT_PACKAGE_NAME.to_string(),
            parallel: true,
        }
    }
}
