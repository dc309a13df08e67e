//! Functions for loading context settings.

use std::env;

use serde::{Deserialize, Serialize};

use crate::errors::*;

/// The environment variable read by `ContextParams::from_env`.
pub const DISABLE_EXTENSIONS_ENV: &str = "CRAYON_GL_DISABLE_EXTENSIONS";

/// A structure containing configuration data for a context, used to work
/// around broken drivers or to exercise fallback code paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextParams {
    /// Extensions which are reported as unsupported even when the driver
    /// advertises them, e.g. `"GL_ARB_direct_state_access"`.
    pub disabled_extensions: Vec<String>,
    /// Logs capabilities and the selected implementations with `info!`
    /// instead of `debug!`.
    pub verbose: bool,
}

impl ContextParams {
    /// Parses params from a json document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads the space separated list of disabled extensions from the
    /// environment.
    pub fn from_env() -> Self {
        let mut params = ContextParams::default();
        if let Ok(v) = env::var(DISABLE_EXTENSIONS_ENV) {
            params.disable(v.split_whitespace());
        }

        params
    }

    /// Adds extensions to the disabled list, ignoring duplicates.
    pub fn disable<I, T>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.disabled_extensions.contains(&name) {
                self.disabled_extensions.push(name);
            }
        }

        self
    }
}
