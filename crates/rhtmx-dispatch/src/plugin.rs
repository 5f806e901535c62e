// File: src/plugin.rs
// Purpose: Validates a host and installs verb dispatch on it

use crate::config::DispatchConfig;
use crate::{mixer, App};

pub const PLUGIN_NAME: &str = "rhtmx-dispatch";

/// Whether the dispatch plugin may be installed on `app`
///
/// Plain views are rejected, and so is a host that already has the plugin.
pub fn is_valid(app: &App) -> bool {
    app.capabilities().is_host() && !app.is_registered(PLUGIN_NAME)
}

/// Installs verb methods, routing options and extra verbs on a host
#[derive(Debug, Clone, Default)]
pub struct DispatchPlugin {
    config: DispatchConfig,
}

impl DispatchPlugin {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Returns `false`, leaving the host untouched, when it is not valid
    pub fn install(&self, app: &mut App) -> bool {
        if !is_valid(app) {
            tracing::warn!(host = app.name(), "dispatch plugin not installed");
            return false;
        }

        app.mark_registered(PLUGIN_NAME);
        let added = app.registry.extend(self.config.methods.iter().cloned());
        if app.routes.is_created() {
            app.routes.ensure(&app.registry, Some(&added));
        }
        app.routes.set_case_insensitive(self.config.case_insensitive);
        mixer::mix(app);

        tracing::debug!(host = app.name(), verbs = app.methods().len(), "dispatch plugin installed");
        true
    }
}
