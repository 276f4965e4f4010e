//! Filter plugin registry.

use crate::plugin::PreparedFilter;
use crate::{FilterError, GRAPH_PLUGIN, NULL_PLUGIN};
use flujo_config::ConfigBlock;

/// Factory function type for preparing a filter from configuration.
pub type PluginInit = fn(&ConfigBlock) -> Result<Box<dyn PreparedFilter>, FilterError>;

/// Describes one filter plugin: a name and its prepare function.
#[derive(Clone, Copy)]
pub struct FilterPlugin {
    /// Plugin name used in pipeline configuration.
    pub name: &'static str,
    /// Brief description of what the plugin does.
    pub description: &'static str,
    /// Turns a configuration block into a prepared filter.
    pub init: PluginInit,
}

impl std::fmt::Debug for FilterPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPlugin")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of available filter plugins.
///
/// Populated explicitly at startup; the host dispatches pipeline entries
/// through [`prepare`](FilterRegistry::prepare) by plugin name.
pub struct FilterRegistry {
    entries: Vec<FilterPlugin>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FilterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a registry with the built-in plugins registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(GRAPH_PLUGIN);
        registry.register(NULL_PLUGIN);
        registry
    }

    /// Register a plugin. Later registrations win on name collision.
    pub fn register(&mut self, plugin: FilterPlugin) {
        self.entries.retain(|p| p.name != plugin.name);
        self.entries.push(plugin);
    }

    /// Get a plugin descriptor by name.
    pub fn get(&self, name: &str) -> Option<&FilterPlugin> {
        self.entries.iter().find(|p| p.name == name)
    }

    /// Names of all registered plugins, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|p| p.name).collect()
    }

    /// Prepare a filter by plugin name.
    pub fn prepare(
        &self,
        name: &str,
        block: &ConfigBlock,
    ) -> Result<Box<dyn PreparedFilter>, FilterError> {
        let plugin = self
            .get(name)
            .ok_or_else(|| FilterError::UnknownPlugin(name.to_string()))?;
        (plugin.init)(block)
    }
}
