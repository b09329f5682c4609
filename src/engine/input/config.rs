// Input configuration and remapping

use super::action::{default_bindings, InputSource, Intent};
use std::collections::HashMap;

/// Maps input sources (keys/buttons) to player intents
#[derive(Debug, Clone, Default)]
pub struct InputConfig {
    /// Mapping from input sources to intents
    bindings: HashMap<InputSource, Intent>,

    /// Reverse mapping for quick lookups (intent -> all sources)
    intent_to_sources: HashMap<Intent, Vec<InputSource>>,
}

impl InputConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with the default bindings
    pub fn with_defaults() -> Self {
        Self::from_bindings(default_bindings())
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(bindings: Vec<(InputSource, Intent)>) -> Self {
        let mut config = Self::new();
        for (source, intent) in bindings {
            config.bind(source, intent);
        }
        config
    }

    /// Bind an input source to an intent, replacing its previous binding
    pub fn bind(&mut self, source: InputSource, intent: Intent) {
        self.unbind_source(source);

        self.bindings.insert(source, intent);
        self.intent_to_sources
            .entry(intent)
            .or_default()
            .push(source);
    }

    /// Unbind an input source
    pub fn unbind_source(&mut self, source: InputSource) {
        if let Some(intent) = self.bindings.remove(&source) {
            if let Some(sources) = self.intent_to_sources.get_mut(&intent) {
                sources.retain(|s| *s != source);
                if sources.is_empty() {
                    self.intent_to_sources.remove(&intent);
                }
            }
        }
    }

    /// Unbind all sources for an intent
    pub fn unbind_intent(&mut self, intent: Intent) {
        if let Some(sources) = self.intent_to_sources.remove(&intent) {
            for source in sources {
                self.bindings.remove(&source);
            }
        }
    }

    /// Get the intent bound to an input source
    pub fn get_intent(&self, source: InputSource) -> Option<Intent> {
        self.bindings.get(&source).copied()
    }

    /// Get all input sources bound to an intent
    pub fn get_sources(&self, intent: Intent) -> Vec<InputSource> {
        self.intent_to_sources
            .get(&intent)
            .cloned()
            .unwrap_or_default()
    }

    /// Check if an intent has any bindings
    pub fn has_binding(&self, intent: Intent) -> bool {
        self.intent_to_sources.contains_key(&intent)
    }

    /// Clear all bindings
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.intent_to_sources.clear();
    }

    /// Reset to default bindings
    pub fn reset_to_defaults(&mut self) {
        self.clear();
        for (source, intent) in default_bindings() {
            self.bind(source, intent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_defaults_bind_jump() {
        let config = InputConfig::with_defaults();
        assert_eq!(
            config.get_intent(InputSource::key(KeyCode::Space)),
            Some(Intent::Jump)
        );
    }

    #[test]
    fn test_rebind_replaces_previous_binding() {
        let mut config = InputConfig::with_defaults();
        let space = InputSource::key(KeyCode::Space);

        config.bind(space, Intent::Slide);
        assert_eq!(config.get_intent(space), Some(Intent::Slide));
        assert!(!config.has_binding(Intent::Jump));
        assert_eq!(config.get_sources(Intent::Slide).len(), 3);
    }

    #[test]
    fn test_unbind_intent() {
        let mut config = InputConfig::with_defaults();
        config.unbind_intent(Intent::Slide);

        assert!(!config.has_binding(Intent::Slide));
        assert_eq!(config.get_intent(InputSource::key(KeyCode::KeyC)), None);
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut config = InputConfig::with_defaults();
        config.clear();
        assert!(!config.has_binding(Intent::Run));

        config.reset_to_defaults();
        assert!(config.has_binding(Intent::Run));
    }
}
