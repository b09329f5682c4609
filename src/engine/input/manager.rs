// Input manager - turns raw window events into per-frame intents

use super::action::{InputSource, Intent};
use super::config::InputConfig;
use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::PhysicalKey;

/// Collects intents triggered since the last frame
#[derive(Debug, Default)]
pub struct InputManager {
    config: InputConfig,

    /// Intents pressed this frame, in press order
    just_pressed: Vec<Intent>,

    /// Intents currently held
    held: HashSet<Intent>,
}

impl InputManager {
    /// Create an input manager with the default bindings
    pub fn new() -> Self {
        Self::with_config(InputConfig::with_defaults())
    }

    pub fn with_config(config: InputConfig) -> Self {
        Self {
            config,
            just_pressed: Vec::new(),
            held: HashSet::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_source(InputSource::key(key_code), event.state, event.repeat);
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_event(&mut self, button: MouseButton, state: ElementState) {
        self.process_source(InputSource::mouse(button), state, false);
    }

    fn process_source(&mut self, source: InputSource, state: ElementState, repeat: bool) {
        let Some(intent) = self.config.get_intent(source) else {
            return;
        };

        match state {
            ElementState::Pressed => {
                // Key repeats are not new intents
                if !repeat {
                    self.press(intent);
                }
            }
            ElementState::Released => self.release(intent),
        }
    }

    pub(crate) fn press(&mut self, intent: Intent) {
        if self.held.insert(intent) {
            self.just_pressed.push(intent);
        }
    }

    pub(crate) fn release(&mut self, intent: Intent) {
        self.held.remove(&intent);
    }

    /// Take the intents pressed since the last call
    pub fn drain_intents(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.just_pressed)
    }

    /// Check if an intent is currently held
    pub fn is_held(&self, intent: Intent) -> bool {
        self.held.contains(&intent)
    }

    /// Forget all held and pending intents (e.g. on focus loss)
    pub fn reset(&mut self) {
        self.just_pressed.clear();
        self.held.clear();
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut InputConfig {
        &mut self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_press_yields_intent_once() {
        let mut manager = InputManager::new();
        manager.press(Intent::Jump);
        // Holding does not re-trigger
        manager.press(Intent::Jump);

        assert_eq!(manager.drain_intents(), vec![Intent::Jump]);
        assert!(manager.drain_intents().is_empty());
        assert!(manager.is_held(Intent::Jump));
    }

    #[test]
    fn test_release_allows_next_press() {
        let mut manager = InputManager::new();
        manager.press(Intent::Jump);
        manager.release(Intent::Jump);
        manager.press(Intent::Jump);

        assert_eq!(manager.drain_intents(), vec![Intent::Jump, Intent::Jump]);
    }

    #[test]
    fn test_intents_keep_press_order() {
        let mut manager = InputManager::new();
        manager.press(Intent::Run);
        manager.press(Intent::Jump);

        assert_eq!(manager.drain_intents(), vec![Intent::Run, Intent::Jump]);
    }

    #[test]
    fn test_mouse_binding() {
        let mut manager = InputManager::new();
        manager.process_mouse_event(MouseButton::Right, ElementState::Pressed);
        assert_eq!(manager.drain_intents(), vec![Intent::Slide]);

        manager.process_mouse_event(MouseButton::Left, ElementState::Pressed);
        assert!(manager.drain_intents().is_empty());
    }

    #[test]
    fn test_unbound_source_ignored() {
        let mut manager = InputManager::with_config(InputConfig::new());
        manager.process_source(InputSource::key(KeyCode::Space), ElementState::Pressed, false);
        assert!(manager.drain_intents().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut manager = InputManager::new();
        manager.press(Intent::Run);
        manager.reset();
        assert!(!manager.is_held(Intent::Run));
        assert!(manager.drain_intents().is_empty());
    }
}
