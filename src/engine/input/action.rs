// Player intents and their default bindings

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Discrete player intents fed to the character each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    // Locomotion
    Run,
    Idle,
    Jump,
    /// The character touched ground again after a jump
    Land,

    // One-shot moves played directly, bypassing the state machine
    Slide,

    // Meta
    Pause,
}

/// Represents an input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    /// Create a mouse button input source
    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Default keyboard/mouse bindings
pub fn default_bindings() -> Vec<(InputSource, Intent)> {
    vec![
        (InputSource::key(KeyCode::KeyW), Intent::Run),
        (InputSource::key(KeyCode::KeyS), Intent::Idle),
        (InputSource::key(KeyCode::Space), Intent::Jump),
        (InputSource::key(KeyCode::KeyE), Intent::Land),
        (InputSource::key(KeyCode::KeyC), Intent::Slide),
        (InputSource::mouse(MouseButton::Right), Intent::Slide),
        (InputSource::key(KeyCode::KeyP), Intent::Pause),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_source_keyboard_creation() {
        let source = InputSource::key(KeyCode::Space);
        assert_eq!(source, InputSource::Keyboard(KeyCode::Space));
    }

    #[test]
    fn test_input_source_mouse_creation() {
        let source = InputSource::mouse(MouseButton::Right);
        assert_eq!(source, InputSource::Mouse(MouseButton::Right));
    }

    #[test]
    fn test_space_jumps_by_default() {
        let bindings = default_bindings();
        assert!(bindings.contains(&(InputSource::key(KeyCode::Space), Intent::Jump)));
    }

    #[test]
    fn test_no_duplicate_inputs() {
        let bindings = default_bindings();
        let mut seen_sources = std::collections::HashSet::new();
        for (source, _) in bindings {
            assert!(
                seen_sources.insert(source),
                "Duplicate input source found in default bindings"
            );
        }
    }
}
