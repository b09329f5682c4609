// Input handling
//
// Raw window events are mapped to discrete player intents, which the game
// layer turns into character state-change requests.
//
// - `action`: intents and default bindings
// - `config`: rebindable source -> intent mapping
// - `manager`: collects the intents pressed each frame
//
// ## Usage Example
//
// ```rust,ignore
// let mut input = InputManager::new();
//
// // In your event loop, process keyboard events
// input.process_keyboard_event(&key_event);
//
// // Once per frame, hand the collected intents to the character
// for intent in input.drain_intents() {
//     character.handle_intent(intent)?;
// }
// ```

pub mod action;
pub mod config;
pub mod manager;

// Re-export commonly used types
pub use action::{InputSource, Intent};
pub use config::InputConfig;
pub use manager::InputManager;
