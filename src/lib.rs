// Locomotion animation for a skinned runner character

pub mod core;
pub mod engine;
pub mod game;
