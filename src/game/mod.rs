// Game layer: characters and their animation logic

pub mod characters;
