// Engine modules: animation runtime, frame timing, input

pub mod animation;
pub mod game_loop;
pub mod input;
