use anyhow::Result;
use log::{error, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use dummy_runner::engine::game_loop::FrameClock;
use dummy_runner::engine::input::{InputManager, Intent};
use dummy_runner::game::characters::{
    dummy_clip_library, dummy_mesh, Character, CharacterConfig, ClipId, RigDefinition,
};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Dummy Runner...");

    let mut character = Character::new(
        0,
        "dummy",
        dummy_mesh(),
        &dummy_clip_library(),
        RigDefinition::dummy(),
        CharacterConfig::default(),
    )?;
    let mut input = InputManager::new();
    let mut clock = FrameClock::new();
    let mut last_clip = character.controller().active_clip();
    let mut failure: Option<anyhow::Error> = None;

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Dummy Runner - W run, S idle, Space jump, C slide, P pause")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    // Main event loop
    event_loop
        .run(|event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => input.reset(),
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => input.process_keyboard_event(&event),
            Event::WindowEvent {
                event: WindowEvent::MouseInput { state, button, .. },
                ..
            } => input.process_mouse_event(button, state),
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                let dt = clock.begin_frame();

                let frame = input
                    .drain_intents()
                    .into_iter()
                    .try_for_each(|intent| match intent {
                        Intent::Pause => {
                            clock.toggle_pause();
                            Ok(())
                        }
                        other => character.handle_intent(other),
                    })
                    .and_then(|()| character.update(dt));

                if let Err(e) = frame {
                    error!("Animation failure: {e}");
                    failure = Some(e.into());
                    elwt.exit();
                    return;
                }

                let clip: ClipId = character.controller().active_clip();
                if clip != last_clip {
                    info!("Now playing {clip} ({})", character.state());
                    last_clip = clip;
                }

                // Stand-in for the renderer: sample the pose every frame
                let pose = character.pose();
                if let Some(root) = pose.bones.first() {
                    log::trace!("root height {:.3}, {:.0} fps", root.translation.y, clock.fps());
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
