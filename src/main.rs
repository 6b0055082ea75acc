/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::hero::FrameInput;
use sim::event::StepEvent;
use sim::level::{self, LevelDef};
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Heading change per tilt key press, in degrees.
const TILT_STEP_DEG: f32 = 15.0;

fn main() {
    // Diagnostics go to stderr and stay silent unless RUST_LOG is set,
    // so the raw-mode screen is not disturbed.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = GameConfig::load();
    let levels = level::level_defs(&config);

    let mut world = WorldState::new(config.physics.clone());

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &levels, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Slopewalker!");
}

fn game_loop(
    world: &mut WorldState,
    levels: &[LevelDef],
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        world.set_message("Gamepad connected", 120);
    }

    let mut prev_frame = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, levels, sound, &kb, &gp) {
            break;
        }

        // Frame-time coefficient: actual elapsed time over the nominal
        // frame duration. Displacements scale by it, so motion speed is
        // independent of the real frame rate. Capped per config.
        let now = Instant::now();
        let elapsed_ms = now.duration_since(prev_frame).as_secs_f32() * 1000.0;
        prev_frame = now;
        let dt_coef = (elapsed_ms / config.timing.nominal_frame_ms)
            .min(config.timing.max_frame_coef);

        if world.phase == Phase::Playing && !world.paused {
            let input = FrameInput {
                left: kb.any_held(KEYS_LEFT) || gp.left_held(),
                right: kb.any_held(KEYS_RIGHT) || gp.right_held(),
                jump: kb.any_held(KEYS_JUMP) || gp.jump_held(),
            };
            let events = step::advance(world, input, dt_coef);
            process_sound_events(sound, &events);

            let (w, h) = world.map.pixel_size();
            world.camera.follow(world.hero.pos, w, h);
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_JUMP: &[KeyCode] = &[
    KeyCode::Up,
    KeyCode::Char('w'),
    KeyCode::Char('W'),
    KeyCode::Char(' '),
];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)];
const KEYS_DEBUG: &[KeyCode] = &[KeyCode::Char('g'), KeyCode::Char('G')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];

fn process_sound_events(sound: Option<&SoundEngine>, events: &[StepEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    // At most one cue per event kind per frame — a long slope may report
    // several climbs in a single sweep.
    if events.contains(&StepEvent::Jumped) {
        sfx.play_jump();
    }
    if events.contains(&StepEvent::Landed) {
        sfx.play_land();
    }
    if events.contains(&StepEvent::WallBumped) || events.contains(&StepEvent::CeilingBumped) {
        sfx.play_bump();
    }
    if events.contains(&StepEvent::StepClimbed) {
        sfx.play_climb();
    }
}

/// Handle phase transitions and one-shot meta keys.
/// Returns true to quit the program.
fn handle_meta(
    world: &mut WorldState,
    levels: &[LevelDef],
    sound: Option<&SoundEngine>,
    kb: &InputState,
    gp: &GamepadState,
) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed();
    let esc = kb.any_pressed(&[KeyCode::Esc]) || gp.cancel_pressed();

    match world.phase {
        // ── Title Screen ──
        Phase::Title => {
            if confirm {
                if let Some(def) = levels.first() {
                    level::load_level(world, def);
                    if let Some(sfx) = sound {
                        sfx.play_start();
                    }
                }
            } else if kb.any_pressed(&[KeyCode::Char('q'), KeyCode::Char('Q')]) || esc {
                return true;
            }
        }

        // ── Playing ──
        Phase::Playing => {
            if esc {
                world.phase = Phase::Title;
                world.paused = false;
                return false;
            }

            if kb.any_pressed(KEYS_PAUSE) {
                world.paused = !world.paused;
                return false;
            }
            if world.paused {
                // Everything else is blocked while paused.
                return false;
            }

            if kb.any_pressed(KEYS_RESTART) || gp.restart_pressed() {
                world.respawn_hero();
                world.set_message("Restarted", 30);
            }
            if kb.any_pressed(KEYS_DEBUG) {
                world.debug_points = !world.debug_points;
            }

            // Tilt controls: rotate the hero's frame in steps, reset
            // with 0.
            if kb.any_pressed(&[KeyCode::Char('[')]) {
                let deg = world.hero.heading_deg - TILT_STEP_DEG;
                world.hero.set_heading_deg(deg);
            }
            if kb.any_pressed(&[KeyCode::Char(']')]) {
                let deg = world.hero.heading_deg + TILT_STEP_DEG;
                world.hero.set_heading_deg(deg);
            }
            if kb.any_pressed(&[KeyCode::Char('0')]) {
                world.hero.set_heading_deg(0.0);
            }
        }
    }

    false
}
