/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub timing: TimingConfig,
    pub gamepad: GamepadConfig,
    pub levels_dir: PathBuf,
}

/// Movement constants, in pixels per nominal frame (and per-frame deltas).
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    pub max_walk_speed: f32,
    pub walk_acceleration: f32,
    /// Magnitude of the idle deceleration toward zero.
    pub idle_deceleration: f32,
    /// Negative: a jump pushes fall speed upward.
    pub jump_impulse: f32,
    pub gravity: f32,
    /// Terminal velocity; applies to falling only.
    pub max_fall_speed: f32,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Nominal frame duration the physics constants are tuned for.
    pub nominal_frame_ms: f32,
    /// Cap on the frame-time coefficient so a stall can't teleport the
    /// hero through the level.
    pub max_frame_coef: f32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub restart: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_max_walk_speed")]
    max_walk_speed: f32,
    #[serde(default = "default_walk_acceleration")]
    walk_acceleration: f32,
    #[serde(default = "default_idle_deceleration")]
    idle_deceleration: f32,
    #[serde(default = "default_jump_impulse")]
    jump_impulse: f32,
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_max_fall_speed")]
    max_fall_speed: f32,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_nominal_frame_ms")]
    nominal_frame_ms: f32,
    #[serde(default = "default_max_frame_coef")]
    max_frame_coef: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump_buttons")]
    jump: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
}

// ── Defaults (the original tuning) ──

fn default_max_walk_speed() -> f32 { 3.0 }
fn default_walk_acceleration() -> f32 { 0.3 }
fn default_idle_deceleration() -> f32 { 1.0 }
fn default_jump_impulse() -> f32 { -14.0 }
fn default_gravity() -> f32 { 1.0 }
fn default_max_fall_speed() -> f32 { 6.0 }

fn default_nominal_frame_ms() -> f32 { 16.0 }
fn default_max_frame_coef() -> f32 { 4.0 }

fn default_jump_buttons() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_restart() -> Vec<String> { vec!["Start".into()] }
fn default_levels_dir() -> String { "levels".into() }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            max_walk_speed: default_max_walk_speed(),
            walk_acceleration: default_walk_acceleration(),
            idle_deceleration: default_idle_deceleration(),
            jump_impulse: default_jump_impulse(),
            gravity: default_gravity(),
            max_fall_speed: default_max_fall_speed(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            nominal_frame_ms: default_nominal_frame_ms(),
            max_frame_coef: default_max_frame_coef(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump_buttons(),
            confirm: default_confirm(),
            cancel: default_cancel(),
            restart: default_restart(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        let levels_dir_str = &toml_cfg.general.levels_dir;
        let levels_dir = if PathBuf::from(levels_dir_str).is_absolute() {
            PathBuf::from(levels_dir_str)
        } else {
            search_dirs
                .iter()
                .map(|d| d.join(levels_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(levels_dir_str))
        };

        GameConfig {
            physics: PhysicsConfig {
                max_walk_speed: toml_cfg.physics.max_walk_speed,
                walk_acceleration: toml_cfg.physics.walk_acceleration,
                idle_deceleration: toml_cfg.physics.idle_deceleration,
                jump_impulse: toml_cfg.physics.jump_impulse,
                gravity: toml_cfg.physics.gravity,
                max_fall_speed: toml_cfg.physics.max_fall_speed,
            },
            timing: TimingConfig {
                nominal_frame_ms: toml_cfg.timing.nominal_frame_ms.max(1.0),
                max_frame_coef: toml_cfg.timing.max_frame_coef.max(1.0),
            },
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
                restart: toml_cfg.gamepad.restart,
            },
            levels_dir,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths
/// (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable (symlinks resolved so data
    //    is found relative to the real binary).
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/slopewalker)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/slopewalker");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/slopewalker");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_original_tuning() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.physics.max_walk_speed, 3.0);
        assert_eq!(cfg.physics.jump_impulse, -14.0);
        assert_eq!(cfg.timing.nominal_frame_ms, 16.0);
        assert_eq!(cfg.general.levels_dir, "levels");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg: TomlConfig = toml::from_str(
            "[physics]\ngravity = 2.5\n",
        )
        .unwrap();
        assert_eq!(cfg.physics.gravity, 2.5);
        assert_eq!(cfg.physics.max_fall_speed, 6.0);
        assert_eq!(cfg.gamepad.jump, vec!["A".to_string(), "B".to_string()]);
    }
}
