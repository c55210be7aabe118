use std::path::PathBuf;

use engine::app::AppConfig;
use pixels::wgpu::PresentMode;
use winit::dpi::PhysicalSize;

use crate::spawner::TileDistribution;
use crate::ui::{TITLE, WINDOW_HEIGHT, WINDOW_WIDTH};

pub const ENV_HIGHSCORE_PATH: &str = "TWENTY48_HIGHSCORE_PATH";
pub const ENV_SEED: &str = "TWENTY48_SEED";
pub const ENV_SPAWN: &str = "TWENTY48_SPAWN";
pub const ENV_WINDOW_WIDTH: &str = "TWENTY48_WINDOW_WIDTH";
pub const ENV_WINDOW_HEIGHT: &str = "TWENTY48_WINDOW_HEIGHT";
pub const ENV_VSYNC: &str = "TWENTY48_VSYNC";
pub const ENV_PRESENT_MODE: &str = "TWENTY48_PRESENT_MODE";
pub const ENV_POLL: &str = "TWENTY48_POLL";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub highscore_path: PathBuf,
    /// `None` seeds the session from entropy.
    pub seed: Option<u64>,
    pub distribution: TileDistribution,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: Option<bool>,
    pub present_mode: Option<PresentMode>,
    pub poll: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            highscore_path: PathBuf::from("highscore"),
            seed: None,
            distribution: TileDistribution::default(),
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            vsync: None,
            present_mode: None,
            poll: false,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            highscore_path: highscore_path(&lookup),
            seed: parsed(&lookup, ENV_SEED),
            distribution: parsed(&lookup, ENV_SPAWN).unwrap_or(defaults.distribution),
            window_width: parsed(&lookup, ENV_WINDOW_WIDTH)
                .filter(|&w: &u32| w > 0)
                .unwrap_or(defaults.window_width),
            window_height: parsed(&lookup, ENV_WINDOW_HEIGHT)
                .filter(|&h: &u32| h > 0)
                .unwrap_or(defaults.window_height),
            vsync: lookup(ENV_VSYNC).and_then(|v| parse_bool(ENV_VSYNC, &v)),
            present_mode: lookup(ENV_PRESENT_MODE).and_then(|v| parse_present_mode(&v)),
            poll: lookup(ENV_POLL)
                .and_then(|v| parse_bool(ENV_POLL, &v))
                .unwrap_or(defaults.poll),
        }
    }

    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            title: TITLE.to_string(),
            desired_size: PhysicalSize::new(self.window_width, self.window_height),
            clamp_to_monitor: true,
            resizable: true,
            vsync: self.vsync,
            present_mode: self.present_mode,
            poll: self.poll,
        }
    }
}

/// Explicit override, then the XDG data dir, then `~/.local/share`, then the working dir.
fn highscore_path<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(explicit) = lookup(ENV_HIGHSCORE_PATH).filter(|v| !v.is_empty()) {
        return PathBuf::from(explicit);
    }

    let base = lookup("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            lookup("HOME").filter(|v| !v.is_empty()).map(|home| {
                let mut p = PathBuf::from(home);
                p.push(".local");
                p.push("share");
                p
            })
        });

    match base {
        Some(mut path) => {
            path.push("game2048");
            path.push("highscore");
            path
        }
        None => PathBuf::from("highscore"),
    }
}

fn parsed<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

fn parse_bool(name: &str, v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(var = name, value = v, "ignoring unparsable boolean");
            None
        }
    }
}

fn parse_present_mode(v: &str) -> Option<PresentMode> {
    match v.trim().to_ascii_lowercase().as_str() {
        "auto" | "auto_vsync" | "vsync" => Some(PresentMode::AutoVsync),
        "auto_no_vsync" | "no_vsync" => Some(PresentMode::AutoNoVsync),
        "fifo" => Some(PresentMode::Fifo),
        "mailbox" => Some(PresentMode::Mailbox),
        "immediate" => Some(PresentMode::Immediate),
        other => {
            tracing::warn!(value = other, "unknown present mode");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> GameConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GameConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]), GameConfig::default());
    }

    #[test]
    fn highscore_path_prefers_override_then_xdg_then_home() {
        assert_eq!(
            config_from(&[(ENV_HIGHSCORE_PATH, "/tmp/hs"), ("HOME", "/home/p")]).highscore_path,
            PathBuf::from("/tmp/hs")
        );
        assert_eq!(
            config_from(&[("XDG_DATA_HOME", "/data"), ("HOME", "/home/p")]).highscore_path,
            PathBuf::from("/data/game2048/highscore")
        );
        assert_eq!(
            config_from(&[("HOME", "/home/p")]).highscore_path,
            PathBuf::from("/home/p/.local/share/game2048/highscore")
        );
    }

    #[test]
    fn parses_gameplay_and_window_settings() {
        let config = config_from(&[
            (ENV_SEED, "1234"),
            (ENV_SPAWN, "classic"),
            (ENV_WINDOW_WIDTH, "800"),
            (ENV_WINDOW_HEIGHT, "0"),
            (ENV_VSYNC, "off"),
            (ENV_PRESENT_MODE, "mailbox"),
            (ENV_POLL, "yes"),
        ]);
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.distribution, TileDistribution::Classic);
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, WINDOW_HEIGHT);
        assert_eq!(config.vsync, Some(false));
        assert_eq!(config.present_mode, Some(PresentMode::Mailbox));
        assert!(config.poll);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config_from(&[(ENV_SEED, "abc"), (ENV_SPAWN, "often"), (ENV_VSYNC, "maybe")]);
        assert_eq!(config.seed, None);
        assert_eq!(config.distribution, TileDistribution::Uniform);
        assert_eq!(config.vsync, None);
    }
}
