use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Serialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Automatically close the app after this many seconds. 0.0 (or omitted) = run indefinitely.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Slingshot".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity_y: f32,
    pub pixels_per_meter: f32,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: -981.0,
            pixels_per_meter: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PivotConfig {
    pub x: f32,
    pub y: f32,
}
impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            x: -300.0,
            y: -100.0,
        }
    }
}
impl PivotConfig {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Timing of the launch cycle plus the anchor the spring pulls toward.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LauncherConfig {
    /// Seconds between release and the spring letting go of the ball.
    pub detach_delay: f32,
    /// Seconds between the spring letting go and the next ball appearing.
    pub respawn_delay: f32,
    pub pivot: PivotConfig,
}
impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            detach_delay: 0.15,
            respawn_delay: 1.0,
            pivot: PivotConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub density: f32,
    pub restitution: f32,
}
impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            density: 1.0,
            restitution: 0.6,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpringConfig {
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
}
impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            rest_length: 0.0,
            stiffness: 60.0,
            damping: 1.5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub launcher: LauncherConfig,
    pub ball: BallConfig,
    pub spring: SpringConfig,
    pub rapier_debug: bool,
    pub draw_pivot: bool,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            physics: Default::default(),
            launcher: Default::default(),
            ball: Default::default(),
            spring: Default::default(),
            rapier_debug: false,
            draw_pivot: true,
        }
    }
}

/// Outcome of the startup config load, kept around so it can be logged once
/// the Bevy log subscriber exists.
#[derive(Resource, Debug, Default, Clone)]
pub struct ConfigLoadReport {
    pub used: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
    use ron::value::Value;
    match (base, overlay) {
        (Value::Map(bm), Value::Map(om)) => {
            for (k, v) in om.into_iter() {
                let mut incoming = Some(v);
                for (ek, ev) in bm.iter_mut() {
                    if *ek == k {
                        if let Some(val) = incoming.take() {
                            merge_value(ev, val);
                        }
                        break;
                    }
                }
                if let Some(val) = incoming {
                    bm.insert(k, val);
                }
            }
        }
        (b, o) => *b = o,
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Deep-merges every readable file in order (later files win) and
    /// deserializes the result. Returns the config, the files that were used
    /// and the non-fatal errors met along the way.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match merged.as_mut() {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.width * self.window.height > 10_000_000.0 {
            w.push(format!(
                "very large window area: {}x{}",
                self.window.width, self.window.height
            ));
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.physics.gravity_y.abs() < 1e-4 {
            w.push("physics.gravity_y magnitude near zero; launched balls will float".into());
        }
        if self.physics.pixels_per_meter <= 0.0 {
            w.push(format!(
                "physics.pixels_per_meter {} must be > 0",
                self.physics.pixels_per_meter
            ));
        }
        let l = &self.launcher;
        if l.detach_delay < 0.0 {
            w.push(format!(
                "launcher.detach_delay {} negative -> clamped to 0",
                l.detach_delay
            ));
        }
        if l.respawn_delay < 0.0 {
            w.push(format!(
                "launcher.respawn_delay {} negative -> clamped to 0",
                l.respawn_delay
            ));
        }
        if l.detach_delay == 0.0 {
            w.push("launcher.detach_delay is 0; spring releases on the launch frame".into());
        }
        if self.ball.radius <= 0.0 {
            w.push(format!("ball.radius {} must be > 0", self.ball.radius));
        }
        if self.ball.density <= 0.0 {
            w.push(format!("ball.density {} must be > 0", self.ball.density));
        }
        if !(0.0..=1.5).contains(&self.ball.restitution) {
            w.push(format!(
                "ball.restitution {} outside recommended 0..1.5",
                self.ball.restitution
            ));
        }
        if self.spring.stiffness <= 0.0 {
            w.push(format!(
                "spring.stiffness {} must be > 0 (no pull toward the pivot)",
                self.spring.stiffness
            ));
        }
        if self.spring.damping < 0.0 {
            w.push("spring.damping negative -> oscillation grows".into());
        }
        if self.spring.rest_length < 0.0 {
            w.push("spring.rest_length negative".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate_clean() {
        let cfg = GameConfig::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn validate_flags_bad_values() {
        let mut bad = GameConfig::default();
        bad.window.width = 0.0;
        bad.physics.gravity_y = 0.0;
        bad.launcher.detach_delay = -1.0;
        bad.launcher.respawn_delay = -0.5;
        bad.ball.radius = 0.0;
        bad.spring.stiffness = 0.0;
        let joined = bad.validate().join(" | ");
        assert!(joined.contains("window dimensions must be > 0"));
        assert!(joined.contains("gravity_y magnitude near zero"));
        assert!(joined.contains("launcher.detach_delay -1"));
        assert!(joined.contains("launcher.respawn_delay -0.5"));
        assert!(joined.contains("ball.radius 0 must be > 0"));
        assert!(joined.contains("spring.stiffness"));
    }

    #[test]
    fn load_or_default_missing_file() {
        let (cfg, err) = GameConfig::load_or_default("this/file/does/not/exist.ron");
        assert!(err.is_some());
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn layered_merge_overrides_nested_keys() {
        let base = r"(
            launcher: (detach_delay: 0.3, pivot: (x: 10.0, y: 20.0)),
            ball: (radius: 12.0),
        )";
        let overlay = r"(
            launcher: (pivot: (y: -40.0)),
            spring: (stiffness: 90.0),
        )";
        let mut f1 = tempfile::NamedTempFile::new().unwrap();
        let mut f2 = tempfile::NamedTempFile::new().unwrap();
        f1.write_all(base.as_bytes()).unwrap();
        f2.write_all(overlay.as_bytes()).unwrap();
        let (cfg, used, errors) = GameConfig::load_layered([f1.path(), f2.path()]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(used.len(), 2);
        assert_eq!(cfg.launcher.detach_delay, 0.3);
        assert_eq!(cfg.launcher.pivot.x, 10.0);
        assert_eq!(cfg.launcher.pivot.y, -40.0);
        assert_eq!(cfg.ball.radius, 12.0);
        assert_eq!(cfg.spring.stiffness, 90.0);
        assert_eq!(cfg.launcher.respawn_delay, LauncherConfig::default().respawn_delay);
    }

    #[test]
    fn layered_skips_missing_and_broken_files() {
        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"(launcher: (detach_delay: ").unwrap();
        let (cfg, used, errors) =
            GameConfig::load_layered([Path::new("missing/game.ron"), broken.path()]);
        assert!(used.is_empty());
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("read error"));
        assert!(errors[1].contains("parse error"));
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn parse_autoclose_key() {
        let sample = r"(window: (autoClose: 3.25))";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample.as_bytes()).unwrap();
        let cfg = GameConfig::load_from_file(file.path()).expect("parse config");
        assert!((cfg.window.auto_close - 3.25).abs() < 1e-6);
    }
}
