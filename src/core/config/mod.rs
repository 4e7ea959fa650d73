pub mod config;

pub use config::{
    BallConfig, ConfigLoadReport, GameConfig, LauncherConfig, PhysicsConfig, PivotConfig,
    SpringConfig, WindowConfig,
};
