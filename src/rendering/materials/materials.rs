use bevy::prelude::*;
use rand::Rng;

use crate::core::system::system_order::BallVisualsSet;
use crate::rendering::palette::palette::BASE_COLORS;

/// Shared handles for ball rendering. Only present when the render asset
/// storages exist, so headless apps spawn balls without visuals.
#[derive(Resource, Debug, Clone)]
pub struct BallVisuals {
    /// Unit circle; each ball scales it by its radius.
    pub mesh: Handle<Mesh>,
    pub materials: Vec<Handle<ColorMaterial>>,
}

impl BallVisuals {
    pub fn pick_material(&self, rng: &mut impl Rng) -> Option<Handle<ColorMaterial>> {
        if self.materials.is_empty() {
            return None;
        }
        let i = rng.gen_range(0..self.materials.len());
        Some(self.materials[i].clone())
    }
}

pub struct MaterialsPlugin;

impl Plugin for MaterialsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_ball_visuals.in_set(BallVisualsSet));
    }
}

fn setup_ball_visuals(
    mut commands: Commands,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<ColorMaterial>>>,
) {
    let (Some(mut meshes), Some(mut materials)) = (meshes, materials) else {
        debug!("ball visuals skipped: no mesh/material asset storage");
        return;
    };
    let mesh = meshes.add(Circle::new(1.0));
    let handles = BASE_COLORS.iter().copied().map(|c| materials.add(c)).collect();
    commands.insert_resource(BallVisuals {
        mesh,
        materials: handles,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_app_has_no_visuals() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, MaterialsPlugin));
        app.update();
        assert!(app.world().get_resource::<BallVisuals>().is_none());
    }

    #[test]
    fn pick_from_empty_palette_is_none() {
        let visuals = BallVisuals {
            mesh: Handle::default(),
            materials: Vec::new(),
        };
        assert!(visuals.pick_material(&mut rand::thread_rng()).is_none());
    }
}
