use nalgebra::base::*;
use std::f32::consts::PI;

use crate::config::ShellConfig;
use crate::error::{AvatarError, Result};
use crate::geometry::geometry_operations;
use crate::mesh3d::{MeshPatch, Vertex};

/// Normalized back depth after flattening
fn flatten(t: f32, config: &ShellConfig) -> f32 {
    if t > config.flatten_start {
        config.flatten_start + (t - config.flatten_start) * config.flatten_factor
    } else {
        t
    }
}

/// Builds the back half-ellipsoid closing the visible surface
///
/// The ellipsoid spans the surface width and height, its depth radius is
/// `depth_ratio` times its horizontal radius and its rim lies `gap_fraction` of that
/// depth radius behind the deepest surface point, so no shell vertex is closer to
/// the camera than the surface. Grid rows go from top (latitude 0) to bottom.
pub fn synthesize_shell(surface: &[Vertex], config: &ShellConfig) -> Result<MeshPatch> {
    if config.lat_steps == 0 || config.lon_steps == 0 {
        return Err(AvatarError::Input(format!(
            "shell grid {}x{} is empty",
            config.lat_steps, config.lon_steps
        )));
    }
    let (bmin, bmax) = geometry_operations::bounding_box(surface).ok_or(
        AvatarError::GeometryDegenerate { points: 0 },
    )?;

    let center_x = 0.5 * (bmin[0] + bmax[0]);
    let center_y = 0.5 * (bmin[1] + bmax[1]);
    let radius_x = 0.5 * (bmax[0] - bmin[0]);
    let radius_y = 0.5 * (bmax[1] - bmin[1]);
    let radius_z = config.depth_ratio.max(0.0) * radius_x;
    let rim_z = bmin[2] - config.gap_fraction.max(0.0) * radius_z;

    let nb_lat = config.lat_steps;
    let nb_lon = config.lon_steps;
    let mut vertices = Vec::with_capacity((nb_lat + 1) * (nb_lon + 1));
    for i in 0..=nb_lat {
        let theta = PI * i as f32 / nb_lat as f32;
        for j in 0..=nb_lon {
            let phi = PI + PI * j as f32 / nb_lon as f32;
            // back depth in [0, 1], 0 on the rim
            let t = (-theta.sin() * phi.sin()).max(0.0);
            vertices.push(Vector3::new(
                center_x + radius_x * theta.sin() * phi.cos(),
                center_y + radius_y * theta.cos(),
                rim_z - radius_z * flatten(t, config),
            ));
        }
    }

    let mut faces = Vec::with_capacity(2 * nb_lat * nb_lon);
    for i in 0..nb_lat {
        for j in 0..nb_lon {
            let v0 = i * (nb_lon + 1) + j;
            let v1 = v0 + 1;
            let v2 = v0 + nb_lon + 1;
            let v3 = v2 + 1;
            faces.push([v0, v2, v1]);
            faces.push([v1, v2, v3]);
        }
    }

    Ok(MeshPatch { vertices, faces })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Vec<Vertex> {
        vec![
            Vector3::new(-0.1, 0.7, 0.05),
            Vector3::new(0.1, 0.7, 0.1),
            Vector3::new(0.1, 1.0, 0.2),
            Vector3::new(-0.1, 1.0, 0.15),
            Vector3::new(0.0, 0.85, 0.24),
        ]
    }

    #[test]
    fn test_shell_stays_behind_surface() {
        let config = ShellConfig::default();
        let shell = synthesize_shell(&surface(), &config).unwrap();
        assert_eq!(shell.vertices.len(), 17 * 17);
        assert_eq!(shell.faces.len(), 2 * 16 * 16);
        for vert in shell.vertices.iter() {
            assert!(vert[2] <= 0.05 + 1e-6);
            assert!(vert[0] >= -0.1 - 1e-6 && vert[0] <= 0.1 + 1e-6);
            assert!(vert[1] >= 0.7 - 1e-6 && vert[1] <= 1.0 + 1e-6);
        }
        for face in shell.faces.iter() {
            assert!(face.iter().all(|&ind| ind < shell.vertices.len()));
        }
    }

    #[test]
    fn test_back_is_flattened() {
        let config = ShellConfig::default();
        let shell = synthesize_shell(&surface(), &config).unwrap();
        let deepest = shell
            .vertices
            .iter()
            .fold(f32::INFINITY, |acc, vert| acc.min(vert[2]));
        // rim 0.05 - 0.1 * 0.09, flattened depth 0.6 + 0.4 * 0.85 = 0.94
        let rim_z = 0.05 - 0.1 * 0.09;
        assert!((deepest - (rim_z - 0.09 * 0.94)).abs() < 1e-5);
    }

    #[test]
    fn test_empty_grid() {
        let config = ShellConfig {
            lat_steps: 0,
            ..ShellConfig::default()
        };
        assert!(synthesize_shell(&surface(), &config).is_err());
        assert!(synthesize_shell(&[], &ShellConfig::default()).is_err());
    }
}
