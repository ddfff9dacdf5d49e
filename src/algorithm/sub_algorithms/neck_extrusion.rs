use nalgebra::base::*;
use std::f32::consts::PI;

use crate::config::NeckConfig;
use crate::error::{AvatarError, Result};
use crate::geometry::geometry_operations;
use crate::mesh3d::{MeshPatch, Vertex};

/// Builds a tapered neck cylinder hanging below the lowest band of the mesh
///
/// The cylinder axis goes through the mean (x, z) of the vertices in the bottom
/// `bottom_band` of the head height. Its top radius is `radius_ratio` times the head
/// width and shrinks to `taper` times that at the bottom. Existing vertices are
/// never moved: the returned patch is appended by the caller.
pub fn extrude_neck(vertices: &[Vertex], config: &NeckConfig) -> Result<MeshPatch> {
    if config.rings == 0 || config.segments < 3 {
        return Err(AvatarError::Input(format!(
            "neck needs at least one ring and three segments ({} rings, {} segments)",
            config.rings, config.segments
        )));
    }
    let (bmin, bmax) = geometry_operations::bounding_box(vertices)
        .ok_or(AvatarError::GeometryDegenerate { points: 0 })?;
    let width = bmax[0] - bmin[0];
    let height = bmax[1] - bmin[1];

    let band_top = bmin[1] + config.bottom_band * height;
    let mut center = Vector2::zeros();
    let mut nb_band = 0;
    for vert in vertices.iter().filter(|vert| vert[1] <= band_top) {
        center += Vector2::new(vert[0], vert[2]);
        nb_band = nb_band + 1;
    }
    center /= nb_band as f32;

    let top_radius = config.radius_ratio * width;
    let length = config.length_ratio * height;

    let nb_seg = config.segments;
    let mut neck_vertices = Vec::with_capacity((config.rings + 1) * (nb_seg + 1));
    for ring in 0..=config.rings {
        let t = ring as f32 / config.rings as f32;
        let y = bmin[1] - t * length;
        let radius = top_radius * (config.taper + (1.0 - config.taper) * (1.0 - t));
        for j in 0..=nb_seg {
            let phi = 2.0 * PI * j as f32 / nb_seg as f32;
            neck_vertices.push(Vector3::new(
                center[0] + radius * phi.cos(),
                y,
                center[1] + radius * phi.sin(),
            ));
        }
    }

    let mut faces = Vec::with_capacity(2 * config.rings * nb_seg);
    for ring in 0..config.rings {
        for j in 0..nb_seg {
            let v0 = ring * (nb_seg + 1) + j;
            let v1 = v0 + 1;
            let v2 = v0 + nb_seg + 1;
            let v3 = v2 + 1;
            faces.push([v0, v2, v1]);
            faces.push([v1, v2, v3]);
        }
    }

    Ok(MeshPatch {
        vertices: neck_vertices,
        faces,
    })
}
