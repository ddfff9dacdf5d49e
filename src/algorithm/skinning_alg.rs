use log::warn;
use std::cmp::Ordering;

use crate::config::SkinningConfig;
use crate::error::Result;
use crate::mesh3d::Vertex;
use crate::skeleton3d::{Influence, SkinBinding, Skeleton3D, MAX_INFLUENCES};

/// Inverse distance weights of the nearest bones of one vertex
///
/// `candidates` are (bone index, position) pairs. The result is sorted by
/// decreasing weight and zero padded.
pub fn vertex_influences(
    vert: &Vertex,
    candidates: &[(usize, Vertex)],
    epsilon: f32,
) -> [Influence; MAX_INFLUENCES] {
    let mut dists: Vec<(usize, f32)> = candidates
        .iter()
        .map(|(ind_bone, pos)| (*ind_bone, (pos - vert).norm()))
        .collect();
    dists.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    dists.truncate(MAX_INFLUENCES);

    let mut influences = [(0, 0.0); MAX_INFLUENCES];
    let mut total = 0.0;
    for (k, &(ind_bone, dist)) in dists.iter().enumerate() {
        let weight = 1.0 / dist.max(epsilon);
        influences[k] = (ind_bone, weight);
        total += weight;
    }
    if total > 0.0 {
        for infl in influences.iter_mut() {
            infl.1 /= total;
        }
    }
    influences
}

/// Computes the skin binding of every vertex from bone rest positions
///
/// Purely spatial: connectivity is ignored, so close but unrelated bones can share
/// a vertex. Bones listed in `excluded_bones` never influence a vertex; if no bone is
/// left the vertices stay unskinned (all zero weights).
pub fn compute_skin_binding(
    vertices: &[Vertex],
    skeleton: &Skeleton3D,
    config: &SkinningConfig,
) -> Result<SkinBinding> {
    for name in config.excluded_bones.iter() {
        if skeleton.find_bone(name).is_none() {
            warn!("Excluded bone {} is not in the skeleton", name);
        }
    }
    let candidates: Vec<(usize, Vertex)> = skeleton
        .bones()
        .iter()
        .enumerate()
        .filter(|(_, bone)| !config.excluded_bones.contains(&bone.name))
        .map(|(ind_bone, bone)| (ind_bone, bone.position))
        .collect();
    if candidates.is_empty() && !vertices.is_empty() {
        warn!("No bone can influence the mesh, vertices stay unskinned");
    }

    let mut skin = SkinBinding::new();
    for vert in vertices.iter() {
        skin.push(vertex_influences(vert, &candidates, config.epsilon));
    }
    skin.check(vertices.len(), skeleton.get_nb_bones())?;
    Ok(skin)
}
