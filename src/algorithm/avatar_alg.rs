use log::{debug, info, warn};
use serde::Serialize;

use crate::algorithm::sub_algorithms::{
    depth_refinement, landmark_projection, mesh_cleaning, neck_extrusion, seam_stitching,
    shell_synthesis, surface_triangulation, CleaningReport, TriangulationMethod,
};
use crate::algorithm::{skeleton_alg, skinning_alg};
use crate::asset;
use crate::config::AvatarConfig;
use crate::error::{AvatarError, Result};
use crate::input::io::skin_tone;
use crate::input::{DepthSource, LandmarkSet};
use crate::mesh3d::{Color, GenericMesh3D, MeshRegion};
use crate::skeleton3d::{Skeleton3D, SkinBinding};

/// Everything a request brings
pub struct AvatarInput<'a> {
    /// Detector landmarks
    pub landmarks: &'a LandmarkSet,
    /// Landmark adjacency (detector tessellation edges)
    pub adjacency: Option<&'a [[usize; 2]]>,
    /// Depth map provider
    pub depth_source: Option<&'a dyn DepthSource>,
    /// One color per landmark
    pub colors: Option<Vec<Color>>,
}

impl<'a> AvatarInput<'a> {
    /// Input made of landmarks only
    pub fn new(landmarks: &'a LandmarkSet) -> AvatarInput<'a> {
        AvatarInput {
            landmarks,
            adjacency: None,
            depth_source: None,
            colors: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// Bookkeeping fields returned to the caller with the asset
pub struct AvatarSummary {
    pub vertex_count: usize,
    pub face_count: usize,
    pub bone_names: Vec<String>,
}

/// Rigged avatar, before serialization
pub struct AvatarRig {
    pub mesh: GenericMesh3D,
    pub skeleton: Skeleton3D,
    pub skin: SkinBinding,
    pub triangulation: TriangulationMethod,
    /// False when the seam could not be stitched
    pub stitched: bool,
    /// False when no depth map could be used
    pub depth_refined: bool,
    pub cleaning: CleaningReport,
}

/// Rigged avatar and its GLB asset
pub struct AvatarOutput {
    pub rig: AvatarRig,
    pub asset: Vec<u8>,
    pub summary: AvatarSummary,
}

fn check_stage(mesh: &GenericMesh3D, stage: &str) -> Result<()> {
    mesh.check_mesh()?;
    debug!(
        "{}: {} vertices, {} faces, indices valid",
        stage,
        mesh.get_nb_vertices(),
        mesh.get_nb_faces()
    );
    Ok(())
}

/// Builds the mesh, skeleton and skin binding from the landmarks
///
/// Recoverable failures (seam, depth map) are logged and skipped. Any other failure
/// aborts the request.
pub fn build_rig(input: &AvatarInput, config: &AvatarConfig) -> Result<AvatarRig> {
    let points = landmark_projection::project_landmarks(input.landmarks)?;
    info!("Projected {} landmarks", points.len());

    let triangulation =
        surface_triangulation::triangulate_surface(&points, input.adjacency, &config.triangulation)?;
    info!(
        "Surface triangulated ({:?}): {} faces",
        triangulation.method,
        triangulation.faces.len()
    );

    let mut mesh = GenericMesh3D::new();
    mesh.append_patch(&points, &triangulation.faces, MeshRegion::Surface)?;
    if let Some(colors) = &input.colors {
        if colors.len() != points.len() {
            return Err(AvatarError::Input(format!(
                "{} colors for {} landmarks",
                colors.len(),
                points.len()
            )));
        }
        mesh.set_colors(colors.clone())?;
        if let Some(tone) = skin_tone(colors, input.landmarks) {
            debug!("Skin tone {:?}", tone);
            mesh.set_fill_color(tone);
        }
    }
    check_stage(&mesh, "Surface")?;

    let shell = shell_synthesis::synthesize_shell(&points, &config.shell)?;
    let shell_offset = mesh.get_nb_vertices();
    mesh.append_mesh_patch(&shell, MeshRegion::Shell)?;
    info!(
        "Shell synthesized: {} vertices, {} faces",
        shell.vertices.len(),
        shell.faces.len()
    );
    check_stage(&mesh, "Shell")?;

    let stitched = match seam_stitching::stitch_seam(&points, &shell.vertices, shell_offset, &config.seam) {
        Ok(seam) => {
            for face in seam.iter() {
                mesh.add_face(face[0], face[1], face[2])?;
            }
            info!("Seam stitched: {} faces", seam.len());
            true
        }
        Err(err) if err.is_recoverable() => {
            warn!("Seam skipped, mesh stays open: {}", err);
            false
        }
        Err(err) => return Err(err),
    };
    check_stage(&mesh, "Seam")?;

    let depth_refined = match input.depth_source {
        Some(source) => match depth_refinement::refine_from_source(&mut mesh, source, &config.depth) {
            Ok(nb_displaced) => {
                info!("Depth refined: {} surface vertices", nb_displaced);
                true
            }
            Err(err) if err.is_recoverable() => {
                warn!("Depth refinement skipped: {}", err);
                false
            }
            Err(err) => return Err(err),
        },
        None => false,
    };

    let neck = neck_extrusion::extrude_neck(mesh.vertices(), &config.neck)?;
    mesh.append_mesh_patch(&neck, MeshRegion::Neck)?;
    info!(
        "Neck extruded: {} vertices, {} faces",
        neck.vertices.len(),
        neck.faces.len()
    );
    check_stage(&mesh, "Neck")?;

    let cleaning = mesh_cleaning::clean_mesh(&mut mesh, &config.cleaning)?;
    info!(
        "Mesh cleaned: {} vertices, {} faces",
        mesh.get_nb_vertices(),
        mesh.get_nb_faces()
    );
    if mesh.get_nb_faces() == 0 {
        return Err(AvatarError::GeometryDegenerate { points: points.len() });
    }

    let skeleton = skeleton_alg::estimate_skeleton(mesh.vertices(), config.skeleton.preset)?;
    info!("Skeleton estimated: {} bones", skeleton.get_nb_bones());

    let skin = skinning_alg::compute_skin_binding(mesh.vertices(), &skeleton, &config.skinning)?;
    info!("Skin weights computed for {} vertices", skin.get_nb_vertices());

    Ok(AvatarRig {
        mesh,
        skeleton,
        skin,
        triangulation: triangulation.method,
        stitched,
        depth_refined,
        cleaning,
    })
}

/// Runs the whole pipeline: landmarks to GLB asset
///
/// No asset is produced unless every fatal stage succeeded.
pub fn build_avatar(input: &AvatarInput, config: &AvatarConfig) -> Result<AvatarOutput> {
    let rig = build_rig(input, config)?;
    let asset = asset::serialize_avatar(&rig.mesh, &rig.skeleton, &rig.skin)?;
    info!("Asset serialized: {} bytes", asset.len());

    let summary = AvatarSummary {
        vertex_count: rig.mesh.get_nb_vertices(),
        face_count: rig.mesh.get_nb_faces(),
        bone_names: rig.skeleton.bone_names(),
    };
    Ok(AvatarOutput {
        rig,
        asset,
        summary,
    })
}
