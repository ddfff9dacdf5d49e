use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use head_rig_3d::algorithm::avatar_alg::{build_avatar, build_rig, AvatarInput};
use head_rig_3d::algorithm::sub_algorithms::TriangulationMethod;
use head_rig_3d::asset::glb;
use head_rig_3d::config::AvatarConfig;
use head_rig_3d::input::{DepthMap, DepthSource, ImageDepthSource, Landmark, LandmarkSet};
use head_rig_3d::skeleton3d::SkeletonPreset;
use head_rig_3d::{AvatarError, Result};

fn spherical_cloud(nb_landmarks: usize, seed: u64) -> LandmarkSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let landmarks = (0..nb_landmarks)
        .map(|_| {
            let u: f32 = rng.gen_range(-1.0..1.0);
            let ang: f32 = rng.gen_range(0.0..(2.0 * std::f32::consts::PI));
            let rad = 0.1 * (1.0 - u * u).sqrt();
            Landmark::new(rad * ang.cos(), rad * ang.sin(), 0.1 * u)
        })
        .collect();
    LandmarkSet::new(landmarks)
}

fn face_grid(nb: usize) -> (LandmarkSet, Vec<[usize; 2]>) {
    let mut landmarks = Vec::new();
    let mut edges = Vec::new();
    for i in 0..nb {
        for j in 0..nb {
            let x = 0.3 + 0.4 * i as f32 / (nb - 1) as f32;
            let y = 0.2 + 0.6 * j as f32 / (nb - 1) as f32 + 0.001 * i as f32;
            let r2 = (x - 0.5).powi(2) + (y - 0.5).powi(2);
            landmarks.push(Landmark::new(x, y, r2));

            let ind = i * nb + j;
            if j + 1 < nb {
                edges.push([ind, ind + 1]);
            }
            if i + 1 < nb {
                edges.push([ind, ind + nb]);
            }
            if i + 1 < nb && j + 1 < nb {
                edges.push([ind, ind + nb + 1]);
            }
        }
    }
    (LandmarkSet::new(landmarks), edges)
}

struct FailingDepth;

impl DepthSource for FailingDepth {
    fn depth_map(&self) -> Result<DepthMap> {
        Err(AvatarError::DepthUnavailable("depth model timed out".to_string()))
    }
}

#[test]
fn spherical_cloud_gives_rigged_asset() {
    let landmarks = spherical_cloud(478, 3);
    let output = build_avatar(&AvatarInput::new(&landmarks), &AvatarConfig::default()).unwrap();

    assert!(output.summary.face_count > 0);
    assert_eq!(output.summary.bone_names.len(), 20);
    assert_eq!(output.summary.bone_names[0], "Hips");

    let declared = u32::from_le_bytes([
        output.asset[8],
        output.asset[9],
        output.asset[10],
        output.asset[11],
    ]) as usize;
    assert_eq!(declared, output.asset.len());

    let (document, bin) = glb::read_glb(&output.asset).unwrap();
    assert_eq!(document.buffers.len(), 1);
    assert_eq!(document.buffers[0].byte_length, bin.len());
    for view in document.buffer_views.iter() {
        assert!(view.byte_offset + view.byte_length <= bin.len());
    }
}

#[test]
fn decoded_asset_matches_the_rig() {
    let landmarks = spherical_cloud(478, 11);
    let output = build_avatar(&AvatarInput::new(&landmarks), &AvatarConfig::default()).unwrap();
    let (document, buffers, _) = gltf::import_slice(&output.asset).unwrap();

    let mesh = document.meshes().next().unwrap();
    let primitive = mesh.primitives().next().unwrap();
    let reader = primitive.reader(|buffer| Some(buffers[buffer.index()].0.as_slice()));

    let nb_positions = reader.read_positions().unwrap().count();
    assert_eq!(nb_positions, output.summary.vertex_count);
    let indices: Vec<u32> = reader.read_indices().unwrap().into_u32().collect();
    assert_eq!(indices.len(), 3 * output.summary.face_count);
    assert!(indices.iter().all(|&ind| (ind as usize) < nb_positions));

    for weights in reader.read_weights(0).unwrap().into_f32() {
        let sum: f32 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
        assert!(weights.iter().all(|&w| w >= 0.0));
    }
    let nb_joint_sets = reader.read_joints(0).unwrap().into_u16().count();
    assert_eq!(nb_joint_sets, nb_positions);

    let skin = document.skins().next().unwrap();
    let nb_joints = skin.joints().count();
    assert_eq!(nb_joints, output.summary.bone_names.len());
    assert_eq!(skin.inverse_bind_matrices().unwrap().count(), nb_joints);
    assert_eq!(document.nodes().count(), nb_joints + 1);

    // one bone is nobody's child
    let mut is_child = vec![false; document.nodes().count()];
    for node in document.nodes() {
        for child in node.children() {
            is_child[child.index()] = true;
        }
    }
    let roots: Vec<usize> = skin
        .joints()
        .map(|joint| joint.index())
        .filter(|&ind| !is_child[ind])
        .collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(skin.skeleton().unwrap().index(), roots[0]);
}

#[test]
fn two_landmarks_are_rejected() {
    let landmarks = LandmarkSet::new(vec![
        Landmark::new(0.4, 0.4, 0.0),
        Landmark::new(0.6, 0.6, 0.0),
    ]);
    let res = build_rig(&AvatarInput::new(&landmarks), &AvatarConfig::default());
    assert!(matches!(res, Err(AvatarError::Input(_))));
}

#[test]
fn failing_depth_source_is_a_passthrough() {
    let landmarks = spherical_cloud(478, 5);
    let missing = ImageDepthSource::new("/nonexistent/depth.png");
    let config = AvatarConfig::default();
    let plain = build_avatar(&AvatarInput::new(&landmarks), &config).unwrap();

    let mut input = AvatarInput::new(&landmarks);
    input.depth_source = Some(&FailingDepth);
    let failing = build_avatar(&input, &config).unwrap();
    assert!(!failing.rig.depth_refined);
    assert_eq!(plain.asset, failing.asset);

    input.depth_source = Some(&missing);
    let missing_out = build_avatar(&input, &config).unwrap();
    assert_eq!(plain.asset, missing_out.asset);
}

#[test]
fn depth_map_moves_the_surface() {
    let landmarks = spherical_cloud(478, 5);
    let config = AvatarConfig::default();
    let plain = build_avatar(&AvatarInput::new(&landmarks), &config).unwrap();

    let data: Vec<f32> = (0..64 * 64).map(|ind| (ind % 64) as f32 / 63.0).collect();
    let depth = DepthMap::new(64, 64, data).unwrap();
    let mut input = AvatarInput::new(&landmarks);
    input.depth_source = Some(&depth);
    let refined = build_avatar(&input, &config).unwrap();
    assert!(refined.rig.depth_refined);
    assert_ne!(plain.asset, refined.asset);
}

#[test]
fn adjacency_topology_and_colors() {
    let (landmarks, edges) = face_grid(10);
    let mut input = AvatarInput::new(&landmarks);
    input.adjacency = Some(&edges);
    input.colors = Some(vec![[0.9, 0.6, 0.5, 1.0]; landmarks.len()]);

    let mut config = AvatarConfig::default();
    config.skeleton.preset = SkeletonPreset::Mixamo;
    let output = build_avatar(&input, &config).unwrap();
    assert_eq!(output.rig.triangulation, TriangulationMethod::Topology);
    assert_eq!(output.summary.bone_names.len(), 23);

    let colors = output.rig.mesh.colors().unwrap();
    assert_eq!(colors.len(), output.summary.vertex_count);
    assert!(colors.iter().all(|col| (col[0] - 0.9).abs() < 1e-4));

    let (document, _, _) = gltf::import_slice(&output.asset).unwrap();
    let primitive = document.meshes().next().unwrap().primitives().next().unwrap();
    assert!(primitive.get(&gltf::Semantic::Colors(0)).is_some());
}

#[test]
fn unstitched_seam_still_gives_an_asset() {
    let landmarks = spherical_cloud(478, 9);
    let mut config = AvatarConfig::default();
    config.seam.min_points = 100_000;

    let output = build_avatar(&AvatarInput::new(&landmarks), &config).unwrap();
    assert!(!output.rig.stitched);
    assert!(output.summary.face_count > 0);
    assert_eq!(output.summary.bone_names.len(), 20);

    let (document, buffers, _) = gltf::import_slice(&output.asset).unwrap();
    let primitive = document.meshes().next().unwrap().primitives().next().unwrap();
    let reader = primitive.reader(|buffer| Some(buffers[buffer.index()].0.as_slice()));
    assert_eq!(
        reader.read_positions().unwrap().count(),
        output.summary.vertex_count
    );
}
