use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

use head_rig_3d::algorithm::avatar_alg::{self, AvatarInput};
use head_rig_3d::config::AvatarConfig;
use head_rig_3d::input::{self, ImageDepthSource, Landmark, LandmarkSet};
use head_rig_3d::mesh3d;
use head_rig_3d::skeleton3d::{self, SkeletonPreset};

fn generate_test_landmarks(nb_landmarks: usize, seed: u64) -> LandmarkSet {
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

/// Logger showing stage progress (info) unless the environment asks otherwise
fn logger_builder(env: Env) -> Builder {
    Builder::from_env(env.default_filter_or("info"))
}

#[derive(Parser)]
struct Cli {
    #[arg(long = "landmarks")]
    landmarks_path: Option<std::path::PathBuf>,
    /// Number of landmarks of a synthetic spherical cloud, used without --landmarks
    #[arg(default_value_t = 478, long = "synthetic")]
    nb_synthetic: usize,
    #[arg(default_value_t = 0, long = "seed")]
    seed: u64,
    #[arg(long = "adjacency")]
    adjacency_path: Option<std::path::PathBuf>,
    #[arg(long = "depth")]
    depth_path: Option<std::path::PathBuf>,
    #[arg(long = "photo")]
    photo_path: Option<std::path::PathBuf>,
    #[arg(long = "config")]
    config_path: Option<std::path::PathBuf>,
    #[arg(long = "preset")]
    preset: Option<SkeletonPreset>,
    #[arg(long = "depth-strength")]
    depth_strength: Option<f32>,
    #[arg(long = "neck-rings")]
    neck_rings: Option<usize>,
    #[arg(default_value = "./avatar.glb", long = "glboutfile")]
    glb_out_path: std::path::PathBuf,
    #[arg(long = "objoutfile")]
    obj_out_path: Option<std::path::PathBuf>,
    #[arg(long = "skeloutfile")]
    skel_out_path: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    logger_builder(Env::default()).init();
    let args = Cli::parse();

    let mut config = match &args.config_path {
        Some(path) => AvatarConfig::from_json_file(path)?,
        None => AvatarConfig::default(),
    };
    if let Some(preset) = args.preset {
        config.skeleton.preset = preset;
    }
    if let Some(strength) = args.depth_strength {
        config.depth.strength = strength;
    }
    if let Some(rings) = args.neck_rings {
        config.neck.rings = rings;
    }

    let landmarks = if let Some(path) = &args.landmarks_path {
        input::io::load_landmarks(path)?
    } else {
        generate_test_landmarks(args.nb_synthetic, args.seed)
    };
    println!("{} landmarks", landmarks.len());

    let adjacency = match &args.adjacency_path {
        Some(path) => Some(input::io::load_adjacency(path)?),
        None => None,
    };
    let depth_source = args.depth_path.as_ref().map(ImageDepthSource::new);

    let mut avatar_input = AvatarInput::new(&landmarks);
    avatar_input.adjacency = adjacency.as_deref();
    avatar_input.depth_source = depth_source
        .as_ref()
        .map(|source| source as &dyn input::DepthSource);
    if let Some(path) = &args.photo_path {
        avatar_input.colors = Some(input::io::load_landmark_colors(path, &landmarks)?);
    }

    println!("Building avatar");
    let now = Instant::now();
    let output = avatar_alg::build_avatar(&avatar_input, &config)?;
    let duration = now.elapsed();
    println!("Avatar built in {}ms", duration.as_millis());

    println!("Saving asset");
    std::fs::write(&args.glb_out_path, &output.asset)?;
    if let Some(path) = &args.obj_out_path {
        mesh3d::io::save_obj(path, &output.rig.mesh)?;
    }
    if let Some(path) = &args.skel_out_path {
        skeleton3d::io::save_obj(path, &output.rig.skeleton)?;
    }

    println!("{}", serde_json::to_string_pretty(&output.summary)?);

    Ok(())
}
