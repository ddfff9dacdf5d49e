use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AvatarError;

/// Bone placement entry: position is `bbox_min + ratio * bbox_size`
///
/// Parents always come before their children in a table.
#[derive(Copy, Clone, Debug)]
pub struct BoneDef {
    pub name: &'static str,
    pub parent: Option<usize>,
    pub ratio: [f32; 3],
}

const fn bone(name: &'static str, parent: Option<usize>, ratio: [f32; 3]) -> BoneDef {
    BoneDef {
        name,
        parent,
        ratio,
    }
}

/// Mixamo table without the toe bases and Spine2 (shoulders hang from Spine1)
#[rustfmt::skip]
static HUMANOID_BONES: [BoneDef; 20] = [
    bone("Hips",          None,     [0.50, 0.45, 0.50]),
    bone("Spine",         Some(0),  [0.50, 0.52, 0.50]),
    bone("Spine1",        Some(1),  [0.50, 0.58, 0.50]),
    bone("Neck",          Some(2),  [0.50, 0.78, 0.50]),
    bone("Head",          Some(3),  [0.50, 0.85, 0.50]),
    bone("HeadTop_End",   Some(4),  [0.50, 0.98, 0.50]),
    bone("LeftShoulder",  Some(2),  [0.58, 0.72, 0.50]),
    bone("LeftArm",       Some(6),  [0.72, 0.70, 0.50]),
    bone("LeftForeArm",   Some(7),  [0.82, 0.55, 0.50]),
    bone("LeftHand",      Some(8),  [0.90, 0.42, 0.50]),
    bone("RightShoulder", Some(2),  [0.42, 0.72, 0.50]),
    bone("RightArm",      Some(10), [0.28, 0.70, 0.50]),
    bone("RightForeArm",  Some(11), [0.18, 0.55, 0.50]),
    bone("RightHand",     Some(12), [0.10, 0.42, 0.50]),
    bone("LeftUpLeg",     Some(0),  [0.58, 0.42, 0.50]),
    bone("LeftLeg",       Some(14), [0.58, 0.24, 0.50]),
    bone("LeftFoot",      Some(15), [0.58, 0.04, 0.55]),
    bone("RightUpLeg",    Some(0),  [0.42, 0.42, 0.50]),
    bone("RightLeg",      Some(17), [0.42, 0.24, 0.50]),
    bone("RightFoot",     Some(18), [0.42, 0.04, 0.55]),
];

#[rustfmt::skip]
static MIXAMO_BONES: [BoneDef; 23] = [
    bone("Hips",          None,     [0.50, 0.45, 0.50]),
    bone("Spine",         Some(0),  [0.50, 0.52, 0.50]),
    bone("Spine1",        Some(1),  [0.50, 0.58, 0.50]),
    bone("Spine2",        Some(2),  [0.50, 0.64, 0.50]),
    bone("Neck",          Some(3),  [0.50, 0.78, 0.50]),
    bone("Head",          Some(4),  [0.50, 0.85, 0.50]),
    bone("HeadTop_End",   Some(5),  [0.50, 0.98, 0.50]),
    bone("LeftShoulder",  Some(3),  [0.58, 0.72, 0.50]),
    bone("LeftArm",       Some(7),  [0.72, 0.70, 0.50]),
    bone("LeftForeArm",   Some(8),  [0.82, 0.55, 0.50]),
    bone("LeftHand",      Some(9),  [0.90, 0.42, 0.50]),
    bone("RightShoulder", Some(3),  [0.42, 0.72, 0.50]),
    bone("RightArm",      Some(11), [0.28, 0.70, 0.50]),
    bone("RightForeArm",  Some(12), [0.18, 0.55, 0.50]),
    bone("RightHand",     Some(13), [0.10, 0.42, 0.50]),
    bone("LeftUpLeg",     Some(0),  [0.58, 0.42, 0.50]),
    bone("LeftLeg",       Some(15), [0.58, 0.24, 0.50]),
    bone("LeftFoot",      Some(16), [0.58, 0.04, 0.55]),
    bone("LeftToeBase",   Some(17), [0.58, 0.01, 0.70]),
    bone("RightUpLeg",    Some(0),  [0.42, 0.42, 0.50]),
    bone("RightLeg",      Some(19), [0.42, 0.24, 0.50]),
    bone("RightFoot",     Some(20), [0.42, 0.04, 0.55]),
    bone("RightToeBase",  Some(21), [0.42, 0.01, 0.70]),
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Available bone tables
pub enum SkeletonPreset {
    /// Two bone spine, no toes
    #[default]
    Humanoid,
    /// Three bone spine with toe bases, Mixamo naming
    Mixamo,
}

impl SkeletonPreset {
    /// Bone table of the preset
    pub fn bones(&self) -> &'static [BoneDef] {
        match self {
            SkeletonPreset::Humanoid => &HUMANOID_BONES,
            SkeletonPreset::Mixamo => &MIXAMO_BONES,
        }
    }
}

impl FromStr for SkeletonPreset {
    type Err = AvatarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "humanoid" => Ok(SkeletonPreset::Humanoid),
            "mixamo" => Ok(SkeletonPreset::Mixamo),
            _ => Err(AvatarError::Input(format!("unknown skeleton preset '{}'", s))),
        }
    }
}

impl fmt::Display for SkeletonPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkeletonPreset::Humanoid => write!(f, "humanoid"),
            SkeletonPreset::Mixamo => write!(f, "mixamo"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_table(table: &[BoneDef]) {
        let nb_roots = table.iter().filter(|def| def.parent.is_none()).count();
        assert_eq!(nb_roots, 1);
        assert!(table[0].parent.is_none());
        for (ind, def) in table.iter().enumerate() {
            if let Some(par) = def.parent {
                assert!(par < ind, "{} comes before its parent", def.name);
            }
            for r in def.ratio.iter() {
                assert!((0.0..=1.0).contains(r));
            }
        }
    }

    #[test]
    fn test_tables_are_parent_ordered() {
        assert_eq!(SkeletonPreset::Humanoid.bones().len(), 20);
        assert_eq!(SkeletonPreset::Mixamo.bones().len(), 23);
        check_table(SkeletonPreset::Humanoid.bones());
        check_table(SkeletonPreset::Mixamo.bones());
    }

    #[test]
    fn test_limbs_are_mirrored() {
        for table in [SkeletonPreset::Humanoid.bones(), SkeletonPreset::Mixamo.bones()] {
            for def in table.iter().filter(|def| def.name.starts_with("Left")) {
                let mirror_name = def.name.replacen("Left", "Right", 1);
                let mirror = table.iter().find(|d| d.name == mirror_name).unwrap();
                assert!((def.ratio[0] + mirror.ratio[0] - 1.0).abs() < 1e-6);
                assert_eq!(def.ratio[1], mirror.ratio[1]);
            }
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Mixamo".parse::<SkeletonPreset>().unwrap(), SkeletonPreset::Mixamo);
        assert_eq!(SkeletonPreset::Humanoid.to_string(), "humanoid");
        assert!("quadruped".parse::<SkeletonPreset>().is_err());
    }

    #[test]
    fn test_humanoid_positions_come_from_mixamo() {
        let mixamo = SkeletonPreset::Mixamo.bones();
        for def in SkeletonPreset::Humanoid.bones().iter() {
            let full = mixamo.iter().find(|other| other.name == def.name).unwrap();
            assert_eq!(def.ratio, full.ratio, "{}", def.name);
        }
    }
}
