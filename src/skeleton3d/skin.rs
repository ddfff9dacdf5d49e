use crate::error::{AvatarError, Result};

/// Number of bone influences per vertex
pub const MAX_INFLUENCES: usize = 4;

/// (bone index, weight)
pub type Influence = (usize, f32);

#[derive(Clone, Debug, Default)]
/// Bone influences of every mesh vertex
///
/// Each vertex has exactly [`MAX_INFLUENCES`] pairs, sorted by decreasing weight and
/// zero padded. Weights sum to one, or are all zero for an unskinned vertex.
pub struct SkinBinding {
    pub(super) influences: Vec<[Influence; MAX_INFLUENCES]>,
}

impl SkinBinding {
    /// Skin binding constructor
    pub fn new() -> SkinBinding {
        SkinBinding {
            influences: Vec::new(),
        }
    }

    /// Adds the influences of the next vertex
    pub fn push(&mut self, influences: [Influence; MAX_INFLUENCES]) -> usize {
        self.influences.push(influences);
        self.influences.len() - 1
    }

    /// Gets number of skinned vertices
    pub fn get_nb_vertices(&self) -> usize {
        self.influences.len()
    }

    /// Influences of a vertex
    pub fn get_influences(&self, ind_vertex: usize) -> Result<&[Influence; MAX_INFLUENCES]> {
        self.influences.get(ind_vertex).ok_or_else(|| {
            AvatarError::InvalidMesh(format!(
                "get_influences(): Index {} out of bounds",
                ind_vertex
            ))
        })
    }

    /// Influences of all vertices
    pub fn influences(&self) -> &[[Influence; MAX_INFLUENCES]] {
        &self.influences
    }

    /// Checks weights (non negative, sum to one or all zero) and bone indices
    pub fn check(&self, nb_vertices: usize, nb_bones: usize) -> Result<()> {
        if self.influences.len() != nb_vertices {
            return Err(AvatarError::InvalidSkeleton(format!(
                "skin check(): {} influence sets for {} vertices",
                self.influences.len(),
                nb_vertices
            )));
        }
        for (ind_vertex, infl) in self.influences.iter().enumerate() {
            let mut sum = 0.0;
            for &(ind_bone, weight) in infl.iter() {
                if weight < 0.0 || !weight.is_finite() {
                    return Err(AvatarError::InvalidSkeleton(format!(
                        "skin check(): vertex {} has weight {}",
                        ind_vertex, weight
                    )));
                }
                if weight > 0.0 && ind_bone >= nb_bones {
                    return Err(AvatarError::InvalidSkeleton(format!(
                        "skin check(): vertex {} references bone {} ({} bones)",
                        ind_vertex, ind_bone, nb_bones
                    )));
                }
                sum += weight;
            }
            if sum != 0.0 && (sum - 1.0).abs() > 1e-4 {
                return Err(AvatarError::InvalidSkeleton(format!(
                    "skin check(): vertex {} weights sum to {}",
                    ind_vertex, sum
                )));
            }
        }
        Ok(())
    }
}
