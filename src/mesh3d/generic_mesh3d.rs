use nalgebra::base::*;

use crate::error::{AvatarError, Result};

/// Mesh vertex
pub type Vertex = Vector3<f32>;
/// Mesh face (array of vertex indices, counter clockwise)
pub type Face = [usize; 3];
/// RGBA vertex color
pub type Color = [f32; 4];

/// Color given to vertices without sampled color
pub const DEFAULT_SKIN_COLOR: Color = [0.8, 0.7, 0.6, 1.0];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Pipeline stage that created a vertex
pub enum MeshRegion {
    /// Projected landmarks (visible face)
    Surface,
    /// Synthesized back of the head
    Shell,
    /// Extruded neck
    Neck,
}

#[derive(Clone, Debug, Default)]
/// Standalone vertex/face set with local indices, offset when appended to a mesh
pub struct MeshPatch {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

#[derive(Clone, Debug)]
/// Arena mesh: vertices and faces only grow until cleaning rebuilds the buffers
///
/// Every vertex carries the region that created it, so stage specific passes
/// stay valid after the cleaner compacts the buffers.
pub struct GenericMesh3D {
    pub(super) vertices: Vec<Vertex>,
    pub(super) faces: Vec<Face>,
    pub(super) regions: Vec<MeshRegion>,
    pub(super) normals: Option<Vec<Vertex>>,
    pub(super) colors: Option<Vec<Color>>,
    pub(super) fill_color: Color,
}

impl GenericMesh3D {
    /// Generic mesh constructor
    pub fn new() -> GenericMesh3D {
        GenericMesh3D {
            vertices: Vec::new(),
            faces: Vec::new(),
            regions: Vec::new(),
            normals: None,
            colors: None,
            fill_color: DEFAULT_SKIN_COLOR,
        }
    }

    /// Adds a vertex to the mesh
    pub fn add_vertex(&mut self, point: &Vertex, region: MeshRegion) -> usize {
        self.vertices.push(*point);
        self.regions.push(region);
        if let Some(colors) = self.colors.as_mut() {
            colors.push(self.fill_color);
        }
        self.normals = None;
        self.vertices.len() - 1
    }

    /// Vertex getter
    pub fn get_vertex(&self, ind_vertex: usize) -> Result<Vertex> {
        if ind_vertex >= self.vertices.len() {
            return Err(AvatarError::InvalidMesh(format!(
                "get_vertex(): Index {} out of bounds",
                ind_vertex
            )));
        }
        Ok(self.vertices[ind_vertex])
    }

    /// Vertex setter, used by stages displacing existing vertices
    pub fn set_vertex(&mut self, ind_vertex: usize, point: &Vertex) -> Result<()> {
        if ind_vertex >= self.vertices.len() {
            return Err(AvatarError::InvalidMesh(format!(
                "set_vertex(): Index {} out of bounds",
                ind_vertex
            )));
        }
        self.vertices[ind_vertex] = *point;
        self.normals = None;
        Ok(())
    }

    /// Gets number of vertices
    pub fn get_nb_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Adds a face to the mesh, keeping the given winding
    pub fn add_face(
        &mut self,
        ind_vertex1: usize,
        ind_vertex2: usize,
        ind_vertex3: usize,
    ) -> Result<usize> {
        let face = [ind_vertex1, ind_vertex2, ind_vertex3];
        if face.iter().any(|&ind| ind >= self.vertices.len()) {
            return Err(AvatarError::InvalidMesh(format!(
                "add_face(): Face {:?} references a vertex out of bounds ({} vertices)",
                face,
                self.vertices.len()
            )));
        }
        self.faces.push(face);
        self.normals = None;
        Ok(self.faces.len() - 1)
    }

    /// Face getter
    pub fn get_face(&self, ind_face: usize) -> Result<Face> {
        if ind_face >= self.faces.len() {
            return Err(AvatarError::InvalidMesh(format!(
                "get_face(): Index {} out of bounds",
                ind_face
            )));
        }
        Ok(self.faces[ind_face])
    }

    /// Gets number of faces
    pub fn get_nb_faces(&self) -> usize {
        self.faces.len()
    }

    /// Appends a vertex/face patch whose faces use local indices
    ///
    /// Returns the offset added to the patch indices
    pub fn append_patch(
        &mut self,
        vertices: &[Vertex],
        faces: &[Face],
        region: MeshRegion,
    ) -> Result<usize> {
        let offset = self.vertices.len();
        for vert in vertices.iter() {
            self.add_vertex(vert, region);
        }
        for face in faces.iter() {
            self.add_face(face[0] + offset, face[1] + offset, face[2] + offset)?;
        }
        Ok(offset)
    }

    /// Appends a patch built by a synthesis stage
    pub fn append_mesh_patch(&mut self, patch: &MeshPatch, region: MeshRegion) -> Result<usize> {
        self.append_patch(&patch.vertices, &patch.faces, region)
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Region of every vertex
    pub fn regions(&self) -> &[MeshRegion] {
        &self.regions
    }

    /// Indices of the vertices created by a given stage
    pub fn region_indices(&self, region: MeshRegion) -> Vec<usize> {
        self.regions
            .iter()
            .enumerate()
            .filter_map(|(ind, &reg)| if reg == region { Some(ind) } else { None })
            .collect()
    }

    /// Per vertex normals, available once computed by the cleaner
    pub fn normals(&self) -> Option<&[Vertex]> {
        self.normals.as_deref()
    }

    /// Per vertex colors, if any
    pub fn colors(&self) -> Option<&[Color]> {
        self.colors.as_deref()
    }

    /// Sets colors of existing vertices
    ///
    /// Vertices added afterwards get the mean of the given colors.
    pub fn set_colors(&mut self, colors: Vec<Color>) -> Result<()> {
        if colors.len() != self.vertices.len() {
            return Err(AvatarError::InvalidMesh(format!(
                "set_colors(): {} colors for {} vertices",
                colors.len(),
                self.vertices.len()
            )));
        }
        if !colors.is_empty() {
            let mut mean = [0.0f32; 4];
            for col in colors.iter() {
                for i in 0..4 {
                    mean[i] += col[i];
                }
            }
            for val in mean.iter_mut() {
                *val /= colors.len() as f32;
            }
            self.fill_color = mean;
        }
        self.colors = Some(colors);
        Ok(())
    }

    /// Sets the color given to vertices added from now on
    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    /// Checks that every face references existing vertices and that per vertex arrays match
    pub fn check_mesh(&self) -> Result<()> {
        let nb_vertices = self.vertices.len();
        if self.regions.len() != nb_vertices {
            return Err(AvatarError::InvalidMesh(format!(
                "check_mesh(): {} regions for {} vertices",
                self.regions.len(),
                nb_vertices
            )));
        }
        if let Some(colors) = &self.colors {
            if colors.len() != nb_vertices {
                return Err(AvatarError::InvalidMesh(format!(
                    "check_mesh(): {} colors for {} vertices",
                    colors.len(),
                    nb_vertices
                )));
            }
        }
        if let Some(normals) = &self.normals {
            if normals.len() != nb_vertices {
                return Err(AvatarError::InvalidMesh(format!(
                    "check_mesh(): {} normals for {} vertices",
                    normals.len(),
                    nb_vertices
                )));
            }
        }
        for (ind_face, face) in self.faces.iter().enumerate() {
            if let Some(&ind) = face.iter().find(|&&ind| ind >= nb_vertices) {
                return Err(AvatarError::InvalidMesh(format!(
                    "check_mesh(): face {} references vertex {} ({} vertices)",
                    ind_face, ind, nb_vertices
                )));
            }
        }
        Ok(())
    }
}

impl Default for GenericMesh3D {
    fn default() -> Self {
        GenericMesh3D::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_patch_offsets_faces() {
        let mut mesh = GenericMesh3D::new();
        mesh.add_vertex(&Vector3::new(0.0, 0.0, 0.0), MeshRegion::Surface);
        mesh.add_vertex(&Vector3::new(1.0, 0.0, 0.0), MeshRegion::Surface);

        let patch = [
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
        ];
        let offset = mesh.append_patch(&patch, &[[0, 1, 2]], MeshRegion::Shell).unwrap();

        assert_eq!(offset, 2);
        assert_eq!(mesh.get_face(0).unwrap(), [2, 3, 4]);
        assert_eq!(mesh.region_indices(MeshRegion::Shell), vec![2, 3, 4]);
        assert!(mesh.check_mesh().is_ok());
    }

    #[test]
    fn test_add_face_out_of_bounds() {
        let mut mesh = GenericMesh3D::new();
        mesh.add_vertex(&Vector3::zeros(), MeshRegion::Surface);
        assert!(matches!(
            mesh.add_face(0, 1, 2),
            Err(AvatarError::InvalidMesh(_))
        ));
    }

    #[test]
    fn test_colors_fill_new_vertices_with_mean() {
        let mut mesh = GenericMesh3D::new();
        mesh.add_vertex(&Vector3::zeros(), MeshRegion::Surface);
        mesh.add_vertex(&Vector3::x(), MeshRegion::Surface);
        mesh.set_colors(vec![[1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]])
            .unwrap();
        mesh.add_vertex(&Vector3::y(), MeshRegion::Neck);

        let colors = mesh.colors().unwrap();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[2], [0.5, 0.0, 0.5, 1.0]);
    }
}
