use log::debug;
use nalgebra::{Matrix4, Vector3};

use crate::asset::buffer_layout::{self, BufferBuilder};
use crate::asset::glb;
use crate::asset::gltf_json::*;
use crate::error::{AvatarError, Result};
use crate::geometry::geometry_operations;
use crate::mesh3d::GenericMesh3D;
use crate::skeleton3d::{Skeleton3D, SkinBinding, MAX_INFLUENCES};

pub const GENERATOR: &str = "head-rig-3d";
pub const MESH_NODE_NAME: &str = "AvatarMesh";
/// Base color of the single material
pub const BASE_COLOR: [f32; 4] = [0.8, 0.7, 0.6, 1.0];

/// Inverse bind matrix of a bone, column major
///
/// Bones have no rest rotation, so the matrix is the translation by the opposite of
/// the rest position.
pub fn inverse_bind_matrix(position: &Vector3<f32>) -> [f32; 16] {
    let mat = Matrix4::new_translation(&(-position));
    let mut out = [0.0; 16];
    out.copy_from_slice(mat.as_slice());
    out
}

/// Joints (4 x u16) and weights (4 x f32) of every vertex
///
/// Influences are sorted by decreasing weight and renormalized; zero weights point
/// to joint 0.
pub fn joints_and_weights(skin: &SkinBinding) -> Result<(Vec<u16>, Vec<f32>)> {
    let mut joints = Vec::with_capacity(MAX_INFLUENCES * skin.get_nb_vertices());
    let mut weights = Vec::with_capacity(MAX_INFLUENCES * skin.get_nb_vertices());
    for infl in skin.influences().iter() {
        let mut sorted = *infl;
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let total: f32 = sorted.iter().map(|&(_, weight)| weight).sum();
        for &(ind_bone, weight) in sorted.iter() {
            if weight > 0.0 {
                let joint = u16::try_from(ind_bone).map_err(|_| {
                    AvatarError::SerializationBounds(format!("joint {} does not fit u16", ind_bone))
                })?;
                joints.push(joint);
                weights.push(weight / total);
            } else {
                joints.push(0);
                weights.push(0.0);
            }
        }
    }
    Ok((joints, weights))
}

fn vertex_accessor(
    buffer_view: usize,
    component_type: ComponentType,
    count: usize,
    accessor_type: AccessorType,
) -> Accessor {
    Accessor {
        buffer_view,
        byte_offset: 0,
        component_type,
        count,
        accessor_type,
        min: None,
        max: None,
    }
}

/// Builds the glTF document and its binary buffer
pub fn build_document(
    mesh: &GenericMesh3D,
    skeleton: &Skeleton3D,
    skin: &SkinBinding,
) -> Result<(Document, Vec<u8>)> {
    mesh.check_mesh()?;
    skeleton.check()?;
    let nb_vertices = mesh.get_nb_vertices();
    let nb_faces = mesh.get_nb_faces();
    let nb_bones = skeleton.get_nb_bones();
    skin.check(nb_vertices, nb_bones)?;
    if nb_faces == 0 {
        return Err(AvatarError::InvalidMesh("mesh without faces".to_string()));
    }
    let normals = mesh
        .normals()
        .ok_or_else(|| AvatarError::InvalidMesh("normals were not computed".to_string()))?;
    let root = skeleton
        .root()
        .ok_or_else(|| AvatarError::InvalidSkeleton("skeleton without root".to_string()))?;

    let mut builder = BufferBuilder::new();
    let mut accessors = Vec::new();

    let positions: Vec<f32> = mesh.vertices().iter().flat_map(|v| [v[0], v[1], v[2]]).collect();
    let (bmin, bmax) = geometry_operations::bounding_box(mesh.vertices())
        .ok_or_else(|| AvatarError::InvalidMesh("mesh without vertices".to_string()))?;
    let view = builder.push_f32(&positions, Some(BufferViewTarget::ArrayBuffer))?;
    let mut acc_position = vertex_accessor(view, ComponentType::Float, nb_vertices, AccessorType::Vec3);
    acc_position.min = Some(vec![bmin[0], bmin[1], bmin[2]]);
    acc_position.max = Some(vec![bmax[0], bmax[1], bmax[2]]);
    accessors.push(acc_position);
    let ind_position = accessors.len() - 1;

    let flat_normals: Vec<f32> = normals.iter().flat_map(|n| [n[0], n[1], n[2]]).collect();
    let view = builder.push_f32(&flat_normals, Some(BufferViewTarget::ArrayBuffer))?;
    accessors.push(vertex_accessor(view, ComponentType::Float, nb_vertices, AccessorType::Vec3));
    let ind_normal = accessors.len() - 1;

    let ind_color = match mesh.colors() {
        Some(colors) => {
            let flat: Vec<f32> = colors.iter().flat_map(|col| *col).collect();
            let view = builder.push_f32(&flat, Some(BufferViewTarget::ArrayBuffer))?;
            accessors.push(vertex_accessor(view, ComponentType::Float, nb_vertices, AccessorType::Vec4));
            Some(accessors.len() - 1)
        }
        None => None,
    };

    let (joints, weights) = joints_and_weights(skin)?;
    let view = builder.push_u16(&joints, Some(BufferViewTarget::ArrayBuffer))?;
    accessors.push(vertex_accessor(view, ComponentType::UnsignedShort, nb_vertices, AccessorType::Vec4));
    let ind_joints = accessors.len() - 1;
    let view = builder.push_f32(&weights, Some(BufferViewTarget::ArrayBuffer))?;
    accessors.push(vertex_accessor(view, ComponentType::Float, nb_vertices, AccessorType::Vec4));
    let ind_weights = accessors.len() - 1;

    let mut indices = Vec::with_capacity(3 * nb_faces);
    for face in mesh.faces().iter() {
        for &ind in face.iter() {
            indices.push(u32::try_from(ind).map_err(|_| {
                AvatarError::SerializationBounds(format!("vertex index {} does not fit u32", ind))
            })?);
        }
    }
    let view = builder.push_u32(&indices, Some(BufferViewTarget::ElementArrayBuffer))?;
    accessors.push(vertex_accessor(view, ComponentType::UnsignedInt, indices.len(), AccessorType::Scalar));
    let ind_indices = accessors.len() - 1;

    let ibms: Vec<f32> = skeleton
        .bones()
        .iter()
        .flat_map(|bone| inverse_bind_matrix(&bone.position))
        .collect();
    let view = builder.push_f32(&ibms, None)?;
    accessors.push(vertex_accessor(view, ComponentType::Float, nb_bones, AccessorType::Mat4));
    let ind_ibm = accessors.len() - 1;

    let (data, buffer_views) = builder.finish();
    buffer_layout::validate_layout(data.len(), &buffer_views, &accessors)?;

    // node 0 holds the mesh, bone i is node i + 1
    let mut nodes = vec![Node {
        name: MESH_NODE_NAME.to_string(),
        mesh: Some(0),
        skin: Some(0),
        translation: None,
        children: Vec::new(),
    }];
    for (ind_bone, bone) in skeleton.bones().iter().enumerate() {
        let local = skeleton.local_translation(ind_bone)?;
        nodes.push(Node {
            name: bone.name.clone(),
            mesh: None,
            skin: None,
            translation: Some([local[0], local[1], local[2]]),
            children: skeleton
                .children(ind_bone)
                .into_iter()
                .map(|ind_child| ind_child + 1)
                .collect(),
        });
    }

    let document = Document {
        asset: Asset {
            generator: GENERATOR.to_string(),
            version: "2.0".to_string(),
        },
        scene: 0,
        scenes: vec![Scene {
            name: "Scene".to_string(),
            nodes: vec![0, root + 1],
        }],
        nodes,
        meshes: vec![Mesh {
            name: MESH_NODE_NAME.to_string(),
            primitives: vec![Primitive {
                attributes: PrimitiveAttributes {
                    position: ind_position,
                    normal: ind_normal,
                    color: ind_color,
                    joints: ind_joints,
                    weights: ind_weights,
                },
                indices: ind_indices,
                material: Some(0),
                mode: 4,
            }],
        }],
        materials: vec![Material {
            name: "Skin".to_string(),
            pbr_metallic_roughness: PbrMetallicRoughness {
                base_color_factor: BASE_COLOR,
                metallic_factor: 0.0,
                roughness_factor: 0.8,
            },
        }],
        skins: vec![Skin {
            name: "Armature".to_string(),
            joints: (1..=nb_bones).collect(),
            skeleton: root + 1,
            inverse_bind_matrices: ind_ibm,
        }],
        accessors,
        buffer_views,
        buffers: vec![Buffer {
            byte_length: data.len(),
        }],
    };
    debug!(
        "Asset layout: {} accessors, {} views, {} bytes",
        document.accessors.len(),
        document.buffer_views.len(),
        data.len()
    );

    Ok((document, data))
}

/// Serializes mesh, skeleton and skin as a self-contained GLB asset
pub fn serialize_avatar(mesh: &GenericMesh3D, skeleton: &Skeleton3D, skin: &SkinBinding) -> Result<Vec<u8>> {
    let (document, data) = build_document(mesh, skeleton, skin)?;
    glb::write_glb(&document, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh3d::{mesh_operations, MeshRegion};

    fn tetra_avatar() -> (GenericMesh3D, Skeleton3D, SkinBinding) {
        let mut mesh = GenericMesh3D::new();
        mesh.add_vertex(&Vector3::new(0.0, 0.0, 0.0), MeshRegion::Surface);
        mesh.add_vertex(&Vector3::new(1.0, 0.0, 0.0), MeshRegion::Surface);
        mesh.add_vertex(&Vector3::new(0.0, 1.0, 0.0), MeshRegion::Shell);
        mesh.add_vertex(&Vector3::new(0.0, 0.0, 1.0), MeshRegion::Neck);
        mesh.add_face(0, 2, 1).unwrap();
        mesh.add_face(0, 1, 3).unwrap();
        mesh.add_face(1, 2, 3).unwrap();
        mesh.add_face(0, 3, 2).unwrap();
        mesh_operations::compute_vertex_normals(&mut mesh);

        let mut skeleton = Skeleton3D::new();
        skeleton.add_bone("Hips", None, &Vector3::new(0.0, 0.5, 0.0)).unwrap();
        skeleton.add_bone("Head", Some(0), &Vector3::new(0.0, 1.0, 0.0)).unwrap();

        let mut skin = SkinBinding::new();
        skin.push([(0, 0.25), (1, 0.75), (0, 0.0), (0, 0.0)]);
        for _ in 0..3 {
            skin.push([(0, 1.0), (0, 0.0), (0, 0.0), (0, 0.0)]);
        }
        (mesh, skeleton, skin)
    }

    #[test]
    fn test_inverse_bind_matrix_convention() {
        let ibm = inverse_bind_matrix(&Vector3::new(1.0, 2.0, 3.0));
        // column major: translation in the last column
        assert_eq!(&ibm[12..16], &[-1.0, -2.0, -3.0, 1.0]);
        assert_eq!(ibm[0], 1.0);
        assert_eq!(ibm[3], 0.0);
    }

    #[test]
    fn test_joints_sorted_by_weight() {
        let (_, _, skin) = tetra_avatar();
        let (joints, weights) = joints_and_weights(&skin).unwrap();
        assert_eq!(&joints[0..4], &[1, 0, 0, 0]);
        assert_eq!(&weights[0..4], &[0.75, 0.25, 0.0, 0.0]);
        assert_eq!(joints.len(), 16);
    }

    #[test]
    fn test_document_consistency() {
        let (mesh, skeleton, skin) = tetra_avatar();
        let (document, data) = build_document(&mesh, &skeleton, &skin).unwrap();

        assert_eq!(document.buffers[0].byte_length, data.len());
        assert_eq!(document.nodes.len(), 3);
        assert_eq!(document.nodes[1].children, vec![2]);
        assert_eq!(document.nodes[2].translation, Some([0.0, 0.5, 0.0]));
        assert_eq!(document.scenes[0].nodes, vec![0, 1]);

        let skin_obj = &document.skins[0];
        assert_eq!(skin_obj.joints, vec![1, 2]);
        assert_eq!(document.accessors[skin_obj.inverse_bind_matrices].count, 2);

        let attributes = &document.meshes[0].primitives[0].attributes;
        assert!(attributes.color.is_none());
        let indices = &document.accessors[document.meshes[0].primitives[0].indices];
        assert_eq!(indices.count, 12);
        assert_eq!(document.accessors[attributes.position].max, Some(vec![1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_missing_normals_rejected() {
        let (mut mesh, skeleton, skin) = tetra_avatar();
        mesh.add_face(0, 1, 2).unwrap();
        assert!(matches!(
            serialize_avatar(&mesh, &skeleton, &skin),
            Err(AvatarError::InvalidMesh(_))
        ));
    }
}
