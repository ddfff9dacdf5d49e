use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum ComponentType {
    UnsignedByte = 5121,
    UnsignedShort = 5123,
    UnsignedInt = 5125,
    Float = 5126,
}

impl ComponentType {
    /// Size in bytes of one component
    pub fn size(&self) -> usize {
        match self {
            ComponentType::UnsignedByte => 1,
            ComponentType::UnsignedShort => 2,
            ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessorType {
    #[serde(rename = "SCALAR")]
    Scalar,
    #[serde(rename = "VEC3")]
    Vec3,
    #[serde(rename = "VEC4")]
    Vec4,
    #[serde(rename = "MAT4")]
    Mat4,
}

impl AccessorType {
    /// Number of components of one element
    pub fn components(&self) -> usize {
        match self {
            AccessorType::Scalar => 1,
            AccessorType::Vec3 => 3,
            AccessorType::Vec4 => 4,
            AccessorType::Mat4 => 16,
        }
    }
}

#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum BufferViewTarget {
    ArrayBuffer = 34962,
    ElementArrayBuffer = 34963,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Accessor {
    #[serde(rename = "bufferView")]
    pub buffer_view: usize,
    #[serde(rename = "byteOffset", default)]
    pub byte_offset: usize,
    #[serde(rename = "componentType")]
    pub component_type: ComponentType,
    pub count: usize,
    #[serde(rename = "type")]
    pub accessor_type: AccessorType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max: Option<Vec<f32>>,
}

impl Accessor {
    /// Size in bytes of the accessed range
    pub fn byte_length(&self) -> Option<usize> {
        self.count
            .checked_mul(self.accessor_type.components() * self.component_type.size())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Asset {
    pub generator: String,
    pub version: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BufferView {
    pub buffer: usize,
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
    #[serde(rename = "byteOffset", default)]
    pub byte_offset: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<BufferViewTarget>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Buffer {
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PrimitiveAttributes {
    #[serde(rename = "POSITION")]
    pub position: usize,
    #[serde(rename = "NORMAL")]
    pub normal: usize,
    #[serde(rename = "COLOR_0", skip_serializing_if = "Option::is_none", default)]
    pub color: Option<usize>,
    #[serde(rename = "JOINTS_0")]
    pub joints: usize,
    #[serde(rename = "WEIGHTS_0")]
    pub weights: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Primitive {
    pub attributes: PrimitiveAttributes,
    pub indices: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub material: Option<usize>,
    /// 4: triangles
    pub mode: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mesh: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub skin: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub translation: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Skin {
    pub name: String,
    pub joints: Vec<usize>,
    pub skeleton: usize,
    #[serde(rename = "inverseBindMatrices")]
    pub inverse_bind_matrices: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PbrMetallicRoughness {
    #[serde(rename = "baseColorFactor")]
    pub base_color_factor: [f32; 4],
    #[serde(rename = "metallicFactor")]
    pub metallic_factor: f32,
    #[serde(rename = "roughnessFactor")]
    pub roughness_factor: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    #[serde(rename = "pbrMetallicRoughness")]
    pub pbr_metallic_roughness: PbrMetallicRoughness,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Scene {
    pub name: String,
    pub nodes: Vec<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Document {
    pub asset: Asset,
    pub scene: usize,
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub materials: Vec<Material>,
    pub skins: Vec<Skin>,
    pub accessors: Vec<Accessor>,
    #[serde(rename = "bufferViews")]
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<Buffer>,
}
