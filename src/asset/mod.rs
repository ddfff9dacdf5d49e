/// Buffer views packing and bounds validation
pub mod buffer_layout;
/// GLB container
pub mod glb;
/// glTF 2.0 json document
pub mod gltf_json;
/// Avatar to GLB serialization
pub mod serializer;
pub use serializer::serialize_avatar;
