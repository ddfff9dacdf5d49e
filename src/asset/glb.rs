use crate::asset::gltf_json::Document;
use crate::error::{AvatarError, Result};

/// "glTF"
pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_VERSION: u32 = 2;
/// "JSON"
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// "BIN\0"
pub const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_LENGTH: usize = 12;
const CHUNK_HEADER_LENGTH: usize = 8;

fn push_u32(out: &mut Vec<u8>, val: u32) {
    out.extend_from_slice(&val.to_le_bytes());
}

fn chunk_length(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        AvatarError::SerializationBounds(format!("chunk of {} bytes does not fit a GLB file", len))
    })
}

/// Packs a document and its binary buffer in a GLB container
///
/// The JSON chunk is padded with spaces and the BIN chunk with zeros to 4 bytes.
pub fn write_glb(document: &Document, bin: &[u8]) -> Result<Vec<u8>> {
    let mut json = serde_json::to_vec(document)?;
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = HEADER_LENGTH + 2 * CHUNK_HEADER_LENGTH + json.len() + bin.len();
    let mut out = Vec::with_capacity(total);
    push_u32(&mut out, GLB_MAGIC);
    push_u32(&mut out, GLB_VERSION);
    push_u32(&mut out, chunk_length(total)?);

    push_u32(&mut out, chunk_length(json.len())?);
    push_u32(&mut out, CHUNK_JSON);
    out.extend_from_slice(&json);

    push_u32(&mut out, chunk_length(bin.len())?);
    push_u32(&mut out, CHUNK_BIN);
    out.extend_from_slice(&bin);

    Ok(out)
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .and_then(|word| <[u8; 4]>::try_from(word).ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| AvatarError::Input(format!("GLB truncated at byte {}", offset)))
}

/// Reads a GLB container: parsed JSON document and BIN chunk
pub fn read_glb(bytes: &[u8]) -> Result<(Document, Vec<u8>)> {
    if read_u32(bytes, 0)? != GLB_MAGIC {
        return Err(AvatarError::Input("not a GLB file".to_string()));
    }
    let version = read_u32(bytes, 4)?;
    if version != GLB_VERSION {
        return Err(AvatarError::Input(format!("GLB version {}", version)));
    }
    let total = read_u32(bytes, 8)? as usize;
    if total != bytes.len() {
        return Err(AvatarError::Input(format!(
            "GLB declares {} bytes, {} given",
            total,
            bytes.len()
        )));
    }

    let mut opt_document: Option<Document> = None;
    let mut bin = Vec::new();
    let mut offset = HEADER_LENGTH;
    while offset < total {
        let len = read_u32(bytes, offset)? as usize;
        let kind = read_u32(bytes, offset + 4)?;
        let start = offset + CHUNK_HEADER_LENGTH;
        let chunk = bytes
            .get(start..start + len)
            .ok_or_else(|| AvatarError::Input(format!("GLB chunk at {} is truncated", offset)))?;
        match kind {
            CHUNK_JSON => opt_document = Some(serde_json::from_slice(chunk)?),
            CHUNK_BIN => bin = chunk.to_vec(),
            _ => (),
        }
        offset = start + len;
    }

    let document = opt_document.ok_or_else(|| AvatarError::Input("GLB without JSON chunk".to_string()))?;
    Ok((document, bin))
}
