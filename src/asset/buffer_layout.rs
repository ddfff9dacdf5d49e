use crate::asset::gltf_json::{Accessor, BufferView, BufferViewTarget};
use crate::error::{AvatarError, Result};

/// Byte alignment of every buffer view
pub const VIEW_ALIGNMENT: usize = 4;

fn bounds_error(msg: String) -> AvatarError {
    AvatarError::SerializationBounds(msg)
}

/// Contiguous binary buffer built view after view
///
/// Every view starts on a 4-byte boundary and offsets only grow.
#[derive(Debug, Default)]
pub struct BufferBuilder {
    data: Vec<u8>,
    views: Vec<BufferView>,
}

impl BufferBuilder {
    /// Buffer builder constructor
    pub fn new() -> BufferBuilder {
        BufferBuilder {
            data: Vec::new(),
            views: Vec::new(),
        }
    }

    fn pad(&mut self) {
        while self.data.len() % VIEW_ALIGNMENT != 0 {
            self.data.push(0);
        }
    }

    /// Appends raw bytes as a new view, returns the view index
    pub fn push_view(&mut self, bytes: &[u8], target: Option<BufferViewTarget>) -> Result<usize> {
        self.pad();
        let byte_offset = self.data.len();
        byte_offset.checked_add(bytes.len()).ok_or_else(|| {
            bounds_error(format!(
                "view of {} bytes at offset {} overflows",
                bytes.len(),
                byte_offset
            ))
        })?;
        self.data.extend_from_slice(bytes);
        self.views.push(BufferView {
            buffer: 0,
            byte_length: bytes.len(),
            byte_offset,
            target,
        });
        Ok(self.views.len() - 1)
    }

    /// Appends little endian f32 values as a new view
    pub fn push_f32(&mut self, values: &[f32], target: Option<BufferViewTarget>) -> Result<usize> {
        let bytes: Vec<u8> = values.iter().flat_map(|val| val.to_le_bytes()).collect();
        self.push_view(&bytes, target)
    }

    /// Appends little endian u32 values as a new view
    pub fn push_u32(&mut self, values: &[u32], target: Option<BufferViewTarget>) -> Result<usize> {
        let bytes: Vec<u8> = values.iter().flat_map(|val| val.to_le_bytes()).collect();
        self.push_view(&bytes, target)
    }

    /// Appends little endian u16 values as a new view
    pub fn push_u16(&mut self, values: &[u16], target: Option<BufferViewTarget>) -> Result<usize> {
        let bytes: Vec<u8> = values.iter().flat_map(|val| val.to_le_bytes()).collect();
        self.push_view(&bytes, target)
    }

    /// Current buffer length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if no byte was written
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Views written so far
    pub fn views(&self) -> &[BufferView] {
        &self.views
    }

    /// Pads the buffer to the view alignment and returns it with its views
    pub fn finish(mut self) -> (Vec<u8>, Vec<BufferView>) {
        self.pad();
        (self.data, self.views)
    }
}

/// Checks that every view lies in the buffer and every accessor in its view
pub fn validate_layout(buffer_length: usize, views: &[BufferView], accessors: &[Accessor]) -> Result<()> {
    for (ind_view, view) in views.iter().enumerate() {
        let end = view.byte_offset.checked_add(view.byte_length).ok_or_else(|| {
            bounds_error(format!("view {}: end offset overflows", ind_view))
        })?;
        if end > buffer_length {
            return Err(bounds_error(format!(
                "view {}: bytes {}..{} outside a {} byte buffer",
                ind_view, view.byte_offset, end, buffer_length
            )));
        }
        if view.byte_offset % VIEW_ALIGNMENT != 0 {
            return Err(bounds_error(format!(
                "view {}: offset {} is not {}-byte aligned",
                ind_view, view.byte_offset, VIEW_ALIGNMENT
            )));
        }
    }
    for (ind_acc, accessor) in accessors.iter().enumerate() {
        let view = views.get(accessor.buffer_view).ok_or_else(|| {
            bounds_error(format!(
                "accessor {}: view {} does not exist",
                ind_acc, accessor.buffer_view
            ))
        })?;
        let end = accessor
            .byte_length()
            .and_then(|len| len.checked_add(accessor.byte_offset))
            .ok_or_else(|| bounds_error(format!("accessor {}: length overflows", ind_acc)))?;
        if end > view.byte_length {
            return Err(bounds_error(format!(
                "accessor {}: {} bytes needed, view {} holds {}",
                ind_acc, end, accessor.buffer_view, view.byte_length
            )));
        }
    }
    Ok(())
}
