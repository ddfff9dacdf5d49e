use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::skeleton3d::Skeleton3D;

/// Writes the skeleton as .obj content: one vertex per bone, one line per parent link
pub fn write_obj<W: Write>(writer: &mut W, skeleton: &Skeleton3D) -> Result<()> {
    for bone in skeleton.bones.iter() {
        writeln!(writer, "# {}", bone.name)?;
        writeln!(
            writer,
            "v {} {} {}",
            bone.position[0], bone.position[1], bone.position[2]
        )?;
    }
    for (ind_bone, bone) in skeleton.bones.iter().enumerate() {
        if let Some(ind_parent) = bone.parent {
            writeln!(writer, "l {} {}", ind_parent + 1, ind_bone + 1)?;
        }
    }
    Ok(())
}

/// Save skeleton as .obj file
pub fn save_obj<P: AsRef<Path>>(filename: P, skeleton: &Skeleton3D) -> Result<()> {
    let mut writer = BufWriter::new(File::create(filename)?);
    write_obj(&mut writer, skeleton)?;
    writer.flush()?;
    Ok(())
}
