use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::mesh3d::GenericMesh3D;

/// Writes mesh as obj, with normals when computed
pub fn write_obj<W: Write>(writer: &mut W, mesh: &GenericMesh3D) -> Result<()> {
    for v in 0..mesh.get_nb_vertices() {
        let vert = mesh.get_vertex(v)?;
        writeln!(writer, "v {} {} {}", vert[0], vert[1], vert[2])?;
    }

    let with_normals = if let Some(normals) = mesh.normals() {
        for nor in normals.iter() {
            writeln!(writer, "vn {} {} {}", nor[0], nor[1], nor[2])?;
        }
        true
    } else {
        false
    };

    for f in 0..mesh.get_nb_faces() {
        let face = mesh.get_face(f)?;
        if with_normals {
            writeln!(
                writer,
                "f {}//{} {}//{} {}//{}",
                face[0] + 1,
                face[0] + 1,
                face[1] + 1,
                face[1] + 1,
                face[2] + 1,
                face[2] + 1
            )?;
        } else {
            writeln!(writer, "f {} {} {}", face[0] + 1, face[1] + 1, face[2] + 1)?;
        }
    }

    Ok(())
}

/// Save mesh as obj file
pub fn save_obj<P: AsRef<Path>>(filename: P, mesh: &GenericMesh3D) -> Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    write_obj(&mut file, mesh)?;
    file.flush()?;
    Ok(())
}
