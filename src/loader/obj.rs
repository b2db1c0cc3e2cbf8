use std::io::BufRead;
use std::path::Path;

use glam::{Vec2, Vec3};

use super::LoadError;
use crate::geometry::TriMesh;

fn load_options() -> tobj::LoadOptions {
    let mut options = tobj::GPU_LOAD_OPTIONS;
    options.single_index = true;
    options.triangulate = true;
    options
}

/// Load an OBJ file, materials are ignored
pub fn load_obj(path: &Path) -> Result<TriMesh, LoadError> {
    let (models, _materials) = tobj::load_obj(path, &load_options())?;
    Ok(merge_models(models))
}

pub fn parse_obj<R: BufRead>(reader: &mut R) -> Result<TriMesh, LoadError> {
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default()))?;
    Ok(merge_models(models))
}

/// All the models of a file end up in one mesh
fn merge_models(models: Vec<tobj::Model>) -> TriMesh {
    let mut mesh = TriMesh::default();
    let mut missing_normals = false;
    let mut missing_tex_coords = false;
    let mut missing_colors = false;

    for model in models {
        let m = model.mesh;
        let num_vertices = m.positions.len() / 3;
        log::debug!(
            "Loading model {}; {} faces",
            model.name,
            m.indices.len() / 3
        );

        let offset = mesh.positions.len() as u32;
        mesh.positions
            .extend(m.positions.chunks_exact(3).map(Vec3::from_slice));
        mesh.indices.extend(m.indices.iter().map(|i| i + offset));

        if m.normals.len() == 3 * num_vertices {
            mesh.normals.extend(m.normals.chunks_exact(3).map(Vec3::from_slice));
        } else {
            missing_normals = true;
        }
        if m.texcoords.len() == 2 * num_vertices {
            mesh.tex_coords
                .extend(m.texcoords.chunks_exact(2).map(Vec2::from_slice));
        } else {
            missing_tex_coords = true;
        }
        if m.vertex_color.len() == 3 * num_vertices {
            mesh.colors
                .extend(m.vertex_color.chunks_exact(3).map(Vec3::from_slice));
        } else {
            missing_colors = true;
        }
    }

    // attributes are only kept when every model has them
    if missing_normals {
        mesh.normals.clear();
    }
    if missing_tex_coords {
        mesh.tex_coords.clear();
    }
    if missing_colors {
        mesh.colors.clear();
    }
    mesh
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use glam::Vec3;

    use super::*;

    const QUAD: &str = "\
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn quad_is_triangulated() {
        let mesh = parse_obj(&mut Cursor::new(QUAD)).unwrap();
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.num_vertices(), 4);
        assert!(mesh.has_tex_coords());
        assert!(!mesh.has_normals());
        assert_eq!(mesh.positions[2], Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn normals_are_read() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let mesh = parse_obj(&mut Cursor::new(text)).unwrap();
        assert!(mesh.has_normals());
        assert!(mesh.normals.iter().all(|n| *n == Vec3::Z));
    }
}
