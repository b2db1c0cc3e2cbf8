//! Mesh files: Wavefront OBJ, OFF and STL.

pub mod obj;
pub mod off;
pub mod stl;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geometry::TriMesh;

/// Extensions accepted by [load_mesh], without the leading dot
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["stl", "obj", "off"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported mesh format: {0:?}")]
    UnsupportedExtension(String),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("truncated file: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("the mesh has no triangles")]
    Empty,
    #[error("invalid OBJ file")]
    Obj(#[from] tobj::LoadError),
}

impl LoadError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        LoadError::Parse {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Obj,
    Off,
    Stl,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "obj" => Ok(Format::Obj),
            "off" => Ok(Format::Off),
            "stl" => Ok(Format::Stl),
            _ => Err(LoadError::UnsupportedExtension(extension)),
        }
    }
}

pub fn load_mesh(path: &Path) -> Result<TriMesh, LoadError> {
    let format = Format::from_path(path)?;
    let io_error = |source| LoadError::Io {
        path: path.to_owned(),
        source,
    };

    let mesh = match format {
        Format::Obj => obj::load_obj(path)?,
        Format::Off => off::parse_off(&std::fs::read_to_string(path).map_err(io_error)?)?,
        Format::Stl => stl::parse_stl(&std::fs::read(path).map_err(io_error)?)?,
    };
    let mesh = finalize(mesh)?;

    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

/// Reject empty meshes, fill in missing normals and tangents
pub fn finalize(mut mesh: TriMesh) -> Result<TriMesh, LoadError> {
    if mesh.is_empty() {
        return Err(LoadError::Empty);
    }
    if let Some(&i) = mesh
        .indices
        .iter()
        .find(|&&i| i as usize >= mesh.num_vertices())
    {
        return Err(LoadError::parse(0, format!("vertex index {i} out of range")));
    }

    if !mesh.has_normals() {
        log::debug!("Computing smooth normals");
        mesh.compute_smooth_normals();
    }
    if !mesh.has_tex_coords() {
        mesh.tex_coords.clear();
    }
    if !mesh.has_colors() {
        mesh.colors.clear();
    }
    mesh.compute_tangents();
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.OBJ")).unwrap(), Format::Obj);
        assert_eq!(Format::from_path(Path::new("mesh.stl")).unwrap(), Format::Stl);
        assert_eq!(Format::from_path(Path::new("mesh.off")).unwrap(), Format::Off);
        assert!(matches!(
            Format::from_path(Path::new("mesh.ply")),
            Err(LoadError::UnsupportedExtension(e)) if e == "ply"
        ));
        assert!(Format::from_path(Path::new("mesh")).is_err());
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_mesh(Path::new("/nonexistent/mesh.off")),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn finalize_fills_normals() {
        let text = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
        let mesh = finalize(off::parse_off(text).unwrap()).unwrap();
        assert!(mesh.has_normals());
        assert!(mesh.normals[0].abs_diff_eq(glam::Vec3::Z, 1e-6));
        assert!(!mesh.has_tangents());
    }

    #[test]
    fn finalize_rejects_empty() {
        assert!(matches!(finalize(TriMesh::default()), Err(LoadError::Empty)));
    }
}
