use glam::Vec3;

use super::LoadError;
use crate::geometry::TriMesh;

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

/// Parse a binary or ASCII STL file. Every facet gets its own three vertices.
pub fn parse_stl(bytes: &[u8]) -> Result<TriMesh, LoadError> {
    if is_binary(bytes) {
        parse_binary(bytes)
    } else {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| LoadError::parse(0, "neither a binary nor an ASCII STL file"))?;
        parse_ascii(text)
    }
}

/// ASCII files start with `solid`, but so do some binary files: the size tells them apart
fn is_binary(bytes: &[u8]) -> bool {
    let sized = binary_triangle_count(bytes)
        .map(|n| bytes.len() == HEADER_LEN + 4 + n * TRIANGLE_LEN)
        .unwrap_or(false);
    let ascii = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|start| bytes[start..].starts_with(b"solid"))
        .unwrap_or(false);
    sized || !ascii
}

fn binary_triangle_count(bytes: &[u8]) -> Option<usize> {
    let count = bytes.get(HEADER_LEN..HEADER_LEN + 4)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as usize)
}

fn read_vec3(bytes: &[u8]) -> Vec3 {
    let f = |i: usize| {
        f32::from_le_bytes([bytes[4 * i], bytes[4 * i + 1], bytes[4 * i + 2], bytes[4 * i + 3]])
    };
    Vec3::new(f(0), f(1), f(2))
}

fn push_facet(mesh: &mut TriMesh, normal: Vec3, vertices: [Vec3; 3]) {
    let [a, b, c] = vertices;
    let normal = if normal.length_squared() > 0.0 {
        normal.normalize()
    } else {
        (b - a).cross(c - a).normalize_or_zero()
    };
    let first = mesh.positions.len() as u32;
    mesh.positions.extend(vertices);
    mesh.normals.extend([normal; 3]);
    mesh.indices.extend([first, first + 1, first + 2]);
}

fn parse_binary(bytes: &[u8]) -> Result<TriMesh, LoadError> {
    let count = binary_triangle_count(bytes).ok_or(LoadError::Truncated {
        expected: HEADER_LEN + 4,
        found: bytes.len(),
    })?;
    let expected = HEADER_LEN + 4 + count * TRIANGLE_LEN;
    if bytes.len() < expected {
        return Err(LoadError::Truncated {
            expected,
            found: bytes.len(),
        });
    }

    let mut mesh = TriMesh::default();
    for facet in bytes[HEADER_LEN + 4..expected].chunks_exact(TRIANGLE_LEN) {
        let normal = read_vec3(&facet[0..12]);
        let vertices = [
            read_vec3(&facet[12..24]),
            read_vec3(&facet[24..36]),
            read_vec3(&facet[36..48]),
        ];
        push_facet(&mut mesh, normal, vertices);
    }
    Ok(mesh)
}

fn read_ascii_vec3<'a, I: Iterator<Item = &'a str>>(
    tokens: &mut I,
    line: usize,
) -> Result<Vec3, LoadError> {
    let values: Vec<f32> = tokens
        .take(3)
        .map(|t| t.parse())
        .collect::<Result<_, _>>()
        .map_err(|_| LoadError::parse(line, "invalid number"))?;
    match values[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(LoadError::parse(line, "expected 3 values")),
    }
}

fn parse_ascii(text: &str) -> Result<TriMesh, LoadError> {
    let mut mesh = TriMesh::default();
    let mut normal = Vec3::ZERO;
    let mut vertices = Vec::with_capacity(3);

    for (i, line) in text.lines().enumerate() {
        let line_number = i + 1;
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next();
        match keyword {
            Some("facet") => {
                // facet normal nx ny nz
                if tokens.next() != Some("normal") {
                    return Err(LoadError::parse(line_number, "expected a facet normal"));
                }
                normal = read_ascii_vec3(&mut tokens, line_number)?;
                vertices.clear();
            }
            Some("vertex") => vertices.push(read_ascii_vec3(&mut tokens, line_number)?),
            Some("endfacet") => {
                let facet: [Vec3; 3] = vertices
                    .as_slice()
                    .try_into()
                    .map_err(|_| LoadError::parse(line_number, "facets must have 3 vertices"))?;
                push_facet(&mut mesh, normal, facet);
                vertices.clear();
            }
            _ => {}
        }
    }
    Ok(mesh)
}
