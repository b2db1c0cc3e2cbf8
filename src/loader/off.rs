use glam::Vec3;

use super::LoadError;
use crate::geometry::TriMesh;

/// Non empty lines without comments, with their 1-based line number
fn content_lines(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines().enumerate().filter_map(|(i, line)| {
        let line = line.split('#').next().unwrap_or_default();
        let tokens: Vec<_> = line.split_whitespace().collect();
        (!tokens.is_empty()).then_some((i + 1, tokens))
    })
}

fn parse_numbers<T: std::str::FromStr>(
    line: usize,
    tokens: &[&str],
    count: usize,
) -> Result<Vec<T>, LoadError> {
    if tokens.len() < count {
        return Err(LoadError::parse(
            line,
            format!("expected {count} values, found {}", tokens.len()),
        ));
    }
    tokens[..count]
        .iter()
        .map(|t| {
            t.parse()
                .map_err(|_| LoadError::parse(line, format!("invalid number {t:?}")))
        })
        .collect()
}

/// Parse an ASCII OFF file. Polygons are triangulated as fans, per element colors are ignored.
pub fn parse_off(text: &str) -> Result<TriMesh, LoadError> {
    let mut lines = content_lines(text);
    let unexpected_end = || LoadError::parse(text.lines().count(), "unexpected end of file");

    let (line, header) = lines.next().ok_or_else(unexpected_end)?;
    if !header[0].ends_with("OFF") {
        return Err(LoadError::parse(line, "missing OFF header"));
    }
    // the counts may follow the header on the same line
    let (line, counts) = if header.len() > 1 {
        (line, header[1..].to_vec())
    } else {
        lines.next().ok_or_else(unexpected_end)?
    };
    let counts: Vec<usize> = parse_numbers(line, &counts, 2)?;
    let (num_vertices, num_faces) = (counts[0], counts[1]);

    let mut mesh = TriMesh::default();
    for _ in 0..num_vertices {
        let (line, tokens) = lines.next().ok_or_else(unexpected_end)?;
        let p: Vec<f32> = parse_numbers(line, &tokens, 3)?;
        mesh.positions.push(Vec3::new(p[0], p[1], p[2]));
    }

    for _ in 0..num_faces {
        let (line, tokens) = lines.next().ok_or_else(unexpected_end)?;
        let n: Vec<usize> = parse_numbers(line, &tokens, 1)?;
        let polygon: Vec<u32> = parse_numbers(line, &tokens[1..], n[0])?;
        if let Some(i) = polygon.iter().find(|&&i| i as usize >= num_vertices) {
            return Err(LoadError::parse(line, format!("vertex index {i} out of range")));
        }
        for k in 1..polygon.len().saturating_sub(1) {
            mesh.indices
                .extend([polygon[0], polygon[k], polygon[k + 1]]);
        }
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    const CUBE: &str = "\
OFF
# a cube
8 6 12
-0.5 -0.5 0.5
0.5 -0.5 0.5
-0.5 0.5 0.5
0.5 0.5 0.5
-0.5 0.5 -0.5
0.5 0.5 -0.5
-0.5 -0.5 -0.5
0.5 -0.5 -0.5
4 0 1 3 2
4 2 3 5 4
4 4 5 7 6
4 6 7 1 0
4 1 7 5 3
4 6 0 2 4
";

    #[test]
    fn cube() {
        let mesh = parse_off(CUBE).unwrap();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_triangles(), 12);
        assert_eq!(mesh.positions[3], Vec3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn counts_on_header_line() {
        let mesh = parse_off("OFF 3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2 255 0 0\n").unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn errors_report_lines() {
        assert!(matches!(
            parse_off("PLY\n"),
            Err(LoadError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_off("OFF\n3 1 0\n0 0 0\n1 x 0\n0 1 0\n3 0 1 2\n"),
            Err(LoadError::Parse { line: 4, .. })
        ));
        assert!(matches!(
            parse_off("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 7\n"),
            Err(LoadError::Parse { line: 6, .. })
        ));
        assert!(parse_off("OFF\n3 1 0\n0 0 0\n").is_err());
    }
}
