//! PLY export of a merged cloud, for viewing the diff in external tools.

use cloudiff_core::MergedCloud;
use std::fs;
use std::io::{self, BufWriter, Write as _};
use std::path::Path;

fn write_header(w: &mut impl io::Write, format: &str, vertices: usize) -> io::Result<()> {
    w.write_all(b"ply\n")?;
    writeln!(w, "format {format} 1.0")?;
    writeln!(w, "element vertex {vertices}")?;
    w.write_all(b"property float x\n")?;
    w.write_all(b"property float y\n")?;
    w.write_all(b"property float z\n")?;
    w.write_all(b"property uchar red\n")?;
    w.write_all(b"property uchar green\n")?;
    w.write_all(b"property uchar blue\n")?;
    w.write_all(b"property uchar alpha\n")?;
    w.write_all(b"end_header\n")
}

/// Write a PLY file in ASCII format with RGBA vertex colors.
pub fn write_ply(path: impl AsRef<Path>, cloud: &MergedCloud) -> io::Result<()> {
    let mut out = Vec::new();
    write_header(&mut out, "ascii", cloud.len())?;

    for p in cloud {
        let [x, y, z] = p.position;
        let c = p.color;
        writeln!(out, "{x} {y} {z} {} {} {} {}", c.r, c.g, c.b, c.a)?;
    }

    fs::write(path, out)
}

/// Write a PLY file in binary_little_endian format with RGBA vertex colors.
pub fn write_ply_binary(path: impl AsRef<Path>, cloud: &MergedCloud) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut w = BufWriter::new(file);

    write_header(&mut w, "binary_little_endian", cloud.len())?;

    for p in cloud {
        for v in p.position {
            w.write_all(&v.to_le_bytes())?;
        }
        w.write_all(&p.color.to_array())?;
    }

    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudiff_core::{MergedPoint, Rgba};
    use tempfile::NamedTempFile;

    fn sample_cloud() -> MergedCloud {
        MergedCloud::from_points(vec![
            MergedPoint::new([0.0, 0.0, 11.0], Rgba::opaque(255, 0, 0)),
            MergedPoint::new([1.5, -2.0, 3.0], Rgba::opaque(127, 127, 255)),
        ])
    }

    #[test]
    fn ascii_body_has_one_line_per_point() {
        let tmp = NamedTempFile::new().unwrap();
        write_ply(tmp.path(), &sample_cloud()).unwrap();
        let text = fs::read_to_string(tmp.path()).unwrap();

        let (header, body) = text.split_once("end_header\n").unwrap();
        assert!(header.starts_with("ply\nformat ascii 1.0\n"));
        assert!(header.contains("element vertex 2\n"));
        assert!(header.contains("property uchar alpha\n"));

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines, vec!["0 0 11 255 0 0 255", "1.5 -2 3 127 127 255 255"]);
    }

    #[test]
    fn ascii_empty_cloud() {
        let tmp = NamedTempFile::new().unwrap();
        write_ply(tmp.path(), &MergedCloud::new()).unwrap();
        let text = fs::read_to_string(tmp.path()).unwrap();
        assert!(text.contains("element vertex 0\n"));
        assert!(text.ends_with("end_header\n"));
    }

    #[test]
    fn binary_body_is_sixteen_bytes_per_point() {
        let tmp = NamedTempFile::new().unwrap();
        let cloud = sample_cloud();
        write_ply_binary(tmp.path(), &cloud).unwrap();
        let raw = fs::read(tmp.path()).unwrap();

        let marker = b"end_header\n";
        let start = raw
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap()
            + marker.len();
        let body = &raw[start..];
        assert_eq!(body.len(), cloud.len() * 16);

        let z = f32::from_le_bytes([body[8], body[9], body[10], body[11]]);
        assert_eq!(z, 11.0);
        assert_eq!(&body[12..16], &[255, 0, 0, 255]);
        let x = f32::from_le_bytes([body[16], body[17], body[18], body[19]]);
        assert_eq!(x, 1.5);
        assert_eq!(&body[28..32], &[127, 127, 255, 255]);
    }

    #[test]
    fn write_to_missing_dir_fails() {
        let result = write_ply_binary("/nonexistent_dir_12345/out.ply", &sample_cloud());
        assert!(result.is_err());
    }
}
