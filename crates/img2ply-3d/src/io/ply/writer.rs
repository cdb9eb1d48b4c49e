use std::io::{BufWriter, Write};
use std::path::Path;

use bincode::config::{self, Config};

use super::{Encoding, PlyError, PlyType, XYZRgbProperty, XYZRgbaProperty};
use crate::pointcloud::PointCloud;

/// Write the PLY header for `vertex_count` vertices of the given layout.
pub fn write_ply_header<W: Write>(
    writer: &mut W,
    vertex_count: usize,
    format: PlyType,
    encoding: Encoding,
) -> Result<(), PlyError> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format {encoding} 1.0")?;
    writeln!(writer, "element vertex {vertex_count}")?;
    for (name, data_type) in format.properties() {
        writeln!(writer, "property {} {}", data_type.name(), name)?;
    }
    writeln!(writer, "end_header")?;
    Ok(())
}

/// Serialize a point cloud as a PLY document into `writer`.
///
/// The header declares exactly `cloud.len()` vertices and an alpha property iff
/// the cloud carries alpha. Vertices are written in cloud order.
pub fn write_ply_to<W: Write>(
    writer: &mut W,
    cloud: &PointCloud,
    encoding: Encoding,
) -> Result<(), PlyError> {
    let format = PlyType::for_alpha(cloud.has_alpha());
    write_ply_header(writer, cloud.len(), format, encoding)?;

    let base = config::standard().with_fixed_int_encoding();
    match encoding {
        Encoding::Ascii => write_ascii_payload(writer, cloud),
        Encoding::BinaryLittleEndian => {
            write_binary_payload(writer, cloud, base.with_little_endian())
        }
        Encoding::BinaryBigEndian => write_binary_payload(writer, cloud, base.with_big_endian()),
    }
}

/// Write a point cloud to a PLY file.
///
/// # Arguments
///
/// * `path` - The destination file, created or truncated.
/// * `cloud` - The points to write.
/// * `encoding` - The payload encoding.
pub fn write_ply(
    path: impl AsRef<Path>,
    cloud: &PointCloud,
    encoding: Encoding,
) -> Result<(), PlyError> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ply_to(&mut writer, cloud, encoding)?;
    writer.flush()?;
    Ok(())
}

fn write_ascii_payload<W: Write>(writer: &mut W, cloud: &PointCloud) -> Result<(), PlyError> {
    let with_alpha = cloud.has_alpha();
    for (p, [r, g, b, a]) in cloud.iter() {
        write!(
            writer,
            "{} {} {} {} {} {}",
            p[0] as f32, p[1] as f32, p[2] as f32, r, g, b
        )?;
        if with_alpha {
            write!(writer, " {a}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn write_binary_payload<W: Write, C: Config>(
    writer: &mut W,
    cloud: &PointCloud,
    config: C,
) -> Result<(), PlyError> {
    if cloud.has_alpha() {
        for (p, rgba) in cloud.iter() {
            bincode::encode_into_std_write(XYZRgbaProperty::new(p, rgba), writer, config)?;
        }
    } else {
        for (p, rgba) in cloud.iter() {
            bincode::encode_into_std_write(XYZRgbProperty::new(p, rgba), writer, config)?;
        }
    }
    Ok(())
}
