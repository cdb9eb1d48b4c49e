use std::io::BufRead;
use std::path::Path;

use bincode::config::{self, Config};

use super::{
    properties::{PlyDataType, PlyPropertyDefinition, PlyType},
    Encoding, PlyError, PlyPropertyTrait, XYZRgbProperty, XYZRgbaProperty,
};
use crate::pointcloud::PointCloud;

// upper bound on the points reserved up front when reading a file
const MAX_PREALLOCATED_VERTICES: usize = 1 << 20;

/// The parsed header of a PLY file.
#[derive(Debug, Clone, PartialEq)]
pub struct PlyHeader {
    /// Encoding of the payload.
    pub encoding: Encoding,
    /// Number of vertices declared.
    pub vertex_count: usize,
    /// Vertex properties in declaration order.
    pub properties: Vec<PlyPropertyDefinition>,
    /// Layout matching the declared properties.
    pub format: PlyType,
}

/// Parse the header of a PLY file, leaving `reader` at the start of the payload.
pub fn parse_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader, PlyError> {
    let mut line = String::new();
    let mut encoding = None;
    let mut vertex_count = None;
    let mut properties = Vec::new();

    if reader.read_line(&mut line)? == 0 || line.trim() != "ply" {
        return Err(PlyError::InvalidHeader("missing ply magic".to_string()));
    }

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::InvalidHeader("missing end_header".to_string()));
        }
        let parts = line.split_whitespace().collect::<Vec<_>>();

        match parts.as_slice() {
            ["end_header"] => break,
            ["comment", ..] | ["obj_info", ..] | [] => continue,
            ["format", format, version] => {
                if *version != "1.0" {
                    return Err(PlyError::InvalidHeader(format!(
                        "unsupported version {version}"
                    )));
                }
                encoding = Some(format.parse::<Encoding>().map_err(PlyError::InvalidHeader)?);
            }
            ["element", "vertex", count] => {
                if vertex_count.is_some() {
                    return Err(PlyError::InvalidHeader(
                        "duplicated vertex element".to_string(),
                    ));
                }
                vertex_count = Some(count.parse::<usize>().map_err(|e| {
                    PlyError::InvalidHeader(format!("invalid vertex count {count}: {e}"))
                })?);
            }
            ["element", name, ..] => {
                return Err(PlyError::UnsupportedProperty(format!("element {name}")));
            }
            ["property", "list", ..] => {
                return Err(PlyError::UnsupportedProperty(line.trim().to_string()));
            }
            ["property", data_type, name] => {
                if vertex_count.is_none() {
                    return Err(PlyError::InvalidHeader(format!(
                        "property {name} declared outside of an element"
                    )));
                }
                properties.push(PlyPropertyDefinition {
                    name: name.to_string(),
                    data_type: parse_data_type(data_type)?,
                });
            }
            _ => {
                return Err(PlyError::InvalidHeader(format!(
                    "unexpected line: {}",
                    line.trim()
                )));
            }
        }
    }

    let encoding =
        encoding.ok_or_else(|| PlyError::InvalidHeader("missing format line".to_string()))?;
    let vertex_count = vertex_count
        .ok_or_else(|| PlyError::InvalidHeader("missing vertex element".to_string()))?;
    let format = PlyType::detect_format(&properties)?;

    Ok(PlyHeader {
        encoding,
        vertex_count,
        properties,
        format,
    })
}

fn parse_data_type(type_str: &str) -> Result<PlyDataType, PlyError> {
    match type_str {
        "float" | "float32" => Ok(PlyDataType::Float32),
        "double" | "float64" => Ok(PlyDataType::Float64),
        "char" | "int8" => Ok(PlyDataType::Int8),
        "uchar" | "uint8" => Ok(PlyDataType::UInt8),
        "short" | "int16" => Ok(PlyDataType::Int16),
        "ushort" | "uint16" => Ok(PlyDataType::UInt16),
        "int" | "int32" => Ok(PlyDataType::Int32),
        "uint" | "uint32" => Ok(PlyDataType::UInt32),
        _ => Err(PlyError::UnsupportedProperty(type_str.to_string())),
    }
}

/// Read a PLY point cloud from any reader.
pub fn read_ply_from<R: BufRead>(reader: &mut R) -> Result<PointCloud, PlyError> {
    let header = parse_header(reader)?;
    // the declared count is untrusted, the payload readers fail on a short file
    let capacity = header.vertex_count.min(MAX_PREALLOCATED_VERTICES);
    let mut cloud = PointCloud::with_capacity(capacity, header.format.has_alpha());

    let base = config::standard().with_fixed_int_encoding();
    match header.encoding {
        Encoding::Ascii => read_ascii_payload(reader, &header, &mut cloud)?,
        Encoding::BinaryLittleEndian => {
            read_binary_payload(reader, &header, &mut cloud, base.with_little_endian())?
        }
        Encoding::BinaryBigEndian => {
            read_binary_payload(reader, &header, &mut cloud, base.with_big_endian())?
        }
    }

    Ok(cloud)
}

/// Read a PLY point cloud written in any of the supported encodings.
///
/// # Arguments
///
/// * `path` - The PLY file to read.
///
/// # Returns
///
/// The points of the file, with an alpha column iff the file declares alpha.
pub fn read_ply(path: impl AsRef<Path>) -> Result<PointCloud, PlyError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    read_ply_from(&mut reader)
}

fn read_ascii_payload<R: BufRead>(
    reader: &mut R,
    header: &PlyHeader,
    cloud: &mut PointCloud,
) -> Result<(), PlyError> {
    let expected = header.format.properties().count();
    let mut line = String::new();

    for index in 1..=header.vertex_count {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::InvalidVertex {
                line: index,
                reason: "unexpected end of file".to_string(),
            });
        }

        let invalid = |reason: String| PlyError::InvalidVertex {
            line: index,
            reason,
        };

        let values = line.split_whitespace().collect::<Vec<_>>();
        if values.len() != expected {
            return Err(invalid(format!(
                "expected {expected} values, found {}",
                values.len()
            )));
        }

        let mut point = [0.0; 3];
        for (coord, value) in point.iter_mut().zip(&values[..3]) {
            *coord = value
                .parse::<f32>()
                .map_err(|e| invalid(format!("{value}: {e}")))? as f64;
        }

        let mut rgba = [u8::MAX; 4];
        for (channel, value) in rgba.iter_mut().zip(&values[3..]) {
            *channel = value
                .parse::<u8>()
                .map_err(|e| invalid(format!("{value}: {e}")))?;
        }

        cloud.push(point, rgba);
    }

    Ok(())
}

fn read_binary_payload<R: BufRead, C: Config>(
    reader: &mut R,
    header: &PlyHeader,
    cloud: &mut PointCloud,
    config: C,
) -> Result<(), PlyError> {
    for _ in 0..header.vertex_count {
        let (point, rgba) = match header.format {
            PlyType::XYZRgb => {
                let entry: XYZRgbProperty = bincode::decode_from_std_read(reader, config)?;
                (entry.to_point(), entry.to_color())
            }
            PlyType::XYZRgba => {
                let entry: XYZRgbaProperty = bincode::decode_from_std_read(reader, config)?;
                (entry.to_point(), entry.to_color())
            }
        };
        cloud.push(point, rgba);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ply::write_ply_to;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RGB_HEADER: &str = "ply\nformat ascii 1.0\ncomment written by hand\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n";

    fn sample_cloud(with_alpha: bool) -> PointCloud {
        let mut cloud = PointCloud::new(with_alpha);
        cloud.push([0.0, 0.5, 1.0], [1, 2, 3, 4]);
        cloud.push([15.0, 10.0, -15.0], [255, 128, 0, 200]);
        cloud.push([0.125, 7.75, 3.5], [9, 9, 9, 255]);
        cloud
    }

    #[test]
    fn test_parse_header_basic() {
        let mut reader = std::io::BufReader::new(RGB_HEADER.as_bytes());
        let header = parse_header(&mut reader).unwrap();
        assert_eq!(header.encoding, Encoding::Ascii);
        assert_eq!(header.vertex_count, 2);
        assert_eq!(header.properties.len(), 6);
        assert_eq!(header.properties[0].name, "x");
        assert_eq!(header.properties[0].data_type, PlyDataType::Float32);
        assert_eq!(header.format, PlyType::XYZRgb);
    }

    #[test]
    fn test_parse_header_errors() {
        for text in [
            "",
            "plyx\nformat ascii 1.0\nend_header\n",
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\n",
            "ply\nformat ascii 2.0\nelement vertex 0\nend_header\n",
            "ply\nformat utf8 1.0\nelement vertex 0\nend_header\n",
            "ply\nelement vertex 0\nend_header\n",
            "ply\nformat ascii 1.0\nelement vertex abc\nend_header\n",
        ] {
            let mut reader = std::io::BufReader::new(text.as_bytes());
            assert!(
                matches!(parse_header(&mut reader), Err(PlyError::InvalidHeader(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_parse_header_unsupported() {
        for text in [
            "ply\nformat ascii 1.0\nelement vertex 0\nproperty float x\nproperty float y\nproperty float z\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nelement face 0\nproperty list uchar int vertex_indices\nend_header\n",
            "ply\nformat ascii 1.0\nelement vertex 0\nproperty float x\nproperty float y\nproperty float z\nproperty float intensity\nend_header\n",
            "ply\nformat ascii 1.0\nelement vertex 0\nproperty half x\nend_header\n",
        ] {
            let mut reader = std::io::BufReader::new(text.as_bytes());
            assert!(
                matches!(parse_header(&mut reader), Err(PlyError::UnsupportedProperty(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_data_type_parsing() {
        assert_eq!(parse_data_type("float").unwrap(), PlyDataType::Float32);
        assert_eq!(parse_data_type("uchar").unwrap(), PlyDataType::UInt8);
        assert_eq!(parse_data_type("double").unwrap(), PlyDataType::Float64);
        assert!(parse_data_type("invalid").is_err());
    }

    #[test]
    fn test_read_ascii_by_hand() -> Result<(), PlyError> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{RGB_HEADER}1 2 3 255 128 0\n-1.5 0 0.25 0 0 7\n")?;

        let cloud = read_ply(file.path())?;
        assert_eq!(cloud.len(), 2);
        assert!(!cloud.has_alpha());
        assert_eq!(cloud.points(), &[[1.0, 2.0, 3.0], [-1.5, 0.0, 0.25]]);
        assert_eq!(cloud.colors(), &[[255, 128, 0], [0, 0, 7]]);
        Ok(())
    }

    #[test]
    fn test_read_ascii_truncated() -> Result<(), PlyError> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{RGB_HEADER}1 2 3 255 128 0\n")?;

        let result = read_ply(file.path());
        assert!(matches!(
            result,
            Err(PlyError::InvalidVertex { line: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_read_ascii_bad_value() -> Result<(), PlyError> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{RGB_HEADER}1 2 3 255 128 0\n1 2 3 256 0 0\n")?;

        let result = read_ply(file.path());
        assert!(matches!(
            result,
            Err(PlyError::InvalidVertex { line: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_round_trip_all_encodings() -> Result<(), PlyError> {
        for with_alpha in [false, true] {
            let cloud = sample_cloud(with_alpha);
            for encoding in [
                Encoding::Ascii,
                Encoding::BinaryLittleEndian,
                Encoding::BinaryBigEndian,
            ] {
                let mut buffer = Vec::new();
                write_ply_to(&mut buffer, &cloud, encoding)?;
                let read_back = read_ply_from(&mut buffer.as_slice())?;
                assert_eq!(read_back, cloud, "{encoding} alpha={with_alpha}");
            }
        }
        Ok(())
    }

    #[test]
    fn test_read_oversized_vertex_count() {
        let count = format!("element vertex {}", usize::MAX);
        let header = RGB_HEADER.replace("element vertex 2", &count);

        let mut document = format!("{header}1 2 3 255 128 0\n");
        let result = read_ply_from(&mut document.as_bytes());
        assert!(matches!(
            result,
            Err(PlyError::InvalidVertex { line: 2, .. })
        ));

        document = header.replace("format ascii", "format binary_little_endian");
        let result = read_ply_from(&mut document.as_bytes());
        assert!(matches!(result, Err(PlyError::Decode(_))));
    }

    #[test]
    fn test_read_binary_truncated() -> Result<(), PlyError> {
        let mut buffer = Vec::new();
        write_ply_to(&mut buffer, &sample_cloud(false), Encoding::BinaryLittleEndian)?;
        buffer.truncate(buffer.len() - 1);

        let result = read_ply_from(&mut buffer.as_slice());
        assert!(matches!(result, Err(PlyError::Decode(_))));
        Ok(())
    }
}
