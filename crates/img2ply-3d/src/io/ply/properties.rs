use super::PlyError;

/// Vertex layouts understood by the reader and produced by the writer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlyType {
    /// `x y z red green blue`
    XYZRgb,
    /// `x y z red green blue alpha`
    XYZRgba,
}

/// A `property <type> <name>` line of the header.
#[derive(Debug, PartialEq, Clone)]
pub struct PlyPropertyDefinition {
    /// Name of the property.
    pub name: String,
    /// Scalar type of the property.
    pub data_type: PlyDataType,
}

/// Scalar types of the PLY format.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlyDataType {
    /// `float`, `float32`
    Float32,
    /// `double`, `float64`
    Float64,
    /// `char`, `int8`
    Int8,
    /// `uchar`, `uint8`
    UInt8,
    /// `short`, `int16`
    Int16,
    /// `ushort`, `uint16`
    UInt16,
    /// `int`, `int32`
    Int32,
    /// `uint`, `uint32`
    UInt32,
}

impl PlyDataType {
    /// Size in bytes of a binary value.
    pub fn size(&self) -> usize {
        match self {
            PlyDataType::Float32 | PlyDataType::Int32 | PlyDataType::UInt32 => 4,
            PlyDataType::Float64 => 8,
            PlyDataType::Int16 | PlyDataType::UInt16 => 2,
            PlyDataType::Int8 | PlyDataType::UInt8 => 1,
        }
    }

    /// Name used in `property <type> <name>` header lines.
    pub fn name(&self) -> &'static str {
        match self {
            PlyDataType::Float32 => "float",
            PlyDataType::Float64 => "double",
            PlyDataType::Int8 => "char",
            PlyDataType::UInt8 => "uchar",
            PlyDataType::Int16 => "short",
            PlyDataType::UInt16 => "ushort",
            PlyDataType::Int32 => "int",
            PlyDataType::UInt32 => "uint",
        }
    }
}

const XYZ_RGB: [(&str, PlyDataType); 6] = [
    ("x", PlyDataType::Float32),
    ("y", PlyDataType::Float32),
    ("z", PlyDataType::Float32),
    ("red", PlyDataType::UInt8),
    ("green", PlyDataType::UInt8),
    ("blue", PlyDataType::UInt8),
];

const ALPHA: (&str, PlyDataType) = ("alpha", PlyDataType::UInt8);

impl PlyType {
    /// The layout of a cloud with or without alpha.
    pub fn for_alpha(has_alpha: bool) -> Self {
        if has_alpha {
            PlyType::XYZRgba
        } else {
            PlyType::XYZRgb
        }
    }

    /// Whether the layout carries an alpha property.
    pub fn has_alpha(&self) -> bool {
        matches!(self, PlyType::XYZRgba)
    }

    /// The vertex properties, in payload order.
    pub fn properties(&self) -> impl Iterator<Item = (&'static str, PlyDataType)> {
        XYZ_RGB
            .into_iter()
            .chain(self.has_alpha().then_some(ALPHA))
    }

    /// Size in bytes of one binary vertex record.
    pub fn size_of(&self) -> usize {
        self.properties().map(|(_, t)| t.size()).sum()
    }

    /// Match the header properties against the supported layouts.
    pub fn detect_format(properties: &[PlyPropertyDefinition]) -> Result<Self, PlyError> {
        for format in [PlyType::XYZRgb, PlyType::XYZRgba] {
            let matches = properties.len() == format.properties().count()
                && properties
                    .iter()
                    .zip(format.properties())
                    .all(|(p, (name, data_type))| p.name == name && p.data_type == data_type);
            if matches {
                return Ok(format);
            }
        }

        let found = properties
            .iter()
            .map(|p| format!("{} {}", p.data_type.name(), p.name))
            .collect::<Vec<_>>()
            .join(", ");
        Err(PlyError::UnsupportedProperty(found))
    }
}

/// Binary record of the `x y z red green blue` layout.
#[derive(Debug, PartialEq, Clone, Copy, bincode::Encode, bincode::Decode)]
#[allow(missing_docs)]
pub struct XYZRgbProperty {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Binary record of the `x y z red green blue alpha` layout.
#[derive(Debug, PartialEq, Clone, Copy, bincode::Encode, bincode::Decode)]
#[allow(missing_docs)]
pub struct XYZRgbaProperty {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl XYZRgbProperty {
    /// Create a record from a point and its color, dropping alpha.
    pub fn new(point: [f64; 3], rgba: [u8; 4]) -> Self {
        Self {
            x: point[0] as f32,
            y: point[1] as f32,
            z: point[2] as f32,
            red: rgba[0],
            green: rgba[1],
            blue: rgba[2],
        }
    }
}

impl XYZRgbaProperty {
    /// Create a record from a point and its color.
    pub fn new(point: [f64; 3], rgba: [u8; 4]) -> Self {
        Self {
            x: point[0] as f32,
            y: point[1] as f32,
            z: point[2] as f32,
            red: rgba[0],
            green: rgba[1],
            blue: rgba[2],
            alpha: rgba[3],
        }
    }
}

/// Access to the content of a vertex record.
pub trait PlyPropertyTrait {
    /// Position of the vertex.
    fn to_point(&self) -> [f64; 3];
    /// Color of the vertex, alpha is 255 when the layout has none.
    fn to_color(&self) -> [u8; 4];
}

impl PlyPropertyTrait for XYZRgbProperty {
    fn to_point(&self) -> [f64; 3] {
        [self.x as f64, self.y as f64, self.z as f64]
    }

    fn to_color(&self) -> [u8; 4] {
        [self.red, self.green, self.blue, u8::MAX]
    }
}

impl PlyPropertyTrait for XYZRgbaProperty {
    fn to_point(&self) -> [f64; 3] {
        [self.x as f64, self.y as f64, self.z as f64]
    }

    fn to_color(&self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions(props: &[(&str, PlyDataType)]) -> Vec<PlyPropertyDefinition> {
        props
            .iter()
            .map(|(name, data_type)| PlyPropertyDefinition {
                name: name.to_string(),
                data_type: *data_type,
            })
            .collect()
    }

    #[test]
    fn test_format_detection() {
        let rgb = definitions(&XYZ_RGB);
        assert_eq!(PlyType::detect_format(&rgb).unwrap(), PlyType::XYZRgb);

        let mut rgba = rgb.clone();
        rgba.extend(definitions(&[ALPHA]));
        assert_eq!(PlyType::detect_format(&rgba).unwrap(), PlyType::XYZRgba);
    }

    #[test]
    fn test_format_detection_rejects_other_layouts() {
        let mut doubles = definitions(&XYZ_RGB);
        doubles[0].data_type = PlyDataType::Float64;
        assert!(PlyType::detect_format(&doubles).is_err());

        let normals = definitions(&[
            ("x", PlyDataType::Float32),
            ("y", PlyDataType::Float32),
            ("z", PlyDataType::Float32),
            ("nx", PlyDataType::Float32),
        ]);
        assert!(matches!(
            PlyType::detect_format(&normals),
            Err(PlyError::UnsupportedProperty(_))
        ));
    }

    #[test]
    fn test_record_sizes() {
        assert_eq!(PlyType::XYZRgb.size_of(), 15);
        assert_eq!(PlyType::XYZRgba.size_of(), 16);
    }
}
