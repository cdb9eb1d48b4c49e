/// A colored point cloud.
///
/// Points are stored column-wise in insertion order. The alpha column is either
/// present for every point or for none of them, decided when the cloud is created.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    // The points in the point cloud.
    points: Vec<[f64; 3]>,
    // The colors of the points.
    colors: Vec<[u8; 3]>,
    // The alpha values of the points, if retained.
    alphas: Option<Vec<u8>>,
}

impl PointCloud {
    /// Create an empty point cloud, with or without an alpha column.
    pub fn new(with_alpha: bool) -> Self {
        Self {
            points: Vec::new(),
            colors: Vec::new(),
            alphas: with_alpha.then(Vec::new),
        }
    }

    /// Create an empty point cloud with room for `capacity` points.
    pub fn with_capacity(capacity: usize, with_alpha: bool) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
            alphas: with_alpha.then(|| Vec::with_capacity(capacity)),
        }
    }

    /// Append a point. The alpha value is dropped when the cloud has no alpha column.
    #[inline]
    pub fn push(&mut self, point: [f64; 3], rgba: [u8; 4]) {
        let [r, g, b, a] = rgba;
        self.points.push(point);
        self.colors.push([r, g, b]);
        if let Some(alphas) = self.alphas.as_mut() {
            alphas.push(a);
        }
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the points carry an alpha value.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.alphas.is_some()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Get as reference the colors of the points in the point cloud.
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Get as reference the alpha values of the points, if retained.
    pub fn alphas(&self) -> Option<&[u8]> {
        self.alphas.as_deref()
    }

    /// Iterate over `(position, rgba)` pairs. Alpha reads 255 when not retained.
    pub fn iter(&self) -> impl Iterator<Item = ([f64; 3], [u8; 4])> + '_ {
        self.points
            .iter()
            .zip(self.colors.iter())
            .enumerate()
            .map(move |(i, (&p, &[r, g, b]))| {
                let a = self.alphas.as_ref().map_or(u8::MAX, |alphas| alphas[i]);
                (p, [r, g, b, a])
            })
    }

    /// Get the minimum and maximum corner of the point cloud.
    ///
    /// Returns `None` for an empty cloud.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (
                [min[0].min(p[0]), min[1].min(p[1]), min[2].min(p[2])],
                [max[0].max(p[0]), max[1].max(p[1]), max[2].max(p[2])],
            )
        }))
    }
}
