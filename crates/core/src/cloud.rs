use crate::{MergedPoint, Rgba};

/// Ordered output of one compare run, owned by whoever displays it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedCloud {
    points: Vec<MergedPoint>,
}

impl MergedCloud {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn from_points(points: Vec<MergedPoint>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: MergedPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, i: usize) -> &MergedPoint {
        &self.points[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MergedPoint> + '_ {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[MergedPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<MergedPoint> {
        self.points
    }

    /// Position array in emission order, as handed to a renderer.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Color array parallel to [`positions`](Self::positions).
    pub fn colors(&self) -> Vec<Rgba> {
        self.points.iter().map(|p| p.color).collect()
    }

    /// Interleaved `x, y, z` floats.
    pub fn to_array(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * 3);
        for p in &self.points {
            out.extend_from_slice(&p.position);
        }
        out
    }

    pub fn count_color(&self, color: Rgba) -> usize {
        self.points.iter().filter(|p| p.color == color).count()
    }
}

impl FromIterator<MergedPoint> for MergedCloud {
    fn from_iter<I: IntoIterator<Item = MergedPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl Extend<MergedPoint> for MergedCloud {
    fn extend<I: IntoIterator<Item = MergedPoint>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<'a> IntoIterator for &'a MergedCloud {
    type Item = &'a MergedPoint;
    type IntoIter = std::slice::Iter<'a, MergedPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
