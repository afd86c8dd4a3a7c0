/// Running min/max of scaled elevations across every sample of both clouds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationRange {
    pub min: f64,
    pub max: f64,
    empty: bool,
}

impl ElevationRange {
    pub fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Non-finite elevations are ignored so one bad sample cannot blow up
    /// the color scale.
    pub fn expand(&mut self, z: f64) {
        if !z.is_finite() {
            return;
        }

        if self.empty {
            self.min = z;
            self.max = z;
            self.empty = false;
            return;
        }

        self.min = self.min.min(z);
        self.max = self.max.max(z);
    }

    /// Commutative union of two ranges.
    pub fn merge(&mut self, other: &ElevationRange) {
        if other.empty {
            return;
        }
        self.expand(other.min);
        self.expand(other.max);
    }

    pub fn merged(mut self, other: &ElevationRange) -> Self {
        self.merge(other);
        self
    }

    /// `max - min`, or 0 for an empty range.
    pub fn amplitude(&self) -> f64 {
        if self.empty {
            0.0
        } else {
            self.max - self.min
        }
    }

    pub fn contains(&self, z: f64) -> bool {
        !self.empty && z >= self.min && z <= self.max
    }

    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut range = Self::empty();
        for z in values {
            range.expand(z);
        }
        range
    }
}

impl Default for ElevationRange {
    fn default() -> Self {
        Self::empty()
    }
}
