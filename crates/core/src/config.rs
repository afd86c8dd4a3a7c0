use crate::error::{DiffError, Result};

/// How a scaled planar coordinate is turned into an integer cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellRounding {
    /// `as` cast semantics: -0.5 lands in cell 0.
    #[default]
    TowardZero,
    /// -0.5 lands in cell -1, giving cells of equal width on both sides of 0.
    Floor,
}

impl CellRounding {
    pub fn apply(self, scaled: f64) -> i32 {
        match self {
            CellRounding::TowardZero => scaled as i32,
            CellRounding::Floor => scaled.floor() as i32,
        }
    }
}

/// Parameters for one compare run.
///
/// `unit` converts file units to world units, `epsilon` is the cell size in
/// world units and `averaging` selects how duplicate samples in one cell
/// are combined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareConfig {
    pub unit: f64,
    pub epsilon: f64,
    pub averaging: bool,
    pub rounding: CellRounding,
}

impl CompareConfig {
    pub fn new(unit: f64, epsilon: f64, averaging: bool) -> Self {
        Self {
            unit,
            epsilon,
            averaging,
            rounding: CellRounding::default(),
        }
    }

    pub fn with_unit(mut self, unit: f64) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_averaging(mut self, averaging: bool) -> Self {
        self.averaging = averaging;
        self
    }

    pub fn with_rounding(mut self, rounding: CellRounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(DiffError::Config(format!(
                "epsilon must be > 0 and finite, got {}",
                self.epsilon
            )));
        }
        if !self.unit.is_finite() || self.unit == 0.0 {
            return Err(DiffError::Config(format!(
                "unit must be non-zero and finite, got {}",
                self.unit
            )));
        }
        Ok(())
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self::new(1.0, 1.0, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(CompareConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_epsilon() {
        for eps in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = CompareConfig::default().with_epsilon(eps);
            assert!(matches!(cfg.validate(), Err(DiffError::Config(_))), "eps={eps}");
        }
    }

    #[test]
    fn rejects_zero_unit() {
        let cfg = CompareConfig::default().with_unit(0.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn toward_zero_differs_from_floor_for_negatives() {
        assert_eq!(CellRounding::TowardZero.apply(-0.5), 0);
        assert_eq!(CellRounding::Floor.apply(-0.5), -1);
        assert_eq!(CellRounding::TowardZero.apply(2.9), 2);
        assert_eq!(CellRounding::Floor.apply(2.9), 2);
    }

    #[test]
    fn rounding_saturates_out_of_range() {
        assert_eq!(CellRounding::TowardZero.apply(1e20), i32::MAX);
        assert_eq!(CellRounding::Floor.apply(-1e20), i32::MIN);
        assert_eq!(CellRounding::TowardZero.apply(f64::NAN), 0);
    }
}
