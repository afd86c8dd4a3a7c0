use cloudiff_core::CompareConfig;
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

/// Integer key of a planar grid bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub ix: i32,
    pub iy: i32,
}

impl Cell {
    pub const fn new(ix: i32, iy: i32) -> Self {
        Self { ix, iy }
    }

    /// Cell holding the planar coordinate `(x, y)`, given in file units.
    pub fn quantize(x: f64, y: f64, config: &CompareConfig) -> Self {
        let CompareConfig {
            unit,
            epsilon,
            rounding,
            ..
        } = *config;
        Self {
            ix: rounding.apply(x * unit / epsilon),
            iy: rounding.apply(y * unit / epsilon),
        }
    }

    /// Planar position of the cell origin: `(ix * epsilon / unit, iy * epsilon / unit)`.
    pub fn planar_position(&self, config: &CompareConfig) -> (f64, f64) {
        (
            self.ix as f64 * config.epsilon / config.unit,
            self.iy as f64 * config.epsilon / config.unit,
        )
    }
}

/// What happens when a second sample lands in an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    #[default]
    FirstWins,
    /// Replace with the midpoint of the stored and the new value.
    Average,
}

impl CollisionPolicy {
    pub fn from_averaging(averaging: bool) -> Self {
        if averaging {
            CollisionPolicy::Average
        } else {
            CollisionPolicy::FirstWins
        }
    }
}

/// Sparse map from planar cell to elevation.
#[derive(Debug, Clone, Default)]
pub struct PlanarGrid {
    cells: HashMap<Cell, f64>,
    policy: CollisionPolicy,
}

impl PlanarGrid {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            cells: HashMap::new(),
            policy,
        }
    }

    pub fn with_capacity(policy: CollisionPolicy, capacity: usize) -> Self {
        Self {
            cells: HashMap::with_capacity(capacity),
            policy,
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Returns `true` if `cell` was not present before.
    pub fn insert(&mut self, cell: Cell, value: f64) -> bool {
        match self.cells.entry(cell) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            Entry::Occupied(mut slot) => {
                if self.policy == CollisionPolicy::Average {
                    let old = *slot.get();
                    slot.insert(old + (value - old) / 2.0);
                }
                false
            }
        }
    }

    pub fn get(&self, cell: &Cell) -> Option<f64> {
        self.cells.get(cell).copied()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains_key(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Unordered `(cell, value)` pairs. Each call starts a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, f64)> + '_ {
        self.cells.iter().map(|(cell, value)| (*cell, *value))
    }

    /// Cell keys ascending by `(ix, iy)`.
    pub fn sorted_cells(&self) -> Vec<Cell> {
        let mut keys: Vec<Cell> = self.cells.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// `(cell, value)` pairs ascending by cell.
    pub fn sorted_entries(&self) -> Vec<(Cell, f64)> {
        let mut entries: Vec<(Cell, f64)> = self.iter().collect();
        entries.sort_unstable_by_key(|(cell, _)| *cell);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudiff_core::CellRounding;
    use proptest::prelude::*;

    #[test]
    fn first_write_wins_by_default() {
        let mut grid = PlanarGrid::new(CollisionPolicy::FirstWins);
        assert!(grid.insert(Cell::new(0, 0), 1.0));
        assert!(!grid.insert(Cell::new(0, 0), 5.0));
        assert_eq!(grid.get(&Cell::new(0, 0)), Some(1.0));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn averaging_keeps_running_midpoint() {
        let mut grid = PlanarGrid::new(CollisionPolicy::Average);
        grid.insert(Cell::new(1, 2), 0.0);
        grid.insert(Cell::new(1, 2), 4.0);
        assert_eq!(grid.get(&Cell::new(1, 2)), Some(2.0));
        // Third sample halves the distance again rather than taking a true mean.
        grid.insert(Cell::new(1, 2), 6.0);
        assert_eq!(grid.get(&Cell::new(1, 2)), Some(4.0));
    }

    #[test]
    fn lookup_absent_cell() {
        let grid = PlanarGrid::default();
        assert!(grid.is_empty());
        assert_eq!(grid.get(&Cell::new(3, 3)), None);
        assert!(!grid.contains(&Cell::new(3, 3)));
    }

    #[test]
    fn quantize_truncates_toward_zero() {
        let cfg = CompareConfig::default();
        assert_eq!(Cell::quantize(-0.5, 1.9, &cfg), Cell::new(0, 1));
        let cfg = cfg.with_rounding(CellRounding::Floor);
        assert_eq!(Cell::quantize(-0.5, 1.9, &cfg), Cell::new(-1, 1));
    }

    #[test]
    fn quantize_applies_scale() {
        // m -> mm with 5 mm cells
        let cfg = CompareConfig::new(1000.0, 5.0, false);
        let c = Cell::quantize(0.012, 0.0049, &cfg);
        assert_eq!(c, Cell::new(2, 0));
        let (x, y) = c.planar_position(&cfg);
        assert!((x - 0.01).abs() < 1e-12);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn sorted_cells_is_ascending() {
        let mut grid = PlanarGrid::default();
        for (ix, iy) in [(2, 0), (-1, 5), (0, 0), (-1, -3)] {
            grid.insert(Cell::new(ix, iy), 0.0);
        }
        assert_eq!(
            grid.sorted_cells(),
            vec![
                Cell::new(-1, -3),
                Cell::new(-1, 5),
                Cell::new(0, 0),
                Cell::new(2, 0)
            ]
        );
    }

    #[test]
    fn sorted_entries_carry_values() {
        let mut grid = PlanarGrid::default();
        grid.insert(Cell::new(1, 0), 2.0);
        grid.insert(Cell::new(0, 9), 1.0);
        assert_eq!(
            grid.sorted_entries(),
            vec![(Cell::new(0, 9), 1.0), (Cell::new(1, 0), 2.0)]
        );
    }

    #[test]
    fn iter_is_restartable() {
        let mut grid = PlanarGrid::default();
        grid.insert(Cell::new(0, 0), 1.0);
        grid.insert(Cell::new(0, 1), 2.0);
        assert_eq!(grid.iter().count(), 2);
        assert_eq!(grid.iter().count(), 2);
        let total: f64 = grid.iter().map(|(_, v)| v).sum();
        assert_eq!(total, 3.0);
    }

    proptest! {
        #[test]
        fn len_never_exceeds_inserts(
            cells in prop::collection::vec((-20i32..20, -20i32..20, -100.0f64..100.0), 0..400),
            averaging in any::<bool>(),
        ) {
            let mut grid = PlanarGrid::new(CollisionPolicy::from_averaging(averaging));
            let mut fresh = 0;
            for &(ix, iy, z) in &cells {
                if grid.insert(Cell::new(ix, iy), z) {
                    fresh += 1;
                }
            }
            prop_assert!(grid.len() <= cells.len());
            prop_assert_eq!(grid.len(), fresh);
        }

        #[test]
        fn averaged_value_stays_within_inputs(
            zs in prop::collection::vec(-100.0f64..100.0, 1..50),
        ) {
            let mut grid = PlanarGrid::new(CollisionPolicy::Average);
            for &z in &zs {
                grid.insert(Cell::new(0, 0), z);
            }
            let lo = zs.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = zs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let v = grid.get(&Cell::new(0, 0)).unwrap();
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
    }
}
