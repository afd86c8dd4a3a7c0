use crate::color::Classification;
use cloudiff_core::{CompareConfig, ElevationRange, MergedCloud, MergedPoint, Rgba};
use cloudiff_spatial::{Cell, PlanarGrid};
use rayon::prelude::*;
use tracing::debug;

/// Per-class counts of one diff run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiffSummary {
    pub matched: usize,
    pub only_a: usize,
    pub only_b: usize,
    pub amplitude: f64,
}

impl DiffSummary {
    pub fn total(&self) -> usize {
        self.matched + self.only_a + self.only_b
    }
}

/// Merge two grids into one colored cloud.
///
/// Every cell of `a ∪ b` yields exactly one point. Cells of `a` come first,
/// then cells found only in `b`; both passes run in ascending `(ix, iy)`
/// order so the output is stable across runs.
pub fn diff_grids(
    a: &PlanarGrid,
    b: &PlanarGrid,
    range: &ElevationRange,
    config: &CompareConfig,
) -> MergedCloud {
    diff_grids_with_summary(a, b, range, config).0
}

/// Same as [`diff_grids`] but also reports how many cells fell in each class.
pub fn diff_grids_with_summary(
    a: &PlanarGrid,
    b: &PlanarGrid,
    range: &ElevationRange,
    config: &CompareConfig,
) -> (MergedCloud, DiffSummary) {
    let amplitude = range.amplitude();

    // Pass 1: every cell of A, matched or A-only.
    let first: Vec<(MergedPoint, bool)> = a
        .sorted_entries()
        .into_par_iter()
        .map(|(cell, z_a)| match b.get(&cell) {
            Some(z_b) => {
                let class = Classification::Matched { z_a, z_b };
                let z = z_a + (z_b - z_a) / 2.0;
                (emit(&cell, z, class.color(amplitude), config), true)
            }
            None => {
                let color = Classification::OnlyA.color(amplitude);
                (emit(&cell, z_a, color, config), false)
            }
        })
        .collect();

    let matched = first.iter().filter(|(_, m)| *m).count();
    let mut summary = DiffSummary {
        matched,
        only_a: first.len() - matched,
        only_b: 0,
        amplitude,
    };

    let mut cloud = MergedCloud::with_capacity(first.len() + b.len() - matched);
    cloud.extend(first.into_iter().map(|(p, _)| p));

    // Pass 2: cells of B that A never had. Matched cells were emitted above.
    for (cell, z_b) in b.sorted_entries() {
        if a.contains(&cell) {
            continue;
        }
        cloud.push(emit(
            &cell,
            z_b,
            Classification::OnlyB.color(amplitude),
            config,
        ));
        summary.only_b += 1;
    }

    debug!(
        matched = summary.matched,
        only_a = summary.only_a,
        only_b = summary.only_b,
        amplitude,
        "diffed grids"
    );
    (cloud, summary)
}

fn emit(cell: &Cell, z: f64, color: Rgba, config: &CompareConfig) -> MergedPoint {
    let (x, y) = cell.planar_position(config);
    MergedPoint::new([x as f32, y as f32, z as f32], color)
}
