use cloudiff_core::{CompareConfig, ElevationRange, MergedCloud, Result};
use cloudiff_diff::{diff_grids_with_summary, DiffSummary};
use cloudiff_io::{decode_bin, read_bin};
use cloudiff_spatial::PlanarGrid;
use std::path::Path;
use tracing::info;

type Decoded = Result<(PlanarGrid, ElevationRange)>;

/// Compare two cloud files and return the merged, colored cloud.
///
/// Both files are decoded concurrently, each into its own elevation range;
/// the ranges are merged before any color is computed. If either file
/// fails, no cloud is produced and the error for `path_a` wins.
pub fn compare(
    path_a: impl AsRef<Path>,
    path_b: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<MergedCloud> {
    compare_with_summary(path_a, path_b, config).map(|(cloud, _)| cloud)
}

pub fn compare_with_summary(
    path_a: impl AsRef<Path>,
    path_b: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<(MergedCloud, DiffSummary)> {
    config.validate()?;
    let (path_a, path_b) = (path_a.as_ref(), path_b.as_ref());

    let (a, b) = rayon::join(
        || decode_with(|range| read_bin(path_a, config, range)),
        || decode_with(|range| read_bin(path_b, config, range)),
    );
    merge(a, b, config)
}

/// [`compare`] for clouds already in memory.
pub fn compare_bytes(
    bytes_a: &[u8],
    bytes_b: &[u8],
    config: &CompareConfig,
) -> Result<MergedCloud> {
    config.validate()?;

    let (a, b) = rayon::join(
        || decode_with(|range| decode_bin(bytes_a, config, range)),
        || decode_with(|range| decode_bin(bytes_b, config, range)),
    );
    merge(a, b, config).map(|(cloud, _)| cloud)
}

fn decode_with(decode: impl FnOnce(&mut ElevationRange) -> Result<PlanarGrid>) -> Decoded {
    let mut range = ElevationRange::empty();
    let grid = decode(&mut range)?;
    Ok((grid, range))
}

fn merge(a: Decoded, b: Decoded, config: &CompareConfig) -> Result<(MergedCloud, DiffSummary)> {
    let (grid_a, range_a) = a?;
    let (grid_b, range_b) = b?;
    let range = range_a.merged(&range_b);

    let (cloud, summary) = diff_grids_with_summary(&grid_a, &grid_b, &range, config);
    info!(
        points = cloud.len(),
        matched = summary.matched,
        only_a = summary.only_a,
        only_b = summary.only_b,
        min = range.min,
        max = range.max,
        "compared clouds"
    );
    Ok((cloud, summary))
}
