//! Reader for the `.bin` cloud format:
//!
//! ```text
//! offset 0 : i32 LE   N
//! offset 4 : N x { f32 LE x, f32 LE y, f32 LE z }
//! ```
//!
//! The total length must be exactly `4 + 12 * N` bytes.

use cloudiff_core::{CompareConfig, DiffError, ElevationRange, Result, Sample};
use cloudiff_spatial::{Cell, CollisionPolicy, PlanarGrid};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

pub const HEADER_LEN: u64 = 4;
pub const RECORD_LEN: u64 = 12;

/// Byte length a file declaring `declared` points must have.
pub fn expected_len(declared: i32) -> i64 {
    HEADER_LEN as i64 + RECORD_LEN as i64 * declared as i64
}

/// Reads the declared point count. A stream shorter than the header is a
/// read error, not a format error.
pub fn read_header(bytes: &[u8]) -> Result<i32> {
    let header: [u8; 4] = bytes
        .get(..HEADER_LEN as usize)
        .and_then(|h| h.try_into().ok())
        .ok_or_else(|| {
            DiffError::Stream(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("cloud stream has {} bytes, header needs 4", bytes.len()),
            ))
        })?;
    Ok(i32::from_le_bytes(header))
}

/// Decodes an in-memory cloud file into a grid.
///
/// `range` is only widened when the whole file decodes.
pub fn decode_bin(
    bytes: &[u8],
    config: &CompareConfig,
    range: &mut ElevationRange,
) -> Result<PlanarGrid> {
    config.validate()?;
    let declared = read_header(bytes)?;
    let count = check_len(declared, bytes.len() as u64)?;

    let mut body = &bytes[HEADER_LEN as usize..];
    let (grid, local) = decode_records(&mut body, count, config)?;
    range.merge(&local);
    Ok(grid)
}

/// Reads a whole stream into memory, then decodes it.
pub fn read_bin_from<R: Read>(
    mut reader: R,
    config: &CompareConfig,
    range: &mut ElevationRange,
) -> Result<PlanarGrid> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    decode_bin(&buf, config, range)
}

/// Decodes a cloud file from disk.
///
/// The declared count is checked against the file's metadata length before
/// any record is read; records are then streamed through a buffered reader.
pub fn read_bin(
    path: impl AsRef<Path>,
    config: &CompareConfig,
    range: &mut ElevationRange,
) -> Result<PlanarGrid> {
    let path = path.as_ref();
    config.validate()?;

    let file = File::open(path).map_err(|e| DiffError::read(path, e))?;
    let metadata = file.metadata().map_err(|e| DiffError::read(path, e))?;
    if !metadata.is_file() {
        // Pipes and devices report no length up front.
        let mut buf = Vec::new();
        BufReader::new(file)
            .read_to_end(&mut buf)
            .map_err(|e| DiffError::read(path, e))?;
        return decode_bin(&buf, config, range).inspect_err(|e| {
            warn!(path = %path.display(), "{e}");
        });
    }
    let actual = metadata.len();
    let mut reader = BufReader::new(file);

    let mut header = [0u8; 4];
    reader
        .read_exact(&mut header)
        .map_err(|e| DiffError::read(path, e))?;
    let declared = i32::from_le_bytes(header);
    let count = check_len(declared, actual).inspect_err(|e| {
        warn!(path = %path.display(), "{e}");
    })?;

    let (grid, local) =
        decode_records(&mut reader, count, config).map_err(|e| DiffError::read(path, e))?;
    range.merge(&local);
    Ok(grid)
}

/// Serializes samples in the `.bin` layout. Used to build fixtures.
pub fn encode_bin(samples: &[Sample]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN as usize + samples.len() * RECORD_LEN as usize);
    buf.extend_from_slice(&(samples.len() as i32).to_le_bytes());
    for s in samples {
        buf.extend_from_slice(&s.x.to_le_bytes());
        buf.extend_from_slice(&s.y.to_le_bytes());
        buf.extend_from_slice(&s.z.to_le_bytes());
    }
    buf
}

// --- Internal helpers ---

fn check_len(declared: i32, actual: u64) -> Result<usize> {
    let expected = expected_len(declared);
    if declared < 0 || expected != actual as i64 {
        return Err(DiffError::Format {
            declared: declared as i64,
            expected,
            actual,
        });
    }
    Ok(declared as usize)
}

fn decode_records<R: Read>(
    reader: &mut R,
    count: usize,
    config: &CompareConfig,
) -> io::Result<(PlanarGrid, ElevationRange)> {
    let policy = CollisionPolicy::from_averaging(config.averaging);
    let mut grid = PlanarGrid::with_capacity(policy, count);
    let mut range = ElevationRange::empty();
    let mut record = [0u8; RECORD_LEN as usize];

    for _ in 0..count {
        reader.read_exact(&mut record)?;
        let sample = parse_record(&record);

        let z = sample.z as f64 * config.unit;
        range.expand(z);
        grid.insert(Cell::quantize(sample.x as f64, sample.y as f64, config), z);
    }

    debug!(
        samples = count,
        cells = grid.len(),
        collapsed = count - grid.len(),
        "decoded cloud"
    );
    Ok((grid, range))
}

fn parse_record(record: &[u8; RECORD_LEN as usize]) -> Sample {
    let f = |i: usize| f32::from_le_bytes([record[i], record[i + 1], record[i + 2], record[i + 3]]);
    Sample::new(f(0), f(4), f(8))
}
