//! Feature file format: `rows: u32 LE, dims: u32 LE`, then `rows * dims`
//! little-endian f32 values, row-major.

use std::path::Path;

use mmirs_core::constants::FEATURE_HEADER_BYTES;
use mmirs_core::errors::{MmirsResult, PoolError};
use mmirs_core::models::{FeatureRecord, ImageId};

/// Decode one feature file's bytes into a record for `image_id`.
pub fn decode(image_id: ImageId, bytes: &[u8], path: &Path) -> MmirsResult<FeatureRecord> {
    let corrupt = |reason: String| PoolError::CorruptFeatureFile {
        path: path.to_path_buf(),
        reason,
    };

    if bytes.len() < FEATURE_HEADER_BYTES {
        return Err(corrupt(format!("{} bytes is shorter than the header", bytes.len())).into());
    }
    let rows = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let dims = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;

    let expected = rows
        .checked_mul(dims)
        .and_then(|n| n.checked_mul(4))
        .and_then(|n| n.checked_add(FEATURE_HEADER_BYTES))
        .ok_or_else(|| corrupt(format!("header {rows}x{dims} overflows")))?;
    if bytes.len() != expected {
        return Err(corrupt(format!(
            "size mismatch: expected {expected} bytes for {rows}x{dims}, got {}",
            bytes.len()
        ))
        .into());
    }

    let data = bytes[FEATURE_HEADER_BYTES..]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok(FeatureRecord::new(image_id, rows, dims, data))
}
