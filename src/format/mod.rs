/// D88 format constants and coded fields

/// Format constants
pub mod constants;
/// Media type and density codes
pub mod media;

pub use constants::*;
pub use media::{density_to_label, Density, MediaType};

/// Check whether a buffer is plausibly a D88 image
///
/// D88 has no magic bytes, so this only checks that the header fits and
/// that the declared size and first track pointer are sane.
pub fn detect_format(data: &[u8]) -> bool {
    if data.len() < HEADER_SIZE {
        return false;
    }

    let declared = u32::from_le_bytes([
        data[DISK_SIZE_OFFSET],
        data[DISK_SIZE_OFFSET + 1],
        data[DISK_SIZE_OFFSET + 2],
        data[DISK_SIZE_OFFSET + 3],
    ]) as usize;
    let first_track = u32::from_le_bytes([
        data[TRACK_TABLE_OFFSET],
        data[TRACK_TABLE_OFFSET + 1],
        data[TRACK_TABLE_OFFSET + 2],
        data[TRACK_TABLE_OFFSET + 3],
    ]) as usize;

    declared >= HEADER_SIZE && (first_track == 0 || first_track >= HEADER_SIZE)
}
