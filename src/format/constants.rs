/// D88 layout offsets and sizes

use crate::error::{D88Error, Result};

/// Offset of the title field
pub const TITLE_OFFSET: usize = 0x00;

/// Length of the title field
pub const TITLE_LENGTH: usize = 17;

/// Length of the historical rename window (title plus first reserved byte)
pub const LEGACY_TITLE_WINDOW: usize = 18;

/// Offset of the reserved bytes
pub const RESERVED_OFFSET: usize = 0x11;

/// Length of the reserved area
pub const RESERVED_LENGTH: usize = 9;

/// Offset of the write-protect byte
pub const PROTECT_OFFSET: usize = 0x1A;

/// Offset of the media type byte
pub const MEDIA_TYPE_OFFSET: usize = 0x1B;

/// Offset of the declared disk size (u32 LE)
pub const DISK_SIZE_OFFSET: usize = 0x1C;

/// Offset of the track pointer table
pub const TRACK_TABLE_OFFSET: usize = 0x20;

/// Number of slots in the track pointer table
pub const TRACK_TABLE_ENTRIES: usize = 164;

/// Size of the fixed header plus track pointer table
pub const HEADER_SIZE: usize = TRACK_TABLE_OFFSET + TRACK_TABLE_ENTRIES * 4;

/// Protect byte value written by most tools for a protected disk
pub const WRITE_PROTECTED: u8 = 0x10;

/// Size of a sector header
pub const SECTOR_HEADER_SIZE: usize = 16;

/// Sector size code to byte size mapping
/// Index: size_code (0-3), Value: payload size in bytes
pub const SECTOR_SIZES: [usize; 4] = [
    128,  // 0
    256,  // 1
    512,  // 2
    1024, // 3
];

/// Convert a sector size code to its payload size in bytes
#[inline]
pub fn sector_size_to_bytes(size_code: u8) -> Result<usize> {
    SECTOR_SIZES
        .get(size_code as usize)
        .copied()
        .ok_or(D88Error::UnknownSectorSizeCode(size_code))
}
