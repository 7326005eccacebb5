/// Disk header and track pointer table

use crate::error::{D88Error, Result};
use crate::format::constants::*;
use crate::format::MediaType;

/// Table of absolute track offsets; zero marks an unused slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTable([u32; TRACK_TABLE_ENTRIES]);

impl TrackTable {
    /// Create a table from raw entries
    pub fn new(entries: [u32; TRACK_TABLE_ENTRIES]) -> Self {
        TrackTable(entries)
    }

    /// Create a table with every slot unused
    pub fn empty() -> Self {
        TrackTable([0; TRACK_TABLE_ENTRIES])
    }

    /// Get the offset stored in a slot
    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    /// Set the offset stored in a slot
    pub fn set(&mut self, index: usize, offset: u32) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = offset;
        }
    }

    /// Get all slots, including unused ones
    pub fn entries(&self) -> &[u32; TRACK_TABLE_ENTRIES] {
        &self.0
    }

    /// Number of non-zero slots
    pub fn in_use_count(&self) -> usize {
        self.0.iter().filter(|&&offset| offset != 0).count()
    }
}

/// Decoded D88 header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskHeader {
    /// Title bytes, zero padded
    pub title: [u8; TITLE_LENGTH],
    /// Reserved bytes
    pub reserved: [u8; RESERVED_LENGTH],
    /// Write protect flag (0x10 when protected)
    pub protect: u8,
    /// Media type
    pub media_type: MediaType,
    /// Total image size declared by the header
    pub disk_size: u32,
    /// Track pointer table
    pub tracks: TrackTable,
}

impl DiskHeader {
    /// Title text up to the first zero byte
    pub fn title_text(&self) -> String {
        let end = self
            .title
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(TITLE_LENGTH);
        String::from_utf8_lossy(&self.title[..end]).into_owned()
    }

    /// Check the write protect flag
    pub fn is_write_protected(&self) -> bool {
        self.protect != 0
    }
}

#[inline]
pub(crate) fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

#[inline]
pub(crate) fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Decode the header and pointer table from the start of a buffer
///
/// Field values are not validated; an unknown media type decodes as
/// `MediaType::Unknown`.
pub fn decode_header(data: &[u8]) -> Result<DiskHeader> {
    if data.len() < HEADER_SIZE {
        return Err(D88Error::TruncatedHeader {
            length: data.len(),
            needed: HEADER_SIZE,
        });
    }

    let mut title = [0u8; TITLE_LENGTH];
    title.copy_from_slice(&data[TITLE_OFFSET..TITLE_OFFSET + TITLE_LENGTH]);

    let mut reserved = [0u8; RESERVED_LENGTH];
    reserved.copy_from_slice(&data[RESERVED_OFFSET..RESERVED_OFFSET + RESERVED_LENGTH]);

    let mut entries = [0u32; TRACK_TABLE_ENTRIES];
    for (i, entry) in entries.iter_mut().enumerate() {
        *entry = read_u32_le(data, TRACK_TABLE_OFFSET + i * 4);
    }

    Ok(DiskHeader {
        title,
        reserved,
        protect: data[PROTECT_OFFSET],
        media_type: MediaType::from(data[MEDIA_TYPE_OFFSET]),
        disk_size: read_u32_le(data, DISK_SIZE_OFFSET),
        tracks: TrackTable::new(entries),
    })
}

/// Encode a header and pointer table
pub fn encode_header(header: &DiskHeader) -> [u8; HEADER_SIZE] {
    let mut data = [0u8; HEADER_SIZE];

    data[TITLE_OFFSET..TITLE_OFFSET + TITLE_LENGTH].copy_from_slice(&header.title);
    data[RESERVED_OFFSET..RESERVED_OFFSET + RESERVED_LENGTH].copy_from_slice(&header.reserved);
    data[PROTECT_OFFSET] = header.protect;
    data[MEDIA_TYPE_OFFSET] = header.media_type.into();
    data[DISK_SIZE_OFFSET..DISK_SIZE_OFFSET + 4].copy_from_slice(&header.disk_size.to_le_bytes());

    for (i, offset) in header.tracks.entries().iter().enumerate() {
        let pos = TRACK_TABLE_OFFSET + i * 4;
        data[pos..pos + 4].copy_from_slice(&offset.to_le_bytes());
    }

    data
}

/// Encode a title into the zero-padded 17-byte field
pub fn encode_title(title: &[u8]) -> Result<[u8; TITLE_LENGTH]> {
    if title.len() > TITLE_LENGTH {
        return Err(D88Error::TitleTooLong(title.len()));
    }

    let mut field = [0u8; TITLE_LENGTH];
    field[..title.len()].copy_from_slice(title);
    Ok(field)
}
