//! Synthetic D88 images for integration tests

#![allow(dead_code)]

use d88manager::format::constants::{
    HEADER_SIZE, RESERVED_LENGTH, TITLE_LENGTH, TRACK_TABLE_OFFSET,
};
use d88manager::{encode_header, encode_sector_header, DiskHeader, FdcStatus, MediaType};
use d88manager::{SectorHeader, SectorId, TrackTable};

/// One track of identical sectors, records numbered from 1
pub fn track_bytes(cylinder: u8, head: u8, sectors: u8, size_code: u8, fill: u8) -> Vec<u8> {
    let size = 128usize << size_code;
    let mut out = Vec::new();
    for record in 1..=sectors {
        let header = SectorHeader {
            id: SectorId::new(cylinder, head, record, size_code),
            sector_count: sectors as u16,
            density: 0,
            deleted: 0,
            status: FdcStatus::new(0),
            reserved: [0; 5],
            data_size: size as u16,
        };
        out.extend_from_slice(&encode_sector_header(&header));
        out.extend(std::iter::repeat(fill).take(size));
    }
    out
}

/// Lay tracks out back to back after the header, slot by slot
pub fn image_bytes(title: &str, media_type: u8, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut data = vec![0u8; HEADER_SIZE];
    let mut table = TrackTable::empty();
    for (slot, track) in tracks.iter().enumerate() {
        table.set(slot, data.len() as u32);
        data.extend_from_slice(track);
    }

    let mut field = [0u8; TITLE_LENGTH];
    let len = title.len().min(TITLE_LENGTH);
    field[..len].copy_from_slice(&title.as_bytes()[..len]);

    let header = DiskHeader {
        title: field,
        reserved: [0; RESERVED_LENGTH],
        protect: 0,
        media_type: MediaType::from(media_type),
        disk_size: data.len() as u32,
        tracks: table,
    };
    data[..HEADER_SIZE].copy_from_slice(&encode_header(&header));
    data
}

/// Overwrite one pointer table slot
pub fn set_pointer(data: &mut [u8], slot: usize, offset: u32) {
    let at = TRACK_TABLE_OFFSET + slot * 4;
    data[at..at + 4].copy_from_slice(&offset.to_le_bytes());
}
