/// Sector header and sector data

use crate::error::{D88Error, Result};
use crate::fdc::FdcStatus;
use crate::format::constants::{sector_size_to_bytes, SECTOR_HEADER_SIZE};
use crate::format::Density;
use crate::image::header::read_u16_le;
use std::fmt;

/// Sector ID (CHRN) - addressing information for a sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorId {
    /// C - Cylinder number
    pub cylinder: u8,
    /// H - Head number
    pub head: u8,
    /// R - Record/sector number
    pub record: u8,
    /// N - Size code (0=128, 1=256, 2=512, 3=1024)
    pub size_code: u8,
}

impl SectorId {
    /// Create a new sector ID
    pub fn new(cylinder: u8, head: u8, record: u8, size_code: u8) -> Self {
        Self {
            cylinder,
            head,
            record,
            size_code,
        }
    }

    /// Get the sector size in bytes based on size code
    pub fn size_bytes(&self) -> Result<usize> {
        sector_size_to_bytes(self.size_code)
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "C{} H{} R{} N{}",
            self.cylinder, self.head, self.record, self.size_code
        )
    }
}

/// The 16-byte header preceding every sector payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorHeader {
    /// Sector addressing information (CHRN)
    pub id: SectorId,
    /// Number of sectors in the track this sector belongs to
    pub sector_count: u16,
    /// Raw density code
    pub density: u8,
    /// Deleted data flag (non-zero when deleted)
    pub deleted: u8,
    /// Status byte
    pub status: FdcStatus,
    /// Reserved bytes
    pub reserved: [u8; 5],
    /// Payload size recorded in the header
    pub data_size: u16,
}

impl SectorHeader {
    /// Payload size implied by the size code
    pub fn size_bytes(&self) -> Result<usize> {
        self.id.size_bytes()
    }

    /// Decoded density
    pub fn density(&self) -> Result<Density> {
        Density::try_from(self.density)
    }

    /// Check the deleted data flag
    pub fn is_deleted(&self) -> bool {
        self.deleted != 0
    }

    /// Check both coded fields, returning the payload size
    pub fn validate(&self) -> Result<usize> {
        let size = self.size_bytes()?;
        self.density()?;
        Ok(size)
    }
}

/// Decode the sector header at `offset`
pub fn decode_sector_header(data: &[u8], offset: usize) -> Result<SectorHeader> {
    let end = offset
        .checked_add(SECTOR_HEADER_SIZE)
        .ok_or(D88Error::TruncatedSectorHeader { offset })?;
    if end > data.len() {
        return Err(D88Error::TruncatedSectorHeader { offset });
    }

    let raw = &data[offset..end];
    let mut reserved = [0u8; 5];
    reserved.copy_from_slice(&raw[9..14]);

    Ok(SectorHeader {
        id: SectorId::new(raw[0], raw[1], raw[2], raw[3]),
        sector_count: read_u16_le(raw, 4),
        density: raw[6],
        deleted: raw[7],
        status: FdcStatus::new(raw[8]),
        reserved,
        data_size: read_u16_le(raw, 14),
    })
}

/// Encode a sector header
pub fn encode_sector_header(header: &SectorHeader) -> [u8; SECTOR_HEADER_SIZE] {
    let mut raw = [0u8; SECTOR_HEADER_SIZE];
    raw[0] = header.id.cylinder;
    raw[1] = header.id.head;
    raw[2] = header.id.record;
    raw[3] = header.id.size_code;
    raw[4..6].copy_from_slice(&header.sector_count.to_le_bytes());
    raw[6] = header.density;
    raw[7] = header.deleted;
    raw[8] = header.status.0;
    raw[9..14].copy_from_slice(&header.reserved);
    raw[14..16].copy_from_slice(&header.data_size.to_le_bytes());
    raw
}

/// Content classification of a sector payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorContent {
    /// No payload bytes
    Empty,
    /// Every byte holds the same value (freshly formatted)
    Uniform(u8),
    /// Contains data
    Data,
}

impl fmt::Display for SectorContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectorContent::Empty => write!(f, "Empty"),
            SectorContent::Uniform(b) => write!(f, "Filler {:02X}", b),
            SectorContent::Data => write!(f, "In Use"),
        }
    }
}

/// A sector borrowed from an image buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector<'a> {
    /// Offset of the sector header in the image
    pub offset: usize,
    /// Decoded header
    pub header: SectorHeader,
    data: &'a [u8],
}

impl<'a> Sector<'a> {
    /// Create a sector view
    pub fn new(offset: usize, header: SectorHeader, data: &'a [u8]) -> Self {
        Self {
            offset,
            header,
            data,
        }
    }

    /// Get the sector payload
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Get the sector ID
    pub fn id(&self) -> SectorId {
        self.header.id
    }

    /// Payload size from the header's size field
    pub fn recorded_size(&self) -> usize {
        self.header.data_size as usize
    }

    /// Check if the header's size field disagrees with the size code
    pub fn size_mismatch(&self) -> bool {
        self.recorded_size() != self.data.len()
    }

    /// Check if this sector has a status error
    pub fn has_error(&self) -> bool {
        self.header.status.has_error()
    }

    /// Check if this sector is marked as deleted data
    pub fn is_deleted(&self) -> bool {
        self.header.is_deleted() || self.header.status.is_deleted()
    }

    /// Classify the payload
    pub fn content(&self) -> SectorContent {
        match self.data.first() {
            None => SectorContent::Empty,
            Some(&first) if self.data.iter().all(|&b| b == first) => {
                SectorContent::Uniform(first)
            }
            Some(_) => SectorContent::Data,
        }
    }
}
