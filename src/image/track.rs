/// Track walking

use crate::error::{D88Error, Result};
use crate::format::constants::SECTOR_HEADER_SIZE;
use crate::format::Density;
use crate::image::sector::{decode_sector_header, Sector, SectorHeader};

/// Iterator over the sectors of one track
///
/// Construction peeks at the first sector header to learn the sector count
/// and check its coded fields; iteration then starts again from the origin.
/// Iteration stops after the first error.
#[derive(Debug, Clone)]
pub struct TrackWalker<'a> {
    data: &'a [u8],
    origin: usize,
    first: SectorHeader,
    cursor: usize,
    remaining: usize,
    failed: bool,
}

impl<'a> TrackWalker<'a> {
    /// Start walking the track at `origin`
    pub fn new(data: &'a [u8], origin: usize) -> Result<Self> {
        let first = decode_sector_header(data, origin)?;
        first.validate()?;

        log::trace!(
            "Track at {:#X}: {} sectors, first {}",
            origin,
            first.sector_count,
            first.id
        );

        Ok(Self {
            data,
            origin,
            first,
            cursor: origin,
            remaining: first.sector_count as usize,
            failed: false,
        })
    }

    /// Offset of the track's first sector header
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Header of the first sector
    pub fn first_header(&self) -> &SectorHeader {
        &self.first
    }

    /// Number of sectors the track declares
    pub fn sector_count(&self) -> usize {
        self.first.sector_count as usize
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.cursor
    }

    fn read_sector(&mut self) -> Result<Sector<'a>> {
        let offset = self.cursor;
        let header = decode_sector_header(self.data, offset)?;
        let size = header.validate()?;

        let start = offset + SECTOR_HEADER_SIZE;
        let end = start
            .checked_add(size)
            .filter(|&end| end <= self.data.len())
            .ok_or(D88Error::TruncatedSectorData {
                offset: start,
                needed: size,
            })?;

        self.cursor = end;
        Ok(Sector::new(offset, header, &self.data[start..end]))
    }
}

impl<'a> Iterator for TrackWalker<'a> {
    type Item = Result<Sector<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.failed {
            return None;
        }

        match self.read_sector() {
            Ok(sector) => {
                self.remaining -= 1;
                Some(Ok(sector))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

/// Walk the sectors of the track starting at `origin`
pub fn walk_track(data: &[u8], origin: usize) -> Result<TrackWalker<'_>> {
    TrackWalker::new(data, origin)
}

/// A fully decoded track
#[derive(Debug, Clone)]
pub struct Track<'a> {
    /// Pointer table slot
    pub index: usize,
    /// Offset of the first sector header
    pub origin: usize,
    /// Offset just past the last sector payload
    pub end: usize,
    sectors: Vec<Sector<'a>>,
}

impl<'a> Track<'a> {
    /// Get a reference to all sectors
    pub fn sectors(&self) -> &[Sector<'a>] {
        &self.sectors
    }

    /// Get the number of sectors in this track
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Check if this track has any sectors
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Get a sector by its record number
    pub fn get_sector(&self, record: u8) -> Option<&Sector<'a>> {
        self.sectors.iter().find(|s| s.header.id.record == record)
    }

    /// Get a sector by its position index
    pub fn get_sector_by_index(&self, index: usize) -> Option<&Sector<'a>> {
        self.sectors.get(index)
    }

    /// Cylinder from the first sector
    pub fn cylinder(&self) -> Option<u8> {
        self.sectors.first().map(|s| s.header.id.cylinder)
    }

    /// Head from the first sector
    pub fn head(&self) -> Option<u8> {
        self.sectors.first().map(|s| s.header.id.head)
    }

    /// Density from the first sector
    pub fn density(&self) -> Option<Density> {
        self.sectors.first().and_then(|s| s.header.density().ok())
    }

    /// Get the total payload size of all sectors in bytes
    pub fn total_data_size(&self) -> usize {
        self.sectors.iter().map(|s| s.data().len()).sum()
    }

    /// Get the sector size if all sectors are uniform, None otherwise
    pub fn uniform_sector_size(&self) -> Option<usize> {
        let first = self.sectors.first()?.data().len();
        self.sectors
            .iter()
            .all(|s| s.data().len() == first)
            .then_some(first)
    }

    /// Append every sector payload, in file order, to `out`
    pub fn write_payload(&self, out: &mut Vec<u8>) {
        for sector in &self.sectors {
            out.extend_from_slice(sector.data());
        }
    }

    /// Check that the track ends where the next track begins
    pub fn check_alignment(&self, next_origin: Option<usize>) -> Result<()> {
        match next_origin {
            Some(expected) if expected != self.end => Err(D88Error::TrackAlignment {
                expected,
                actual: self.end,
            }),
            _ => Ok(()),
        }
    }
}

/// Decode every sector of the track in slot `index`
///
/// Any sector failure fails the whole track.
pub fn read_track(data: &[u8], index: usize, origin: usize) -> Result<Track<'_>> {
    let mut walker = walk_track(data, origin)?;
    let mut sectors = Vec::with_capacity(walker.sector_count());

    for sector in walker.by_ref() {
        sectors.push(sector?);
    }

    log::debug!(
        "Track {} @ {:#X}: {} sectors, ends at {:#X}",
        index,
        origin,
        sectors.len(),
        walker.position()
    );

    Ok(Track {
        index,
        origin,
        end: walker.position(),
        sectors,
    })
}
