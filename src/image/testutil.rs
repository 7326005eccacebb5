/// Synthetic images for unit tests

use crate::fdc::FdcStatus;
use crate::format::constants::{sector_size_to_bytes, HEADER_SIZE, RESERVED_LENGTH};
use crate::format::MediaType;
use crate::image::header::{encode_header, DiskHeader, TrackTable};
use crate::image::sector::{encode_sector_header, SectorHeader, SectorId};

/// Per-sector overrides
#[derive(Debug, Clone, Default)]
pub(crate) struct SectorSpec {
    size_code: Option<u8>,
    status: Option<u8>,
    deleted: Option<u8>,
    data: Option<Vec<u8>>,
}

impl SectorSpec {
    pub fn size_code(code: u8) -> Self {
        Self {
            size_code: Some(code),
            ..Default::default()
        }
    }

    pub fn data(data: &[u8]) -> Self {
        Self {
            data: Some(data.to_vec()),
            ..Default::default()
        }
    }

    pub fn status(mut self, status: u8) -> Self {
        self.status = Some(status);
        self
    }

    pub fn deleted(mut self) -> Self {
        self.deleted = Some(0x10);
        self
    }
}

/// One track of identically shaped sectors, records numbered from 1
#[derive(Debug, Clone)]
pub(crate) struct TrackSpec {
    cylinder: u8,
    head: u8,
    sectors: usize,
    size_code: u8,
    density: u8,
    declared: Option<u16>,
    fill_record: bool,
    overrides: Vec<(usize, SectorSpec)>,
}

impl TrackSpec {
    pub fn new(cylinder: u8, head: u8, sectors: usize, size_code: u8) -> Self {
        Self {
            cylinder,
            head,
            sectors,
            size_code,
            density: 0,
            declared: None,
            fill_record: false,
            overrides: Vec::new(),
        }
    }

    /// Fill each payload with its record number instead of 0xE5
    pub fn fill_with_record(mut self) -> Self {
        self.fill_record = true;
        self
    }

    pub fn density(mut self, density: u8) -> Self {
        self.density = density;
        self
    }

    pub fn with_declared_count(mut self, count: u16) -> Self {
        self.declared = Some(count);
        self
    }

    pub fn with_sector(mut self, index: usize, spec: SectorSpec) -> Self {
        self.overrides.push((index, spec));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let count = self.declared.unwrap_or(self.sectors as u16);

        for i in 0..self.sectors {
            let spec = self
                .overrides
                .iter()
                .rev()
                .find(|(index, _)| *index == i)
                .map(|(_, spec)| spec.clone())
                .unwrap_or_default();

            let record = i as u8 + 1;
            let size_code = spec.size_code.unwrap_or(self.size_code);
            let size = sector_size_to_bytes(size_code).unwrap_or(128);

            let mut data = spec.data.clone().unwrap_or_else(|| {
                let fill = if self.fill_record { record } else { 0xE5 };
                vec![fill; size]
            });
            data.resize(size, 0);

            let header = SectorHeader {
                id: SectorId::new(self.cylinder, self.head, record, size_code),
                sector_count: count,
                density: self.density,
                deleted: spec.deleted.unwrap_or(0),
                status: FdcStatus::new(spec.status.unwrap_or(0)),
                reserved: [0; 5],
                data_size: size as u16,
            };
            out.extend_from_slice(&encode_sector_header(&header));
            out.extend_from_slice(&data);
        }

        out
    }
}

/// A whole image: header, pointer table and tracks laid out back to back
#[derive(Debug, Clone)]
pub(crate) struct ImageSpec {
    title: Vec<u8>,
    media_type: u8,
    protect: u8,
    tracks: Vec<(usize, TrackSpec)>,
    pointers: Vec<(usize, u32)>,
    disk_size: Option<u32>,
    gap: usize,
}

impl ImageSpec {
    pub fn new() -> Self {
        Self {
            title: b"TEST".to_vec(),
            media_type: 0x00,
            protect: 0,
            tracks: Vec::new(),
            pointers: Vec::new(),
            disk_size: None,
            gap: 0,
        }
    }

    pub fn title(mut self, title: &[u8]) -> Self {
        self.title = title.to_vec();
        self
    }

    pub fn media_type(mut self, media_type: u8) -> Self {
        self.media_type = media_type;
        self
    }

    pub fn protect(mut self, protect: u8) -> Self {
        self.protect = protect;
        self
    }

    /// Add a track in the next free slot
    pub fn track(mut self, track: TrackSpec) -> Self {
        let slot = self.next_slot();
        self.tracks.push((slot, track));
        self
    }

    /// Put a raw offset into a slot
    pub fn pointer(mut self, slot: usize, offset: u32) -> Self {
        self.pointers.push((slot, offset));
        self
    }

    pub fn disk_size(mut self, size: u32) -> Self {
        self.disk_size = Some(size);
        self
    }

    /// Padding bytes written after every track
    pub fn gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    fn next_slot(&self) -> usize {
        self.tracks
            .iter()
            .map(|(slot, _)| *slot)
            .chain(self.pointers.iter().map(|(slot, _)| *slot))
            .max()
            .map_or(0, |slot| slot + 1)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        let mut table = TrackTable::empty();

        for (slot, track) in &self.tracks {
            table.set(*slot, data.len() as u32);
            data.extend_from_slice(&track.build());
            data.resize(data.len() + self.gap, 0);
        }
        for &(slot, offset) in &self.pointers {
            table.set(slot, offset);
        }

        let mut title = [0u8; 17];
        let len = self.title.len().min(17);
        title[..len].copy_from_slice(&self.title[..len]);

        let header = DiskHeader {
            title,
            reserved: [0; RESERVED_LENGTH],
            protect: self.protect,
            media_type: MediaType::from(self.media_type),
            disk_size: self.disk_size.unwrap_or(data.len() as u32),
            tracks: table,
        };
        data[..HEADER_SIZE].copy_from_slice(&encode_header(&header));
        data
    }
}
