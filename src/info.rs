/// Structured image report
///
/// Collects header fields, per-track geometry and every non-fatal problem
/// into one value that a front end can print or inspect.

use crate::error::{D88Error, Result, Warning};
use crate::format::{Density, MediaType};
use crate::image::header::decode_header;
use crate::image::track::read_track;
use crate::validate::{check_declared_size, usable_tracks};
use std::fmt;

/// Geometry of one decoded track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSummary {
    /// Pointer table slot
    pub index: usize,
    /// Offset of the track in the image
    pub origin: usize,
    /// Cylinder of the first sector
    pub cylinder: u8,
    /// Head of the first sector
    pub head: u8,
    /// Sectors decoded
    pub sector_count: usize,
    /// Record number of the first sector
    pub first_record: u8,
    /// Density of the first sector
    pub density: Option<Density>,
    /// Sector size if every sector has the same size
    pub sector_size: Option<usize>,
    /// Payload bytes in the track
    pub data_size: usize,
    /// Sectors with a status error
    pub error_sectors: usize,
    /// Sectors with deleted data
    pub deleted_sectors: usize,
}

/// Report on a whole image
#[derive(Debug)]
pub struct DiskInfo {
    /// Title up to the first zero byte
    pub title: String,
    /// Raw protect byte
    pub protect: u8,
    /// Media type
    pub media_type: MediaType,
    /// Number of sides implied by the media type
    pub sides: u8,
    /// Size stored in the header
    pub declared_size: u32,
    /// Actual image length
    pub actual_size: usize,
    /// Non-zero pointer table slots
    pub tracks_in_use: usize,
    /// Estimated tracks per side; only meaningful for double-sided media
    pub tracks_per_side: Option<usize>,
    /// Tracks that decoded successfully
    pub tracks: Vec<TrackSummary>,
    /// Problems found while decoding
    pub warnings: Vec<Warning>,
}

impl DiskInfo {
    /// Check the write protect flag
    pub fn is_write_protected(&self) -> bool {
        self.protect != 0
    }

    /// Total sector payload bytes across decoded tracks
    pub fn data_size(&self) -> usize {
        self.tracks.iter().map(|t| t.data_size).sum()
    }
}

/// Build a report for the image in `data`
///
/// Fails only if the header cannot be decoded.
pub fn get_info(data: &[u8]) -> Result<DiskInfo> {
    let header = decode_header(data)?;
    let mut warnings = Vec::new();

    if let Err(e) = check_declared_size(header.disk_size, data.len()) {
        log::warn!("{}", e);
        warnings.push(Warning::image(e));
    }

    if let MediaType::Unknown(value) = header.media_type {
        let e = D88Error::UnknownMediaType(value);
        log::warn!("{}", e);
        warnings.push(Warning::image(e));
    }

    let mut tracks = Vec::new();
    for slot in usable_tracks(&header.tracks, data.len(), &mut warnings) {
        let track = match read_track(data, slot.index, slot.origin) {
            Ok(track) => track,
            Err(e) => {
                log::warn!("Track {} @ {:#X}: {}", slot.index, slot.origin, e);
                warnings.push(Warning::track(slot.index, e));
                continue;
            }
        };

        if let Err(e) = track.check_alignment(slot.next_origin) {
            log::warn!("Track {}: {}", slot.index, e);
            warnings.push(Warning::track(slot.index, e));
        }

        let first = track.sectors().first().map(|s| s.header.id);
        tracks.push(TrackSummary {
            index: track.index,
            origin: track.origin,
            cylinder: first.map_or(0, |id| id.cylinder),
            head: first.map_or(0, |id| id.head),
            sector_count: track.sector_count(),
            first_record: first.map_or(0, |id| id.record),
            density: track.density(),
            sector_size: track.uniform_sector_size(),
            data_size: track.total_data_size(),
            error_sectors: track.sectors().iter().filter(|s| s.has_error()).count(),
            deleted_sectors: track.sectors().iter().filter(|s| s.is_deleted()).count(),
        });
    }

    let tracks_in_use = header.tracks.in_use_count();
    let tracks_per_side = if header.media_type.is_single_sided() {
        None
    } else {
        Some(tracks_in_use.div_ceil(2))
    };

    Ok(DiskInfo {
        title: header.title_text(),
        protect: header.protect,
        media_type: header.media_type,
        sides: header.media_type.sides(),
        declared_size: header.disk_size,
        actual_size: data.len(),
        tracks_in_use,
        tracks_per_side,
        tracks,
        warnings,
    })
}

impl fmt::Display for DiskInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Media type: {}", self.media_type)?;
        writeln!(
            f,
            "Sides: {} ({})",
            self.sides,
            if self.sides == 1 { "single-sided" } else { "double-sided" }
        )?;
        writeln!(
            f,
            "Write protected: {} ({:02X}h)",
            if self.is_write_protected() { "Yes" } else { "No" },
            self.protect
        )?;
        writeln!(f, "Declared size: {} bytes", self.declared_size)?;
        writeln!(f, "Actual size: {} bytes", self.actual_size)?;
        writeln!(f, "Tracks in use: {}", self.tracks_in_use)?;
        if let Some(per_side) = self.tracks_per_side {
            writeln!(f, "Tracks per side: {}", per_side)?;
        }
        writeln!(f, "Tracks decoded: {}", self.tracks.len())?;
        writeln!(f, "Sector data: {} KB", self.data_size() / 1024)?;

        if !self.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  {}", warning)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::HEADER_SIZE;
    use crate::image::testutil::{ImageSpec, SectorSpec, TrackSpec};

    #[test]
    fn test_info_single_sided() {
        let mut spec = ImageSpec::new().title(b"SINGLE").media_type(0x30);
        for c in 0..80 {
            spec = spec.track(TrackSpec::new(c, 0, 1, 0));
        }
        let info = get_info(&spec.build()).unwrap();

        assert_eq!(info.title, "SINGLE");
        assert_eq!(info.media_type, MediaType::OneD);
        assert_eq!(info.sides, 1);
        assert_eq!(info.tracks_in_use, 80);
        assert_eq!(info.tracks_per_side, None);
        assert_eq!(info.tracks.len(), 80);
        assert!(info.warnings.is_empty());
    }

    #[test]
    fn test_info_double_sided_estimate() {
        let mut spec = ImageSpec::new().media_type(0x20);
        for c in 0..3 {
            spec = spec
                .track(TrackSpec::new(c, 0, 2, 3))
                .track(TrackSpec::new(c, 1, 2, 3));
        }
        let info = get_info(&spec.build()).unwrap();

        assert_eq!(info.sides, 2);
        assert_eq!(info.tracks_per_side, Some(3));
        assert_eq!(info.tracks[3].cylinder, 1);
        assert_eq!(info.tracks[3].head, 1);
        assert_eq!(info.tracks[3].sector_size, Some(1024));
        assert_eq!(info.data_size(), 6 * 2 * 1024);
    }

    #[test]
    fn test_info_reports_problems() {
        let data = ImageSpec::new()
            .media_type(0x99)
            .protect(0x10)
            .disk_size(42)
            .track(
                TrackSpec::new(0, 0, 3, 1)
                    .with_sector(1, SectorSpec::default().status(0xB0))
                    .with_sector(2, SectorSpec::default().deleted()),
            )
            .track(TrackSpec::new(1, 0, 1, 1).density(2))
            .pointer(5, 0xFFFF_0000)
            .build();
        let info = get_info(&data).unwrap();

        assert!(info.is_write_protected());
        assert_eq!(info.media_type, MediaType::Unknown(0x99));
        assert_eq!(info.tracks_in_use, 3);
        assert_eq!(info.tracks.len(), 1);
        assert_eq!(info.tracks[0].error_sectors, 1);
        assert_eq!(info.tracks[0].deleted_sectors, 1);

        let errors: Vec<&D88Error> = info.warnings.iter().map(|w| &w.error).collect();
        assert!(matches!(errors[0], D88Error::SizeMismatch { declared: 42, .. }));
        assert!(matches!(errors[1], D88Error::UnknownMediaType(0x99)));
        assert!(errors.iter().any(|e| matches!(e, D88Error::OutOfBounds { .. })));
        assert!(errors.iter().any(|e| matches!(e, D88Error::UnknownDensityCode(2))));
    }

    #[test]
    fn test_info_skips_truncated_track() {
        let tail = (HEADER_SIZE + 16 + 128) as u32;
        let data = ImageSpec::new()
            .gap(8)
            .track(TrackSpec::new(0, 0, 1, 0))
            .pointer(1, tail)
            .build();
        let info = get_info(&data).unwrap();

        assert_eq!(info.tracks_in_use, 2);
        assert_eq!(info.tracks.len(), 1);
        assert_eq!(info.warnings.len(), 1);
        let warning = &info.warnings[0];
        assert_eq!(warning.track, Some(1));
        assert!(matches!(warning.error, D88Error::TruncatedSectorHeader { .. }));
        assert!(!warning.error.is_fatal());
    }

    #[test]
    fn test_info_display() {
        let data = ImageSpec::new()
            .title(b"SHOWME")
            .media_type(0x10)
            .track(TrackSpec::new(0, 0, 1, 1))
            .build();
        let text = get_info(&data).unwrap().to_string();

        assert!(text.contains("Title: SHOWME"));
        assert!(text.contains("Media type: 2DD"));
        assert!(text.contains("double-sided"));
        assert!(text.contains("Tracks per side: 1"));
        assert!(!text.contains("Warnings"));
    }
}
