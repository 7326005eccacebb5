/// D88 image data structures

/// Disk header and track pointer table
pub mod header;
/// Sector headers and payloads
pub mod sector;
/// Track walking
pub mod track;

#[cfg(test)]
pub(crate) mod testutil;

pub use header::{decode_header, encode_header, encode_title, DiskHeader, TrackTable};
pub use sector::{
    decode_sector_header, encode_sector_header, Sector, SectorContent, SectorHeader, SectorId,
};
pub use track::{read_track, walk_track, Track, TrackWalker};

use crate::boot::{analyze_boot_sector, BootSector};
use crate::edit::{self, TitleFill};
use crate::error::{Result, Warning};
use crate::flatten::{flatten_image, FlatImage};
use crate::format::MediaType;
use crate::info::{get_info, DiskInfo};
use crate::validate::usable_tracks;
use std::io::Read;
use std::path::Path;

/// Main D88 image container
///
/// Owns the raw bytes and keeps a decoded copy of the header in step with
/// them. Edits patch the bytes in place, so anything this library does not
/// understand is preserved on save.
#[derive(Debug, Clone)]
pub struct D88Image {
    /// Raw image bytes
    pub(crate) data: Vec<u8>,
    /// Header decoded from `data`
    pub(crate) header: DiskHeader,
    /// Has the image been modified?
    pub(crate) changed: bool,
    /// Original filename if loaded from disk
    pub(crate) filename: Option<String>,
}

impl D88Image {
    /// Wrap a buffer, decoding its header
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let header = decode_header(&data)?;
        Ok(Self {
            data,
            header,
            changed: false,
            filename: None,
        })
    }

    /// Open a D88 file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::io::reader::read_d88(path)
    }

    /// Read a D88 image from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        crate::io::reader::read_d88_from(reader)
    }

    /// Get the decoded header
    pub fn header(&self) -> &DiskHeader {
        &self.header
    }

    /// Get the raw image bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the raw image bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Length of the image in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check for an empty buffer (never true for a decoded image)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the original filename if loaded from disk
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Title as text
    pub fn title(&self) -> String {
        self.header.title_text()
    }

    /// Media type from the header
    pub fn media_type(&self) -> MediaType {
        self.header.media_type
    }

    /// Check the write protect flag
    pub fn is_write_protected(&self) -> bool {
        self.header.is_write_protected()
    }

    /// Decode every usable track
    ///
    /// Tracks that fail are left out and reported in the warnings.
    pub fn tracks(&self) -> (Vec<Track<'_>>, Vec<Warning>) {
        let mut warnings = Vec::new();
        let mut tracks = Vec::new();

        for slot in usable_tracks(&self.header.tracks, self.data.len(), &mut warnings) {
            match read_track(&self.data, slot.index, slot.origin) {
                Ok(track) => tracks.push(track),
                Err(e) => {
                    log::warn!("Track {} @ {:#X}: {}", slot.index, slot.origin, e);
                    warnings.push(Warning::track(slot.index, e));
                }
            }
        }

        (tracks, warnings)
    }

    /// Decode the track in pointer table slot `index`
    ///
    /// Returns `None` for an unused slot.
    pub fn track(&self, index: usize) -> Option<Result<Track<'_>>> {
        let offset = self.header.tracks.get(index).filter(|&o| o != 0)?;
        Some(
            crate::validate::validate_offset(offset, self.data.len())
                .and_then(|()| read_track(&self.data, index, offset as usize)),
        )
    }

    /// Build a structured report
    pub fn info(&self) -> Result<DiskInfo> {
        get_info(&self.data)
    }

    /// Convert to a raw sector dump
    pub fn flatten(&self) -> Result<FlatImage> {
        flatten_image(&self.data)
    }

    /// Extract and fingerprint the boot sector
    pub fn boot_sector(&self) -> Result<BootSector> {
        analyze_boot_sector(&self.data)
    }

    /// Change the media type
    pub fn set_media_type(&mut self, media_type: MediaType) -> Result<()> {
        edit::set_media_type(&mut self.data, media_type)?;
        self.refresh()
    }

    /// Change the title, touching only the 17-byte field
    pub fn rename(&mut self, title: &str) -> Result<()> {
        self.rename_with(title, TitleFill::Field)
    }

    /// Change the title with an explicit fill window
    pub fn rename_with(&mut self, title: &str, fill: TitleFill) -> Result<()> {
        edit::rename_title_with(&mut self.data, title, fill)?;
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        self.header = decode_header(&self.data)?;
        self.changed = true;
        Ok(())
    }

    /// Save the D88 image to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        crate::io::writer::write_d88(self, &path)?;
        self.filename = Some(path.as_ref().to_string_lossy().to_string());
        self.changed = false;
        Ok(())
    }

    /// Flatten and write the sector dump to a file
    pub fn save_flat<P: AsRef<Path>>(&self, path: P) -> Result<FlatImage> {
        let flat = self.flatten()?;
        crate::io::writer::write_raw(&flat.data, path)?;
        Ok(flat)
    }

    /// Check if the image has been modified
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Mark the image as unchanged
    pub fn mark_unchanged(&mut self) {
        self.changed = false;
    }
}
