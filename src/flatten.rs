/// Conversion to a raw sector dump
///
/// The output holds sector payloads only, track by track in pointer table
/// order and sector by sector in file order. Tracks that fail validation or
/// decoding are left out entirely, so a damaged image yields a short dump.
/// Compare `tracks_written` with `tracks_in_use` to detect that.

use crate::error::{Result, Warning};
use crate::image::header::decode_header;
use crate::image::track::read_track;
use crate::image::TrackTable;
use crate::validate::{check_declared_size, usable_tracks};

/// Result of flattening an image
#[derive(Debug)]
pub struct FlatImage {
    /// Concatenated sector payloads
    pub data: Vec<u8>,
    /// Tracks whose payload made it into `data`
    pub tracks_written: usize,
    /// Non-zero pointer table slots
    pub tracks_in_use: usize,
    /// Problems found along the way
    pub warnings: Vec<Warning>,
}

impl FlatImage {
    /// Check that every in-use track was written
    pub fn is_complete(&self) -> bool {
        self.tracks_written == self.tracks_in_use
    }
}

/// Flatten the tracks listed in `table`
pub fn flatten(data: &[u8], table: &TrackTable) -> FlatImage {
    let mut warnings = Vec::new();
    let mut out = Vec::new();
    let mut tracks_written = 0;

    for slot in usable_tracks(table, data.len(), &mut warnings) {
        match read_track(data, slot.index, slot.origin) {
            Ok(track) => {
                if let Err(e) = track.check_alignment(slot.next_origin) {
                    log::warn!("Track {}: {}", slot.index, e);
                    warnings.push(Warning::track(slot.index, e));
                }
                track.write_payload(&mut out);
                tracks_written += 1;
            }
            Err(e) => {
                log::warn!("Skipping track {} @ {:#X}: {}", slot.index, slot.origin, e);
                warnings.push(Warning::track(slot.index, e));
            }
        }
    }

    log::debug!(
        "Flattened {} of {} tracks into {} bytes",
        tracks_written,
        table.in_use_count(),
        out.len()
    );

    FlatImage {
        data: out,
        tracks_written,
        tracks_in_use: table.in_use_count(),
        warnings,
    }
}

/// Decode the header of `data` and flatten the whole image
pub fn flatten_image(data: &[u8]) -> Result<FlatImage> {
    let header = decode_header(data)?;
    let mut flat = flatten(data, &header.tracks);

    if let Err(e) = check_declared_size(header.disk_size, data.len()) {
        log::warn!("{}", e);
        flat.warnings.insert(0, Warning::image(e));
    }

    Ok(flat)
}
