/// Boot sector extraction and platform detection
///
/// Examines the first sector of the first usable track to guess which
/// machine the disk was made for.

use crate::error::{D88Error, Result};
use crate::image::header::decode_header;
use crate::image::sector::SectorId;
use crate::image::track::walk_track;
use crate::image::TrackTable;
use crate::validate::{in_use_entries, validate_offset};
use std::fmt;

/// Boot signatures of the PC-6001 family
const PC6001_SIGNATURES: [&[u8]; 3] = [b"SYS", b"RXR", b"IPL"];

/// X1 boot sectors start with this flag byte
const X1_BOOT_FLAG: u8 = 0x01;

/// Marker the X1 IPL checks for
const X1_SYS_MARKER: &[u8] = b"Sys";

/// Offset of the X1 marker
const X1_SYS_OFFSET: usize = 0x0E;

/// Offset and length of the X1 boot label
const X1_LABEL_OFFSET: usize = 1;
const X1_LABEL_LENGTH: usize = 13;

/// Platform a boot sector appears to belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformGuess {
    /// NEC PC-6001 / PC-6601
    Pc6001,
    /// Sharp X1
    SharpX1,
}

impl fmt::Display for PlatformGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformGuess::Pc6001 => write!(f, "NEC PC-6001/6601"),
            PlatformGuess::SharpX1 => write!(f, "Sharp X1"),
        }
    }
}

/// Result of boot sector fingerprinting
#[derive(Debug, Default)]
pub struct BootFingerprint {
    /// Matching platforms, empty if nothing matched
    pub platforms: Vec<PlatformGuess>,
    /// Boot label, when the platform stores one
    pub label: Option<String>,
    /// Why the label could not be read
    pub label_error: Option<D88Error>,
    /// Reason for the detection
    pub reason: String,
}

impl BootFingerprint {
    /// Check whether any platform matched
    pub fn is_bootable(&self) -> bool {
        !self.platforms.is_empty()
    }

    fn add(&mut self, platform: PlatformGuess, reason: String) {
        if !self.platforms.contains(&platform) {
            self.platforms.push(platform);
        }
        if self.reason.is_empty() {
            self.reason = reason;
        } else {
            self.reason = format!("{}; {}", self.reason, reason);
        }
    }
}

/// Boot sector payload together with what was learned from it
#[derive(Debug)]
pub struct BootSector {
    /// Pointer table slot the sector came from
    pub track: usize,
    /// Sector ID of the boot sector
    pub id: SectorId,
    /// Sector payload
    pub data: Vec<u8>,
    /// Platform detection result
    pub fingerprint: BootFingerprint,
}

/// Locate the first sector of the first in-use, in-bounds track
///
/// Returns the slot, the sector ID and the payload.
fn first_sector<'a>(data: &'a [u8], table: &TrackTable) -> Result<(usize, SectorId, &'a [u8])> {
    let (index, origin) = in_use_entries(table)
        .into_iter()
        .find(|&(index, offset)| match validate_offset(offset, data.len()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Track {}: {}", index, e);
                false
            }
        })
        .ok_or(D88Error::NoUsableTrack)?;

    let mut walker = walk_track(data, origin as usize)?;
    match walker.next() {
        Some(sector) => {
            let sector = sector?;
            Ok((index, sector.id(), sector.data()))
        }
        None => Err(D88Error::NoUsableTrack),
    }
}

/// Payload of the first sector of the first usable track
pub fn extract_boot_sector<'a>(data: &'a [u8], table: &TrackTable) -> Result<&'a [u8]> {
    first_sector(data, table).map(|(_, _, payload)| payload)
}

/// Guess the platform from a boot sector payload
pub fn fingerprint(payload: &[u8]) -> BootFingerprint {
    let mut result = BootFingerprint::default();

    if let Some(signature) = PC6001_SIGNATURES.iter().find(|&&sig| payload.starts_with(sig)) {
        result.add(
            PlatformGuess::Pc6001,
            format!(
                "Boot sector starts with \"{}\"",
                String::from_utf8_lossy(signature)
            ),
        );
    }

    let has_sys_marker = payload.get(X1_SYS_OFFSET..X1_SYS_OFFSET + X1_SYS_MARKER.len())
        == Some(X1_SYS_MARKER);
    if payload.first() == Some(&X1_BOOT_FLAG) && has_sys_marker {
        result.add(
            PlatformGuess::SharpX1,
            format!(
                "Boot flag {:02X}h with \"Sys\" at {:02X}h",
                X1_BOOT_FLAG, X1_SYS_OFFSET
            ),
        );
        match decode_label(&payload[X1_LABEL_OFFSET..X1_LABEL_OFFSET + X1_LABEL_LENGTH]) {
            Ok(label) => result.label = Some(label),
            Err(e) => {
                log::warn!("Boot label: {}", e);
                result.label_error = Some(e);
            }
        }
    }

    if !result.is_bootable() {
        result.reason = "No known boot signature".to_string();
    }

    result
}

/// Decode a fixed-width label, trimming trailing padding
fn decode_label(raw: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(raw).map_err(|_| D88Error::LabelDecodeError)?;
    if text.chars().any(|c| c.is_control() && c != '\0') {
        return Err(D88Error::LabelDecodeError);
    }
    Ok(text.trim_end_matches(['\0', ' ']).to_string())
}

/// Extract and fingerprint the boot sector of a whole image
pub fn analyze_boot_sector(data: &[u8]) -> Result<BootSector> {
    let header = decode_header(data)?;
    let (track, id, payload) = first_sector(data, &header.tracks)?;
    let fingerprint = fingerprint(payload);

    log::debug!(
        "Boot sector from track {} ({}): {}",
        track,
        id,
        fingerprint.reason
    );

    Ok(BootSector {
        track,
        id,
        data: payload.to_vec(),
        fingerprint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::testutil::{ImageSpec, SectorSpec, TrackSpec};

    fn x1_boot(label: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; 256];
        data[0] = 0x01;
        data[1..1 + label.len()].copy_from_slice(label);
        data[0x0E..0x11].copy_from_slice(b"Sys");
        data
    }

    #[test]
    fn test_fingerprint_pc6001() {
        for sig in [&b"SYS"[..], &b"RXR"[..], &b"IPL"[..]] {
            let mut data = vec![0u8; 256];
            data[..3].copy_from_slice(sig);
            let result = fingerprint(&data);
            assert_eq!(result.platforms, vec![PlatformGuess::Pc6001]);
            assert!(result.label.is_none());
        }
    }

    #[test]
    fn test_fingerprint_x1_with_label() {
        let result = fingerprint(&x1_boot(b"GAME LOADER  "));
        assert_eq!(result.platforms, vec![PlatformGuess::SharpX1]);
        assert_eq!(result.label.as_deref(), Some("GAME LOADER"));
        assert!(result.label_error.is_none());
        assert!(result.reason.contains("Sys"));
    }

    #[test]
    fn test_fingerprint_x1_bad_label() {
        let result = fingerprint(&x1_boot(&[0xFF, 0xFE, 0x80]));
        assert_eq!(result.platforms, vec![PlatformGuess::SharpX1]);
        assert!(result.label.is_none());
        assert!(matches!(result.label_error, Some(D88Error::LabelDecodeError)));
    }

    #[test]
    fn test_fingerprint_x1_needs_marker() {
        let mut data = x1_boot(b"X");
        data[0x0E] = b's';
        assert!(!fingerprint(&data).is_bootable());
    }

    #[test]
    fn test_fingerprint_unknown() {
        let result = fingerprint(&[0xC3, 0x00, 0x01]);
        assert!(!result.is_bootable());
        assert_eq!(result.reason, "No known boot signature");
        assert!(!fingerprint(&[]).is_bootable());
    }

    #[test]
    fn test_extract_boot_sector() {
        let mut boot = vec![0u8; 256];
        boot[..3].copy_from_slice(b"IPL");
        let data = ImageSpec::new()
            .track(TrackSpec::new(0, 0, 16, 1).with_sector(0, SectorSpec::data(&boot)))
            .build();
        let header = decode_header(&data).unwrap();

        let payload = extract_boot_sector(&data, &header.tracks).unwrap();
        assert_eq!(payload, boot.as_slice());

        let analysis = analyze_boot_sector(&data).unwrap();
        assert_eq!(analysis.track, 0);
        assert_eq!(analysis.id.record, 1);
        assert_eq!(analysis.fingerprint.platforms, vec![PlatformGuess::Pc6001]);
    }

    #[test]
    fn test_extract_skips_out_of_bounds() {
        let data = ImageSpec::new()
            .pointer(0, 0xFFFF_FF00)
            .track(TrackSpec::new(0, 0, 1, 1).fill_with_record())
            .build();

        let analysis = analyze_boot_sector(&data).unwrap();
        assert_eq!(analysis.track, 1);
        assert_eq!(analysis.data[0], 1);
    }

    #[test]
    fn test_no_usable_track() {
        let data = ImageSpec::new().pointer(3, 0x100_0000).build();
        assert!(matches!(
            analyze_boot_sector(&data),
            Err(D88Error::NoUsableTrack)
        ));
    }

    #[test]
    fn test_bad_first_track_propagates() {
        let data = ImageSpec::new()
            .track(TrackSpec::new(0, 0, 1, 1).density(9))
            .track(TrackSpec::new(0, 1, 1, 1))
            .build();
        assert!(matches!(
            analyze_boot_sector(&data),
            Err(D88Error::UnknownDensityCode(9))
        ));
    }
}
