/// Track pointer and size validation
///
/// Problems found here never abort processing. Out-of-range pointers are
/// reported and the track is skipped, a size mismatch is reported and the
/// real buffer length is used from then on.

use crate::error::{D88Error, Result, Warning};
use crate::image::TrackTable;

/// A track pointer that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSlot {
    /// Pointer table slot
    pub index: usize,
    /// Byte offset of the track
    pub origin: usize,
    /// Origin of the next usable track further into the file, if any
    pub next_origin: Option<usize>,
}

/// Non-zero track offsets in table order
pub fn filter_in_use_tracks(table: &TrackTable) -> Vec<u32> {
    table
        .entries()
        .iter()
        .copied()
        .filter(|&offset| offset != 0)
        .collect()
}

/// Non-zero track offsets with their slot numbers, in table order
pub fn in_use_entries(table: &TrackTable) -> Vec<(usize, u32)> {
    table
        .entries()
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, offset)| offset != 0)
        .collect()
}

/// Check that a track offset lies inside the buffer
pub fn validate_offset(offset: u32, length: usize) -> Result<()> {
    if offset as usize >= length {
        return Err(D88Error::OutOfBounds { offset, length });
    }
    Ok(())
}

/// Check the header's declared size against the real buffer length
pub fn check_declared_size(declared: u32, actual: usize) -> Result<()> {
    if declared as usize != actual {
        return Err(D88Error::SizeMismatch { declared, actual });
    }
    Ok(())
}

/// In-use, in-bounds tracks in table order
///
/// Each out-of-bounds pointer adds a warning and is left out.
pub fn usable_tracks(table: &TrackTable, length: usize, warnings: &mut Vec<Warning>) -> Vec<TrackSlot> {
    let mut slots = Vec::new();

    for (index, offset) in in_use_entries(table) {
        if let Err(e) = validate_offset(offset, length) {
            log::warn!("Skipping track {}: {}", index, e);
            warnings.push(Warning::track(index, e));
            continue;
        }
        slots.push(TrackSlot {
            index,
            origin: offset as usize,
            next_origin: None,
        });
    }

    for i in 0..slots.len() {
        let origin = slots[i].origin;
        slots[i].next_origin = slots[i + 1..]
            .iter()
            .map(|slot| slot.origin)
            .find(|&next| next > origin);
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(usize, u32)]) -> TrackTable {
        let mut table = TrackTable::empty();
        for &(index, offset) in entries {
            table.set(index, offset);
        }
        table
    }

    #[test]
    fn test_filter_in_use_preserves_order() {
        let table = table(&[(0, 0x300), (2, 0x200), (5, 0x400)]);
        assert_eq!(filter_in_use_tracks(&table), vec![0x300, 0x200, 0x400]);
        assert_eq!(
            in_use_entries(&table),
            vec![(0, 0x300), (2, 0x200), (5, 0x400)]
        );
    }

    #[test]
    fn test_filter_empty_table() {
        assert!(filter_in_use_tracks(&TrackTable::empty()).is_empty());
    }

    #[test]
    fn test_validate_offset() {
        assert!(validate_offset(0x2B0, 0x1000).is_ok());
        assert!(validate_offset(0xFFF, 0x1000).is_ok());
        assert!(matches!(
            validate_offset(0x1000, 0x1000),
            Err(D88Error::OutOfBounds { offset: 0x1000, length: 0x1000 })
        ));
    }

    #[test]
    fn test_check_declared_size() {
        assert!(check_declared_size(4096, 4096).is_ok());
        assert!(matches!(
            check_declared_size(4096, 4000),
            Err(D88Error::SizeMismatch { declared: 4096, actual: 4000 })
        ));
    }

    #[test]
    fn test_usable_tracks_skips_out_of_bounds() {
        let table = table(&[(0, 0x300), (1, 0x9000), (2, 0x500)]);
        let mut warnings = Vec::new();
        let slots = usable_tracks(&table, 0x1000, &mut warnings);

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].index, 0);
        assert_eq!(slots[0].next_origin, Some(0x500));
        assert_eq!(slots[1].index, 2);
        assert_eq!(slots[1].next_origin, None);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].track, Some(1));
        assert!(matches!(warnings[0].error, D88Error::OutOfBounds { .. }));
    }

    #[test]
    fn test_next_origin_ignores_earlier_tracks() {
        let table = table(&[(0, 0x800), (1, 0x300), (2, 0x900)]);
        let mut warnings = Vec::new();
        let slots = usable_tracks(&table, 0x1000, &mut warnings);
        assert_eq!(slots[0].next_origin, Some(0x900));
        assert_eq!(slots[1].next_origin, Some(0x900));
        assert!(warnings.is_empty());
    }
}
