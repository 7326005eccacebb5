/// Sector map visualization

use crate::image::{D88Image, Sector, SectorContent, Track};
use std::fmt::Write;

/// ANSI color codes for sector map
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BRIGHT_WHITE: &str = "\x1b[97m";
    pub const DARK_WHITE: &str = "\x1b[37m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const DARK_RED: &str = "\x1b[2;31m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const DARK_YELLOW: &str = "\x1b[2;33m";
}

const BLOCK_NO_DATA: &str = "\u{2591}"; // ░ - Light shade (filler)
const BLOCK_HAS_DATA: &str = "\u{2593}"; // ▓ - Dark shade (in-use)

fn sector_cell(sector: &Sector<'_>) -> String {
    let in_use = sector.content() == SectorContent::Data;
    let block = if in_use { BLOCK_HAS_DATA } else { BLOCK_NO_DATA };

    let color = if sector.has_error() {
        if in_use {
            colors::BRIGHT_RED
        } else {
            colors::DARK_RED
        }
    } else if sector.is_deleted() {
        if in_use {
            colors::BRIGHT_YELLOW
        } else {
            colors::DARK_YELLOW
        }
    } else if in_use {
        colors::BRIGHT_WHITE
    } else {
        colors::DARK_WHITE
    };

    format!("{}{}{}", color, block, colors::RESET)
}

/// Render a sector map with one column per pointer table slot
///
/// Rows are physical sector positions, bottom to top. Slots that are unused
/// or failed to decode are left blank.
pub fn render_sector_map(image: &D88Image) -> String {
    let (tracks, _) = image.tracks();
    render_tracks(&tracks)
}

fn render_tracks(tracks: &[Track<'_>]) -> String {
    let mut out = String::new();

    let max_sectors = tracks.iter().map(|t| t.sector_count()).max().unwrap_or(0);
    if max_sectors == 0 {
        out.push_str("No sectors found.\n");
        return out;
    }

    let num_columns = tracks.iter().map(|t| t.index + 1).max().unwrap_or(0);
    let mut columns: Vec<Option<&Track<'_>>> = vec![None; num_columns];
    for track in tracks {
        columns[track.index] = Some(track);
    }

    let _ = writeln!(out, "=== Sector Map ===");
    let _ = writeln!(
        out,
        "Legend: {}In Use{} {}Filler{} {}Error{} {}Deleted{}",
        colors::BRIGHT_WHITE,
        colors::RESET,
        colors::DARK_WHITE,
        colors::RESET,
        colors::BRIGHT_RED,
        colors::RESET,
        colors::BRIGHT_YELLOW,
        colors::RESET
    );
    out.push('\n');

    for sector_pos in (0..max_sectors).rev() {
        let _ = write!(out, "{:>2} ", sector_pos);
        for column in &columns {
            match column.and_then(|t| t.get_sector_by_index(sector_pos)) {
                Some(sector) => out.push_str(&sector_cell(sector)),
                None => out.push(' '),
            }
        }
        out.push('\n');
    }

    // Track number axis, a label every 5 columns
    out.push_str("   ");
    let mut col = 0;
    while col < num_columns {
        if col % 5 == 0 {
            let label = col.to_string();
            let width = label.len().min(num_columns - col);
            out.push_str(&label[..width]);
            col += width;
        } else {
            out.push(' ');
            col += 1;
        }
    }
    out.push('\n');

    out
}

/// Print the sector map to stdout
pub fn draw_sector_map(image: &D88Image) {
    print!("{}", render_sector_map(image));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::testutil::{ImageSpec, SectorSpec, TrackSpec};

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_map_layout() {
        let image = D88Image::from_bytes(
            ImageSpec::new()
                .track(TrackSpec::new(0, 0, 2, 0).fill_with_record())
                .track(TrackSpec::new(0, 1, 1, 0))
                .build(),
        )
        .unwrap();
        let plain = strip_ansi(&render_sector_map(&image));
        let lines: Vec<&str> = plain.lines().collect();

        assert_eq!(lines[0], "=== Sector Map ===");
        // Row 1 only exists on the first track
        assert_eq!(lines[3], " 1 \u{2591} ");
        assert_eq!(lines[4], " 0 \u{2591}\u{2591}");
        assert_eq!(lines[5], "   0 ");
    }

    #[test]
    fn test_map_marks_data_and_errors() {
        let mut payload = vec![0u8; 128];
        payload[7] = 1;
        let image = D88Image::from_bytes(
            ImageSpec::new()
                .track(
                    TrackSpec::new(0, 0, 2, 0)
                        .with_sector(0, SectorSpec::data(&payload))
                        .with_sector(1, SectorSpec::default().status(0xB0)),
                )
                .build(),
        )
        .unwrap();
        let map = render_sector_map(&image);

        assert!(map.contains(&format!("{}{}", colors::BRIGHT_WHITE, BLOCK_HAS_DATA)));
        assert!(map.contains(&format!("{}{}", colors::DARK_RED, BLOCK_NO_DATA)));
    }

    #[test]
    fn test_map_leaves_gaps_for_bad_slots() {
        let image = D88Image::from_bytes(
            ImageSpec::new()
                .track(TrackSpec::new(0, 0, 1, 0))
                .pointer(1, 0xFFFF_FFF0)
                .track(TrackSpec::new(1, 0, 1, 0))
                .build(),
        )
        .unwrap();
        let plain = strip_ansi(&render_sector_map(&image));
        assert!(plain.contains(" 0 \u{2591} \u{2591}"));
    }

    #[test]
    fn test_map_empty_image() {
        let image = D88Image::from_bytes(ImageSpec::new().build()).unwrap();
        assert_eq!(render_sector_map(&image), "No sectors found.\n");
    }
}
