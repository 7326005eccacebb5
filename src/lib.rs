/*!
# d88manager

A Rust library for reading, checking and editing D88 floppy disk images.

D88 is the container used by emulators of Japanese home computers such as
the NEC PC-88, PC-98 and PC-6001 and the Sharp X1. An image is a fixed
header with a title, media type and a table of 164 track offsets, followed
by tracks of sectors, each with its own 16-byte header.

## Features

- Decode and encode the disk header and sector headers
- Walk tracks defensively, skipping damaged tracks with a warning
- Flatten an image into a raw sector dump
- Change the media type or title in place
- Extract the boot sector and guess the platform it was made for
- Idiomatic Rust API with comprehensive error handling

## Quick Start

```rust,no_run
use d88manager::{D88Image, MediaType};

// Open an existing D88 file
let mut image = D88Image::open("disk.d88")?;

// Show what is on it
println!("{}", image.info()?);

// Read a sector
let (tracks, warnings) = image.tracks();
if let Some(sector) = tracks.first().and_then(|t| t.get_sector(1)) {
    println!("{} bytes", sector.data().len());
}
for warning in &warnings {
    eprintln!("{}", warning);
}

// Which machine is it for?
let boot = image.boot_sector()?;
println!("{}", boot.fingerprint.reason);

// Edit and save
image.set_media_type(MediaType::TwoHD)?;
image.rename("MY DISK")?;
image.save("disk.d88")?;

// Write a raw sector dump
let flat = image.save_flat("disk.img")?;
println!("{} of {} tracks written", flat.tracks_written, flat.tracks_in_use);
# Ok::<(), d88manager::D88Error>(())
```

## Error Handling

Problems that make the input unreadable, or arguments that cannot be
honoured, are returned as errors. Problems confined to one track are
collected as [`Warning`]s, logged through the `log` facade, and the track
is skipped.

## Modules

- `format`: D88 constants, media types and density codes
- `image`: Core image data structures (D88Image, Track, Sector)
- `validate`: Track pointer checks
- `flatten`: Raw sector dump conversion
- `edit`: In-place header edits
- `boot`: Boot sector extraction and platform detection
- `info`: Structured image report
- `fdc`: FDC status codes
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// Boot sector extraction and platform detection
pub mod boot;
/// In-place header edits
pub mod edit;
/// Error types and Result alias
pub mod error;
/// FDC (Floppy Disk Controller) status codes
pub mod fdc;
/// Raw sector dump conversion
pub mod flatten;
/// D88 format constants and coded fields
pub mod format;
/// Core image data structures (D88Image, Track, Sector)
pub mod image;
/// Structured image report
pub mod info;
/// I/O operations for reading and writing D88 files
pub mod io;
/// Sector map visualization
pub mod map;
/// Track pointer validation
pub mod validate;

// Re-export common types
pub use boot::{
    analyze_boot_sector, extract_boot_sector, fingerprint, BootFingerprint, BootSector,
    PlatformGuess,
};
pub use edit::{rename_title, rename_title_with, set_media_type, TitleFill};
pub use error::{D88Error, ErrorClass, Result, Warning};
pub use fdc::FdcStatus;
pub use flatten::{flatten, flatten_image, FlatImage};
pub use format::{density_to_label, sector_size_to_bytes, Density, MediaType};
pub use image::{
    decode_header, decode_sector_header, encode_header, encode_sector_header, encode_title,
    read_track, walk_track, D88Image, DiskHeader, Sector, SectorContent, SectorHeader, SectorId,
    Track, TrackTable, TrackWalker,
};
pub use info::{get_info, DiskInfo, TrackSummary};
pub use io::{read_d88, read_d88_from, write_d88, write_raw};
pub use validate::{check_declared_size, filter_in_use_tracks, in_use_entries, validate_offset};
