/// In-place header edits
///
/// Both edits patch fixed byte ranges of the header and never resize the
/// buffer. Arguments are checked before anything is written, so a failed
/// edit leaves the buffer untouched.

use crate::error::{D88Error, Result};
use crate::format::constants::*;
use crate::format::MediaType;
use crate::image::header::encode_title;

/// How many bytes a rename zero-fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleFill {
    /// Only the 17-byte title field
    #[default]
    Field,
    /// An 18-byte window, which also clears the first reserved byte.
    /// Older tools wrote titles this way; use it to reproduce their output
    /// byte for byte.
    Legacy,
}

impl TitleFill {
    /// Number of bytes written from offset 0
    pub fn window(&self) -> usize {
        match self {
            TitleFill::Field => TITLE_LENGTH,
            TitleFill::Legacy => LEGACY_TITLE_WINDOW,
        }
    }
}

fn check_header_length(data: &[u8]) -> Result<()> {
    if data.len() < HEADER_SIZE {
        return Err(D88Error::TruncatedHeader {
            length: data.len(),
            needed: HEADER_SIZE,
        });
    }
    Ok(())
}

/// Overwrite the media type byte at 0x1B
pub fn set_media_type(data: &mut [u8], media_type: MediaType) -> Result<()> {
    check_header_length(data)?;
    data[MEDIA_TYPE_OFFSET] = media_type.into();
    Ok(())
}

/// Overwrite the title, zero-filling the rest of the 17-byte field
pub fn rename_title(data: &mut [u8], title: &str) -> Result<()> {
    rename_title_with(data, title, TitleFill::Field)
}

/// Overwrite the title using the given fill window
pub fn rename_title_with(data: &mut [u8], title: &str, fill: TitleFill) -> Result<()> {
    check_header_length(data)?;

    let length = title.chars().count();
    if length == 0 {
        return Err(D88Error::EmptyTitle);
    }
    if length > TITLE_LENGTH {
        return Err(D88Error::InvalidTitleLength(length));
    }
    if let Some(position) = title.chars().position(|c| c == '\0') {
        return Err(D88Error::TitleContainsNul(position));
    }
    // Multi-byte characters can still overflow the field
    let field = encode_title(title.as_bytes())?;

    let window = &mut data[TITLE_OFFSET..TITLE_OFFSET + fill.window()];
    window.fill(0);
    window[..TITLE_LENGTH].copy_from_slice(&field);
    Ok(())
}
