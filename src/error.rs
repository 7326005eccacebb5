use std::fmt;
use thiserror::Error;

/// Result type alias for D88 operations
pub type Result<T> = std::result::Result<T, D88Error>;

/// Errors that can occur when working with D88 images
#[derive(Debug, Error)]
pub enum D88Error {
    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Buffer is too short to hold the header and track pointer table
    #[error("Truncated header: {length} bytes available, {needed} required")]
    TruncatedHeader {
        /// Length of the buffer
        length: usize,
        /// Bytes required for the header and pointer table
        needed: usize,
    },

    /// Fewer than 16 bytes remain for a sector header
    #[error("Truncated sector header at offset {offset:#X}")]
    TruncatedSectorHeader {
        /// Offset of the sector header
        offset: usize,
    },

    /// A sector payload runs past the end of the buffer
    #[error("Truncated sector data at offset {offset:#X} ({needed} bytes needed)")]
    TruncatedSectorData {
        /// Offset of the sector payload
        offset: usize,
        /// Payload length implied by the size code
        needed: usize,
    },

    /// Sector size code outside 0..=3
    #[error("Unknown sector size code: {0}")]
    UnknownSectorSizeCode(u8),

    /// Density code other than 0 (double) or 1 (high)
    #[error("Unknown density code: {0:#04X}")]
    UnknownDensityCode(u8),

    /// Media type byte is not one of the known disk types
    #[error("Unknown media type: {0:#04X}")]
    UnknownMediaType(u8),

    /// Declared size in the header disagrees with the buffer length
    #[error("Size mismatch: header declares {declared} bytes, image is {actual} bytes")]
    SizeMismatch {
        /// Size stored in the header
        declared: u32,
        /// Actual buffer length
        actual: usize,
    },

    /// Track pointer lies outside the buffer
    #[error("Track offset {offset:#X} is out of bounds (image is {length} bytes)")]
    OutOfBounds {
        /// Offset from the pointer table
        offset: u32,
        /// Buffer length
        length: usize,
    },

    /// A track did not end where the next track begins
    #[error("Track ends at {actual:#X} but next track starts at {expected:#X}")]
    TrackAlignment {
        /// Origin of the next in-use track
        expected: usize,
        /// Cursor after the last sector
        actual: usize,
    },

    /// Encoded title exceeds the 17-byte field
    #[error("Title too long: {0} bytes (max 17)")]
    TitleTooLong(usize),

    /// Rename was given an empty title
    #[error("Title is empty")]
    EmptyTitle,

    /// Rename title length outside 1..=17 characters
    #[error("Invalid title length: {0} characters (must be 1-17)")]
    InvalidTitleLength(usize),

    /// Rename title contains a zero byte, which would end it early
    #[error("Title contains a NUL character at position {0}")]
    TitleContainsNul(usize),

    /// No in-use, in-bounds track exists
    #[error("No usable track in image")]
    NoUsableTrack,

    /// Boot sector label is not valid text
    #[error("Boot sector label is not valid text")]
    LabelDecodeError,
}

/// Broad class of an error, deciding whether processing stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Buffer too short for the disk header
    Structural,
    /// A coded field holds an unrecognised value
    Semantic,
    /// Cross-field disagreement, including a track that runs past the end
    /// of the buffer; processing continues
    Consistency,
    /// Caller supplied an unacceptable argument
    InputConstraint,
    /// Boot sector analysis found no track or no readable label
    Analysis,
    /// Host I/O failure
    Io,
}

impl D88Error {
    /// Classify this error
    pub fn class(&self) -> ErrorClass {
        match self {
            D88Error::Io(_) => ErrorClass::Io,
            D88Error::TruncatedHeader { .. } => ErrorClass::Structural,
            D88Error::UnknownSectorSizeCode(_)
            | D88Error::UnknownDensityCode(_)
            | D88Error::UnknownMediaType(_) => ErrorClass::Semantic,
            D88Error::SizeMismatch { .. }
            | D88Error::OutOfBounds { .. }
            | D88Error::TrackAlignment { .. }
            | D88Error::TruncatedSectorHeader { .. }
            | D88Error::TruncatedSectorData { .. } => ErrorClass::Consistency,
            D88Error::TitleTooLong(_)
            | D88Error::EmptyTitle
            | D88Error::InvalidTitleLength(_)
            | D88Error::TitleContainsNul(_) => ErrorClass::InputConstraint,
            D88Error::NoUsableTrack | D88Error::LabelDecodeError => ErrorClass::Analysis,
        }
    }

    /// Whether this error stops processing of the whole image
    ///
    /// Non-fatal errors that belong to one track are collected as
    /// [`Warning`]s and the track is skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::Structural | ErrorClass::InputConstraint | ErrorClass::Io
        )
    }
}

/// A non-fatal problem collected alongside a best-effort result
#[derive(Debug)]
pub struct Warning {
    /// Pointer table slot the problem belongs to, if any
    pub track: Option<usize>,
    /// What went wrong
    pub error: D88Error,
}

impl Warning {
    /// Warning about the image as a whole
    pub fn image(error: D88Error) -> Self {
        Warning { track: None, error }
    }

    /// Warning about one track pointer slot
    pub fn track(index: usize, error: D88Error) -> Self {
        Warning {
            track: Some(index),
            error,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.track {
            Some(index) => write!(f, "track {}: {}", index, self.error),
            None => write!(f, "{}", self.error),
        }
    }
}
