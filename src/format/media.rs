/// Media type and recording density codes

use crate::error::{D88Error, Result};
use std::fmt;

/// Disk media type stored at header offset 0x1B
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// 2D - double-sided, double density (320K)
    TwoD,
    /// 2DD - double-sided, double density, double track (640K)
    TwoDD,
    /// 2HD - double-sided, high density (1M)
    TwoHD,
    /// 1D - single-sided, double density
    OneD,
    /// 1DD - single-sided, double density, double track
    OneDD,
    /// Any other byte value
    Unknown(u8),
}

impl MediaType {
    /// All recognised media types
    pub const KNOWN: [MediaType; 5] = [
        MediaType::TwoD,
        MediaType::TwoDD,
        MediaType::TwoHD,
        MediaType::OneD,
        MediaType::OneDD,
    ];

    /// Check if this is a recognised media type
    pub fn is_known(&self) -> bool {
        !matches!(self, MediaType::Unknown(_))
    }

    /// 1D and 1DD are single-sided; everything else is double-sided
    pub fn is_single_sided(&self) -> bool {
        matches!(self, MediaType::OneD | MediaType::OneDD)
    }

    /// Number of sides implied by the media type
    pub fn sides(&self) -> u8 {
        if self.is_single_sided() {
            1
        } else {
            2
        }
    }

    /// Short name as printed on the disk label
    pub fn name(&self) -> &'static str {
        match self {
            MediaType::TwoD => "2D",
            MediaType::TwoDD => "2DD",
            MediaType::TwoHD => "2HD",
            MediaType::OneD => "1D",
            MediaType::OneDD => "1DD",
            MediaType::Unknown(_) => "Unknown",
        }
    }

    /// Parse a media type name ("2HD") or a raw byte ("0x20", "32")
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_ascii_uppercase();
        if let Some(known) = Self::KNOWN.iter().find(|m| m.name() == upper) {
            return Some(*known);
        }
        let value = if let Some(hex) = upper.strip_prefix("0X") {
            u8::from_str_radix(hex, 16).ok()?
        } else {
            upper.parse().ok()?
        };
        Some(MediaType::from(value))
    }
}

impl From<u8> for MediaType {
    fn from(value: u8) -> Self {
        match value {
            0x00 => MediaType::TwoD,
            0x10 => MediaType::TwoDD,
            0x20 => MediaType::TwoHD,
            0x30 => MediaType::OneD,
            0x40 => MediaType::OneDD,
            other => MediaType::Unknown(other),
        }
    }
}

impl From<MediaType> for u8 {
    fn from(media: MediaType) -> Self {
        match media {
            MediaType::TwoD => 0x00,
            MediaType::TwoDD => 0x10,
            MediaType::TwoHD => 0x20,
            MediaType::OneD => 0x30,
            MediaType::OneDD => 0x40,
            MediaType::Unknown(value) => value,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Unknown(value) => write!(f, "Unknown ({:#04X})", value),
            known => write!(f, "{}", known.name()),
        }
    }
}

/// Recording density stored in each sector header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    /// Double density (MFM)
    Double,
    /// High density
    High,
}

impl Density {
    /// Label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Density::Double => "double",
            Density::High => "high",
        }
    }
}

impl TryFrom<u8> for Density {
    type Error = D88Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Density::Double),
            1 => Ok(Density::High),
            other => Err(D88Error::UnknownDensityCode(other)),
        }
    }
}

impl From<Density> for u8 {
    fn from(density: Density) -> Self {
        match density {
            Density::Double => 0,
            Density::High => 1,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a density code to its label
pub fn density_to_label(code: u8) -> Result<&'static str> {
    Density::try_from(code).map(|d| d.label())
}
