/// Sector status codes
///
/// D88 stores the result the PC-98 disk BIOS returned when the sector was
/// dumped. The values mirror the uPD765 result phase collapsed to one byte.

use std::fmt;

/// Status byte from a sector header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdcStatus(pub u8);

impl FdcStatus {
    /// Normal end
    pub const NORMAL: u8 = 0x00;

    /// Normal end, deleted data address mark
    pub const DELETED_DATA: u8 = 0x10;

    /// CRC error in the ID field
    pub const ID_CRC_ERROR: u8 = 0xA0;

    /// CRC error in the data field
    pub const DATA_CRC_ERROR: u8 = 0xB0;

    /// No ID address mark found
    pub const NO_ADDRESS_MARK: u8 = 0xE0;

    /// No data address mark found
    pub const NO_DATA_MARK: u8 = 0xF0;

    /// Create a new FdcStatus from a raw byte
    #[inline]
    pub fn new(value: u8) -> Self {
        FdcStatus(value)
    }

    /// Check if the sector read back cleanly
    #[inline]
    pub fn is_normal(&self) -> bool {
        self.0 == Self::NORMAL
    }

    /// Check if the sector carries a deleted data mark
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.0 == Self::DELETED_DATA
    }

    /// Check for an ID field CRC error
    #[inline]
    pub fn id_crc_error(&self) -> bool {
        self.0 == Self::ID_CRC_ERROR
    }

    /// Check for a data field CRC error
    #[inline]
    pub fn data_crc_error(&self) -> bool {
        self.0 == Self::DATA_CRC_ERROR
    }

    /// Check for a missing ID address mark
    #[inline]
    pub fn no_address_mark(&self) -> bool {
        self.0 == Self::NO_ADDRESS_MARK
    }

    /// Check for a missing data address mark
    #[inline]
    pub fn no_data_mark(&self) -> bool {
        self.0 == Self::NO_DATA_MARK
    }

    /// Check if any error is reported (deleted data is not an error)
    #[inline]
    pub fn has_error(&self) -> bool {
        !self.is_normal() && !self.is_deleted()
    }
}

impl fmt::Display for FdcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Self::NORMAL => write!(f, "OK"),
            Self::DELETED_DATA => write!(f, "DDAM"),
            Self::ID_CRC_ERROR => write!(f, "ID CRC"),
            Self::DATA_CRC_ERROR => write!(f, "Data CRC"),
            Self::NO_ADDRESS_MARK => write!(f, "No AM"),
            Self::NO_DATA_MARK => write!(f, "No DAM"),
            other => write!(f, "{:02X}h", other),
        }
    }
}
