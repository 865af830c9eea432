//! Detector identifiers and subdetector classification.

use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Subdetector technology of a tracker module.
///
/// The numeric codes follow the tracker convention: pixels occupy codes 1
/// and 2, strips codes 3 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
#[repr(u32)]
pub enum SubDetector {
    /// Barrel pixel layers (code 1).
    PixelBarrel = 1,
    /// Forward pixel disks (code 2).
    PixelEndcap = 2,
    /// Tracker inner barrel (code 3).
    Tib = 3,
    /// Tracker inner disks (code 4).
    Tid = 4,
    /// Tracker outer barrel (code 5).
    Tob = 5,
    /// Tracker endcaps (code 6).
    Tec = 6,
}

impl SubDetector {
    /// Creates a subdetector from its numeric code.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSubdetector`] for codes outside 1..=6.
    pub fn from_code(code: u32) -> Result<Self, Error> {
        match code {
            1 => Ok(SubDetector::PixelBarrel),
            2 => Ok(SubDetector::PixelEndcap),
            3 => Ok(SubDetector::Tib),
            4 => Ok(SubDetector::Tid),
            5 => Ok(SubDetector::Tob),
            6 => Ok(SubDetector::Tec),
            _ => Err(Error::InvalidSubdetector(code)),
        }
    }

    /// Returns the numeric subdetector code.
    #[inline]
    #[must_use]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// True for strip technologies (every code above the pixel range).
    #[inline]
    #[must_use]
    pub fn is_strip(self) -> bool {
        matches!(
            self,
            SubDetector::Tib | SubDetector::Tid | SubDetector::Tob | SubDetector::Tec
        )
    }

    /// True for pixel technologies.
    #[inline]
    #[must_use]
    pub fn is_pixel(self) -> bool {
        !self.is_strip()
    }
}

impl TryFrom<u32> for SubDetector {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self, Error> {
        SubDetector::from_code(code)
    }
}

impl From<SubDetector> for u32 {
    fn from(subdet: SubDetector) -> u32 {
        subdet.code()
    }
}

/// Identifier of a single detector module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetId {
    /// Subdetector the module belongs to.
    pub subdet: SubDetector,
    /// Opaque module number within the subdetector.
    pub id: u32,
}

impl DetId {
    /// Creates a new detector identifier.
    #[inline]
    #[must_use]
    pub fn new(subdet: SubDetector, id: u32) -> Self {
        Self { subdet, id }
    }

    /// True when the module uses strip technology.
    #[inline]
    #[must_use]
    pub fn is_strip(&self) -> bool {
        self.subdet.is_strip()
    }

    /// True when the module uses pixel technology.
    #[inline]
    #[must_use]
    pub fn is_pixel(&self) -> bool {
        self.subdet.is_pixel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdetector_codes() {
        assert_eq!(SubDetector::PixelBarrel.code(), 1);
        assert_eq!(SubDetector::Tec.code(), 6);
        assert!(matches!(SubDetector::from_code(3), Ok(SubDetector::Tib)));
        assert!(SubDetector::from_code(0).is_err());
        assert!(SubDetector::from_code(7).is_err());
    }

    #[test]
    fn test_strip_is_every_code_above_two() {
        for code in 1..=6 {
            let subdet = SubDetector::from_code(code).unwrap();
            assert_eq!(subdet.is_strip(), code > 2);
            assert_eq!(subdet.is_pixel(), code <= 2);
        }
    }

    #[test]
    fn test_det_id_classification() {
        let pixel = DetId::new(SubDetector::PixelEndcap, 1234);
        let strip = DetId::new(SubDetector::Tob, 98);
        assert!(pixel.is_pixel());
        assert!(!pixel.is_strip());
        assert!(strip.is_strip());
    }
}
