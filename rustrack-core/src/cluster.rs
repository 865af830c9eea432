//! Strip cluster types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A group of adjacent strip signals attributed to one particle crossing.
///
/// Amplitudes are raw ADC counts per strip; a value of 255 marks a
/// saturated strip and contributes its face value to the total charge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StripCluster {
    /// Index of the first strip in the cluster.
    pub first_strip: u16,
    /// ADC amplitudes of the consecutive strips.
    pub amplitudes: Vec<u8>,
}

impl StripCluster {
    /// Creates a new cluster.
    #[must_use]
    pub fn new(first_strip: u16, amplitudes: Vec<u8>) -> Self {
        Self {
            first_strip,
            amplitudes,
        }
    }

    /// Total deposited charge in ADC counts.
    #[inline]
    #[must_use]
    pub fn charge(&self) -> f32 {
        self.amplitudes.iter().map(|&a| f32::from(a)).sum()
    }

    /// Number of strips in the cluster.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.amplitudes.len()
    }
}
