use serde::Deserialize;

use crate::{Error, Result};

/// Bit width of the receive and transmit registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u32")]
pub struct Width(u32);

impl Width {
    pub const BYTE: Width = Width(8);

    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > 64 {
            return Err(Error::InvalidWidth(bits));
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn mask(self) -> u64 {
        if self.0 == 64 {
            u64::MAX
        } else {
            (1u64 << self.0) - 1
        }
    }

    pub fn truncate(self, value: u64) -> u64 {
        value & self.mask()
    }

    /// Most significant bit of `value` at this width.
    pub fn top_bit(self, value: u64) -> bool {
        (value >> (self.0 - 1)) & 1 == 1
    }
}

impl Default for Width {
    fn default() -> Self {
        Self::BYTE
    }
}

impl TryFrom<u32> for Width {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        Self::new(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(Width::new(0), Err(Error::InvalidWidth(0))));
        assert!(matches!(Width::new(65), Err(Error::InvalidWidth(65))));
    }

    #[test]
    fn mask_and_top_bit() {
        let w = Width::new(4).unwrap();
        assert_eq!(w.mask(), 0xF);
        assert_eq!(w.truncate(0x1F), 0xF);
        assert!(w.top_bit(0x8));
        assert!(!w.top_bit(0x7));

        let full = Width::new(64).unwrap();
        assert_eq!(full.mask(), u64::MAX);
        assert!(full.top_bit(1 << 63));
    }
}
