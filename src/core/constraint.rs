use crate::error::{GrindError, Result};
use std::fmt;

pub const FULL_MASK_BITS: u32 = 32;

/// Which of the top 32 bits of X must equal the target.
///
/// Full-32-bit grinding is simply `mask == u32::MAX`; top-N grinding keeps
/// the N most significant bits and leaves the rest as wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetConstraint {
    value: u32,
    mask: u32,
}

impl TargetConstraint {
    pub fn full(value: u32) -> TargetConstraint {
        TargetConstraint {
            value,
            mask: u32::MAX,
        }
    }

    /// Constrain only the top `bits` bits. Target bits below the mask are cleared.
    pub fn top_bits(value: u32, bits: u32) -> Result<TargetConstraint> {
        let mask = top_mask(bits)?;
        Ok(TargetConstraint {
            value: value & mask,
            mask,
        })
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn mask_bits(&self) -> u32 {
        self.mask.count_ones()
    }

    pub fn is_full(&self) -> bool {
        self.mask == u32::MAX
    }

    pub fn matches(&self, x_prefix: u32) -> bool {
        (x_prefix & self.mask) == self.value
    }

    /// Mean attempts a uniform sampler needs, 2^mask_bits
    pub fn expected_attempts(&self) -> f64 {
        2f64.powi(self.mask_bits() as i32)
    }
}

impl fmt::Display for TargetConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}/{:08x}", self.value, self.mask)
    }
}

/// Mask with the top `bits` bits set, for 1 <= bits <= 32
pub fn top_mask(bits: u32) -> Result<u32> {
    if bits == 0 || bits > FULL_MASK_BITS {
        return Err(GrindError::InvalidInput(format!(
            "mask width must be between 1 and 32 bits, got {bits}"
        )));
    }
    Ok(((0xFFFF_FFFFu64 << (FULL_MASK_BITS - bits)) & 0xFFFF_FFFF) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_mask_values() {
        assert_eq!(top_mask(1).unwrap(), 0x8000_0000);
        assert_eq!(top_mask(24).unwrap(), 0xFFFF_FF00);
        assert_eq!(top_mask(32).unwrap(), 0xFFFF_FFFF);
        assert!(top_mask(0).is_err());
        assert!(top_mask(33).is_err());
    }

    #[test]
    fn test_full_constraint_needs_every_bit() {
        let constraint = TargetConstraint::full(0xDEADBEEF);
        assert!(constraint.is_full());
        assert!(constraint.matches(0xDEADBEEF));
        assert!(!constraint.matches(0xDEADBEEE));
    }

    #[test]
    fn test_top_bits_ignores_low_bits() {
        let constraint = TargetConstraint::top_bits(0xABCDEF99, 24).unwrap();
        assert_eq!(constraint.value(), 0xABCDEF00);
        assert!(constraint.matches(0xABCDEF00));
        assert!(constraint.matches(0xABCDEF7F));
        assert!(!constraint.matches(0xABCDEE00));
    }

    #[test]
    fn test_top_32_equals_full() {
        assert_eq!(
            TargetConstraint::top_bits(0x01020304, 32).unwrap(),
            TargetConstraint::full(0x01020304)
        );
    }

    #[test]
    fn test_expected_attempts() {
        let constraint = TargetConstraint::top_bits(0, 8).unwrap();
        assert_eq!(constraint.mask_bits(), 8);
        assert_eq!(constraint.expected_attempts(), 256.0);
    }
}
