//! S-box exponents.
//!
//! The round S-box is either a power map `x -> x^alpha` with `alpha > 0` or the
//! inverse map `x -> x^-1`. The two kinds are analysed with different attack
//! cost models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoundNumberError};

/// Raw exponent used to denote the inverse S-box.
pub const INVERSE_EXPONENT: i64 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum SBox {
    /// `x -> x^alpha` for a positive `alpha`.
    Power(u64),
    /// `x -> x^-1`.
    Inverse,
}

impl SBox {
    /// Builds an S-box from a raw exponent, rejecting everything that is
    /// neither positive nor exactly `-1`.
    pub fn from_exponent(alpha: i64) -> Result<Self> {
        match alpha {
            INVERSE_EXPONENT => Ok(SBox::Inverse),
            a if a > 0 => Ok(SBox::Power(a as u64)),
            a => Err(RoundNumberError::InvalidSBoxExponent(a)),
        }
    }

    pub fn exponent(self) -> i64 {
        match self {
            SBox::Power(alpha) => alpha as i64,
            SBox::Inverse => INVERSE_EXPONENT,
        }
    }

    pub fn is_inverse(self) -> bool {
        matches!(self, SBox::Inverse)
    }
}

impl TryFrom<i64> for SBox {
    type Error = RoundNumberError;

    fn try_from(alpha: i64) -> Result<Self> {
        SBox::from_exponent(alpha)
    }
}

impl From<SBox> for i64 {
    fn from(sbox: SBox) -> i64 {
        sbox.exponent()
    }
}

impl fmt::Display for SBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x^{}", self.exponent())
    }
}
