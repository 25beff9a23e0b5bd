//! Prime field sizes and the logarithms the security bounds are expressed in.
//!
//! The bounds only depend on the modulus through `log2(p)` and
//! `n = ceil(log2(p))`. Both are computed once per field in `f64`, as
//! `ln(p) / ln(2)`. Moduli too wide for an `f64` are split into a mantissa in
//! `[0.5, 1)` and a binary exponent first, so round-number tables produced by
//! the usual float-based parameter scripts are reproduced exactly, including
//! the cases where `log2(p)` lands a hair above an integer.

use std::f64::consts::LN_2;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{Num, ToPrimitive};

use crate::error::{Result, RoundNumberError};

/// Fields whose Poseidon instances are commonly parameterised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldPreset {
    /// Scalar field of BN254 (alt_bn128).
    Bn254,
    /// Scalar field of BLS12-381.
    Bls12_381,
    /// `2^64 - 2^32 + 1`.
    Goldilocks,
    /// `15 * 2^27 + 1`.
    BabyBear,
    /// `2^31 - 1`.
    Mersenne31,
}

impl FieldPreset {
    pub const ALL: [FieldPreset; 5] = [
        FieldPreset::Bn254,
        FieldPreset::Bls12_381,
        FieldPreset::Goldilocks,
        FieldPreset::BabyBear,
        FieldPreset::Mersenne31,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldPreset::Bn254 => "bn254",
            FieldPreset::Bls12_381 => "bls12_381",
            FieldPreset::Goldilocks => "goldilocks",
            FieldPreset::BabyBear => "baby_bear",
            FieldPreset::Mersenne31 => "mersenne31",
        }
    }

    /// The modulus, built from little-endian 32-bit digits.
    pub fn modulus(self) -> BigUint {
        match self {
            FieldPreset::Bn254 => BigUint::from_slice(&[
                0xf000_0001,
                0x43e1_f593,
                0x79b9_7091,
                0x2833_e848,
                0x8181_585d,
                0xb850_45b6,
                0xe131_a029,
                0x3064_4e72,
            ]),
            FieldPreset::Bls12_381 => BigUint::from_slice(&[
                0x0000_0001,
                0xffff_ffff,
                0xfffe_5bfe,
                0x53bd_a402,
                0x09a1_d805,
                0x3339_d808,
                0x299d_7d48,
                0x73ed_a753,
            ]),
            FieldPreset::Goldilocks => BigUint::from(0xffff_ffff_0000_0001u64),
            FieldPreset::BabyBear => BigUint::from(0x7800_0001u64),
            FieldPreset::Mersenne31 => BigUint::from(0x7fff_ffffu64),
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "bn254" | "bn256" | "alt_bn128" => Some(FieldPreset::Bn254),
            "bls12_381" | "bls12-381" => Some(FieldPreset::Bls12_381),
            "goldilocks" => Some(FieldPreset::Goldilocks),
            "baby_bear" | "babybear" => Some(FieldPreset::BabyBear),
            "mersenne31" | "m31" => Some(FieldPreset::Mersenne31),
            _ => None,
        }
    }
}

/// A prime modulus `p` together with `log2(p)` and `n = ceil(log2(p))`.
///
/// Primality is not checked; only `p >= 2` is enforced.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSize {
    modulus: BigUint,
    log2: f64,
    bits: usize,
}

impl FieldSize {
    pub fn new(modulus: BigUint) -> Result<Self> {
        if modulus < BigUint::from(2u32) {
            return Err(RoundNumberError::InvalidModulus(format!(
                "{} is smaller than 2",
                modulus
            )));
        }
        Ok(Self::from_modulus(modulus))
    }

    pub fn preset(preset: FieldPreset) -> Self {
        Self::from_modulus(preset.modulus())
    }

    pub fn bn254() -> Self {
        Self::preset(FieldPreset::Bn254)
    }

    pub fn bls12_381() -> Self {
        Self::preset(FieldPreset::Bls12_381)
    }

    pub fn goldilocks() -> Self {
        Self::preset(FieldPreset::Goldilocks)
    }

    pub fn baby_bear() -> Self {
        Self::preset(FieldPreset::BabyBear)
    }

    pub fn mersenne31() -> Self {
        Self::preset(FieldPreset::Mersenne31)
    }

    // Callers guarantee `modulus >= 2`.
    fn from_modulus(modulus: BigUint) -> Self {
        let log2 = ln(&modulus) / LN_2;
        let bits = log2.ceil() as usize;
        Self {
            modulus,
            log2,
            bits,
        }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// `log2(p)` as used by the statistical and Groebner bounds.
    pub fn log2(&self) -> f64 {
        self.log2
    }

    /// `n = ceil(log2(p))`, the bits needed for one field element.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// `N = n * t`, the number of state bits across `width` elements.
    pub fn cells(&self, width: usize) -> usize {
        self.bits * width
    }
}

/// Natural logarithm of an arbitrarily large integer.
fn ln(x: &BigUint) -> f64 {
    if let Some(v) = x.to_f64().filter(|v| v.is_finite()) {
        return v.ln();
    }

    // x = m * 2^e with m in [0.5, 1), rounded to the nearest f64.
    let bits = x.bits();
    let shift = bits - 64;
    let mut top = (x >> shift).to_u64().unwrap_or(u64::MAX);
    if x.trailing_zeros().map_or(false, |tz| tz < shift) {
        top |= 1;
    }
    let mut mantissa = top as f64 / 2f64.powi(64);
    let mut exponent = bits;
    if mantissa >= 1.0 {
        mantissa /= 2.0;
        exponent += 1;
    }
    mantissa.ln() + LN_2 * exponent as f64
}

impl FromStr for FieldSize {
    type Err = RoundNumberError;

    /// Accepts a preset name, a decimal modulus or a `0x`-prefixed hex modulus.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(preset) = FieldPreset::from_name(&s.to_ascii_lowercase()) {
            return Ok(Self::preset(preset));
        }

        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => BigUint::from_str_radix(&hex.replace('_', ""), 16),
            None => BigUint::from_str_radix(&s.replace('_', ""), 10),
        };
        let modulus = parsed.map_err(|e| {
            RoundNumberError::InvalidModulus(format!("cannot parse '{}': {}", s, e))
        })?;
        Self::new(modulus)
    }
}

impl fmt::Display for FieldSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x} ({} bits)", self.modulus, self.bits)
    }
}
