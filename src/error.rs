use thiserror::Error;

use crate::sbox::SBox;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundNumberError {
    #[error("Invalid S-box exponent: {0} (expected a positive integer or -1)")]
    InvalidSBoxExponent(i64),

    #[error("Invalid state width: {0} (expected at least 2)")]
    InvalidStateWidth(usize),

    #[error("Invalid modulus: {0}")]
    InvalidModulus(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error(
        "No round configuration within the search bounds reaches {security_bits}-bit security \
         for width {width} with S-box {sbox}"
    )]
    SearchExhausted {
        width: usize,
        security_bits: usize,
        sbox: SBox,
    },
}

pub type Result<T> = std::result::Result<T, RoundNumberError>;
