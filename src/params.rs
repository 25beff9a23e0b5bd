//! Final Poseidon parameters for a field, width, S-box and security level.
//!
//! The round numbers are the ones minimising the number of S-boxes. The size
//! cost is reported for the same round numbers: for a fixed `t` and `N` the
//! configuration with the fewest S-boxes also has the smallest size.

use std::fmt;

use log::debug;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::cost::{sbox_cost, size_cost, CostMetric};
use crate::error::Result;
use crate::field::FieldSize;
use crate::rounds::RoundConfiguration;
use crate::sbox::SBox;
use crate::search::{find_round_numbers, SearchConfig};
use crate::security::BoundEvaluator;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseidonParameters {
    /// State width `t`.
    pub width: usize,
    /// Target security `M` in bits.
    pub security_bits: usize,
    pub sbox: SBox,
    pub security_margin: bool,
    /// Total full rounds `R_F`, always even.
    pub full_rounds: usize,
    /// Partial rounds `R_P`.
    pub partial_rounds: usize,
    pub min_sbox_cost: usize,
    pub min_size_cost: usize,
}

impl PoseidonParameters {
    pub fn rounds(&self) -> RoundConfiguration {
        RoundConfiguration::new(self.full_rounds, self.partial_rounds)
    }
}

impl fmt::Display for PoseidonParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "t = {}", self.width)?;
        writeln!(f, "M = {}", self.security_bits)?;
        writeln!(f, "alpha = {}", self.sbox.exponent())?;
        writeln!(f, "security_margin = {}", self.security_margin)?;
        writeln!(f, "R_F = {}", self.full_rounds)?;
        writeln!(f, "R_P = {}", self.partial_rounds)?;
        writeln!(f, "min_sbox_cost = {}", self.min_sbox_cost)?;
        write!(f, "min_size_cost = {}", self.min_size_cost)
    }
}

/// Finalizes the parameters using the default search bounds.
pub fn finalize(
    field: &FieldSize,
    width: usize,
    sbox: SBox,
    security_bits: usize,
    security_margin: bool,
) -> Result<PoseidonParameters> {
    finalize_with_config(
        field,
        width,
        sbox,
        security_bits,
        security_margin,
        &SearchConfig::default(),
    )
}

pub fn finalize_with_config(
    field: &FieldSize,
    width: usize,
    sbox: SBox,
    security_bits: usize,
    security_margin: bool,
    config: &SearchConfig,
) -> Result<PoseidonParameters> {
    let evaluator = BoundEvaluator::new(field, width, sbox, security_bits)?;
    let rounds = find_round_numbers(&evaluator, &CostMetric::SBox, security_margin, config)?;

    let cells = evaluator.cells();
    let params = PoseidonParameters {
        width,
        security_bits,
        sbox,
        security_margin,
        full_rounds: rounds.full_rounds,
        partial_rounds: rounds.partial_rounds,
        min_sbox_cost: sbox_cost(rounds, cells, width),
        min_size_cost: size_cost(rounds, cells, width),
    };
    debug!(
        "finalized {} with {} S-boxes, size {}",
        rounds, params.min_sbox_cost, params.min_size_cost
    );
    Ok(params)
}

/// Round numbers and costs for a prime, state width, raw S-box exponent and
/// security level.
///
/// `sbox_exponent` must be positive or `-1`; anything else fails before any
/// search is attempted.
pub fn get_parameters(
    prime: &BigUint,
    width: usize,
    sbox_exponent: i64,
    security_bits: usize,
    apply_security_margin: bool,
) -> Result<PoseidonParameters> {
    let sbox = SBox::from_exponent(sbox_exponent)?;
    let field = FieldSize::new(prime.clone())?;
    finalize(&field, width, sbox, security_bits, apply_security_margin)
}
