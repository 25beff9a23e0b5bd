use std::fmt;

use serde::{Deserialize, Serialize};

/// Extra full rounds added by the security margin.
pub const MARGIN_FULL_ROUNDS: usize = 2;

/// Factor applied to the partial rounds by the security margin (+7.5%).
pub const MARGIN_PARTIAL_ROUNDS_FACTOR: f64 = 1.075;

/// A candidate round configuration `(R_F, R_P)`.
///
/// `full_rounds` is the total number of full rounds, split evenly before and
/// after the partial rounds, so every configuration the search produces has
/// an even `full_rounds`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundConfiguration {
    pub full_rounds: usize,
    pub partial_rounds: usize,
}

impl RoundConfiguration {
    pub const fn new(full_rounds: usize, partial_rounds: usize) -> Self {
        Self {
            full_rounds,
            partial_rounds,
        }
    }

    /// Full rounds applied on each side of the partial rounds.
    pub const fn half_full_rounds(&self) -> usize {
        self.full_rounds / 2
    }

    pub const fn total_rounds(&self) -> usize {
        self.full_rounds + self.partial_rounds
    }

    /// Pads a configuration that already meets the security bounds:
    /// two more full rounds and 7.5% more partial rounds, rounded up.
    pub fn with_security_margin(self) -> Self {
        let partial_rounds =
            (self.partial_rounds as f64 * MARGIN_PARTIAL_ROUNDS_FACTOR).ceil() as usize;
        Self {
            full_rounds: self.full_rounds + MARGIN_FULL_ROUNDS,
            partial_rounds,
        }
    }
}

impl fmt::Display for RoundConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R_F = {}, R_P = {}", self.full_rounds, self.partial_rounds)
    }
}
