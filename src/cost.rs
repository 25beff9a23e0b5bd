//! Cost metrics for a round configuration.
//!
//! All three take `(R_F, R_P)`, the state size `N = n * t` in bits and the
//! width `t`. Full rounds apply the S-box to all `t` elements; partial rounds
//! apply it to a single element.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RoundNumberError;
use crate::rounds::RoundConfiguration;

/// Number of S-box evaluations: `t * R_F + R_P`.
pub fn sbox_cost(config: RoundConfiguration, _cells: usize, width: usize) -> usize {
    width * config.full_rounds + config.partial_rounds
}

/// Circuit size proxy: `N * R_F + ceil(N / t) * R_P`.
///
/// A zero `width` has no rows, so partial rounds then cost nothing.
pub fn size_cost(config: RoundConfiguration, cells: usize, width: usize) -> usize {
    let row = if width == 0 { 0 } else { cells.div_ceil(width) };
    cells * config.full_rounds + row * config.partial_rounds
}

/// Circuit depth proxy: `R_F + R_P`.
pub fn depth_cost(config: RoundConfiguration, _cells: usize, _width: usize) -> usize {
    config.full_rounds + config.partial_rounds
}

/// Scores a round configuration; lower is better.
pub trait CostModel {
    fn cost(&self, config: RoundConfiguration, cells: usize, width: usize) -> usize;
}

impl<F> CostModel for F
where
    F: Fn(RoundConfiguration, usize, usize) -> usize,
{
    fn cost(&self, config: RoundConfiguration, cells: usize, width: usize) -> usize {
        self(config, cells, width)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostMetric {
    SBox,
    Size,
    Depth,
}

impl CostModel for CostMetric {
    fn cost(&self, config: RoundConfiguration, cells: usize, width: usize) -> usize {
        match self {
            CostMetric::SBox => sbox_cost(config, cells, width),
            CostMetric::Size => size_cost(config, cells, width),
            CostMetric::Depth => depth_cost(config, cells, width),
        }
    }
}

impl fmt::Display for CostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CostMetric::SBox => "sbox",
            CostMetric::Size => "size",
            CostMetric::Depth => "depth",
        };
        f.write_str(name)
    }
}

impl FromStr for CostMetric {
    type Err = RoundNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sbox" | "s-box" => Ok(CostMetric::SBox),
            "size" => Ok(CostMetric::Size),
            "depth" => Ok(CostMetric::Depth),
            other => Err(RoundNumberError::InvalidParameters(format!(
                "unknown cost metric '{}'",
                other
            ))),
        }
    }
}
