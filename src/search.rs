//! Exhaustive round-number search.
//!
//! Candidates are enumerated by ascending `R_P`, then ascending even `R_F`.
//! Each candidate that meets the security bounds is (optionally) padded with
//! the security margin, scored by a [`CostModel`], and the cheapest one wins.
//! Ties on cost go to the smaller `R_F`; remaining ties go to the candidate
//! enumerated first.
//!
//! The parallel search splits the work by `R_P` and reduces with the total
//! ordering `(cost, R_F, verified R_P, verified R_F)`, which selects the same
//! candidate as the sequential fold.

use std::ops::Range;

use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::cost::{CostMetric, CostModel};
use crate::error::{Result, RoundNumberError};
use crate::field::FieldSize;
use crate::rounds::RoundConfiguration;
use crate::sbox::SBox;
use crate::security::BoundEvaluator;

/// Bounds and execution mode of the exhaustive search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Candidate partial-round counts.
    pub partial_rounds: Range<usize>,
    /// Candidate full-round counts; odd values are skipped.
    pub full_rounds: Range<usize>,
    /// Reduce over `R_P` rows with rayon.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            partial_rounds: 1..500,
            full_rounds: 4..100,
            parallel: true,
        }
    }
}

impl SearchConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.full_rounds.clone().any(|rf| rf % 2 == 0) {
            return Err(RoundNumberError::InvalidParameters(format!(
                "full round range {:?} contains no even round count",
                self.full_rounds
            )));
        }
        Ok(())
    }
}

/// All candidate configurations in search order.
pub fn candidates(config: &SearchConfig) -> impl Iterator<Item = RoundConfiguration> {
    let full_rounds = config.full_rounds.clone();
    config.partial_rounds.clone().flat_map(move |rp| {
        even_values(full_rounds.clone()).map(move |rf| RoundConfiguration::new(rf, rp))
    })
}

fn even_values(range: Range<usize>) -> impl Iterator<Item = usize> {
    range.filter(|v| v % 2 == 0)
}

/// A candidate that met the bounds, with the configuration actually costed.
#[derive(Clone, Copy, Debug)]
struct Scored {
    verified: RoundConfiguration,
    selected: RoundConfiguration,
    cost: usize,
}

impl Scored {
    fn key(&self) -> (usize, usize, usize, usize) {
        (
            self.cost,
            self.selected.full_rounds,
            self.verified.partial_rounds,
            self.verified.full_rounds,
        )
    }

    fn improves_on(&self, best: &Scored) -> bool {
        self.cost < best.cost
            || (self.cost == best.cost && self.selected.full_rounds < best.selected.full_rounds)
    }
}

/// Finds the cheapest configuration under `cost_model` that meets the bounds
/// of `evaluator`.
///
/// With `security_margin` set, a candidate is padded by
/// [`RoundConfiguration::with_security_margin`] after it passed the bounds
/// and before it is costed; the padded configuration is what gets returned.
///
/// Returns [`RoundNumberError::SearchExhausted`] when no candidate within
/// `config` meets the bounds.
pub fn find_round_numbers<C>(
    evaluator: &BoundEvaluator,
    cost_model: &C,
    security_margin: bool,
    config: &SearchConfig,
) -> Result<RoundConfiguration>
where
    C: CostModel + Sync,
{
    config.validate()?;

    debug!(
        "searching round numbers: n = {}, t = {}, sbox = {}, M = {}, margin = {}, R_P in {:?}, R_F in {:?}",
        evaluator.field_bits(),
        evaluator.width(),
        evaluator.sbox(),
        evaluator.security_bits(),
        security_margin,
        config.partial_rounds,
        config.full_rounds,
    );

    let cells = evaluator.cells();
    let width = evaluator.width();
    let score = |verified: RoundConfiguration| -> Option<Scored> {
        if !evaluator.satisfies_bounds(verified) {
            return None;
        }
        let selected = if security_margin {
            verified.with_security_margin()
        } else {
            verified
        };
        Some(Scored {
            verified,
            selected,
            cost: cost_model.cost(selected, cells, width),
        })
    };

    let best = if config.parallel {
        config
            .partial_rounds
            .clone()
            .into_par_iter()
            .filter_map(|rp| {
                even_values(config.full_rounds.clone())
                    .filter_map(|rf| score(RoundConfiguration::new(rf, rp)))
                    .min_by_key(Scored::key)
            })
            .min_by_key(Scored::key)
    } else {
        candidates(config)
            .filter_map(score)
            .fold(None, |best: Option<Scored>, next| match best {
                Some(best) if !next.improves_on(&best) => Some(best),
                _ => {
                    trace!(
                        "new best: {} (verified {}) at cost {}",
                        next.selected,
                        next.verified,
                        next.cost
                    );
                    Some(next)
                }
            })
    };

    match best {
        Some(best) => {
            debug!("selected {} at cost {}", best.selected, best.cost);
            Ok(best.selected)
        }
        None => {
            warn!(
                "no round configuration reaches {} bits for t = {} and {}",
                evaluator.security_bits(),
                width,
                evaluator.sbox()
            );
            Err(RoundNumberError::SearchExhausted {
                width,
                security_bits: evaluator.security_bits(),
                sbox: evaluator.sbox(),
            })
        }
    }
}

/// Searches with the default bounds for `(p, t, alpha, M)`.
pub fn search(
    field: &FieldSize,
    width: usize,
    sbox: SBox,
    security_bits: usize,
    metric: CostMetric,
    security_margin: bool,
) -> Result<RoundConfiguration> {
    let evaluator = BoundEvaluator::new(field, width, sbox, security_bits)?;
    find_round_numbers(&evaluator, &metric, security_margin, &SearchConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use num_traits::One;

    fn run(
        field: &FieldSize,
        width: usize,
        sbox: SBox,
        security_bits: usize,
        metric: CostMetric,
        security_margin: bool,
        config: &SearchConfig,
    ) -> Result<RoundConfiguration> {
        let evaluator = BoundEvaluator::new(field, width, sbox, security_bits).unwrap();
        find_round_numbers(&evaluator, &metric, security_margin, config)
    }

    #[test]
    fn test_candidate_order() {
        let config = SearchConfig::default();
        let first: Vec<_> = candidates(&config).take(3).collect();
        assert_eq!(
            first,
            vec![
                RoundConfiguration::new(4, 1),
                RoundConfiguration::new(6, 1),
                RoundConfiguration::new(8, 1),
            ]
        );
        assert_eq!(candidates(&config).nth(48), Some(RoundConfiguration::new(4, 2)));
        assert_eq!(candidates(&config).count(), 499 * 48);
        assert!(candidates(&config).all(|c| c.full_rounds % 2 == 0));
    }

    #[test]
    fn test_sbox_metric_bn254() {
        let field = FieldSize::bn254();
        let sbox = SBox::Power(5);
        assert_eq!(
            search(&field, 3, sbox, 128, CostMetric::SBox, false).unwrap(),
            RoundConfiguration::new(6, 52)
        );
        assert_eq!(
            search(&field, 3, sbox, 128, CostMetric::SBox, true).unwrap(),
            RoundConfiguration::new(8, 56)
        );
        assert_eq!(
            search(&field, 7, sbox, 128, CostMetric::SBox, true).unwrap(),
            RoundConfiguration::new(8, 57)
        );
        assert_eq!(
            search(&field, 3, sbox, 128, CostMetric::Size, false).unwrap(),
            RoundConfiguration::new(6, 52)
        );
    }

    #[test]
    fn test_depth_metric() {
        let field = FieldSize::bn254();
        assert_eq!(
            search(&field, 3, SBox::Inverse, 128, CostMetric::Depth, false).unwrap(),
            RoundConfiguration::new(42, 1)
        );
        assert_eq!(
            search(&field, 7, SBox::Power(5), 128, CostMetric::Depth, true).unwrap(),
            RoundConfiguration::new(48, 14)
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let cases = [
            (FieldSize::bn254(), 3, SBox::Power(5)),
            (FieldSize::bn254(), 5, SBox::Inverse),
            (FieldSize::goldilocks(), 12, SBox::Power(7)),
            (FieldSize::mersenne31(), 3, SBox::Power(3)),
        ];
        for (field, width, sbox) in cases.iter() {
            for metric in [CostMetric::SBox, CostMetric::Size, CostMetric::Depth] {
                for margin in [false, true] {
                    let sequential =
                        run(field, *width, *sbox, 128, metric, margin, &SearchConfig::sequential());
                    let parallel =
                        run(field, *width, *sbox, 128, metric, margin, &SearchConfig::default());
                    assert_eq!(sequential, parallel, "t = {}, {}, {}", width, sbox, metric);
                }
            }
        }
    }

    #[test]
    fn test_custom_cost_function() {
        let evaluator =
            BoundEvaluator::new(&FieldSize::bn254(), 3, SBox::Power(5), 128).unwrap();
        // Partial rounds only: the smallest admissible R_P is reached with the
        // largest R_F, and ties on cost go to the smallest R_F.
        let partial_only = |config: RoundConfiguration, _: usize, _: usize| config.partial_rounds;
        let best = find_round_numbers(&evaluator, &partial_only, false, &SearchConfig::default())
            .unwrap();
        assert_eq!(best.partial_rounds, 1);
        assert!(evaluator.satisfies_bounds(best));
        assert!(!evaluator.satisfies_bounds(RoundConfiguration::new(best.full_rounds - 2, 1)));
    }

    #[test]
    fn test_search_exhausted() {
        let field = FieldSize::new((BigUint::one() << 4096usize) - BigUint::one()).unwrap();
        for config in [SearchConfig::default(), SearchConfig::sequential()] {
            assert_eq!(
                run(&field, 3, SBox::Power(3), 4096, CostMetric::SBox, false, &config),
                Err(RoundNumberError::SearchExhausted {
                    width: 3,
                    security_bits: 4096,
                    sbox: SBox::Power(3),
                })
            );
            assert!(matches!(
                run(&field, 2, SBox::Inverse, 4096, CostMetric::SBox, true, &config),
                Err(RoundNumberError::SearchExhausted { .. })
            ));
        }
    }

    #[test]
    fn test_narrow_ranges_exhaust() {
        let field = FieldSize::bn254();

        // The interpolation bound needs R_F + R_P >= 58, which the default
        // full-round range still reaches for R_P <= 9.
        let few_partial = SearchConfig {
            partial_rounds: 1..10,
            ..SearchConfig::default()
        };
        assert_eq!(
            run(&field, 3, SBox::Power(5), 128, CostMetric::SBox, false, &few_partial),
            Ok(RoundConfiguration::new(50, 8))
        );

        let narrow = SearchConfig {
            partial_rounds: 1..10,
            full_rounds: 4..40,
            ..SearchConfig::default()
        };
        for parallel in [false, true] {
            let config = SearchConfig {
                parallel,
                ..narrow.clone()
            };
            assert_eq!(
                run(&field, 3, SBox::Power(5), 128, CostMetric::SBox, false, &config),
                Err(RoundNumberError::SearchExhausted {
                    width: 3,
                    security_bits: 128,
                    sbox: SBox::Power(5),
                })
            );
        }
    }

    #[test]
    fn test_invalid_full_round_range() {
        let config = SearchConfig {
            full_rounds: 5..6,
            ..SearchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RoundNumberError::InvalidParameters(_))
        ));
        assert!(run(&FieldSize::bn254(), 3, SBox::Power(5), 128, CostMetric::SBox, false, &config)
            .is_err());
    }
}
