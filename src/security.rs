//! Closed-form security bounds on Poseidon round numbers.
//!
//! For a power S-box `x^alpha` the statistical, interpolation and the two
//! Groebner-basis attacks each give a lower bound on the number of full rounds
//! `R_F`, with the candidate number of partial rounds `R_P` taken as given.
//! For the inverse S-box `x^-1` the statistical attack bounds `R_F` while the
//! interpolation and Groebner-basis attacks bound `R_P`, discounted by the
//! diffusion of the supplied full rounds.
//!
//! The numeric constants (the 6/10 statistical thresholds, the `1 +` offsets,
//! the `/3` and `/2` divisors) come from the Poseidon paper
//! <https://eprint.iacr.org/2019/458.pdf> and its reference scripts and must
//! not be tuned.

use crate::error::{Result, RoundNumberError};
use crate::field::FieldSize;
use crate::rounds::RoundConfiguration;
use crate::sbox::SBox;

/// Full rounds required when the statistical attack stays below the threshold.
const STATISTICAL_ROUNDS_LOW: i64 = 6;
/// Full rounds required otherwise.
const STATISTICAL_ROUNDS_HIGH: i64 = 10;

/// The individual round-number lower bounds for one candidate configuration.
///
/// Every value is already ceiling-rounded. A bound that is infinite (e.g. for
/// the degenerate exponent `alpha = 1`) saturates to `i64::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackBounds {
    /// Lower bounds on `R_F` for `x^alpha`, given `R_P`.
    Power {
        statistical: i64,
        interpolation: i64,
        groebner_1: i64,
        groebner_2: i64,
    },
    /// `statistical` bounds `R_F`; `interpolation` and `groebner` bound `R_P`,
    /// given `R_F`.
    Inverse {
        statistical: i64,
        interpolation: i64,
        groebner: i64,
    },
}

impl AttackBounds {
    /// Smallest full-round count these bounds admit.
    pub fn required_full_rounds(&self) -> i64 {
        match *self {
            AttackBounds::Power {
                statistical,
                interpolation,
                groebner_1,
                groebner_2,
            } => statistical
                .max(interpolation)
                .max(groebner_1)
                .max(groebner_2),
            AttackBounds::Inverse { statistical, .. } => statistical,
        }
    }

    /// Smallest partial-round count these bounds admit. Power S-boxes put no
    /// direct bound on `R_P`.
    pub fn required_partial_rounds(&self) -> Option<i64> {
        match *self {
            AttackBounds::Power { .. } => None,
            AttackBounds::Inverse {
                interpolation,
                groebner,
                ..
            } => Some(interpolation.max(groebner)),
        }
    }

    pub fn is_satisfied_by(&self, config: RoundConfiguration) -> bool {
        let full_ok = config.full_rounds as i64 >= self.required_full_rounds();
        let partial_ok = self
            .required_partial_rounds()
            .map_or(true, |rp| config.partial_rounds as i64 >= rp);
        full_ok && partial_ok
    }
}

/// Evaluates the security bounds for a fixed field, width, S-box and target
/// security level.
///
/// The derived logarithms are computed once so that the search can call
/// [`BoundEvaluator::satisfies_bounds`] for every candidate cheaply.
#[derive(Clone, Debug)]
pub struct BoundEvaluator {
    width: usize,
    sbox: SBox,
    security_bits: usize,
    /// `log2(p)`.
    log2_p: f64,
    /// `n = ceil(log2(p))`.
    field_bits: usize,
    /// `N = n * t`.
    cells: usize,
}

impl BoundEvaluator {
    pub fn new(field: &FieldSize, width: usize, sbox: SBox, security_bits: usize) -> Result<Self> {
        if width < 2 {
            return Err(RoundNumberError::InvalidStateWidth(width));
        }
        Ok(Self {
            width,
            sbox,
            security_bits,
            log2_p: field.log2(),
            field_bits: field.bits(),
            cells: field.cells(width),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn sbox(&self) -> SBox {
        self.sbox
    }

    pub fn security_bits(&self) -> usize {
        self.security_bits
    }

    pub fn field_bits(&self) -> usize {
        self.field_bits
    }

    pub fn cells(&self) -> usize {
        self.cells
    }

    pub fn attack_bounds(&self, config: RoundConfiguration) -> AttackBounds {
        match self.sbox {
            SBox::Power(alpha) => self.power_bounds(alpha, config.partial_rounds),
            SBox::Inverse => self.inverse_bounds(config.full_rounds),
        }
    }

    pub fn satisfies_bounds(&self, config: RoundConfiguration) -> bool {
        self.attack_bounds(config).is_satisfied_by(config)
    }

    fn statistical_bound(&self, offset: f64) -> i64 {
        let m = self.security_bits as f64;
        let threshold = (self.log2_p - offset).floor() * (self.width + 1) as f64;
        if m <= threshold {
            STATISTICAL_ROUNDS_LOW
        } else {
            STATISTICAL_ROUNDS_HIGH
        }
    }

    fn power_bounds(&self, alpha: u64, partial_rounds: usize) -> AttackBounds {
        let alpha_f = alpha as f64;
        let t = self.width as f64;
        let m = self.security_bits as f64;
        let rp = partial_rounds as f64;
        // log_alpha(2)
        let log_alpha_2 = log(2.0, alpha_f);

        let statistical = self.statistical_bound((alpha_f - 1.0) / 2.0);

        let interpolation = 1.0
            + (log_alpha_2 * self.security_bits.min(self.field_bits) as f64).ceil()
            + log(t, alpha_f).ceil()
            - rp;

        let groebner_1 = 1.0 + log_alpha_2 * (m / 3.0).min(self.log2_p / 2.0) - rp;

        let groebner_2 = (self.width - 1) as f64
            + ((log_alpha_2 * m) / (t + 1.0)).min((log_alpha_2 * self.log2_p) / 2.0)
            - rp;

        AttackBounds::Power {
            statistical,
            interpolation: ceil_to_i64(interpolation),
            groebner_1: ceil_to_i64(groebner_1),
            groebner_2: ceil_to_i64(groebner_2),
        }
    }

    fn inverse_bounds(&self, full_rounds: usize) -> AttackBounds {
        let t = self.width as f64;
        let m = self.security_bits as f64;
        let log2_t = log(t, 2.0);
        let diffusion = (full_rounds as f64 * log2_t).floor();

        let statistical = self.statistical_bound(2.0);

        let interpolation = 1.0
            + (0.5 * self.security_bits.min(self.field_bits) as f64).ceil()
            + log2_t.ceil()
            - diffusion;

        let groebner = (self.width - 1) as f64
            + log2_t.ceil()
            + (m / (t + 1.0)).ceil().min((0.5 * self.log2_p).ceil())
            - diffusion;

        AttackBounds::Inverse {
            statistical,
            interpolation: ceil_to_i64(interpolation),
            groebner: ceil_to_i64(groebner),
        }
    }
}

/// `log_base(x)` as the quotient of natural logarithms.
fn log(x: f64, base: f64) -> f64 {
    x.ln() / base.ln()
}

/// Float-to-int casts saturate, so an infinite bound becomes `i64::MAX`.
fn ceil_to_i64(x: f64) -> i64 {
    x.ceil() as i64
}

/// Checks whether `(full_rounds, partial_rounds)` reaches `security_bits` of
/// security for the given field, width and S-box.
pub fn satisfies_bounds(
    field: &FieldSize,
    width: usize,
    full_rounds: usize,
    partial_rounds: usize,
    sbox: SBox,
    security_bits: usize,
) -> Result<bool> {
    let evaluator = BoundEvaluator::new(field, width, sbox, security_bits)?;
    Ok(evaluator.satisfies_bounds(RoundConfiguration::new(full_rounds, partial_rounds)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bn254_evaluator(width: usize, sbox: SBox, security_bits: usize) -> BoundEvaluator {
        BoundEvaluator::new(&FieldSize::bn254(), width, sbox, security_bits).unwrap()
    }

    #[test]
    fn test_inverse_sbox_worked_example() {
        let field = FieldSize::mersenne31();
        let evaluator = BoundEvaluator::new(&field, 2, SBox::Inverse, 10).unwrap();

        // 10 <= floor(log2(p) - 2) * 3 = 87, so six full rounds suffice.
        assert_eq!(
            evaluator.attack_bounds(RoundConfiguration::new(6, 1)),
            AttackBounds::Inverse {
                statistical: 6,
                interpolation: 1,
                groebner: 0,
            }
        );
        assert!(satisfies_bounds(&field, 2, 6, 1, SBox::Inverse, 10).unwrap());
        assert!(!satisfies_bounds(&field, 2, 4, 1, SBox::Inverse, 10).unwrap());
    }

    #[test]
    fn test_power_sbox_bounds_bn254() {
        let evaluator = bn254_evaluator(3, SBox::Power(5), 128);

        assert_eq!(
            evaluator.attack_bounds(RoundConfiguration::new(6, 52)),
            AttackBounds::Power {
                statistical: 6,
                interpolation: 6,
                groebner_1: -32,
                groebner_2: -36,
            }
        );
        assert_eq!(
            evaluator.attack_bounds(RoundConfiguration::new(6, 0)),
            AttackBounds::Power {
                statistical: 6,
                interpolation: 58,
                groebner_1: 20,
                groebner_2: 16,
            }
        );

        assert!(evaluator.satisfies_bounds(RoundConfiguration::new(6, 52)));
        // One partial round fewer pushes the interpolation bound to 7.
        assert!(!evaluator.satisfies_bounds(RoundConfiguration::new(6, 51)));
        assert!(evaluator.satisfies_bounds(RoundConfiguration::new(8, 51)));
    }

    #[test]
    fn test_statistical_threshold_switches_to_ten_rounds() {
        // floor(log2(2^31 - 1) - 1) * 4 = 120 < 128.
        let evaluator =
            BoundEvaluator::new(&FieldSize::mersenne31(), 3, SBox::Power(3), 128).unwrap();
        assert_eq!(
            evaluator.attack_bounds(RoundConfiguration::new(0, 0)),
            AttackBounds::Power {
                statistical: 10,
                interpolation: 22,
                groebner_1: 11,
                groebner_2: 12,
            }
        );
        assert!(!evaluator.satisfies_bounds(RoundConfiguration::new(8, 40)));
        assert!(evaluator.satisfies_bounds(RoundConfiguration::new(10, 12)));
    }

    #[test]
    fn test_inverse_sbox_bounds_depend_on_full_rounds() {
        let evaluator = bn254_evaluator(3, SBox::Inverse, 128);

        let with_six = evaluator.attack_bounds(RoundConfiguration::new(6, 0));
        assert_eq!(
            with_six,
            AttackBounds::Inverse {
                statistical: 6,
                interpolation: 58,
                groebner: 27,
            }
        );
        assert_eq!(with_six.required_partial_rounds(), Some(58));

        let with_none = evaluator.attack_bounds(RoundConfiguration::new(0, 0));
        assert_eq!(with_none.required_partial_rounds(), Some(67));

        assert!(evaluator.satisfies_bounds(RoundConfiguration::new(6, 58)));
        assert!(!evaluator.satisfies_bounds(RoundConfiguration::new(6, 57)));
    }

    #[test]
    fn test_unit_exponent_is_never_satisfied() {
        let evaluator = bn254_evaluator(3, SBox::Power(1), 128);
        let bounds = evaluator.attack_bounds(RoundConfiguration::new(98, 499));
        assert_eq!(bounds.required_full_rounds(), i64::MAX);
        assert!(!bounds.is_satisfied_by(RoundConfiguration::new(98, 499)));
    }

    #[test]
    fn test_width_validation() {
        assert_eq!(
            BoundEvaluator::new(&FieldSize::bn254(), 1, SBox::Power(5), 128).unwrap_err(),
            RoundNumberError::InvalidStateWidth(1)
        );
        assert!(satisfies_bounds(&FieldSize::bn254(), 0, 8, 57, SBox::Inverse, 128).is_err());
    }
}
