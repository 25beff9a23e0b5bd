//! Round-number selection for Poseidon-style permutations.
//!
//! Given a prime field, a state width `t`, an S-box exponent and a target
//! security level `M`, this crate finds the cheapest even number of full
//! rounds `R_F` and number of partial rounds `R_P` that satisfy the
//! statistical, interpolation and Groebner-basis bounds from the Poseidon
//! paper, optionally padded with a security margin.
//!
//! ```
//! use poseidon_round_numbers::{finalize, FieldSize, SBox};
//!
//! let params = finalize(&FieldSize::bn254(), 3, SBox::Power(5), 128, true).unwrap();
//! assert_eq!((params.full_rounds, params.partial_rounds), (8, 56));
//! ```

pub mod cost;
pub mod error;
pub mod field;
pub mod params;
pub mod rounds;
pub mod sbox;
pub mod search;
pub mod security;

pub use cost::{depth_cost, sbox_cost, size_cost, CostMetric, CostModel};
pub use error::{Result, RoundNumberError};
pub use field::{FieldPreset, FieldSize};
pub use params::{finalize, finalize_with_config, get_parameters, PoseidonParameters};
pub use rounds::RoundConfiguration;
pub use sbox::SBox;
pub use search::{candidates, find_round_numbers, search, SearchConfig};
pub use security::{satisfies_bounds, AttackBounds, BoundEvaluator};
