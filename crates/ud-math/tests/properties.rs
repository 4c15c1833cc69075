//! Property-based tests for ud-math.

use proptest::prelude::*;
use ud_math::bayes_factor::{log_bf_from_likelihoods, EvidenceDirection, EvidenceSummary};
use ud_math::{complement, is_open_unit_interval, is_unit_interval, mix};

const TOL: f64 = 1e-10;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Complement is an involution on [0, 1].
    #[test]
    fn complement_involution(p in 0.0..=1.0f64) {
        prop_assert!(approx_eq(complement(complement(p)), p, TOL));
        prop_assert!(is_unit_interval(complement(p)));
    }

    /// The open interval is a subset of the closed one.
    #[test]
    fn open_implies_closed(p in -2.0..2.0f64) {
        if is_open_unit_interval(p) {
            prop_assert!(is_unit_interval(p));
        }
    }

    /// A mixture lies between its two endpoints.
    #[test]
    fn mix_is_bounded(w in 0.0..=1.0f64, a in 0.0..=100.0f64, b in 0.0..=100.0f64) {
        let m = mix(w, a, b);
        prop_assert!(m >= a.min(b) - TOL && m <= a.max(b) + TOL);
    }

    /// Posterior odds = prior odds times the Bayes factor.
    #[test]
    fn bayes_rule_in_odds_form(
        prior in 0.01..0.99f64,
        l1 in 0.01..=1.0f64,
        l0 in 0.01..=1.0f64,
    ) {
        let direct = l1 * prior / (l1 * prior + l0 * (1.0 - prior));
        let prior_odds = prior / complement(prior);
        let posterior_odds = prior_odds * log_bf_from_likelihoods(l1, l0).exp();
        let via_odds = posterior_odds / (1.0 + posterior_odds);
        prop_assert!(approx_eq(direct, via_odds, 1e-9), "{} vs {}", direct, via_odds);
    }

    /// Swapping the hypotheses flips the direction and keeps the strength.
    #[test]
    fn swapping_hypotheses_flips_direction(l1 in 0.01..=1.0f64, l0 in 0.01..=1.0f64) {
        let forward = EvidenceSummary::from_likelihoods(l1, l0).unwrap();
        let backward = EvidenceSummary::from_likelihoods(l0, l1).unwrap();
        prop_assert_eq!(forward.strength, backward.strength);
        match forward.direction {
            EvidenceDirection::FavorsH1 => prop_assert_eq!(backward.direction, EvidenceDirection::FavorsH0),
            EvidenceDirection::FavorsH0 => prop_assert_eq!(backward.direction, EvidenceDirection::FavorsH1),
            EvidenceDirection::Neutral => prop_assert_eq!(backward.direction, EvidenceDirection::Neutral),
        }
    }
}
