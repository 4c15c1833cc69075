//! Bayes factors for a single binary observation.
//!
//! For an observation `y` and two competing hypotheses H1 and H0 the Bayes
//! factor is `BF = P(y|H1) / P(y|H0)`. In log domain
//! `log_bf = ln P(y|H1) - ln P(y|H0)`, and the posterior log-odds are the
//! prior log-odds plus `log_bf`.
//!
//! Strength labels follow the Jeffreys scale. The raw `log_bf` is always
//! kept alongside the label; labels are for presentation only.

use serde::Serialize;

/// Log Bayes factor from the two likelihoods of one observation.
///
/// - Both likelihoods positive: finite value.
/// - Only `p_given_h0` zero: +inf (the observation rules out H0).
/// - Only `p_given_h1` zero: -inf (the observation rules out H1).
/// - Both zero, negative or NaN: NaN (the observation is impossible under
///   either hypothesis, so it carries no defined evidence).
pub fn log_bf_from_likelihoods(p_given_h1: f64, p_given_h0: f64) -> f64 {
    if p_given_h1.is_nan() || p_given_h0.is_nan() || p_given_h1 < 0.0 || p_given_h0 < 0.0 {
        return f64::NAN;
    }
    match (p_given_h1 == 0.0, p_given_h0 == 0.0) {
        (true, true) => f64::NAN,
        (false, true) => f64::INFINITY,
        (true, false) => f64::NEG_INFINITY,
        (false, false) => p_given_h1.ln() - p_given_h0.ln(),
    }
}

/// Convert a log Bayes factor in nats to bits.
///
/// Returns NaN if input is NaN. Infinities pass through with their sign.
pub fn delta_bits(log_bf: f64) -> f64 {
    if log_bf.is_nan() {
        return f64::NAN;
    }
    log_bf / std::f64::consts::LN_2
}

/// Evidence strength on the Jeffreys scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStrength {
    /// |log_bf| = 0
    None,
    /// 0 < |log_bf| < ln(3.2)
    Anecdotal,
    /// ln(3.2) <= |log_bf| < ln(10)
    Substantial,
    /// ln(10) <= |log_bf| < ln(32)
    Strong,
    /// ln(32) <= |log_bf| < ln(100)
    VeryStrong,
    /// |log_bf| >= ln(100), including infinite factors
    Decisive,
}

impl EvidenceStrength {
    /// Classify evidence strength by |log_bf|.
    pub fn from_log_bf(log_bf: f64) -> Self {
        if log_bf.is_nan() {
            return EvidenceStrength::None;
        }

        const LN_3_2: f64 = 1.163_150_809_678_64;
        const LN_32: f64 = 3.465_735_902_799_727;
        const LN_100: f64 = 4.605_170_185_988_092;

        let magnitude = log_bf.abs();
        if magnitude < f64::EPSILON {
            EvidenceStrength::None
        } else if magnitude < LN_3_2 {
            EvidenceStrength::Anecdotal
        } else if magnitude < std::f64::consts::LN_10 {
            EvidenceStrength::Substantial
        } else if magnitude < LN_32 {
            EvidenceStrength::Strong
        } else if magnitude < LN_100 {
            EvidenceStrength::VeryStrong
        } else {
            EvidenceStrength::Decisive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EvidenceStrength::None => "none",
            EvidenceStrength::Anecdotal => "anecdotal",
            EvidenceStrength::Substantial => "substantial",
            EvidenceStrength::Strong => "strong",
            EvidenceStrength::VeryStrong => "very strong",
            EvidenceStrength::Decisive => "decisive",
        }
    }
}

impl std::fmt::Display for EvidenceStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which hypothesis the observation favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceDirection {
    FavorsH1,
    FavorsH0,
    Neutral,
}

impl EvidenceDirection {
    pub fn from_log_bf(log_bf: f64) -> Self {
        if log_bf.is_nan() || log_bf.abs() < f64::EPSILON {
            EvidenceDirection::Neutral
        } else if log_bf > 0.0 {
            EvidenceDirection::FavorsH1
        } else {
            EvidenceDirection::FavorsH0
        }
    }
}

/// Bayes factor of one observation, with its presentation labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvidenceSummary {
    /// P(y|H1) / P(y|H0). May be +inf or 0.
    pub bayes_factor: f64,
    /// Natural log of `bayes_factor`.
    pub log_bf: f64,
    /// `log_bf` in bits.
    pub delta_bits: f64,
    pub strength: EvidenceStrength,
    pub direction: EvidenceDirection,
}

impl EvidenceSummary {
    /// Summarise the evidence in one observation.
    ///
    /// Returns `None` when the Bayes factor is undefined (see
    /// [`log_bf_from_likelihoods`]).
    pub fn from_likelihoods(p_given_h1: f64, p_given_h0: f64) -> Option<Self> {
        let log_bf = log_bf_from_likelihoods(p_given_h1, p_given_h0);
        if log_bf.is_nan() {
            return None;
        }
        Some(Self::from_log_bf(log_bf))
    }

    pub fn from_log_bf(log_bf: f64) -> Self {
        EvidenceSummary {
            bayes_factor: log_bf.exp(),
            log_bf,
            delta_bits: delta_bits(log_bf),
            strength: EvidenceStrength::from_log_bf(log_bf),
            direction: EvidenceDirection::from_log_bf(log_bf),
        }
    }
}
