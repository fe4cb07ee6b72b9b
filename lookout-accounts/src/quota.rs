use thiserror::Error;

use crate::Profile;

/// Searches left for a profile: `max(0, allotted - used)`.
///
/// A missing profile has nothing left. A profile without an allotment yields
/// `NaN`, and non-finite counters propagate, so the gate can refuse them.
pub fn compute_remaining(profile: Option<&Profile>) -> f64 {
    let Some(profile) = profile else {
        return 0.0;
    };
    let Some(allotted) = profile.searches_allotted else {
        return f64::NAN;
    };
    let used = profile.searches_used.unwrap_or(0.0);
    let remaining = allotted - used;
    if remaining.is_nan() {
        remaining
    } else {
        remaining.max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("no searches remaining (remaining={remaining})")]
pub struct QuotaDenied {
    pub remaining: f64,
}

/// Decides whether a search may start.
pub struct QuotaGate;

impl QuotaGate {
    /// Permit only a finite, strictly positive balance.
    pub fn check(remaining: f64) -> Result<f64, QuotaDenied> {
        if remaining.is_finite() && remaining > 0.0 {
            Ok(remaining)
        } else {
            Err(QuotaDenied { remaining })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_allotted_minus_used() {
        assert_eq!(compute_remaining(Some(&Profile::new(5.0, 2.0))), 3.0);
    }

    #[test]
    fn overspent_profiles_clamp_to_zero() {
        assert_eq!(compute_remaining(Some(&Profile::new(1.0, 4.0))), 0.0);
    }

    #[test]
    fn missing_profile_has_nothing_left() {
        assert_eq!(compute_remaining(None), 0.0);
    }

    #[test]
    fn missing_allotment_is_unusable() {
        let profile = Profile {
            searches_used: Some(1.0),
            ..Profile::default()
        };
        assert!(compute_remaining(Some(&profile)).is_nan());
    }

    #[test]
    fn missing_usage_counts_as_zero() {
        let profile = Profile {
            searches_allotted: Some(2.0),
            ..Profile::default()
        };
        assert_eq!(compute_remaining(Some(&profile)), 2.0);
    }

    #[test]
    fn infinity_propagates() {
        let remaining = compute_remaining(Some(&Profile::new(f64::INFINITY, 0.0)));
        assert!(remaining.is_infinite());
    }

    #[test]
    fn gate_accepts_only_finite_positive() {
        assert_eq!(QuotaGate::check(1.0), Ok(1.0));
        assert_eq!(QuotaGate::check(0.5), Ok(0.5));
        for bad in [0.0, -1.0, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(QuotaGate::check(bad), Err(QuotaDenied { remaining: bad }));
        }
        assert!(QuotaGate::check(f64::NAN).is_err());
    }
}
