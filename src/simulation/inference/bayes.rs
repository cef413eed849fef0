//! Bayes rule over the binary hypothesis {obstacle, free}.
//!
//! ```text
//! P(H | e) = P(e | H) P(H) / P(e)
//! P(e)     = P(e | H) P(H) + P(e | ¬H) (1 - P(H))
//! ```

/// Likelihoods `(P(reading | obstacle), P(reading | free))` for a sensor of the
/// given accuracy.
#[must_use]
pub fn sensor_likelihoods(reading: bool, accuracy: f64) -> (f64, f64) {
    if reading {
        (accuracy, 1.0 - accuracy)
    } else {
        (1.0 - accuracy, accuracy)
    }
}

/// Total probability of the evidence (the normalizer).
#[must_use]
pub fn compute_evidence(prior: f64, likelihood_h: f64, likelihood_not_h: f64) -> f64 {
    likelihood_h * prior + likelihood_not_h * (1.0 - prior)
}

/// Posterior `P(H | e)`.
///
/// Zero (or non-finite) evidence leaves the prior unchanged.
#[must_use]
pub fn bayes_update(prior: f64, likelihood_h: f64, evidence: f64) -> f64 {
    if evidence <= 0.0 || !evidence.is_finite() {
        return prior;
    }
    (likelihood_h * prior / evidence).clamp(0.0, 1.0)
}

/// Folds one binary reading into `prior`.
#[must_use]
pub fn posterior(prior: f64, reading: bool, accuracy: f64) -> f64 {
    let (likelihood_h, likelihood_not_h) = sensor_likelihoods(reading, accuracy);
    let evidence = compute_evidence(prior, likelihood_h, likelihood_not_h);
    bayes_update(prior, likelihood_h, evidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_prior_moves_to_accuracy() {
        assert!((posterior(0.5, true, 0.9) - 0.9).abs() < 1e-10);
        assert!((posterior(0.5, false, 0.9) - 0.1).abs() < 1e-10);
    }

    #[test]
    fn test_evidence_direction_is_monotonic() {
        for accuracy in [0.55, 0.7, 0.9, 0.99] {
            for prior in [0.01, 0.2, 0.5, 0.8, 0.99] {
                assert!(
                    posterior(prior, true, accuracy) >= prior,
                    "obstacle reading lowered belief: prior={prior} a={accuracy}"
                );
                assert!(
                    posterior(prior, false, accuracy) <= prior,
                    "free reading raised belief: prior={prior} a={accuracy}"
                );
            }
        }
    }

    #[test]
    fn test_uninformative_sensor_keeps_prior() {
        assert!((posterior(0.3, true, 0.5) - 0.3).abs() < 1e-10);
    }

    #[test]
    fn test_zero_evidence_keeps_prior() {
        // Certain-free prior contradicted by a perfect sensor: P(e) = 0
        let evidence = compute_evidence(0.0, 1.0, 0.0);
        assert_eq!(evidence, 0.0);
        assert_eq!(bayes_update(0.0, 1.0, evidence), 0.0);
        assert_eq!(posterior(0.0, true, 1.0), 0.0);
        assert_eq!(posterior(1.0, false, 1.0), 1.0);
    }

    #[test]
    fn test_perfect_sensor_is_decisive() {
        assert_eq!(posterior(0.5, true, 1.0), 1.0);
        assert_eq!(posterior(0.5, false, 1.0), 0.0);
    }
}
