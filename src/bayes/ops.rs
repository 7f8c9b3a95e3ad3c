use nalgebra::DVector;

use crate::bayes::distribution::{Belief, Likelihood, MotionKernel};
use crate::bayes::error::{BayesFilterError, Result};

/// Normalizing constants at or below this value are treated as zero.
pub const NORMALIZATION_EPSILON: f64 = 1e-300;

/// Predict step: propagates `belief` through the motion model.
///
/// The agent moves by `offset` bins, with the deviation from `offset` distributed according to
/// `kernel`:
///
/// ```text
/// predicted[i] = Σ_j belief[(i - offset - (j - center)) mod N] * kernel[j]
/// ```
///
/// The track is circular: mass pushed past the last bin re-enters at bin 0 and vice versa. Mass
/// is neither truncated nor renormalized, so the predicted belief carries the same total mass as
/// `belief`. Callers on a bounded track should choose `N` large enough for wrap-around to be
/// negligible.
pub fn predict(belief: &Belief, offset: i64, kernel: &MotionKernel) -> Belief {
    let n = belief.len() as i64;
    let center = kernel.center() as i64;
    // reduce first, so that `i - offset` cannot overflow
    let offset = offset.rem_euclid(n);
    let prior = belief.as_slice();

    let predicted = DVector::from_fn(belief.len(), |i, _| {
        kernel
            .as_slice()
            .iter()
            .enumerate()
            .map(|(j, k)| {
                let src = (i as i64 - offset - (j as i64 - center)).rem_euclid(n);
                prior[src as usize] * k
            })
            .sum::<f64>()
    });
    Belief::from_vector_unchecked(predicted)
}

/// Update step: fuses `predicted` with the sensor `likelihood` by Bayes' rule.
///
/// ```text
/// posterior[i] = likelihood[i] * predicted[i] / Z,    Z = Σ_i likelihood[i] * predicted[i]
/// ```
///
/// The posterior is divided by the computed sum `Z`, so it sums to one even if `predicted` has
/// drifted slightly from unit mass.
///
/// Fails with [BayesFilterError::LengthMismatch] if the inputs describe tracks of different
/// size, and with [BayesFilterError::DegenerateNormalization] if `Z` vanishes. No recovery is
/// attempted in the latter case.
pub fn update(likelihood: &Likelihood, predicted: &Belief) -> Result<Belief> {
    if likelihood.len() != predicted.len() {
        return Err(BayesFilterError::LengthMismatch {
            context: "likelihood",
            expected: predicted.len(),
            actual: likelihood.len(),
        });
    }
    let unnormalized = likelihood.as_vector().component_mul(predicted.as_vector());
    let z = unnormalized.sum();
    if !(z > NORMALIZATION_EPSILON) || !z.is_finite() {
        return Err(BayesFilterError::DegenerateNormalization { z });
    }
    Ok(Belief::from_vector_unchecked(unnormalized / z))
}

/// [predict] on plain slices, validating the inputs first.
pub fn predict_slice(belief: &[f64], offset: i64, kernel: &[f64]) -> Result<Vec<f64>> {
    let belief = Belief::try_from_slice(belief)?;
    let kernel = MotionKernel::try_new(kernel.to_vec())?;
    Ok(predict(&belief, offset, &kernel).into_vec())
}

/// [update] on plain slices, validating the inputs first.
pub fn update_slice(likelihood: &[f64], predicted: &[f64]) -> Result<Vec<f64>> {
    let predicted = Belief::try_from_slice(predicted)?;
    let likelihood = Likelihood::try_from_slice(likelihood)?;
    Ok(update(&likelihood, &predicted)?.into_vec())
}
