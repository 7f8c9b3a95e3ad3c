use crate::bayes::distribution::{Belief, Likelihood, MotionKernel};
use crate::bayes::error::{BayesFilterError, Result};
use crate::bayes::ops::{predict, update};

/// Histogram filter over a fixed number of bins.
///
/// The filter exclusively owns the carried belief. Each step runs
///
/// ```text
/// belief_t = update(likelihood_t, predict(belief_{t-1}, offset_t, kernel))
/// ```
///
/// A failing call leaves the carried belief untouched.
#[derive(Clone, Debug)]
pub struct DiscreteBayesFilter {
    belief: Belief,
    kernel: MotionKernel,
}

impl DiscreteBayesFilter {
    /// Creates a filter from a prior and the motion kernel used for every predict step.
    pub fn new(prior: Belief, kernel: MotionKernel) -> Self {
        Self {
            belief: prior,
            kernel,
        }
    }

    /// Creates a filter with uniform prior over `num_bins` bins.
    pub fn with_uniform_prior(num_bins: usize, kernel: MotionKernel) -> Result<Self> {
        Ok(Self::new(Belief::uniform(num_bins)?, kernel))
    }

    /// Number of bins of the track.
    pub fn num_bins(&self) -> usize {
        self.belief.len()
    }

    /// Current belief.
    pub fn belief(&self) -> &Belief {
        &self.belief
    }

    /// Motion kernel.
    pub fn kernel(&self) -> &MotionKernel {
        &self.kernel
    }

    /// Moves the belief by `offset` bins.
    pub fn predict(&mut self, offset: i64) -> &Belief {
        self.belief = predict(&self.belief, offset, &self.kernel);
        &self.belief
    }

    /// Fuses the belief with `likelihood`.
    pub fn update(&mut self, likelihood: &Likelihood) -> Result<&Belief> {
        self.belief = update(likelihood, &self.belief)?;
        Ok(&self.belief)
    }

    /// One full filter cycle, predict followed by update.
    ///
    /// If the update fails, the belief is not advanced by the predict step either.
    pub fn step(&mut self, offset: i64, likelihood: &Likelihood) -> Result<&Belief> {
        let predicted = predict(&self.belief, offset, &self.kernel);
        self.belief = update(likelihood, &predicted)?;
        Ok(&self.belief)
    }

    /// Most likely bin.
    pub fn estimate(&self) -> usize {
        self.belief.argmax()
    }

    /// Replaces the belief, e.g. to recover from a degenerate update.
    pub fn reset(&mut self, prior: Belief) -> Result<()> {
        if prior.len() != self.belief.len() {
            return Err(BayesFilterError::LengthMismatch {
                context: "prior",
                expected: self.belief.len(),
                actual: prior.len(),
            });
        }
        self.belief = prior;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_tracks_a_detected_landmark() {
        let mut filter = DiscreteBayesFilter::with_uniform_prior(10, MotionKernel::default()).unwrap();
        let mut detection = vec![0.0; 10];
        detection[3] = 1.0;
        let detection = Likelihood::try_from_vec(detection).unwrap();

        filter.step(1, &detection).unwrap();
        assert_eq!(filter.estimate(), 3);
        assert_eq!(filter.predict(1).as_slice()[4], 1.0);
        assert_eq!(filter.estimate(), 4);
    }

    #[test]
    fn failed_step_keeps_belief() {
        let mut filter = DiscreteBayesFilter::new(Belief::one_hot(4, 0).unwrap(), MotionKernel::default());
        let before = filter.belief().clone();
        let zero = Likelihood::uniform(4, 0.0).unwrap();
        let err = filter.step(1, &zero).unwrap_err();
        assert!(err.is_degenerate());
        assert_eq!(filter.belief(), &before);

        let wrong_len = Likelihood::uniform(5, 1.0).unwrap();
        assert!(filter.update(&wrong_len).unwrap_err().is_invalid_argument());
        assert_eq!(filter.belief(), &before);
    }

    #[test]
    fn reset_checks_length() {
        let mut filter = DiscreteBayesFilter::with_uniform_prior(4, MotionKernel::identity()).unwrap();
        assert!(filter.reset(Belief::uniform(3).unwrap()).is_err());
        filter.reset(Belief::one_hot(4, 2).unwrap()).unwrap();
        assert_eq!(filter.estimate(), 2);
        assert_eq!(filter.num_bins(), 4);
    }
}
