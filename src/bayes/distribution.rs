use std::fmt::Display;

use nalgebra::DVector;

use crate::bayes::error::{BayesFilterError, Result};

/// Tolerance used when checking that a belief or a kernel sums to one.
pub const SUM_TOLERANCE: f64 = 1e-6;

pub(crate) fn check_entries(context: &'static str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(BayesFilterError::Empty { context });
    }
    for (index, &value) in values.iter().enumerate() {
        if !(value.is_finite() && value >= 0.0) {
            return Err(BayesFilterError::InvalidEntry {
                context,
                index,
                value,
            });
        }
    }
    Ok(())
}

pub(crate) fn check_normalized(context: &'static str, values: &[f64]) -> Result<()> {
    let sum: f64 = values.iter().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(BayesFilterError::NotNormalized { context, sum });
    }
    Ok(())
}

/// Probability distribution over the discrete position bins of the track.
///
/// Entry `i` is the probability that the agent is in bin `i`. A belief is never empty, all
/// entries are finite and non-negative, and the entries sum to one within [SUM_TOLERANCE].
#[derive(Clone, Debug, PartialEq)]
pub struct Belief(DVector<f64>);

impl Belief {
    /// Uniform belief, every bin has probability `1 / num_bins`.
    pub fn uniform(num_bins: usize) -> Result<Self> {
        if num_bins == 0 {
            return Err(BayesFilterError::Empty { context: "belief" });
        }
        Ok(Self(DVector::from_element(num_bins, 1.0 / num_bins as f64)))
    }

    /// Belief that puts all mass on `bin`.
    pub fn one_hot(num_bins: usize, bin: usize) -> Result<Self> {
        if num_bins == 0 {
            return Err(BayesFilterError::Empty { context: "belief" });
        }
        if bin >= num_bins {
            return Err(BayesFilterError::BinOutOfRange { bin, len: num_bins });
        }
        let mut v = DVector::zeros(num_bins);
        v[bin] = 1.0;
        Ok(Self(v))
    }

    /// Validates `values` as a probability distribution.
    pub fn try_from_vec(values: Vec<f64>) -> Result<Self> {
        check_entries("belief", &values)?;
        check_normalized("belief", &values)?;
        Ok(Self(DVector::from_vec(values)))
    }

    /// Validates `values` as a probability distribution.
    pub fn try_from_slice(values: &[f64]) -> Result<Self> {
        Self::try_from_vec(values.to_vec())
    }

    pub(crate) fn from_vector_unchecked(v: DVector<f64>) -> Self {
        Self(v)
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, a belief has at least one bin.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total probability mass, one up to floating point error.
    pub fn sum(&self) -> f64 {
        self.0.sum()
    }

    /// Probability of `bin`, if it exists.
    pub fn get(&self, bin: usize) -> Option<f64> {
        self.0.get(bin).copied()
    }

    /// The entries as slice.
    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    /// The entries as column vector.
    pub fn as_vector(&self) -> &DVector<f64> {
        &self.0
    }

    /// Consumes the belief and returns its entries.
    pub fn into_vec(self) -> Vec<f64> {
        self.0.as_slice().to_vec()
    }

    /// Most likely bin. Ties resolve to the lowest bin index.
    pub fn argmax(&self) -> usize {
        self.0.imax()
    }

    /// Probability of the most likely bin.
    pub fn peak(&self) -> f64 {
        self.0.max()
    }
}

impl Display for Belief {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bin {} (p={:.3})", self.argmax(), self.peak())
    }
}

/// Relative probability of the current sensor reading for each bin.
///
/// Entries are finite and non-negative, but need not sum to one: only their ratios matter.
#[derive(Clone, Debug, PartialEq)]
pub struct Likelihood(DVector<f64>);

impl Likelihood {
    /// Constant likelihood `c` for each of the `num_bins` bins.
    pub fn uniform(num_bins: usize, c: f64) -> Result<Self> {
        Self::try_from_vec(vec![c; num_bins])
    }

    /// Validates `values` as a likelihood.
    pub fn try_from_vec(values: Vec<f64>) -> Result<Self> {
        check_entries("likelihood", &values)?;
        Ok(Self(DVector::from_vec(values)))
    }

    /// Validates `values` as a likelihood.
    pub fn try_from_slice(values: &[f64]) -> Result<Self> {
        Self::try_from_vec(values.to_vec())
    }

    pub(crate) fn from_vector_unchecked(v: DVector<f64>) -> Self {
        Self(v)
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, a likelihood has at least one bin.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The entries as slice.
    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    /// The entries as column vector.
    pub fn as_vector(&self) -> &DVector<f64> {
        &self.0
    }

    /// Largest entry.
    pub fn max(&self) -> f64 {
        self.0.max()
    }
}

/// Motion uncertainty around the intended offset.
///
/// Entry `j` is the probability that the actual displacement deviates by `j - center` bins from
/// the intended one. The kernel has odd length, is non-negative and sums to one.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionKernel(DVector<f64>);

impl MotionKernel {
    /// Validates `values` as a centered motion kernel.
    pub fn try_new(values: Vec<f64>) -> Result<Self> {
        check_entries("kernel", &values)?;
        if values.len() % 2 == 0 {
            return Err(BayesFilterError::EvenKernel { len: values.len() });
        }
        check_normalized("kernel", &values)?;
        Ok(Self(DVector::from_vec(values)))
    }

    /// Single element kernel `[1.0]`: motion is exactly the intended offset.
    pub fn identity() -> Self {
        Self(DVector::from_element(1, 1.0))
    }

    /// Three element kernel `[p, 1 - 2p, p]`: undershoot and overshoot by one bin with
    /// probability `p` each.
    pub fn symmetric(p: f64) -> Result<Self> {
        Self::try_new(vec![p, 1.0 - 2.0 * p, p])
    }

    /// Number of elements `K`.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of zero deviation, `(K - 1) / 2`.
    pub fn center(&self) -> usize {
        (self.0.len() - 1) / 2
    }

    /// The entries as slice.
    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }
}

impl Default for MotionKernel {
    /// `[0.0, 1.0, 0.0]`, the noise free three element kernel.
    fn default() -> Self {
        Self(DVector::from_vec(vec![0.0, 1.0, 0.0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_belief_sums_to_one() {
        let b = Belief::uniform(7).unwrap();
        assert_eq!(b.len(), 7);
        assert!((b.sum() - 1.0).abs() < 1e-12);
        assert_eq!(Belief::uniform(0), Err(BayesFilterError::Empty { context: "belief" }));
    }

    #[test]
    fn one_hot_checks_range() {
        let b = Belief::one_hot(4, 2).unwrap();
        assert_eq!(b.as_slice(), &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(
            Belief::one_hot(4, 4),
            Err(BayesFilterError::BinOutOfRange { bin: 4, len: 4 })
        );
    }

    #[test]
    fn belief_rejects_bad_entries() {
        let err = Belief::try_from_vec(vec![0.5, -0.1, 0.6]).unwrap_err();
        assert!(matches!(err, BayesFilterError::InvalidEntry { index: 1, .. }));

        let err = Belief::try_from_vec(vec![0.5, f64::NAN, 0.5]).unwrap_err();
        assert!(err.is_invalid_argument());

        let err = Belief::try_from_vec(vec![0.5, 0.6]).unwrap_err();
        assert!(matches!(err, BayesFilterError::NotNormalized { .. }));
    }

    #[test]
    fn argmax_prefers_first_peak() {
        let b = Belief::try_from_vec(vec![0.1, 0.4, 0.1, 0.4]).unwrap();
        assert_eq!(b.argmax(), 1);
        assert!((b.peak() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn likelihood_need_not_be_normalized() {
        let l = Likelihood::try_from_vec(vec![3.0, 0.0, 5.0]).unwrap();
        assert_eq!(l.len(), 3);
        assert!(Likelihood::try_from_vec(vec![]).is_err());
        assert!(Likelihood::try_from_vec(vec![1.0, -1.0]).is_err());
    }

    #[test]
    fn kernel_must_be_odd_and_normalized() {
        assert_eq!(
            MotionKernel::try_new(vec![0.5, 0.5]),
            Err(BayesFilterError::EvenKernel { len: 2 })
        );
        assert!(matches!(
            MotionKernel::try_new(vec![0.2, 0.2, 0.2]),
            Err(BayesFilterError::NotNormalized { .. })
        ));
        let k = MotionKernel::symmetric(0.1).unwrap();
        assert_eq!(k.center(), 1);
        assert_eq!(MotionKernel::identity().center(), 0);
        assert_eq!(MotionKernel::default().as_slice(), &[0.0, 1.0, 0.0]);
        assert!(MotionKernel::symmetric(0.6).is_err());
    }
}
