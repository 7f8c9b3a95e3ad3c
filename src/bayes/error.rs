use thiserror::Error;

/// Errors raised by the discrete Bayes filter.
///
/// All variants except [BayesFilterError::DegenerateNormalization] are invalid-argument
/// conditions: the caller handed in data which violates the contract of the operation. They are
/// detected before any output is produced and are never silently corrected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BayesFilterError {
    /// Two sequences which must describe the same track have different lengths.
    #[error("{context} has {actual} bins, expected {expected}")]
    LengthMismatch {
        /// Which input had the wrong length.
        context: &'static str,
        /// Expected number of bins.
        expected: usize,
        /// Actual number of bins.
        actual: usize,
    },

    /// A motion kernel must have odd length so that it has a center element.
    #[error("motion kernel must have odd length to be centered, got length {len}")]
    EvenKernel {
        /// Length of the rejected kernel.
        len: usize,
    },

    /// A sequence was empty.
    #[error("{context} must not be empty")]
    Empty {
        /// Which input was empty.
        context: &'static str,
    },

    /// An entry is negative, NaN or infinite.
    #[error("{context}[{index}] = {value} is not a finite non-negative number")]
    InvalidEntry {
        /// Which input contained the entry.
        context: &'static str,
        /// Index of the entry.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// A distribution does not sum to one.
    #[error("{context} sums to {sum}, expected 1")]
    NotNormalized {
        /// Which input is not normalized.
        context: &'static str,
        /// Actual sum.
        sum: f64,
    },

    /// A bin index lies outside of the track.
    #[error("bin {bin} is outside of the track with {len} bins")]
    BinOutOfRange {
        /// Requested bin.
        bin: usize,
        /// Number of bins of the track.
        len: usize,
    },

    /// The normalizing constant of the update step vanished.
    ///
    /// The likelihood assigns zero probability to every bin the prior considers possible, hence
    /// the posterior is undefined.
    #[error("normalizing constant {z} is degenerate, observation contradicts every plausible bin")]
    DegenerateNormalization {
        /// The computed normalizing constant.
        z: f64,
    },
}

impl BayesFilterError {
    /// True if the error is caused by inputs violating the operation's contract.
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_degenerate()
    }

    /// True if the update step could not normalize the posterior.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, BayesFilterError::DegenerateNormalization { .. })
    }
}

/// Result type of the discrete Bayes filter.
pub type Result<T> = std::result::Result<T, BayesFilterError>;
