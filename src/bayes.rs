//! Discrete (histogram) Bayes filter.
//!
//! The filter keeps a [Belief] over the `N` bins of a one dimensional, circular track and
//! refines it each time step with two operations:
//!
//! - [predict] convolves the belief with a [MotionKernel] centered at the intended offset,
//!   wrapping around at the ends of the track.
//! - [update] multiplies the predicted belief element-wise with a [Likelihood] and renormalizes.
//!
//! Both are pure functions. [DiscreteBayesFilter] wraps them around an owned belief for callers
//! that prefer a stateful handle.

/// Typed error of the filter operations.
pub mod error;
pub use error::{BayesFilterError, Result};

/// Belief, likelihood and motion kernel.
pub mod distribution;
pub use distribution::{Belief, Likelihood, MotionKernel, SUM_TOLERANCE};

/// Predict and update.
pub mod ops;
pub use ops::{predict, predict_slice, update, update_slice, NORMALIZATION_EPSILON};

/// Stateful filter instance.
pub mod discrete_filter;
pub use discrete_filter::DiscreteBayesFilter;
