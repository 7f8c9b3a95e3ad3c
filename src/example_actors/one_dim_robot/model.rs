use std::fmt::Debug;
use std::fmt::Display;

use nalgebra::DVector;

use crate::bayes::{BayesFilterError, Belief, Likelihood};

/// A generic value with a timestamp.
#[derive(Clone, Debug, Default)]
pub struct Stamped<T: Clone + Debug> {
    /// Timestamp of the value.
    pub time: f64,
    /// Monotonic sequence counter, one per simulated step.
    pub seq: u64,
    /// The value.
    pub value: T,
}

impl<T: Clone + Debug> Stamped<T> {
    /// Creates a new value with a timestamp.
    pub fn from_stamp_counter_and_value(time: f64, seq: u64, value: &T) -> Self {
        Self {
            time,
            seq,
            value: value.clone(),
        }
    }
}

impl<T: Display + Clone + Debug> Display for Stamped<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{} #{} {}", self.time, self.seq, self.value)
    }
}

/// A robot in a one dimensional world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Robot {
    /// Bin the robot is in.
    pub bin: usize,
    /// Intended displacement per step, in bins.
    pub velocity: i64,
}

impl Display for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(bin: {}, velocity: {})", self.bin, self.velocity)
    }
}

/// A circular one dimensional track of `num_bins` bins with doors at some of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    num_bins: usize,
    landmarks: Vec<usize>,
}

impl World {
    /// Creates a world, landmark bins must lie on the track.
    pub fn new(num_bins: usize, landmarks: Vec<usize>) -> Result<Self, BayesFilterError> {
        if num_bins == 0 {
            return Err(BayesFilterError::Empty { context: "world" });
        }
        let mut landmarks = landmarks;
        landmarks.sort_unstable();
        landmarks.dedup();
        if let Some(&bin) = landmarks.iter().find(|&&bin| bin >= num_bins) {
            return Err(BayesFilterError::BinOutOfRange { bin, len: num_bins });
        }
        Ok(Self {
            num_bins,
            landmarks,
        })
    }

    /// Number of bins.
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Sorted bins of the doors.
    pub fn landmarks(&self) -> &[usize] {
        &self.landmarks
    }

    /// True if there is a door at `bin`.
    pub fn is_landmark(&self, bin: usize) -> bool {
        self.landmarks.binary_search(&bin).is_ok()
    }

    /// Bin reached from `bin` after moving `displacement` bins, wrapping around.
    pub fn advance(&self, bin: usize, displacement: i64) -> usize {
        let n = self.num_bins as i64;
        (bin as i64 + displacement.rem_euclid(n)).rem_euclid(n) as usize
    }

    /// Signed distance from `from` to `to` along the shorter way around the track.
    pub fn signed_distance(&self, from: usize, to: usize) -> i64 {
        let n = self.num_bins as i64;
        let d = (to as i64 - from as i64).rem_euclid(n);
        if d > n / 2 {
            d - n
        } else {
            d
        }
    }
}

impl Default for World {
    /// 100 bins with doors at 10, 25 and 50.
    fn default() -> Self {
        Self {
            num_bins: 100,
            landmarks: vec![10, 25, 50],
        }
    }
}

/// Binary door sensor.
///
/// The sensor fires if and only if the robot is exactly at a door. The likelihood of a reading
/// is spread uniformly over all bins consistent with it: on detection each door bin gets
/// `1 / #doors` and every other bin zero, otherwise each door bin gets zero and every other bin
/// `1 / (N - #doors)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LandmarkSensorModel {
    /// The world the sensor lives in.
    pub world: World,
}

impl LandmarkSensorModel {
    /// Creates the sensor model for `world`.
    pub fn new(world: World) -> Self {
        Self { world }
    }

    /// Sensor reading for a robot at `robot_bin`.
    pub fn detect(&self, robot_bin: usize) -> bool {
        self.world.is_landmark(robot_bin)
    }

    /// Likelihood of the reading `detected` for each bin.
    pub fn likelihood(&self, detected: bool) -> Likelihood {
        let n = self.world.num_bins();
        let num_doors = self.world.landmarks().len();
        let (on_door, off_door) = if detected {
            (1.0 / num_doors.max(1) as f64, 0.0)
        } else if n > num_doors {
            (0.0, 1.0 / (n - num_doors) as f64)
        } else {
            (0.0, 0.0)
        };
        Likelihood::from_vector_unchecked(DVector::from_fn(n, |i, _| {
            if self.world.is_landmark(i) {
                on_door
            } else {
                off_door
            }
        }))
    }
}

/// What the robot knows at each step: its commanded motion and the door sensor reading.
#[derive(Clone, Debug)]
pub struct Observation {
    /// Commanded displacement in bins.
    pub offset: i64,
    /// Door sensor fired.
    pub detected: bool,
    /// Likelihood of the sensor reading.
    pub likelihood: Likelihood,
}

impl Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(offset: {}, {})",
            self.offset,
            if self.detected { "door" } else { "no door" }
        )
    }
}

/// Filter output of one step.
#[derive(Clone, Debug)]
pub struct Estimate {
    /// Posterior belief.
    pub belief: Belief,
    /// Likelihood used for the update.
    pub likelihood: Likelihood,
    /// Most likely bin.
    pub bin: usize,
    /// Door sensor fired.
    pub detected: bool,
    /// The update was degenerate and the filter applied its recovery policy.
    pub recovered: bool,
}

impl Display for Estimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.belief)?;
        if self.recovered {
            write!(f, " [recovered]")?;
        }
        Ok(())
    }
}
