//! Rover / Base time overlap
use hifitime::{Duration, Epoch};

use crate::{bounds::ObservationBounds, Error};

/// Data source, in differential positioning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    /// Moving receiver
    Rover,
    /// Stationary reference receiver
    Base,
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Rover => write!(f, "rover"),
            Self::Base => write!(f, "base"),
        }
    }
}

/// Overlap classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapStatus {
    /// Datasets do not overlap at all (or only touch)
    Disjoint,
    /// Datasets overlap, for less than the minimal duration
    Marginal,
    /// Datasets overlap, for at least the minimal duration
    Sufficient,
}

/// Common time window of two datasets. `end` may precede `start`,
/// in which case the datasets are disjoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub start: Epoch,
    pub end: Epoch,
}

impl Overlap {
    /// Forms the common window of rover and base datasets.
    pub fn new(rover: &ObservationBounds, base: &ObservationBounds) -> Result<Self, Error> {
        let (r_start, r_end) = rover.span().ok_or(Error::MissingEpochs(Site::Rover))?;
        let (b_start, b_end) = base.span().ok_or(Error::MissingEpochs(Site::Base))?;
        Ok(Self {
            start: if r_start > b_start { r_start } else { b_start },
            end: if r_end < b_end { r_end } else { b_end },
        })
    }
    /// Signed duration of the common window. Null or negative
    /// when the datasets do not overlap.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
    /// Returns true if datasets do not overlap
    pub fn is_empty(&self) -> bool {
        self.duration() <= Duration::ZERO
    }
    /// Time separating both datasets, when they do not overlap
    pub fn gap(&self) -> Option<Duration> {
        if self.is_empty() {
            Some(self.duration().abs())
        } else {
            None
        }
    }
    /// Classifies this window with respect to the minimal overlap duration.
    pub fn status(&self, min_overlap: Duration) -> OverlapStatus {
        let dt = self.duration();
        if dt <= Duration::ZERO {
            OverlapStatus::Disjoint
        } else if dt < min_overlap {
            OverlapStatus::Marginal
        } else {
            OverlapStatus::Sufficient
        }
    }
}
