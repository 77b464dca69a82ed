//! Rover / Base station RINEX time overlap validation,
//! and Post Processed Kinematic (PPK) driver for external positioning
//! binaries, like RTKLIB `rnx2rtkp`.
#![cfg_attr(docrs, feature(doc_cfg))]

pub mod bounds;
pub mod cfg;
pub mod epoch;
pub mod overlap;
pub mod process;
pub mod reader;
pub mod report;

mod ppk;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use thiserror::Error;

pub use ppk::{Ppk, Solution, SolutionStatus};

/// Package to include all basic structures
pub mod prelude {
    pub use crate::bounds::ObservationBounds;
    pub use crate::cfg::Config;
    pub use crate::overlap::{Overlap, OverlapStatus, Site};
    pub use crate::process::{ProcessError, ProcessOutput, ProcessRunner, SystemRunner};
    pub use crate::report::{LogReporter, Reporter};
    pub use crate::{Error, Ppk, Solution, SolutionStatus};
    // pub re-export
    pub use hifitime::{Duration, Epoch, Unit};
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] std::io::Error),
    #[error("missing input file \"{0}\"")]
    MissingInput(PathBuf),
    #[error("failed to read timestamps from {0} observations")]
    MissingEpochs(overlap::Site),
    #[error("positioning process error")]
    Process(#[from] process::ProcessError),
}
