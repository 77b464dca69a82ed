//! Observation time span, from epoch lines
use hifitime::{Duration, Epoch};
use log::trace;
use std::io::BufRead;
use std::path::Path;

use crate::{
    epoch::{is_new_epoch, parse_epoch},
    reader::{BufferedReader, LossyLines},
};

/// First and last valid [Epoch] of an Observation file.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ObservationBounds {
    /// First valid epoch, from the top of the file
    pub start: Option<Epoch>,
    /// Last valid epoch
    pub end: Option<Epoch>,
    /// Number of valid epoch lines encountered
    pub epochs: usize,
}

impl ObservationBounds {
    /// Scans given file in a single forward pass.
    /// Invalid epoch lines are skipped, I/O errors are returned.
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let reader = BufferedReader::new(path.as_ref())?;
        let bounds = Self::from_lines(reader.lossy_lines())?;
        trace!("{}: {:?}", path.as_ref().display(), bounds);
        Ok(bounds)
    }
    /// Scans any [BufRead]able content.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        Self::from_lines(LossyLines::new(reader))
    }
    fn from_lines<I: Iterator<Item = std::io::Result<String>>>(
        lines: I,
    ) -> std::io::Result<Self> {
        let mut bounds = Self::default();
        for line in lines {
            let line = line?;
            if !is_new_epoch(&line) {
                continue;
            }
            if let Ok(epoch) = parse_epoch(&line) {
                if bounds.start.is_none() {
                    bounds.start = Some(epoch);
                }
                bounds.end = Some(epoch);
                bounds.epochs += 1;
            }
        }
        Ok(bounds)
    }
    /// Returns true if both ends were identified
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
    /// Returns both ends, when identified
    pub fn span(&self) -> Option<(Epoch, Epoch)> {
        Some((self.start?, self.end?))
    }
    /// Returns time spanned between first and last epoch
    pub fn duration(&self) -> Option<Duration> {
        let (start, end) = self.span()?;
        Some(end - start)
    }
}

impl std::fmt::Display for ObservationBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.span() {
            Some((start, end)) => write!(f, "{} --> {}", start, end),
            None => write!(f, "undetermined"),
        }
    }
}
