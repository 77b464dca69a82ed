use hifitime::Duration;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_binary() -> String {
    String::from("rnx2rtkp")
}

fn default_mode_flag() -> String {
    String::from("-k")
}

fn default_config_file() -> PathBuf {
    PathBuf::from("optimized.conf")
}

fn default_output_flag() -> String {
    String::from("-o")
}

fn default_solution_file() -> String {
    String::from("solution.pos")
}

fn default_min_overlap_s() -> f64 {
    600.0
}

fn default_min_solution_size() -> u64 {
    1000
}

fn default_check_exit_status() -> bool {
    true
}

/// Post processing configuration. Defaults match a standard
/// RTKLIB kinematic run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Output directory, created if need be.
    #[cfg_attr(feature = "serde", serde(default = "default_output_dir"))]
    pub output_dir: PathBuf,
    /// Positioning binary: either a path or a name
    /// resolved with $PATH.
    #[cfg_attr(feature = "serde", serde(default = "default_binary"))]
    pub binary: String,
    /// Flag introducing the configuration file
    #[cfg_attr(feature = "serde", serde(default = "default_mode_flag"))]
    pub mode_flag: String,
    /// Configuration file, handed over as is (not resolved)
    /// so relative to the current directory.
    #[cfg_attr(feature = "serde", serde(default = "default_config_file"))]
    pub config_file: PathBuf,
    /// Flag introducing the solution file
    #[cfg_attr(feature = "serde", serde(default = "default_output_flag"))]
    pub output_flag: String,
    /// Solution file name, within the output directory
    #[cfg_attr(feature = "serde", serde(default = "default_solution_file"))]
    pub solution_file: String,
    /// Overlaps shorter than this [s] are marginal
    #[cfg_attr(feature = "serde", serde(default = "default_min_overlap_s"))]
    pub min_overlap_s: f64,
    /// Solutions must be larger than this [bytes]
    #[cfg_attr(feature = "serde", serde(default = "default_min_solution_size"))]
    pub min_solution_size: u64,
    /// Also require the binary to exit successfully
    #[cfg_attr(feature = "serde", serde(default = "default_check_exit_status"))]
    pub check_exit_status: bool,
    /// Kill the binary after this many seconds
    #[cfg_attr(feature = "serde", serde(default))]
    pub timeout_s: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            binary: default_binary(),
            mode_flag: default_mode_flag(),
            config_file: default_config_file(),
            output_flag: default_output_flag(),
            solution_file: default_solution_file(),
            min_overlap_s: default_min_overlap_s(),
            min_solution_size: default_min_solution_size(),
            check_exit_status: default_check_exit_status(),
            timeout_s: None,
        }
    }
}

impl Config {
    /// Default [Config] writing into given directory
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self::default().with_output_dir(output_dir)
    }
    /// Copies and returns [Config] with given output directory
    pub fn with_output_dir<P: AsRef<Path>>(&self, dir: P) -> Self {
        let mut s = self.clone();
        s.output_dir = dir.as_ref().to_path_buf();
        s
    }
    /// Copies and returns [Config] with given positioning binary
    pub fn with_binary(&self, binary: &str) -> Self {
        let mut s = self.clone();
        s.binary = binary.to_string();
        s
    }
    /// Copies and returns [Config] with given configuration file
    pub fn with_config_file<P: AsRef<Path>>(&self, file: P) -> Self {
        let mut s = self.clone();
        s.config_file = file.as_ref().to_path_buf();
        s
    }
    /// Copies and returns [Config] with given minimal overlap
    pub fn with_min_overlap(&self, dt: Duration) -> Self {
        let mut s = self.clone();
        s.min_overlap_s = dt.to_seconds();
        s
    }
    /// Copies and returns [Config] with given minimal solution size
    pub fn with_min_solution_size(&self, size: u64) -> Self {
        let mut s = self.clone();
        s.min_solution_size = size;
        s
    }
    /// Copies and returns [Config] with exit status gating on/off
    pub fn with_exit_status_check(&self, check: bool) -> Self {
        let mut s = self.clone();
        s.check_exit_status = check;
        s
    }
    /// Copies and returns [Config] with given process timeout
    pub fn with_timeout(&self, dt: Duration) -> Self {
        let mut s = self.clone();
        s.timeout_s = Some(dt.to_seconds());
        s
    }
    /// Minimal overlap, below which a warning is emitted.
    /// Non finite values fall back to the default.
    pub fn min_overlap(&self) -> Duration {
        if self.min_overlap_s.is_finite() {
            Duration::from_seconds(self.min_overlap_s)
        } else {
            Duration::from_seconds(default_min_overlap_s())
        }
    }
    /// Process timeout, if any.
    /// Non finite or non positive values mean no timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_s
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(Duration::from_seconds)
    }
    /// Full path of the solution file
    pub fn solution_path(&self) -> PathBuf {
        self.output_dir.join(&self.solution_file)
    }
}
