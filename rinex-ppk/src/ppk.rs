//! PPK driver: overlap validation and external solver invocation
use hifitime::Duration;
use log::Level;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    bounds::ObservationBounds,
    cfg::Config,
    overlap::{Overlap, OverlapStatus},
    process::{ProcessOutput, ProcessRunner, SystemRunner},
    report::{LogReporter, Reporter},
    Error,
};

/// Post processing verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Solution file was created and looks reasonable
    Created,
    /// Solution file was not created
    Missing,
    /// Solution file is too small to contain anything useful [bytes]
    Undersized(u64),
    /// Solution file looks reasonable but the solver reported a failure
    ExitFailure(Option<i32>),
}

/// Post processing result
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution file
    pub path: PathBuf,
    /// Solution file size [bytes], when it exists
    pub size: Option<u64>,
    /// Verdict
    pub status: SolutionStatus,
    /// Solver output
    pub output: ProcessOutput,
}

impl Solution {
    /// Returns true if a valid solution was produced
    pub fn is_valid(&self) -> bool {
        self.status == SolutionStatus::Created
    }
    /// Returns path to the statistics file, when
    /// the solver was configured to produce one.
    pub fn statistics(&self) -> Option<PathBuf> {
        let mut path = self.path.clone().into_os_string();
        path.push(".stat");
        let path = PathBuf::from(path);
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }
}

/// [Ppk] validates that Rover and Base observations overlap,
/// then drives the external positioning binary.
/// ```no_run
/// use rinex_ppk::prelude::*;
///
/// let ppk = Ppk::new(Config::new("output"))
///     .unwrap();
///
/// if ppk.check_overlap("rover.obs", "base.obs").unwrap() {
///     let solution = ppk.run("rover.obs", "base.obs", "base.nav")
///         .unwrap();
///     assert!(solution.is_valid());
/// }
/// ```
#[derive(Debug)]
pub struct Ppk<R: Reporter = LogReporter, P: ProcessRunner = SystemRunner> {
    cfg: Config,
    reporter: R,
    runner: P,
}

impl Ppk {
    /// Builds a new [Ppk] that reports through the [log] facade and
    /// spawns actual processes. Creates the output directory.
    pub fn new(cfg: Config) -> Result<Self, Error> {
        Self::with_capabilities(cfg, LogReporter, SystemRunner)
    }
}

impl<R: Reporter, P: ProcessRunner> Ppk<R, P> {
    /// Builds a new [Ppk] with custom [Reporter] and [ProcessRunner].
    /// Creates the output directory.
    pub fn with_capabilities(cfg: Config, reporter: R, runner: P) -> Result<Self, Error> {
        let ppk = Self {
            cfg,
            reporter,
            runner,
        };
        ppk.create_output_dir()?;
        Ok(ppk)
    }
    /// Returns [Ppk] using a different [Reporter]
    pub fn with_reporter<T: Reporter>(self, reporter: T) -> Ppk<T, P> {
        Ppk {
            cfg: self.cfg,
            reporter,
            runner: self.runner,
        }
    }
    /// Returns [Ppk] using a different [ProcessRunner]
    pub fn with_runner<T: ProcessRunner>(self, runner: T) -> Ppk<R, T> {
        Ppk {
            cfg: self.cfg,
            reporter: self.reporter,
            runner,
        }
    }
    pub fn config(&self) -> &Config {
        &self.cfg
    }
    pub fn reporter(&self) -> &R {
        &self.reporter
    }
    fn report(&self, level: Level, msg: &str) {
        self.reporter.log(level, msg);
    }
    /// Creates the output directory (and its parents), if need be.
    /// Existing content is preserved.
    pub fn create_output_dir(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.cfg.output_dir)?;
        Ok(())
    }
    /// Scans both files and determines whether PPK should proceed.
    /// Only I/O errors are returned, analysis findings
    /// go to the [Reporter].
    pub fn check_overlap<A: AsRef<Path>, B: AsRef<Path>>(
        &self,
        rover: A,
        base: B,
    ) -> Result<bool, Error> {
        self.report(Level::Info, "time overlap analysis");
        let rover_bounds = ObservationBounds::from_path(&rover)?;
        let base_bounds = ObservationBounds::from_path(&base)?;
        self.report(
            Level::Debug,
            &format!(
                "rover: \"{}\" ({} epochs)",
                rover.as_ref().display(),
                rover_bounds.epochs
            ),
        );
        self.report(
            Level::Debug,
            &format!(
                "base: \"{}\" ({} epochs)",
                base.as_ref().display(),
                base_bounds.epochs
            ),
        );
        Ok(self.check_bounds(&rover_bounds, &base_bounds))
    }
    /// Determines whether PPK should proceed, from known [ObservationBounds].
    pub fn check_bounds(&self, rover: &ObservationBounds, base: &ObservationBounds) -> bool {
        let overlap = match Overlap::new(rover, base) {
            Ok(overlap) => overlap,
            Err(e) => {
                self.report(Level::Error, &e.to_string());
                return false;
            },
        };

        self.report(Level::Info, &format!("rover: {}", rover));
        self.report(Level::Info, &format!("base:  {}", base));

        let dt = overlap.duration().to_seconds();

        match overlap.status(self.cfg.min_overlap()) {
            OverlapStatus::Disjoint => {
                self.report(Level::Error, "no overlap detected!");
                self.report(
                    Level::Error,
                    "base data ends before rover starts (or vice versa)",
                );
                let gap = overlap.gap().unwrap_or(Duration::ZERO);
                self.report(
                    Level::Error,
                    &format!("gap: {:.1} seconds", gap.to_seconds()),
                );
                false
            },
            status => {
                self.report(
                    Level::Info,
                    &format!("common window: {:.1} seconds ({:.1} min)", dt, dt / 60.0),
                );
                if status == OverlapStatus::Marginal {
                    self.report(
                        Level::Warn,
                        &format!(
                            "overlap is very short (<{:.1} min): solution may be unstable",
                            self.cfg.min_overlap_s / 60.0
                        ),
                    );
                }
                true
            },
        }
    }
    /// Command line handed to the positioning binary (binary excluded)
    pub fn command_args<A: AsRef<Path>, B: AsRef<Path>, C: AsRef<Path>>(
        &self,
        rover: A,
        base: B,
        nav: C,
    ) -> Vec<String> {
        vec![
            self.cfg.mode_flag.clone(),
            self.cfg.config_file.to_string_lossy().to_string(),
            self.cfg.output_flag.clone(),
            self.cfg.solution_path().to_string_lossy().to_string(),
            rover.as_ref().to_string_lossy().to_string(),
            base.as_ref().to_string_lossy().to_string(),
            nav.as_ref().to_string_lossy().to_string(),
        ]
    }
    /// Runs the positioning binary and evaluates the solution it produced.
    /// Solver failures are reported and described by the returned [Solution],
    /// only missing inputs, I/O, launch and timeout issues are returned as [Error].
    pub fn run<A: AsRef<Path>, B: AsRef<Path>, C: AsRef<Path>>(
        &self,
        rover: A,
        base: B,
        nav: C,
    ) -> Result<Solution, Error> {
        for input in [rover.as_ref(), base.as_ref(), nav.as_ref()] {
            if !input.exists() {
                return Err(Error::MissingInput(input.to_path_buf()));
            }
        }

        self.report(Level::Info, "ppk processing");
        self.create_output_dir()?;

        let path = self.cfg.solution_path();
        if path.exists() {
            self.report(
                Level::Debug,
                &format!("removing previous solution \"{}\"", path.display()),
            );
            fs::remove_file(&path)?;
        }

        let args = self.command_args(rover, base, nav);
        let output = self
            .runner
            .run(&self.cfg.binary, &args, self.cfg.timeout())?;

        self.report(Level::Debug, &output.stdout);
        if !output.stderr.is_empty() {
            self.report(Level::Debug, &output.stderr);
        }

        let size = fs::metadata(&path).ok().map(|meta| meta.len());

        let status = match size {
            None => SolutionStatus::Missing,
            Some(size) if size <= self.cfg.min_solution_size => SolutionStatus::Undersized(size),
            Some(_) if self.cfg.check_exit_status && !output.success() => {
                SolutionStatus::ExitFailure(output.exit_code)
            },
            Some(_) => SolutionStatus::Created,
        };

        match status {
            SolutionStatus::Created => {
                self.report(
                    Level::Info,
                    &format!(
                        "solution created: \"{}\" ({} bytes)",
                        path.display(),
                        size.unwrap_or_default()
                    ),
                );
            },
            failure => {
                let msg = match failure {
                    SolutionStatus::Missing => {
                        format!("solution \"{}\" was not created", path.display())
                    },
                    SolutionStatus::Undersized(size) => {
                        format!("solution file is empty ({} bytes)", size)
                    },
                    SolutionStatus::ExitFailure(Some(code)) => {
                        format!("{} exited with code {}", self.cfg.binary, code)
                    },
                    _ => format!("{} was interrupted", self.cfg.binary),
                };
                self.report(Level::Error, &msg);
                self.report(
                    Level::Error,
                    &format!("{} error output:\n{}", self.cfg.binary, output.stderr),
                );
            },
        }

        Ok(Solution {
            path,
            size,
            status,
            output,
        })
    }
    /// Validates the overlap, then runs the positioning binary.
    /// Returns None when the datasets should not be post processed.
    pub fn post_process<A: AsRef<Path>, B: AsRef<Path>, C: AsRef<Path>>(
        &self,
        rover: A,
        base: B,
        nav: C,
    ) -> Result<Option<Solution>, Error> {
        if self.check_overlap(&rover, &base)? {
            Ok(Some(self.run(rover, base, nav)?))
        } else {
            Ok(None)
        }
    }
}
