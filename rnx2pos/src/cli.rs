use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};
use std::path::{Path, PathBuf};

/// Timeout must be a finite, strictly positive number of seconds
fn parse_timeout(s: &str) -> Result<f64, String> {
    let secs = s
        .parse::<f64>()
        .map_err(|e| format!("invalid number of seconds: {}", e))?;
    if secs.is_finite() && secs > 0.0 {
        Ok(secs)
    } else {
        Err(format!("expecting a positive number of seconds, got {}", secs))
    }
}

pub struct Cli {
    /// arguments passed by user
    pub matches: ArgMatches,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            matches: Self::command().get_matches(),
        }
    }
    #[cfg(test)]
    pub fn from_args(args: &[&str]) -> Self {
        Self {
            matches: Self::command().get_matches_from(args),
        }
    }
    fn command() -> Command {
        Command::new("rnx2pos")
            .author("Guillaume W. Bres <guillaume.bressaix@gmail.com>")
            .version(env!("CARGO_PKG_VERSION"))
            .about("PPK solution from rover and base station Observation RINEX")
            .arg_required_else_help(true)
            .color(ColorChoice::Always)
            .arg(
                Arg::new("rover")
                    .short('r')
                    .long("rover")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help("Rover Observation RINEX")
                    .required(true),
            )
            .arg(
                Arg::new("base")
                    .short('b')
                    .long("base")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help("Base station Observation RINEX")
                    .required(true),
            )
            .arg(
                Arg::new("nav")
                    .short('n')
                    .long("nav")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help("Navigation RINEX")
                    .required_unless_present("check-only"),
            )
            .arg(
                Arg::new("workspace")
                    .short('w')
                    .long("workspace")
                    .value_name("DIR")
                    .value_parser(value_parser!(PathBuf))
                    .help(
                        "Define custom output directory.
Otherwise, we use $PPK_WORKSPACE or ./output.",
                    ),
            )
            .arg(
                Arg::new("check-only")
                    .long("check-only")
                    .action(ArgAction::SetTrue)
                    .help("Only verify that rover and base observations overlap."),
            )
            .next_help_heading("Solver")
            .arg(
                Arg::new("bin")
                    .long("bin")
                    .value_name("PATH")
                    .help("Positioning binary, default: \"rnx2rtkp\" from $PATH."),
            )
            .arg(
                Arg::new("conf")
                    .short('k')
                    .long("conf")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help("Solver configuration file, default: \"optimized.conf\"."),
            )
            .arg(
                Arg::new("cfg")
                    .short('c')
                    .long("cfg")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .help(
                        "Custom configuration (JSON). Command line options
have precedence.",
                    ),
            )
            .arg(
                Arg::new("timeout")
                    .short('t')
                    .long("timeout")
                    .value_name("SECONDS")
                    .value_parser(parse_timeout)
                    .help("Kill the positioning binary after that many seconds."),
            )
            .arg(
                Arg::new("ignore-exit-status")
                    .long("ignore-exit-status")
                    .action(ArgAction::SetTrue)
                    .help("Only judge the solution file, whatever the solver exit code."),
            )
    }
    pub fn rover(&self) -> &Path {
        self.matches
            .get_one::<PathBuf>("rover")
            .map(|p| p.as_path())
            .unwrap_or_else(|| Path::new(""))
    }
    pub fn base(&self) -> &Path {
        self.matches
            .get_one::<PathBuf>("base")
            .map(|p| p.as_path())
            .unwrap_or_else(|| Path::new(""))
    }
    pub fn nav(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("nav")
    }
    /// Output directory, from the command line only.
    /// See [Cli::workspace_or] for the environment fallback.
    pub fn workspace(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("workspace")
    }
    /// Output directory, from the command line or given fallback
    /// (usually $PPK_WORKSPACE)
    pub fn workspace_or(&self, fallback: Option<PathBuf>) -> Option<PathBuf> {
        self.workspace().cloned().or(fallback)
    }
    pub fn check_only(&self) -> bool {
        self.matches.get_flag("check-only")
    }
    pub fn binary(&self) -> Option<&String> {
        self.matches.get_one::<String>("bin")
    }
    pub fn solver_conf(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("conf")
    }
    pub fn config(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("cfg")
    }
    pub fn timeout(&self) -> Option<f64> {
        self.matches.get_one::<f64>("timeout").copied()
    }
    pub fn ignore_exit_status(&self) -> bool {
        self.matches.get_flag("ignore-exit-status")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    fn cli(args: &[&str]) -> Cli {
        Cli::from_args(args)
    }
    #[test]
    fn ppk_args() {
        let cli = cli(&[
            "rnx2pos",
            "-r",
            "rover.obs",
            "-b",
            "base.obs",
            "-n",
            "base.nav",
            "-w",
            "/tmp/ppk",
            "--timeout",
            "30",
        ]);
        assert_eq!(cli.rover(), Path::new("rover.obs"));
        assert_eq!(cli.base(), Path::new("base.obs"));
        assert_eq!(cli.nav(), Some(&PathBuf::from("base.nav")));
        assert_eq!(cli.workspace(), Some(&PathBuf::from("/tmp/ppk")));
        assert_eq!(
            cli.workspace_or(Some(PathBuf::from("/data"))),
            Some(PathBuf::from("/tmp/ppk"))
        );
        assert_eq!(cli.timeout(), Some(30.0));
        assert!(!cli.check_only());
        assert!(!cli.ignore_exit_status());
        assert!(cli.binary().is_none());
    }
    #[test]
    fn check_only_args() {
        let cli = cli(&["rnx2pos", "-r", "rover.obs", "-b", "base.obs", "--check-only"]);
        assert!(cli.check_only());
        assert!(cli.nav().is_none());
        assert!(cli.workspace().is_none());
        assert_eq!(
            cli.workspace_or(Some(PathBuf::from("/data"))),
            Some(PathBuf::from("/data"))
        );
        assert!(cli.workspace_or(None).is_none());
    }
    #[test]
    fn nav_required() {
        let res = Cli::command().try_get_matches_from([
            "rnx2pos",
            "-r",
            "rover.obs",
            "-b",
            "base.obs",
        ]);
        assert!(res.is_err());
    }
    #[test]
    fn invalid_timeout() {
        for timeout in ["inf", "NaN", "-inf", "0", "-3", "abc"] {
            let res = Cli::command().try_get_matches_from([
                "rnx2pos",
                "-r",
                "rover.obs",
                "-b",
                "base.obs",
                "--check-only",
                "--timeout",
                timeout,
            ]);
            assert!(res.is_err(), "--timeout {} should be rejected", timeout);
        }
        let cli = cli(&[
            "rnx2pos",
            "-r",
            "rover.obs",
            "-b",
            "base.obs",
            "--check-only",
            "--timeout",
            "0.5",
        ]);
        assert_eq!(cli.timeout(), Some(0.5));
    }
}
