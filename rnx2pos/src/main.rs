//! Command line tool to validate rover / base station time overlap
//! and produce a PPK solution with an external solver (RTKLIB `rnx2rtkp`).
//! Homepage: <https://github.com/georust/rinex>

mod cli; // command line interface
use cli::Cli;

use env_logger::{Builder, Target};
use std::fs::read_to_string;
use std::path::PathBuf;
use std::process::ExitCode;

#[macro_use]
extern crate log;

use rinex_ppk::prelude::{Config, Ppk};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error")]
    StdioError(#[from] std::io::Error),
    #[error("failed to parse configuration")]
    ConfigError(#[from] serde_json::Error),
    #[error("ppk error")]
    PpkError(#[from] rinex_ppk::Error),
    #[error("missing (BRDC) NAV RINEX")]
    MissingNavigationRinex,
}

/*
 * Custom configuration first, then command line options.
 * Output directory: command line, then `env_workspace`,
 * then custom configuration, then ./output.
 */
fn config(cli: &Cli, env_workspace: Option<PathBuf>) -> Result<Config, Error> {
    let mut cfg = match cli.config() {
        Some(fp) => {
            let content = read_to_string(fp)?;
            let cfg: Config = serde_json::from_str(&content)?;
            info!("using custom configuration: {:#?}", cfg);
            cfg
        },
        None => Config::default(),
    };
    if let Some(dir) = cli.workspace_or(env_workspace) {
        cfg = cfg.with_output_dir(dir);
    }
    if let Some(bin) = cli.binary() {
        cfg = cfg.with_binary(bin);
    }
    if let Some(conf) = cli.solver_conf() {
        cfg = cfg.with_config_file(conf);
    }
    if let Some(timeout) = cli.timeout() {
        cfg.timeout_s = Some(timeout);
    }
    if cli.ignore_exit_status() {
        cfg = cfg.with_exit_status_check(false);
    }
    Ok(cfg)
}

pub fn main() -> Result<ExitCode, Error> {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    let cfg = config(&cli, std::env::var("PPK_WORKSPACE").ok().map(PathBuf::from))?;

    let ppk = Ppk::new(cfg)?;
    info!(
        "session workspace is \"{}\"",
        ppk.config().output_dir.display()
    );

    if !ppk.check_overlap(cli.rover(), cli.base())? {
        return Ok(ExitCode::FAILURE);
    }

    if cli.check_only() {
        return Ok(ExitCode::SUCCESS);
    }

    let nav = cli.nav().ok_or(Error::MissingNavigationRinex)?;
    let solution = ppk.run(cli.rover(), cli.base(), nav)?;

    if let Some(stat) = solution.statistics() {
        info!("solver statistics: \"{}\"", stat.display());
    }

    if solution.is_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
