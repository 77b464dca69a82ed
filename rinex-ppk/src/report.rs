//! Analysis reporting
use log::Level;

/// Destination of every finding made during analysis and post processing.
/// Inject your own to redirect or capture the messages.
pub trait Reporter {
    fn log(&self, level: Level, msg: &str);
}

/// [Reporter] forwarding to the [log] facade,
/// whatever logger the application installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn log(&self, level: Level, msg: &str) {
        log::log!(target: "rinex_ppk", level, "{}", msg);
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn log(&self, level: Level, msg: &str) {
        (**self).log(level, msg)
    }
}
