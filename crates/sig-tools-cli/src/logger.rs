use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;

/// Logger writing progress and diagnostics to stderr.
///
/// Stdout may carry the imposed document, so nothing is ever logged there.
#[derive(Clone, Copy)]
pub struct StderrLogger {
    max_level: LevelFilter,
}

impl StderrLogger {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let max_level = match (quiet, verbose) {
            (true, _) => LevelFilter::Warn,
            (false, true) => LevelFilter::Debug,
            (false, false) => LevelFilter::Info,
        };
        Self { max_level }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(self.max_level);
        Ok(())
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut stderr = std::io::stderr().lock();
        let _ = match record.level() {
            Level::Info => writeln!(stderr, "{}", record.args()),
            level => writeln!(
                stderr,
                "sigbook: {}: {}",
                level.as_str().to_lowercase(),
                record.args()
            ),
        };
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
