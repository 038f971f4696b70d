use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};

use crate::console::CONSOLE;

#[cfg(feature = "verbose")]
const MAX_LEVEL: LevelFilter = LevelFilter::Trace;
#[cfg(not(feature = "verbose"))]
const MAX_LEVEL: LevelFilter = LevelFilter::Warn;

/// Writes `[LEVEL] target: message` lines to the console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Dropped rather than deadlocking when logging from inside a
        // console write.
        if let Some(mut console) = CONSOLE.try_lock() {
            let _ = writeln!(
                console,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Installs the console logger.
///
/// # Safety
///
/// Must run once, before anything logs. The racy setters are used because
/// atomic read-modify-write is unavailable with the MMU off.
pub unsafe fn init() {
    if log::set_logger_racy(&LOGGER).is_ok() {
        log::set_max_level_racy(MAX_LEVEL);
    }
}
