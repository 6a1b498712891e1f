//! `log` backend writing to the host log

use std::ffi::CString;
use std::sync::OnceLock;

use libc::{c_char, c_int};
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::host::{LOG_DEBUG, LOG_ERROR, LOG_INFO, LOG_WARNING};

static LOGGER: OnceLock<HostLogger> = OnceLock::new();

pub struct HostLogger {
    write: unsafe extern "C" fn(level: c_int, message: *const c_char),
}

fn host_level(level: Level) -> c_int {
    match level {
        Level::Error => LOG_ERROR,
        Level::Warn => LOG_WARNING,
        Level::Info => LOG_INFO,
        Level::Debug | Level::Trace => LOG_DEBUG,
    }
}

impl Log for HostLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Interior NULs would truncate the line on the C side
        let line = record.args().to_string().replace('\0', " ");
        if let Ok(line) = CString::new(line) {
            unsafe { (self.write)(host_level(record.level()), line.as_ptr()) };
        }
    }

    fn flush(&self) {}
}

/// Route `log` records to the host. Later calls keep the first logger.
pub fn install(write: unsafe extern "C" fn(c_int, *const c_char)) {
    let logger = LOGGER.get_or_init(|| HostLogger { write });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        });
    }
}
