use flexi_logger::DeferredNow;
use log::{Level, Record};

/// `LEVEL [target] message`, with the timestamp only at debug and below.
pub fn cli_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    match record.level() {
        Level::Error | Level::Warn | Level::Info => write!(
            w,
            "{:<5} [{}] {}",
            record.level(),
            record.target(),
            record.args()
        ),
        Level::Debug | Level::Trace => write!(
            w,
            "{} {:<5} [{}] {}",
            now.format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        ),
    }
}
