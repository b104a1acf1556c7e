//! Process-wide logger.

use log::LevelFilter;

/// Install a stderr logger at `level`.  Only the first call in a process
/// succeeds; later ones return the `SetLoggerError`.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{:<5} {}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
