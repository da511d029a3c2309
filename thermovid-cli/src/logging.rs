// thermovid-cli/src/logging.rs
//
// Sets up logging for the CLI: styled console output plus a raw,
// timestamped run log file next to the converted videos.

use std::path::Path;

use console::style;
use log::LevelFilter;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// Used to generate unique names for run log files.
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Initializes the global logger.
///
/// Console output is colored by level and kept terse; the log file gets the
/// full timestamped record of the run. May only be called once per process.
pub fn setup_logging(verbose: bool, log_file: &Path) -> Result<(), fern::InitError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fern::Dispatch::new()
        .level(level)
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    let prefix = match record.level() {
                        log::Level::Error => format!("{}", style("error:").red().bold()),
                        log::Level::Warn => format!("{}", style("warning:").yellow().bold()),
                        log::Level::Info => String::new(),
                        _ => format!("{}", style(record.level().as_str()).dim()),
                    };
                    if prefix.is_empty() {
                        out.finish(format_args!("{message}"))
                    } else {
                        out.finish(format_args!("{prefix} {message}"))
                    }
                })
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {} {}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(fern::log_file(log_file)?),
        )
        .apply()?;
    Ok(())
}
