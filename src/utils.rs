//! Small shared helpers: logging setup and base64.

use std::fs::OpenOptions;
use std::sync::Once;

use base64::Engine as _;
use log::LevelFilter;

use crate::error::ImgcolError;

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` backend once per process.
///
/// Lines are formatted as `[LEVEL] message`. With `log_file`, output is
/// appended to that file instead of stderr. Later calls are no-ops, even if
/// they pass different arguments.
pub fn init_logging(level: LevelFilter, log_file: Option<&str>) -> Result<(), ImgcolError> {
    // Open the file up front so a bad path is reported rather than swallowed.
    let file = log_file
        .map(|path| OpenOptions::new().append(true).create(true).open(path))
        .transpose()?;

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}

/// Encode arbitrary bytes as base64 using the standard alphabet.
pub fn encode_base64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}
