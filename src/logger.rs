use std::path::Path;

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::Error;

const CONFIG_FILE: &str = "log4rs.yaml";
const FALLBACK_PATTERN: &str = "{d(%H:%M:%S)} {l} {t} - {m}{n}";

/// Set up the global logger from `log4rs.yaml`, or log to stderr at info
/// level when no usable configuration file is found.
pub fn init_logging() -> crate::Result<()> {
    if Path::new(CONFIG_FILE).is_file()
        && log4rs::init_file(CONFIG_FILE, Default::default()).is_ok()
    {
        return Ok(());
    }
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))
        .map_err(|e| Error::LoggerInitialization(e.to_string()))?;
    log4rs::init_config(config).map_err(|e| Error::LoggerInitialization(e.to_string()))?;
    Ok(())
}

pub fn log_header(magic: &str, width: usize, height: usize, max_value: Option<u8>) {
    match max_value {
        Some(max_value) => log::info!("{} {}x{}, max value {}", magic, width, height, max_value),
        None => log::info!("{} {}x{}", magic, width, height),
    }
}
