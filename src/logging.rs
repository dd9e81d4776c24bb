use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::path::PathBuf;

use crate::core::config;

pub fn log_path() -> PathBuf {
    config::data_dir().join("telecrafter.log")
}

/// Log to a file under the data dir. `console` adds a stderr appender for
/// warnings; leave it off while the form owns the terminal.
pub fn setup(verbose: bool, console: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let path = log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let mut builder = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)));
    let mut root = Root::builder().appender("file");

    if console {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new("{l}: {m}{n}")))
            .build();
        builder = builder.appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Warn)))
                .build("stderr", Box::new(stderr)),
        );
        root = root.appender("stderr");
    }

    let config = builder
        .build(root.build(level))
        .context("invalid logging configuration")?;
    log4rs::init_config(config).context("failed to initialize logging")?;
    log::debug!("logging to {}", path.display());
    Ok(())
}
