use std::env;

use log::{Level, LevelFilter};

use crate::{issue_command, SecretMasker};

/// Routes `log` records to stdout as workflow commands, masking every
/// registered secret on the way out.
pub fn setup_logging(masker: SecretMasker) -> Result<(), fern::InitError> {
    let level = level_from(
        env::var("LOG_LEVEL").ok().as_deref(),
        env::var("RUNNER_DEBUG").ok().as_deref(),
    );

    let stdout_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}",
                render_record(&masker, record.level(), &message.to_string())
            ))
        })
        .level(level)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .chain(std::io::stdout());

    fern::Dispatch::new().chain(stdout_config).apply()?;

    Ok(())
}

fn level_from(log_level: Option<&str>, runner_debug: Option<&str>) -> LevelFilter {
    match log_level {
        Some("debug") => LevelFilter::Debug,
        Some("info") => LevelFilter::Info,
        Some("warn") => LevelFilter::Warn,
        Some("error") => LevelFilter::Error,
        _ if runner_debug == Some("1") => LevelFilter::Debug,
        _ => LevelFilter::Info, // Info carries the step's progress report
    }
}

fn render_record(masker: &SecretMasker, level: Level, message: &str) -> String {
    let message = masker.mask(message);
    match level {
        Level::Error => issue_command("error", &message),
        Level::Warn => issue_command("warning", &message),
        Level::Info => message,
        Level::Debug | Level::Trace => issue_command("debug", &message),
    }
}
