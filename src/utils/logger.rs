use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "FIELDRULES_LOG_FORMAT";

/// Log output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text format with timestamp, level, target, and message
    Text,
    /// JSON format with structured fields: timestamp, level, target, message
    Json,
}

impl LogFormat {
    /// Parses a format name, ignoring case. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" => Some(LogFormat::Text),
            _ => None,
        }
    }

    /// Parses a format string from environment or returns the default Text format
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fieldrules::utils::logger::LogFormat;
    ///
    /// assert_eq!(LogFormat::from_env_or_default(), LogFormat::Text); // default
    /// std::env::set_var("FIELDRULES_LOG_FORMAT", "json");
    /// assert_eq!(LogFormat::from_env_or_default(), LogFormat::Json);
    /// ```
    pub fn from_env_or_default() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|s| LogFormat::parse(&s))
            .unwrap_or(LogFormat::Text)
    }
}

/// Initializes the tracing subscriber used by the engine's log output.
///
/// Sets up:
/// - Environment filter for log level control (`RUST_LOG`, `info` when unset)
/// - A text or JSON `fmt` layer, chosen by `FIELDRULES_LOG_FORMAT`
/// - Log-to-tracing bridge so the engine's `log` macros reach the subscriber
///
/// This function is safe to call multiple times. If called when a global subscriber
/// is already set, it returns `Ok(())` without error (idempotent).
///
/// # Examples
///
/// ```
/// use fieldrules::utils::logger::init_logging;
///
/// let _ = init_logging();
/// ```
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_with(LogFormat::from_env_or_default())
}

/// Same as [`init_logging`] with an explicit output format.
pub fn init_logging_with(format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_log::LogTracer;
    use tracing_subscriber::fmt;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (text_layer, json_layer) = match format {
        LogFormat::Text => (Some(fmt::layer().with_target(true)), None),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_target(true).with_current_span(true)),
        ),
    };

    // Initialize LogTracer bridge first (idempotent - errors are ignored)
    let _ = LogTracer::init();

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .try_init();

    if let Err(e) = result {
        // Another subscriber owns the process; keep using it.
        eprintln!(
            "Tracing subscriber already initialized or failed to initialize: {:?}",
            e
        );
    }

    Ok(())
}
