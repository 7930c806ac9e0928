use crate::config::RunwareConfig;
use crate::error::{Result, RunwareError};
use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::RwLock;
use std::time::{Duration, Instant};

static RUNWARE_LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::new);

pub fn init() -> Result<()> {
    init_with_config(LoggerConfig::default())
}

/// Installs the console logger as the global `log` backend.
///
/// Can only succeed once per process; later calls only update the config.
pub fn init_with_config(config: LoggerConfig) -> Result<()> {
    let filter = config.min_level.to_level_filter();
    RUNWARE_LOGGER.update_config(config);

    let installed = log::set_logger(&*RUNWARE_LOGGER);
    log::set_max_level(filter);
    installed.map_err(|e| RunwareError::Config(format!("failed to set logger: {}", e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn badge(&self) -> (Color, &'static str) {
        match self {
            LogLevel::Trace => (Color::Cyan, "🔍"),
            LogLevel::Debug => (Color::Blue, "🐛"),
            LogLevel::Info => (Color::Green, "💡"),
            LogLevel::Warn => (Color::Yellow, "⚠️"),
            LogLevel::Error => (Color::Red, "❌"),
        }
    }

    pub fn color(&self) -> Color {
        self.badge().0
    }

    pub fn emoji(&self) -> &'static str {
        self.badge().1
    }

    pub fn as_str(&self) -> &'static str {
        Level::from(*self).as_str()
    }

    pub fn to_level_filter(&self) -> LevelFilter {
        Level::from(*self).to_level_filter()
    }

    /// Whether a record at `level` passes this minimum.
    pub fn allows(&self, level: Level) -> bool {
        level <= self.to_level_filter()
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }
}

/// One formatted record, also the shape of a JSON log line.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        };
        Self {
            timestamp: Utc::now(),
            level: record.level().into(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            location,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_target: bool,
    pub show_file_location: bool,
    pub timestamp_format: String,
    pub output_json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_target: true,
            show_file_location: false,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    /// Debug level so request payloads and timings show up.
    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_colors: true,
            show_emojis: true,
            show_file_location: true,
            ..Default::default()
        }
    }
}

/// `log` backend writing one line per record to stderr.
pub struct ConsoleLogger {
    config: RwLock<LoggerConfig>,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            config: RwLock::new(LoggerConfig::default()),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) {
        if let Ok(mut config) = self.config.write() {
            *config = new_config;
        }
    }

    fn format_line(entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.output_json {
            return serde_json::to_string(entry).unwrap_or_else(|_| entry.message.clone());
        }

        let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
        let level = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };

        let mut output = String::new();
        if config.show_colors {
            output.push_str(&format!(
                "{} [{}] ",
                timestamp.bright_black(),
                level.color(entry.level.color()).bold()
            ));
            if config.show_target {
                output.push_str(&format!("{}: ", entry.target.bright_blue()));
            }
            output.push_str(&entry.message);
        } else {
            output.push_str(&format!("{} [{}] ", timestamp, level));
            if config.show_target {
                output.push_str(&format!("{}: ", entry.target));
            }
            output.push_str(&entry.message);
        }

        if config.show_file_location {
            if let Some(location) = &entry.location {
                if config.show_colors {
                    output.push_str(&format!(" ({})", location.bright_black()));
                } else {
                    output.push_str(&format!(" ({})", location));
                }
            }
        }

        output
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.read() {
            Ok(config) => config.min_level.allows(metadata.level()),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_record(record);
        if let Ok(config) = self.config.read() {
            let line = Self::format_line(&entry, &config);
            let _ = writeln!(io::stderr().lock(), "{}", line);
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Logs how long a request took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::debug!(
            "⏱️  {} completed in {}ms",
            self.name,
            self.elapsed().as_millis()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_config_info(config: &RunwareConfig) {
    log::info!("⚙️  Runware client configuration:");
    log::info!("   Endpoint: {}", config.api_url);
    log::info!("   API key: {}", config.masked_api_key());
    match config.timeout {
        Some(timeout) => log::info!("   Timeout: {}s", timeout.as_secs()),
        None => log::info!("   Timeout: none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level,
            target: "runware::runware".to_string(),
            message: message.to_string(),
            location: Some("src/runware/mod.rs:10".to_string()),
        }
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Error.emoji(), "❌");
        assert_eq!(LogLevel::Debug.color(), Color::Blue);
        assert_eq!(LogLevel::from(Level::Warn), LogLevel::Warn);
        assert!(LogLevel::Info.allows(Level::Error));
        assert!(!LogLevel::Info.allows(Level::Debug));
    }

    #[test]
    fn level_names_follow_log_crate() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(LogLevel::from(Level::from(level)), level);
            assert_eq!(level.as_str(), Level::from(level).as_str());
        }
        assert_eq!(LogLevel::Warn.to_level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn test_logger_config() {
        let config = LoggerConfig::development();
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.show_colors);

        let prod_config = LoggerConfig::production();
        assert!(!prod_config.show_colors);
        assert!(prod_config.output_json);
    }

    #[test]
    fn plain_line_layout() {
        let config = LoggerConfig::new()
            .with_colors(false)
            .with_level(LogLevel::Trace);
        let config = LoggerConfig {
            show_emojis: false,
            ..config
        };
        let line = ConsoleLogger::format_line(&entry(LogLevel::Info, "dispatching"), &config);
        assert!(line.contains("[INFO] runware::runware: dispatching"));
        assert!(!line.contains("src/runware/mod.rs"));
    }

    #[test]
    fn json_line_layout() {
        let line = ConsoleLogger::format_line(
            &entry(LogLevel::Warn, "no results"),
            &LoggerConfig::production(),
        );
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["message"], "no results");
        assert_eq!(value["location"], "src/runware/mod.rs:10");
    }

    #[test]
    fn test_logger_initialization() {
        let _ = init_with_config(LoggerConfig::development());
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }
}
