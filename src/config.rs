use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

// Directory containing the running executable, used to anchor relative
// config and log paths. Falls back to "." when the exe path is unknown.
static EXE_DIR: Lazy<PathBuf> = Lazy::new(|| {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
});

/// Resolve a path from the config file: absolute paths are kept as-is,
/// relative ones are anchored at the executable's directory.
pub fn exe_relative(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        EXE_DIR.join(path)
    }
}

/// Server configuration, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root_dir: PathBuf,
    pub default_document: String,
    pub bind_address: String,
    pub port: u16,
    pub log_path: PathBuf,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            root_dir: PathBuf::from("."),
            default_document: "index.html".to_string(),
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            log_path: PathBuf::from("wren.log"),
            debug: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    /// A line that has a key but no value.
    MalformedLine(usize),
    /// An integer-valued key whose value did not parse.
    BadValue { key: &'static str, line: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read configuration file: {}", e),
            ConfigError::MalformedLine(n) => {
                write!(f, "invalid formatting for configuration file at line {}", n)
            }
            ConfigError::BadValue { key, line } => {
                write!(f, "invalid {} value at line {}", key, line)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl ServerConfig {
    /// Load configuration from a `<key> <value>` text file. Keys are
    /// matched case-insensitively; unknown keys are ignored; keys not
    /// present keep their defaults.
    pub fn load(path: &Path) -> Result<ServerConfig, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<ServerConfig, ConfigError> {
        let mut entries: FxHashMap<String, (String, usize)> = FxHashMap::default();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            // Leading whitespace is tolerated; the key is the first token.
            let line = line.trim_start();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(2, char::is_whitespace);
            let key = parts.next().unwrap_or("");
            let value = parts.next().map(str::trim).unwrap_or("");
            if key.is_empty() || value.is_empty() {
                return Err(ConfigError::MalformedLine(line_no));
            }
            entries.insert(key.to_ascii_lowercase(), (value.to_string(), line_no));
        }

        let mut config = ServerConfig::default();

        if let Some((value, _)) = entries.remove("root_dir") {
            config.root_dir = PathBuf::from(value);
        }
        if let Some((value, _)) = entries.remove("default_html") {
            config.default_document = value;
        }
        if let Some((value, _)) = entries.remove("ip_address") {
            config.bind_address = value;
        }
        if let Some((value, line)) = entries.remove("port") {
            config.port = value
                .parse()
                .map_err(|_| ConfigError::BadValue { key: "port", line })?;
        }
        if let Some((value, _)) = entries.remove("logfile") {
            config.log_path = PathBuf::from(value);
        }
        if let Some((value, line)) = entries.remove("debug") {
            let flag: i64 = value
                .parse()
                .map_err(|_| ConfigError::BadValue { key: "debug", line })?;
            config.debug = flag != 0;
        }

        Ok(config)
    }
}
