use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the remote API (e.g. `https://host/api`). When absent the
    /// facade runs against the local store only.
    pub api_url: Option<String>,
    /// Optional bearer token sent with every API request.
    pub api_token: Option<String>,
    /// Directory holding the namespaced local store files.
    pub data_dir: PathBuf,
    /// Default interval for polling subscriptions, in seconds.
    pub poll_interval_secs: u64,
    /// Interval for the appointment completion sweep, in seconds.
    pub sweep_interval_secs: u64,
    /// Email delivery channel settings.
    pub email: EmailSettings,
    /// Whether the messaging delivery channel is enabled.
    pub messaging_enabled: bool,
}

/// SMTP settings for the email delivery channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub from_email: String,
    pub from_name: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: None,
            from_email: "noreply@classbook.example".to_string(),
            from_name: "ClassBook".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            data_dir: Self::default_data_dir(),
            poll_interval_secs: 5,
            sweep_interval_secs: 60,
            email: EmailSettings::default(),
            messaging_enabled: false,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        // Apply environment variable overrides
        if let Ok(url) = std::env::var("CLASSBOOK_API_URL") {
            config.api_url = Some(url);
        }
        if let Ok(token) = std::env::var("CLASSBOOK_API_TOKEN") {
            config.api_token = Some(token);
        }
        if let Ok(dir) = std::env::var("CLASSBOOK_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(secs) = std::env::var("CLASSBOOK_POLL_INTERVAL") {
            if let Ok(secs) = secs.parse() {
                config.poll_interval_secs = secs;
            }
        }
        if let Ok(secs) = std::env::var("CLASSBOOK_SWEEP_INTERVAL") {
            if let Ok(secs) = secs.parse() {
                config.sweep_interval_secs = secs;
            }
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/classbook/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("classbook")
            .join("config.yaml")
    }

    /// Default data directory: ~/.classbook
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".classbook")
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_url.is_none());
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.sweep_interval_secs, 60);
        assert!(!config.email.enabled);
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config.api_url.is_none());
        assert_eq!(config.sweep_interval_secs, 60);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_url: http://localhost:3000/api").unwrap();
        writeln!(file, "data_dir: /custom/data").unwrap();
        writeln!(file, "poll_interval_secs: 10").unwrap();
        writeln!(file, "email:").unwrap();
        writeln!(file, "  enabled: true").unwrap();
        writeln!(file, "  smtp_host: smtp.example.com").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:3000/api"));
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.poll_interval_secs, 10);
        assert!(config.email.enabled);
        assert_eq!(config.email.smtp_host, "smtp.example.com");
    }

    #[test]
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_url: http://fromfile/api").unwrap();

        std::env::set_var("CLASSBOOK_API_URL", "http://fromenv/api");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://fromenv/api"));

        std::env::remove_var("CLASSBOOK_API_URL");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file"));
    }
}
