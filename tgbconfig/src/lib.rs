//! # TGBio Configuration Module
//!
//! This module provides the credential store of the bridge:
//! - Locating the configuration directory (explicit, environment, executable dir)
//! - Loading `config.yaml` into a typed [`BridgeConfig`]
//! - Prompting the operator on first run and persisting the answers
//! - Resolving the paths of the other persisted files (token, session)
//!
//! ## Usage
//!
//! ```no_run
//! use tgbconfig::ConfigStore;
//!
//! let store = ConfigStore::open("")?;
//! let config = store.load()?;
//! println!("polling every {:?}", config.poll_interval());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! There is no merge logic: either `config.yaml` exists and must decode as a
//! complete [`BridgeConfig`], or it does not exist and the first-run prompt
//! path builds one.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, warn};

mod prompt;

pub use prompt::prompt_config;

const ENV_CONFIG_DIR: &str = "TGBIO_CONFIG";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default polling interval, in seconds
pub const DEFAULT_UPDATE_INTERVAL: u64 = 45;

/// Operating parameters supplied by the operator
///
/// Loaded once at startup and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    /// Kept as text, exactly as typed by the operator; see [`BridgeConfig::telegram_api_id`]
    pub telegram_api_id: String,
    pub telegram_api_hash: String,
    /// International format, e.g. `+33612345678`
    pub telegram_phone: String,
    /// Seconds between two polls
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_proxy: Option<String>,
}

fn default_update_interval() -> u64 {
    DEFAULT_UPDATE_INTERVAL
}

impl BridgeConfig {
    /// Polling interval as a `Duration`, never shorter than one second
    pub fn poll_interval(&self) -> Duration {
        if self.update_interval == 0 {
            warn!("update_interval is 0, using 1 second instead");
            return Duration::from_secs(1);
        }
        Duration::from_secs(self.update_interval)
    }

    /// Numeric Telegram API id
    pub fn telegram_api_id(&self) -> Result<i32> {
        self.telegram_api_id
            .trim()
            .parse::<i32>()
            .with_context(|| format!("invalid Telegram API id {:?}", self.telegram_api_id))
    }

    /// Checks the fields that can be checked without touching the network
    pub fn validate(&self) -> Result<()> {
        self.telegram_api_id()?;
        if let Some(proxy) = &self.http_proxy {
            url::Url::parse(proxy).with_context(|| format!("invalid HTTP proxy URL {:?}", proxy))?;
        }
        Ok(())
    }
}

/// Handle on the configuration directory
///
/// Every file the bridge persists lives in this directory: the configuration
/// itself, the cached Spotify token and the Telegram session.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: PathBuf,
    path: PathBuf,
}

impl ConfigStore {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> PathBuf {
        // 1. Try provided directory
        if !directory.is_empty() {
            return PathBuf::from(directory);
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            if !env_path.is_empty() {
                info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Using config dir from env");
                return PathBuf::from(env_path);
            }
        }

        // 3. Next to the executable
        if let Some(dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            return dir;
        }

        // Default fallback
        PathBuf::from(".")
    }

    /// Opens (and creates if needed) the configuration directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `TGBIO_CONFIG` environment variable
    /// 3. The directory containing the running executable
    /// 4. The current directory
    pub fn open(directory: &str) -> Result<Self> {
        let config_dir = Self::find_config_dir(directory);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).with_context(|| {
                format!("failed to create config directory {}", config_dir.display())
            })?;
        }
        if !config_dir.is_dir() {
            return Err(anyhow!("{} is not a directory", config_dir.display()));
        }

        let path = config_dir.join(CONFIG_FILE_NAME);
        info!(config_dir = %config_dir.display(), "Using config directory");
        Ok(Self { config_dir, path })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of `config.yaml`
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of another file stored next to the configuration
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.config_dir.join(name)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the configuration, prompting on stdin/stdout when it is absent
    pub fn load(&self) -> Result<BridgeConfig> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.load_or_prompt(&mut input, &mut output)
    }

    /// Loads the configuration, prompting on the given streams when it is absent
    ///
    /// A present but malformed file is an error: the prompt path is only taken
    /// when the file does not exist.
    pub fn load_or_prompt<R, W>(&self, input: &mut R, output: &mut W) -> Result<BridgeConfig>
    where
        R: BufRead,
        W: Write,
    {
        if !self.exists() {
            info!(config_file = %self.path.display(), "Config file not found, asking the operator");
            let config = prompt_config(input, output)?;
            config.validate()?;
            self.save(&config)?;
            writeln!(output, "Configuration saved to {}", self.path.display())?;
            return Ok(config);
        }

        let config = self.read()?;
        config.validate()?;
        Ok(config)
    }

    /// Decodes the existing `config.yaml`
    pub fn read(&self) -> Result<BridgeConfig> {
        let data = fs::read(&self.path)
            .with_context(|| format!("failed to open config file {}", self.path.display()))?;
        let config: BridgeConfig = serde_yaml::from_slice(&data)
            .with_context(|| format!("failed to decode config file {}", self.path.display()))?;
        info!(config_file = %self.path.display(), "Loaded config file");
        Ok(config)
    }

    /// Writes `config.yaml`
    pub fn save(&self, config: &BridgeConfig) -> Result<()> {
        let yaml = serde_yaml::to_string(config)?;
        fs::write(&self.path, yaml)
            .with_context(|| format!("failed to save config file {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BridgeConfig {
        BridgeConfig {
            spotify_client_id: "cid".into(),
            spotify_client_secret: "secret".into(),
            telegram_api_id: "12345".into(),
            telegram_api_hash: "hash".into(),
            telegram_phone: "+33600000000".into(),
            update_interval: 45,
            http_proxy: None,
        }
    }

    #[test]
    fn test_poll_interval() {
        let mut config = sample();
        assert_eq!(config.poll_interval(), Duration::from_secs(45));
        config.update_interval = 0;
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_api_id_parsing() {
        let mut config = sample();
        assert_eq!(config.telegram_api_id().unwrap(), 12345);
        config.telegram_api_id = "abc".into();
        assert!(config.telegram_api_id().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let mut config = sample();
        config.http_proxy = Some("not a url".into());
        assert!(config.validate().is_err());
        config.http_proxy = Some("http://127.0.0.1:3128".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_proxy_not_serialized() {
        let yaml = serde_yaml::to_string(&sample()).unwrap();
        assert!(!yaml.contains("http_proxy"));
    }

    #[test]
    fn test_default_interval_when_absent() {
        let yaml = "spotify_client_id: a\nspotify_client_secret: b\ntelegram_api_id: '1'\ntelegram_api_hash: c\ntelegram_phone: '+1'\n";
        let config: BridgeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.update_interval, DEFAULT_UPDATE_INTERVAL);
        assert_eq!(config.http_proxy, None);
    }
}
