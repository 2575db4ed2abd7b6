//! Configuration for running this bot.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serenity::all::GuildId;

use crate::error::ConfigError;

/// The path to the config file
pub const CONFIG_PATH: &str = "config.toml";

/// Environment variable holding the discord token.
pub const TOKEN_VAR: &str = "TOKEN";

/// Prefix used in guilds without a custom one.
pub const DEFAULT_PREFIX: &str = "angela^";

/// Settings read from [CONFIG_PATH] that modify bot behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// See [BotConfig]
    #[serde(default)]
    bot: BotConfig,

    /// See [LoggingConfig]
    #[serde(default)]
    logging: LoggingConfig,

    /// Useful developer specific configs.
    #[serde(default)]
    dev_utils: DevConfig,
}

/// How the config was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from an existing file.
    File,
    /// The file was missing or empty, defaults were written to it.
    CreatedDefault,
}

impl Config {
    /// Tries to read `path` to extract a [Config].
    /// If the file doesn't exist or is empty, write the default config there and use it.
    /// If the file exists but is malformed, return an error naming the bad key.
    /// If file existence is indeterminate (e.g. missing permissions), return error.
    pub fn read(path: impl AsRef<Path>) -> Result<(Config, ConfigSource), ConfigError> {
        let path = path.as_ref();

        match std::fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => {
                write_file(path, &Config::default())?;
                Ok((Config::default(), ConfigSource::CreatedDefault))
            }
            Ok(content) => Config::parse(&content).map(|c| (c, ConfigSource::File)),
            Err(file_error) => match file_error.kind() {
                std::io::ErrorKind::NotFound => {
                    write_file(path, &Config::default())?;
                    Ok((Config::default(), ConfigSource::CreatedDefault))
                }
                _ => Err(ConfigError::IoError(file_error)),
            },
        }
    }

    /// Deserialize a config, describing the offending key on failure.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        let to_toml = toml::Deserializer::new(content);
        serde_path_to_error::deserialize(to_toml).map_err(|error| ConfigError::InvalidConfig {
            reason: error.to_string(),
        })
    }

    /// Read the discord token from the environment.
    pub fn token() -> Result<String, ConfigError> {
        let missing = ConfigError::MissingToken { var: TOKEN_VAR };
        let token = std::env::var(TOKEN_VAR).map_err(|_| missing)?;

        // Basic sanity check for if a token was given.
        if token.trim().is_empty() {
            Err(ConfigError::MissingToken { var: TOKEN_VAR })
        } else {
            Ok(token)
        }
    }

    /// Prefix used when a guild has none stored.
    pub fn default_prefix(&self) -> &str {
        &self.bot.default_prefix
    }

    /// Location of the guild prefix file.
    pub fn prefix_file(&self) -> &Path {
        &self.bot.prefix_file
    }

    /// Getter for log_dir.
    pub fn log_dir(&self) -> &str {
        &self.logging.log_dir
    }

    /// Is debug mode enabled for console logs
    pub fn console_debug(&self) -> bool {
        self.logging.console_debug
    }

    /// Is file logging enabled.
    pub fn logs_enabled(&self) -> bool {
        self.logging.logs_enabled
    }

    /// Guild that also receives every command registration.
    pub fn dev_guild(&self) -> Option<GuildId> {
        self.dev_utils.dev_guild
    }
}

/// Command invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
struct BotConfig {
    /// Prefix for guilds without an entry in `prefix_file`.
    default_prefix: String,
    /// JSON file mapping guild ids to prefixes.
    prefix_file: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            default_prefix: DEFAULT_PREFIX.to_string(),
            prefix_file: PathBuf::from("prefixes.json"),
        }
    }
}

/// Configs for logging
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
struct LoggingConfig {
    /// Print debug traces to console?
    console_debug: bool,
    /// Enable writing to log file?
    logs_enabled: bool,
    /// Directory to store log files
    log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_debug: false,
            logs_enabled: true,
            log_dir: "logs".to_string(),
        }
    }
}

/// Optional configs to enable developer-specific behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct DevConfig {
    /// Optional guild to automatically update commands quickly.
    #[serde(
        default,
        serialize_with = "serialize_opt",
        deserialize_with = "deserialize_opt"
    )]
    dev_guild: Option<GuildId>,
}

/// Write the given config to `path`.
fn write_file(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidConfig {
        reason: e.to_string(),
    })?;
    std::fs::write(path, content).map_err(ConfigError::IoError)
}

fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<GuildId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_str(OptVisitor)
}

fn serialize_opt<S>(val: &Option<GuildId>, ser: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match val {
        Some(v) => ser.serialize_str(&v.get().to_string()),
        None => ser.serialize_str(""),
    }
}

struct OptVisitor;

impl<'de> serde::de::Visitor<'de> for OptVisitor {
    type Value = Option<GuildId>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a valid guild id")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match v {
            "" => Ok(None),
            _ => {
                let num: u64 = v.parse().map_err(|_| E::custom("not u64"))?;
                if num == 0 {
                    return Err(E::custom("guild id can't be 0"));
                }
                Ok(Some(GuildId::new(num)))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    const FULL: &str = r#"
        [bot]
        default_prefix = "xx!"
        prefix_file = "data/prefixes.json"

        [logging]
        console_debug = true
        logs_enabled = false
        log_dir = "var/log"

        [dev_utils]
        dev_guild = "310243609641484288"
    "#;

    #[test]
    fn parses_full_config() {
        let config = Config::parse(FULL).unwrap();

        assert_eq!(config.default_prefix(), "xx!");
        assert_eq!(config.prefix_file(), Path::new("data/prefixes.json"));
        assert!(config.console_debug());
        assert!(!config.logs_enabled());
        assert_eq!(config.log_dir(), "var/log");
        assert_eq!(config.dev_guild(), Some(GuildId::new(310243609641484288)));
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = Config::parse("[bot]\ndefault_prefix = \"$\"\n[logging]\nconsole_debug = true\n").unwrap();

        assert_eq!(config.default_prefix(), "$");
        assert_eq!(config.prefix_file(), Path::new("prefixes.json"));
        assert!(config.console_debug());
        assert!(config.logs_enabled());
        assert_eq!(config.dev_guild(), None);
    }

    #[test]
    fn empty_dev_guild_is_none() {
        let config = Config::parse("[dev_utils]\ndev_guild = \"\"\n").unwrap();
        assert_eq!(config.dev_guild(), None);
    }

    #[test]
    fn bad_value_names_the_key() {
        let err = Config::parse("[dev_utils]\ndev_guild = \"abc\"\n").unwrap_err();

        match err {
            ConfigError::InvalidConfig { reason } => assert!(reason.contains("dev_utils.dev_guild")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn default_config_survives_writing() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), Config::default());
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = std::env::temp_dir().join(format!("angela-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let _ = std::fs::remove_file(&path);

        let (config, source) = Config::read(&path).unwrap();

        assert_eq!(source, ConfigSource::CreatedDefault);
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let (_, source) = Config::read(&path).unwrap();
        assert_eq!(source, ConfigSource::File);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
