//! Per-guild command prefixes, read once from a JSON file.

use std::collections::HashMap;
use std::path::Path;

use serenity::all::GuildId;
use tracing::instrument;

use crate::error::PrefixError;

/// Maps guilds to their custom prefix, falling back to a default.
#[derive(Debug, Clone)]
pub struct PrefixStore {
    default: String,
    prefixes: HashMap<GuildId, String>,
}

impl PrefixStore {
    /// An empty store where every guild uses `default`.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            prefixes: HashMap::new(),
        }
    }

    /// Read `path`, a JSON object of guild id strings to prefixes.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>, default: &str) -> Result<Self, PrefixError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => PrefixError::Missing {
                path: path.to_path_buf(),
            },
            _ => PrefixError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let entries: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| PrefixError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::from_entries(default, entries))
    }

    /// Same as [PrefixStore::load] but never fails.
    /// Problems are logged and every guild gets the default prefix.
    pub fn load_or_default(path: impl AsRef<Path>, default: &str) -> Self {
        match Self::load(path, default) {
            Ok(store) => {
                tracing::info!("Loaded {} guild prefixes.", store.len());
                store
            }
            Err(e @ PrefixError::Missing { .. }) => {
                tracing::info!("{e}. Using default prefix '{default}'.");
                Self::new(default)
            }
            Err(e) => {
                tracing::warn!("{e}. Using default prefix '{default}'.");
                Self::new(default)
            }
        }
    }

    /// Build a store from raw guild id strings, skipping unusable entries.
    fn from_entries(default: &str, entries: HashMap<String, String>) -> Self {
        let mut store = Self::new(default);

        for (guild, prefix) in entries {
            let Some(guild_id) = guild.parse::<u64>().ok().filter(|id| *id != 0) else {
                tracing::warn!("Skipping prefix for invalid guild id '{guild}'.");
                continue;
            };
            if prefix.trim().is_empty() {
                tracing::warn!("Skipping empty prefix for guild {guild}.");
                continue;
            }
            store.prefixes.insert(GuildId::new(guild_id), prefix);
        }

        store
    }

    /// The prefix to use in `guild`.
    pub fn resolve(&self, guild: GuildId) -> &str {
        self.prefixes.get(&guild).unwrap_or(&self.default)
    }

    /// Prefix for guilds without a custom one.
    pub fn default_prefix(&self) -> &str {
        &self.default
    }

    /// Set a custom prefix for `guild`.
    #[cfg(test)]
    pub fn with(mut self, guild: GuildId, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(guild, prefix.into());
        self
    }

    /// Number of guilds with a custom prefix.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }
}
