//! What a command module declares about itself.
//!
//! Every module registers its capabilities explicitly through [CommandModule]:
//! a slash schema with its [SlashHandler], a [PrefixHandler], or both.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::Data;
use crate::error::BotError;
use crate::error::LoadError;
use crate::error::UserError;
use crate::platform::InteractionContext;
use crate::platform::MessageContext;

/// Discord's limit on options per command.
const MAX_OPTIONS: usize = 25;
/// Discord's limit on name length.
const MAX_NAME_LEN: usize = 32;
/// Discord's limit on description length.
const MAX_DESCRIPTION_LEN: usize = 100;

/// Everything a prefix handler gets.
pub struct PrefixContext<'a> {
    /// The message that invoked the command.
    pub message: &'a dyn MessageContext,
    /// Whitespace separated tokens after the command name.
    pub args: &'a [String],
    /// The prefix that was used.
    pub prefix: &'a str,
    pub data: &'a Data,
}

/// Everything a slash handler gets.
pub struct SlashContext<'a> {
    pub interaction: &'a dyn InteractionContext,
    pub data: &'a Data,
}

/// Runs a command invoked from a text message.
#[async_trait]
pub trait PrefixHandler: Send + Sync {
    async fn run(&self, ctx: &PrefixContext<'_>) -> Result<(), BotError>;
}

/// Runs a command invoked as a slash command.
#[async_trait]
pub trait SlashHandler: Send + Sync {
    /// Long-running commands get a deferred acknowledgment before [SlashHandler::run]
    /// and must answer with follow-ups.
    fn long_running(&self) -> bool {
        false
    }

    /// Validation that happens before anything is sent.
    /// An error here is the immediate reply and `run` is skipped.
    fn check(&self, _ctx: &SlashContext<'_>) -> Result<(), UserError> {
        Ok(())
    }

    async fn run(&self, ctx: &SlashContext<'_>) -> Result<(), BotError>;
}

/// The type of a slash command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Integer,
    Number,
    Boolean,
    User,
    Channel,
    Role,
}

/// One option of a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSchema {
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl OptionSchema {
    pub fn new(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
        }
    }

    /// Shorthand for a string option.
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::String, name, description)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The descriptor published to discord for a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashSchema {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionSchema>,
}

impl SlashSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, option: OptionSchema) -> Self {
        self.options.push(option);
        self
    }

    /// Check the schema against discord's rules so publishing can't be rejected for it.
    pub fn validate(&self) -> Result<(), LoadError> {
        check_name(&self.name)?;
        check_description(&self.name, &self.description)?;

        if self.options.len() > MAX_OPTIONS {
            return Err(invalid(format!(
                "'{}' has {} options, at most {MAX_OPTIONS} are allowed",
                self.name,
                self.options.len()
            )));
        }

        let mut seen_optional = false;
        for option in &self.options {
            check_name(&option.name)?;
            check_description(&option.name, &option.description)?;

            if option.required && seen_optional {
                return Err(invalid(format!(
                    "required option '{}' comes after an optional one",
                    option.name
                )));
            }
            seen_optional |= !option.required;
        }

        let mut names: Vec<&str> = self.options.iter().map(|o| o.name.as_str()).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(invalid(format!("duplicate option '{}'", pair[0])));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> LoadError {
    LoadError::InvalidSchema { reason }
}

/// Names are 1-32 lowercase letters, digits, `-` or `_`.
fn check_name(name: &str) -> Result<(), LoadError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(invalid(format!(
            "name '{name}' must be 1-{MAX_NAME_LEN} characters"
        )));
    }

    let allowed = |c: char| {
        c == '-' || c == '_' || c.is_numeric() || (c.is_alphabetic() && !c.is_uppercase())
    };
    if !name.chars().all(allowed) {
        return Err(invalid(format!(
            "name '{name}' may only contain lowercase letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

fn check_description(name: &str, description: &str) -> Result<(), LoadError> {
    let len = description.chars().count();
    if len == 0 || len > MAX_DESCRIPTION_LEN {
        return Err(invalid(format!(
            "description of '{name}' must be 1-{MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// A slash schema bound to its handler.
#[derive(Clone)]
pub struct SlashCommand {
    pub schema: SlashSchema,
    pub handler: Arc<dyn SlashHandler>,
}

/// The capabilities one module registers.
#[derive(Clone, Default)]
pub struct CommandModule {
    pub(super) slash: Option<SlashCommand>,
    pub(super) prefix: Option<Arc<dyn PrefixHandler>>,
}

impl CommandModule {
    /// A module with no capabilities yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register as a slash command.
    pub fn slash(mut self, schema: SlashSchema, handler: impl SlashHandler + 'static) -> Self {
        self.slash = Some(SlashCommand {
            schema,
            handler: Arc::new(handler),
        });
        self
    }

    /// Register as a prefix command.
    pub fn prefix(mut self, handler: impl PrefixHandler + 'static) -> Self {
        self.prefix = Some(Arc::new(handler));
        self
    }
}

/// Builds a module, failing if its declaration is unusable.
pub type ModuleLoader = fn() -> Result<CommandModule, LoadError>;

/// A command module file inside a category folder.
#[derive(Debug, Clone, Copy)]
pub struct ModuleEntry {
    /// Grouping folder, only used for display.
    pub category: &'static str,
    /// File name of the module, e.g. `ping.rs`.
    pub file: &'static str,
    pub load: ModuleLoader,
}

impl ModuleEntry {
    pub const fn new(category: &'static str, file: &'static str, load: ModuleLoader) -> Self {
        Self {
            category,
            file,
            load,
        }
    }

    /// `category/file`, the scan order key.
    pub fn path(&self) -> String {
        format!("{}/{}", self.category, self.file)
    }

    /// Command name derived from the file name, used by prefix-only commands.
    pub fn file_stem(&self) -> String {
        let stem = self
            .file
            .rsplit_once('.')
            .map_or(self.file, |(stem, _extension)| stem);
        stem.to_lowercase()
    }
}

/// Something that lists command modules.
pub trait CommandSource {
    fn modules(&self) -> Vec<ModuleEntry>;
}

impl CommandSource for [ModuleEntry] {
    fn modules(&self) -> Vec<ModuleEntry> {
        self.to_vec()
    }
}

impl CommandSource for Vec<ModuleEntry> {
    fn modules(&self) -> Vec<ModuleEntry> {
        self.clone()
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;

    fn empty() -> Result<CommandModule, LoadError> {
        Ok(CommandModule::new())
    }

    #[rstest]
    #[case("play")]
    #[case("set-prefix")]
    #[case("queue_2")]
    #[case("ping")]
    fn valid_names(#[case] name: &str) {
        assert!(SlashSchema::new(name, "does a thing").validate().is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("Play")]
    #[case("two words")]
    #[case("this-name-is-far-too-long-to-be-a-command")]
    fn invalid_names(#[case] name: &str) {
        let err = SlashSchema::new(name, "does a thing").validate().unwrap_err();
        assert!(matches!(err, LoadError::InvalidSchema { .. }));
    }

    #[test]
    fn empty_description_is_invalid() {
        assert!(SlashSchema::new("play", "").validate().is_err());
    }

    #[test]
    fn required_after_optional_is_invalid() {
        let schema = SlashSchema::new("play", "Play a song")
            .option(OptionSchema::string("volume", "How loud"))
            .option(OptionSchema::string("query", "What to play").required());
        assert!(schema.validate().is_err());
    }

    #[test]
    fn duplicate_options_are_invalid() {
        let schema = SlashSchema::new("play", "Play a song")
            .option(OptionSchema::string("query", "What to play"))
            .option(OptionSchema::string("query", "Again"));
        assert!(schema.validate().is_err());
    }

    #[test]
    fn too_many_options_are_invalid() {
        let schema = (0..=MAX_OPTIONS).fold(SlashSchema::new("many", "Many options"), |s, i| {
            s.option(OptionSchema::string(format!("o{i}"), "An option"))
        });
        assert!(schema.validate().is_err());
    }

    #[rstest]
    #[case("ping.rs", "ping")]
    #[case("Ping.rs", "ping")]
    #[case("ping", "ping")]
    fn file_stem_names(#[case] file: &str, #[case] expected: &str) {
        // Leak to get the &'static str ModuleEntry wants.
        let file: &'static str = Box::leak(file.to_string().into_boxed_str());
        let entry = ModuleEntry::new("general", file, empty);
        assert_eq!(entry.file_stem(), expected);
        assert_eq!(entry.path(), format!("general/{file}"));
    }
}
