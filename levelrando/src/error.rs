use thiserror::Error;

/// Fatal failures while loading or merging randomizer content.
///
/// Content that simply does not exist is not an error: loaders return
/// `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error parsing {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Error reading {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Room name '{name}' is duplicated")]
    DuplicateRoom { name: String },
    #[error("Ruleset name '{name}' is duplicated")]
    DuplicateRuleset { name: String },
    #[error("Rulesets must have Name specified")]
    MissingRulesetName,
    #[error("Randomizer metadata has already been installed")]
    MetadataAlreadyInstalled,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
