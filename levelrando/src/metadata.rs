use std::sync::OnceLock;

use hashbrown::HashSet;
use levelrando_game::{Background, Campaign, IndexedVec, MetadataFile, MusicCue, Ruleset};
use log::{debug, info};

use crate::content::{AssetKind, ContentSource, is_package_qualified};
use crate::error::{ConfigError, Result};

pub const METADATA_FILE_NAME: &str = "rando";

/// The set of audio events that can actually be played.
pub trait AudioRegistry {
    fn has_event(&self, name: &str) -> bool;
}

impl<F: Fn(&str) -> bool> AudioRegistry for F {
    fn has_event(&self, name: &str) -> bool {
        self(name)
    }
}

impl AudioRegistry for HashSet<String> {
    fn has_event(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Metadata merged from every content package. Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct RandoMetadata {
    collectable_names: Vec<String>,
    music: Vec<MusicCue>,
    campaigns: Vec<Campaign>,
    backgrounds: Vec<Background>,
    bg_effects: Vec<Background>,
    fg_effects: Vec<Background>,
    ruleset_isv: IndexedVec<String>,
    rulesets: Vec<Ruleset>,
}

impl RandoMetadata {
    pub fn collectable_names(&self) -> &[String] {
        &self.collectable_names
    }

    pub fn music(&self) -> &[MusicCue] {
        &self.music
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn backgrounds(&self) -> &[Background] {
        &self.backgrounds
    }

    pub fn bg_effects(&self) -> &[Background] {
        &self.bg_effects
    }

    pub fn fg_effects(&self) -> &[Background] {
        &self.fg_effects
    }

    /// Rulesets in the order they were merged.
    pub fn rulesets(&self) -> &[Ruleset] {
        &self.rulesets
    }

    pub fn ruleset(&self, name: &str) -> Option<&Ruleset> {
        self.ruleset_isv
            .index_by_key
            .get(name)
            .map(|&idx| &self.rulesets[idx])
    }

    /// Merge the top-level `rando` metadata file of every content package.
    pub fn load_all(
        content: &(impl ContentSource + ?Sized),
        audio: &(impl AudioRegistry + ?Sized),
    ) -> Result<RandoMetadata> {
        let mut builder = MetadataBuilder::new();
        for (key, asset) in content.entries() {
            if is_package_qualified(key)
                || asset.kind != AssetKind::Yaml
                || asset.file_name() != METADATA_FILE_NAME
            {
                continue;
            }
            info!(
                "Found metadata {} in {}",
                asset.path_virtual, asset.source_name
            );
            let text = asset.read_to_string()?;
            let fragment: MetadataFile =
                serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                    path: format!("{}:/{}", asset.source_name, asset.path_virtual),
                    source,
                })?;
            builder.add(fragment, audio)?;
        }
        Ok(builder.finish())
    }
}

/// Accumulates metadata fragments. Each fragment is merged entirely or not
/// at all.
#[derive(Default)]
pub struct MetadataBuilder {
    metadata: RandoMetadata,
}

impl MetadataBuilder {
    pub fn new() -> Self {
        MetadataBuilder::default()
    }

    pub fn add(
        &mut self,
        other: MetadataFile,
        audio: &(impl AudioRegistry + ?Sized),
    ) -> Result<()> {
        {
            let mut seen: HashSet<&str> = HashSet::new();
            for ruleset in &other.rulesets {
                if ruleset.name.is_empty() {
                    return Err(ConfigError::MissingRulesetName);
                }
                if self.metadata.ruleset_isv.contains(&ruleset.name)
                    || !seen.insert(ruleset.name.as_str())
                {
                    return Err(ConfigError::DuplicateRuleset {
                        name: ruleset.name.clone(),
                    });
                }
            }
        }

        let meta = &mut self.metadata;
        meta.collectable_names.extend(other.collectable_names);
        for cue in other.music {
            if audio.has_event(&cue.name) {
                meta.music.push(cue);
            } else {
                debug!("Dropping music cue {}: no such audio event", cue.name);
            }
        }
        meta.campaigns.extend(other.campaigns);
        meta.backgrounds.extend(other.backgrounds);
        meta.bg_effects.extend(other.bg_effects);
        meta.fg_effects.extend(other.fg_effects);
        for ruleset in other.rulesets {
            meta.ruleset_isv.add(&ruleset.name);
            meta.rulesets.push(ruleset);
        }
        Ok(())
    }

    pub fn finish(self) -> RandoMetadata {
        self.metadata
    }
}

static GLOBAL_METADATA: OnceLock<RandoMetadata> = OnceLock::new();

/// Register the process-wide metadata. Only the first call succeeds.
pub fn install(metadata: RandoMetadata) -> Result<&'static RandoMetadata> {
    let mut installed = false;
    let global = GLOBAL_METADATA.get_or_init(|| {
        installed = true;
        metadata
    });
    if !installed {
        return Err(ConfigError::MetadataAlreadyInstalled);
    }
    Ok(global)
}

pub fn global() -> Option<&'static RandoMetadata> {
    GLOBAL_METADATA.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(yaml: &str) -> MetadataFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn all_events(_: &str) -> bool {
        true
    }

    #[test]
    fn test_failed_fragment_is_not_partially_merged() {
        let mut builder = MetadataBuilder::new();
        builder
            .add(fragment("Rulesets:\n  - Name: Classic\n"), &all_events)
            .unwrap();
        let err = builder
            .add(
                fragment("CollectableNames: [gem]\nRulesets:\n  - Name: Extra\n  - Name: Classic\n"),
                &all_events,
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRuleset { ref name } if name == "Classic"));
        let meta = builder.finish();
        assert!(meta.collectable_names().is_empty());
        assert!(meta.ruleset("Extra").is_none());
        assert_eq!(meta.rulesets().len(), 1);
    }

    #[test]
    fn test_duplicate_within_fragment() {
        let mut builder = MetadataBuilder::new();
        let err = builder
            .add(
                fragment("Rulesets:\n  - Name: A\n  - Name: A\n"),
                &all_events,
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRuleset { .. }));
    }

    #[test]
    fn test_unnamed_ruleset() {
        let mut builder = MetadataBuilder::new();
        let err = builder
            .add(fragment("Rulesets:\n  - Length: Long\n"), &all_events)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRulesetName));
    }

    #[test]
    fn test_unregistered_music_dropped() {
        let registry: HashSet<String> = ["event:/music/a".to_string()].into_iter().collect();
        let mut builder = MetadataBuilder::new();
        builder
            .add(
                fragment("Music:\n  - Name: event:/music/a\n    Weight: 2\n  - Name: event:/music/missing\n"),
                &registry,
            )
            .unwrap();
        let meta = builder.finish();
        assert_eq!(meta.music().len(), 1);
        assert_eq!(meta.music()[0].name, "event:/music/a");
        assert_eq!(meta.music()[0].weight(), 2.0);
    }
}
