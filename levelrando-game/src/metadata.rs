use hashbrown::HashMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{AreaMode, Difficulty, NumDashes};

pub const DEFAULT_MUSIC_WEIGHT: f32 = 1.0;
pub const MAX_MUSIC_WEIGHT: f32 = 3.0;

/// One package's `rando` metadata document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetadataFile {
    pub collectable_names: Vec<String>,
    pub music: Vec<MusicCue>,
    pub campaigns: Vec<Campaign>,
    pub backgrounds: Vec<Background>,
    pub bg_effects: Vec<Background>,
    pub fg_effects: Vec<Background>,
    pub rulesets: Vec<Ruleset>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MusicCue {
    pub name: String,
    #[serde(
        default = "default_music_weight",
        deserialize_with = "deserialize_music_weight"
    )]
    weight: f32,
    #[serde(default)]
    pub parameters: HashMap<String, i32>,
}

fn default_music_weight() -> f32 {
    DEFAULT_MUSIC_WEIGHT
}

// Out-of-range weights fall back to the default rather than failing the load.
fn sanitize_music_weight(weight: f32) -> f32 {
    if (0.0..=MAX_MUSIC_WEIGHT).contains(&weight) {
        weight
    } else {
        DEFAULT_MUSIC_WEIGHT
    }
}

fn deserialize_music_weight<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    let weight = f32::deserialize(deserializer)?;
    Ok(sanitize_music_weight(weight))
}

impl MusicCue {
    pub fn new(name: &str) -> Self {
        MusicCue {
            name: name.to_string(),
            weight: DEFAULT_MUSIC_WEIGHT,
            parameters: HashMap::new(),
        }
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f32) {
        self.weight = sanitize_music_weight(weight);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Campaign {
    pub name: String,
    #[serde(default)]
    pub level_sets: Vec<LevelSet>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LevelSet {
    pub name: String,
    #[serde(rename = "ID")]
    pub id: String,
}

/// A parallax background or effect layer. `AndThen` chains to another layer
/// that is drawn together with this one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Background {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    pub cover_top: i32,
    pub cover_bottom: i32,
    pub opaque: bool,
    pub loop_x: bool,
    pub loop_y: bool,
    pub flip_x: bool,
    pub flip_y: bool,
    pub needs_color: bool,
    pub scroll_factor_x: f32,
    pub scroll_factor_y: f32,
    pub provides_wind: bool,
    pub alpha: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub off_x: i32,
    pub off_y: i32,
    pub blend_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub and_then: Option<Box<Background>>,
}

impl Default for Background {
    fn default() -> Self {
        Background {
            texture: None,
            effect: None,
            cover_top: 0,
            cover_bottom: 0,
            opaque: false,
            loop_x: true,
            loop_y: false,
            flip_x: false,
            flip_y: false,
            needs_color: false,
            scroll_factor_x: 1.0,
            scroll_factor_y: 1.0,
            provides_wind: false,
            alpha: 1.0,
            speed_x: 0.0,
            speed_y: 0.0,
            off_x: 0,
            off_y: 0,
            blend_mode: "alphablend".to_string(),
            and_then: None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShineLights {
    Disabled,
    #[default]
    Hubs,
    On,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Darkness {
    #[default]
    Never,
    Vanilla,
    Always,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicType {
    #[default]
    Pathway,
    Labyrinth,
    Endless,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapLength {
    #[default]
    Short,
    Medium,
    Long,
    Enormous,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyEagerness {
    None,
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrawberryDensity {
    #[default]
    None,
    Low,
    High,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MapKey {
    #[serde(rename = "SID")]
    pub sid: String,
    #[serde(default)]
    pub mode: AreaMode,
}

/// A named preset of search settings offered to the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Ruleset {
    pub name: String,
    #[serde(rename = "LongName", skip_serializing_if = "Option::is_none")]
    long_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_maps: Option<Vec<MapKey>>,
    pub repeat_rooms: bool,
    pub enter_unknown: bool,
    pub variants: bool,
    pub lights: ShineLights,
    pub darkness: Darkness,
    pub algorithm: LogicType,
    pub length: MapLength,
    pub dashes: NumDashes,
    pub difficulty: Difficulty,
    pub difficulty_eagerness: DifficultyEagerness,
    pub strawberries: StrawberryDensity,
    pub lives: i32,
}

impl Default for Ruleset {
    fn default() -> Self {
        Ruleset {
            name: String::new(),
            long_name: None,
            enabled_maps: None,
            repeat_rooms: false,
            enter_unknown: false,
            variants: false,
            lights: ShineLights::Hubs,
            darkness: Darkness::Never,
            algorithm: LogicType::Pathway,
            length: MapLength::Short,
            dashes: NumDashes::One,
            difficulty: Difficulty::Normal,
            difficulty_eagerness: DifficultyEagerness::Medium,
            strawberries: StrawberryDensity::None,
            lives: 0,
        }
    }
}

impl Ruleset {
    pub fn new(name: &str) -> Self {
        Ruleset {
            name: name.to_string(),
            ..Ruleset::default()
        }
    }

    pub fn long_name(&self) -> String {
        match &self.long_name {
            Some(long_name) => long_name.clone(),
            None => format!("Ruleset {}", self.name),
        }
    }

    pub fn set_long_name(&mut self, long_name: &str) {
        self.long_name = Some(long_name.to_string());
    }
}
