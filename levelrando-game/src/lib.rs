pub mod metadata;
pub mod req;
pub mod room;

pub use metadata::{
    Background, Campaign, Darkness, DifficultyEagerness, LevelSet, LogicType, MapKey, MapLength,
    MetadataFile, MusicCue, Ruleset, ShineLights, StrawberryDensity,
};
pub use req::Req;
pub use room::{
    Collectable, CoreModeOverride, DecalType, Edit, EdgeSplit, EditNode, EditUpdate, Hole,
    InternalEdge, Rectangle, Room,
};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::borrow::ToOwned;
use std::hash::Hash;
use strum_macros::{EnumString, VariantNames};

pub type KeyholeId = i32; // KeyholeID from the config: identifies one keyhole within a map
pub type HoleIdx = i32; // Disambiguates multiple holes on the same side of a room
pub type CollectableIdx = usize; // Index into Room.collectables

#[derive(Default, Clone, Debug)]
pub struct IndexedVec<T: Hash + Eq> {
    pub keys: Vec<T>,
    pub index_by_key: HashMap<T, usize>,
}

impl<T: Hash + Eq + Clone> IndexedVec<T> {
    pub fn add<U: ToOwned<Owned = T> + ?Sized>(&mut self, name: &U) -> usize {
        let key = name.to_owned();
        if let Some(&idx) = self.index_by_key.get(&key) {
            return idx;
        }
        let idx = self.keys.len();
        self.index_by_key.insert(key.clone(), idx);
        self.keys.push(key);
        idx
    }

    pub fn contains(&self, key: &T) -> bool {
        self.index_by_key.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// Note: the ordering of these variants is significant; requirements compare tiers with `>=`.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
    Expert,
    Master,
    Perfect,
}

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
)]
pub enum NumDashes {
    Zero,
    #[default]
    One,
    Two,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumString, VariantNames, Serialize, Deserialize)]
pub enum ScreenDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoleKind {
    #[default]
    #[serde(alias = "none")]
    None,
    #[serde(alias = "in")]
    In,
    #[serde(alias = "out")]
    Out,
    #[serde(alias = "inout")]
    InOut,
    #[serde(alias = "unknown")]
    Unknown,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreMode {
    #[default]
    None,
    Hot,
    Cold,
}

/// Which variant of a map is being played.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, EnumString, VariantNames, Serialize, Deserialize,
)]
pub enum AreaMode {
    #[default]
    Normal,
    BSide,
    CSide,
}
