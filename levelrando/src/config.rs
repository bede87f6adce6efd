use hashbrown::HashMap;
use levelrando_game::{AreaMode, Room};
use log::info;
use serde::{Deserialize, Serialize};

use crate::content::ContentSource;
use crate::error::{ConfigError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
    C,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::A, Side::B, Side::C];

    pub fn letter(self) -> char {
        match self {
            Side::A => 'A',
            Side::B => 'B',
            Side::C => 'C',
        }
    }
}

impl From<AreaMode> for Side {
    fn from(mode: AreaMode) -> Self {
        match mode {
            AreaMode::Normal => Side::A,
            AreaMode::BSide => Side::B,
            AreaMode::CSide => Side::C,
        }
    }
}

/// Wire form of a map's randomizer config, either combined or for one side.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RandoConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_side: Option<Vec<Room>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_side: Option<Vec<Room>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_side: Option<Vec<Room>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SideState {
    /// The map has no such side.
    #[default]
    Absent,
    /// The side's config exists but has not been parsed yet.
    Pending,
    Loaded(Vec<Room>),
}

impl SideState {
    fn from_rooms(rooms: Option<Vec<Room>>) -> Self {
        match rooms {
            Some(rooms) => SideState::Loaded(rooms),
            None => SideState::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, SideState::Absent)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SideState::Pending)
    }

    pub fn rooms(&self) -> Option<&[Room]> {
        match self {
            SideState::Loaded(rooms) => Some(rooms),
            _ => None,
        }
    }
}

/// The randomizer config of one map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigDocument {
    a_side: SideState,
    b_side: SideState,
    c_side: SideState,
}

impl From<RandoConfigFile> for ConfigDocument {
    fn from(file: RandoConfigFile) -> Self {
        ConfigDocument {
            a_side: SideState::from_rooms(file.a_side),
            b_side: SideState::from_rooms(file.b_side),
            c_side: SideState::from_rooms(file.c_side),
        }
    }
}

pub fn combined_path(map_id: &str) -> String {
    format!("Config/{map_id}.rando")
}

pub fn side_path(map_id: &str, side: Side) -> String {
    format!("Config/{map_id}.{}.rando", side.letter())
}

/// Resolve and parse one config file. `Ok(None)` if the path has no content;
/// with `lazy`, an existing file is not parsed and every side comes back pending.
pub fn load_single(
    content: &(impl ContentSource + ?Sized),
    path: &str,
    lazy: bool,
) -> Result<Option<ConfigDocument>> {
    info!("Loading config from {path}");
    let Some(asset) = content.try_get(path) else {
        info!("...not found");
        return Ok(None);
    };
    if lazy {
        return Ok(Some(ConfigDocument::pending()));
    }
    let text = asset.read_to_string()?;
    let file: RandoConfigFile =
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
    Ok(Some(file.into()))
}

/// Load a map's config: the combined document if there is one, otherwise
/// whichever per-side documents exist. `Ok(None)` if the map has no config.
pub fn load_all(
    content: &(impl ContentSource + ?Sized),
    map_id: &str,
    lazy: bool,
) -> Result<Option<ConfigDocument>> {
    if let Some(doc) = load_single(content, &combined_path(map_id), false)? {
        return Ok(Some(doc));
    }

    let mut doc = ConfigDocument::default();
    for side in Side::ALL {
        if let Some(mut partial) = load_single(content, &side_path(map_id, side), lazy)? {
            let state = partial.take_side(side);
            if !state.is_absent() {
                *doc.side_mut(side) = state;
            }
        }
    }

    // A map without any side config is not randomizable at all.
    if Side::ALL.iter().all(|&s| doc.side(s).is_absent()) {
        return Ok(None);
    }
    Ok(Some(doc))
}

/// Fully load the per-side document for `mode` and map its rooms by name.
pub fn lazy_reload(
    content: &(impl ContentSource + ?Sized),
    map_id: &str,
    mode: AreaMode,
) -> Result<Option<HashMap<String, Room>>> {
    let path = side_path(map_id, mode.into());
    match load_single(content, &path, false)? {
        Some(doc) => doc.into_room_mapping(mode),
        None => Ok(None),
    }
}

fn build_mapping<K, V>(rooms: impl Iterator<Item = (K, V)>) -> Result<HashMap<K, V>>
where
    K: std::hash::Hash + Eq + AsRef<str>,
{
    let mut out: HashMap<K, V> = HashMap::new();
    for (name, room) in rooms {
        if out.contains_key(&name) {
            return Err(ConfigError::DuplicateRoom {
                name: name.as_ref().to_string(),
            });
        }
        out.insert(name, room);
    }
    Ok(out)
}

impl ConfigDocument {
    /// A document whose three sides all await a full load.
    pub fn pending() -> Self {
        ConfigDocument {
            a_side: SideState::Pending,
            b_side: SideState::Pending,
            c_side: SideState::Pending,
        }
    }

    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::A => &self.a_side,
            Side::B => &self.b_side,
            Side::C => &self.c_side,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::A => &mut self.a_side,
            Side::B => &mut self.b_side,
            Side::C => &mut self.c_side,
        }
    }

    fn take_side(&mut self, side: Side) -> SideState {
        std::mem::take(self.side_mut(side))
    }

    /// Map room names to rooms for the side played in `mode`.
    ///
    /// `Ok(None)` if the side does not exist. A pending side maps to an empty
    /// mapping; see [`ConfigDocument::materialize`].
    pub fn room_mapping(&self, mode: AreaMode) -> Result<Option<HashMap<&str, &Room>>> {
        match self.side(mode.into()) {
            SideState::Absent => Ok(None),
            SideState::Pending => Ok(Some(HashMap::new())),
            SideState::Loaded(rooms) => {
                build_mapping(rooms.iter().map(|r| (r.name.as_str(), r))).map(Some)
            }
        }
    }

    pub fn into_room_mapping(mut self, mode: AreaMode) -> Result<Option<HashMap<String, Room>>> {
        match self.take_side(mode.into()) {
            SideState::Absent => Ok(None),
            SideState::Pending => Ok(Some(HashMap::new())),
            SideState::Loaded(rooms) => {
                build_mapping(rooms.into_iter().map(|r| (r.name.clone(), r))).map(Some)
            }
        }
    }

    /// Replace a pending side with its fully parsed rooms. Sides that are
    /// already loaded or absent are left alone.
    pub fn materialize(
        &mut self,
        content: &(impl ContentSource + ?Sized),
        map_id: &str,
        mode: AreaMode,
    ) -> Result<Option<&[Room]>> {
        let side = Side::from(mode);
        if self.side(side).is_pending() {
            let state = match load_single(content, &side_path(map_id, side), false)? {
                Some(mut doc) => doc.take_side(side),
                None => SideState::Absent,
            };
            *self.side_mut(side) = state;
        }
        Ok(self.side(side).rooms())
    }
}
