use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{CollectableIdx, CoreMode, HoleIdx, HoleKind, Req, ScreenDirection};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", from = "RoomDef")]
pub struct Room {
    #[serde(rename = "Room")]
    pub name: String,
    pub collectables: Vec<Collectable>,
    pub holes: Vec<Hole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subrooms: Option<Vec<Room>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_edges: Option<Vec<InternalEdge>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_end: Option<Req>,
    pub hub: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweaks: Option<Vec<Edit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core: Option<CoreModeOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_space: Option<Vec<Rectangle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worth: Option<f32>,
    pub spinners_shatter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,
}

// Wire form of a room. `End` is an alias that only ever writes into `ReqEnd`.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RoomDef {
    room: String,
    #[serde(default)]
    collectables: Vec<Collectable>,
    #[serde(default)]
    holes: Vec<Hole>,
    subrooms: Option<Vec<Room>>,
    internal_edges: Option<Vec<InternalEdge>>,
    end: Option<bool>,
    req_end: Option<Req>,
    #[serde(default)]
    hub: bool,
    tweaks: Option<Vec<Edit>>,
    core: Option<CoreModeOverride>,
    extra_space: Option<Vec<Rectangle>>,
    worth: Option<f32>,
    #[serde(default)]
    spinners_shatter: bool,
    flags: Option<Vec<String>>,
}

impl From<RoomDef> for Room {
    fn from(def: RoomDef) -> Self {
        let mut room = Room {
            name: def.room,
            collectables: def.collectables,
            holes: def.holes,
            subrooms: def.subrooms,
            internal_edges: def.internal_edges,
            req_end: None,
            hub: def.hub,
            tweaks: def.tweaks,
            core: def.core,
            extra_space: def.extra_space,
            worth: def.worth,
            spinners_shatter: def.spinners_shatter,
            flags: def.flags,
        };
        if let Some(end) = def.end {
            room.set_end(end);
        }
        if def.req_end.is_some() {
            room.req_end = def.req_end;
        }
        room
    }
}

impl Room {
    pub fn new(name: &str) -> Self {
        Room {
            name: name.to_string(),
            collectables: vec![],
            holes: vec![],
            subrooms: None,
            internal_edges: None,
            req_end: None,
            hub: false,
            tweaks: None,
            core: None,
            extra_space: None,
            worth: None,
            spinners_shatter: false,
            flags: None,
        }
    }

    /// Whether reaching this room can finish the map.
    pub fn is_end(&self) -> bool {
        self.req_end.is_some()
    }

    pub fn set_end(&mut self, end: bool) {
        self.req_end = if end { Some(Req::default()) } else { None };
    }

    pub fn find_hole(&self, side: ScreenDirection, idx: HoleIdx) -> Option<&Hole> {
        self.holes.iter().find(|h| h.matches(side, idx))
    }

    pub fn find_subroom(&self, name: &str) -> Option<&Room> {
        self.subrooms
            .iter()
            .flatten()
            .find(|r| r.name == name)
    }

    /// Visit this room and then every nested sub-room, depth first.
    pub fn walk(&self, visit: &mut impl FnMut(&Room)) {
        let mut stack: Vec<&Room> = vec![self];
        while let Some(room) = stack.pop() {
            visit(room);
            if let Some(subrooms) = &room.subrooms {
                stack.extend(subrooms.iter().rev());
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Collectable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    pub must_fly: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", from = "HoleDef")]
pub struct Hole {
    pub side: ScreenDirection,
    pub idx: HoleIdx,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_bound: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_bound: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_in: Option<Req>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_out: Option<Req>,
    pub kind: HoleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch: Option<i32>,
    pub new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<Box<Hole>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HoleDef {
    side: ScreenDirection,
    #[serde(default)]
    idx: HoleIdx,
    low_bound: Option<i32>,
    high_bound: Option<i32>,
    high_open: Option<bool>,
    req_in: Option<Req>,
    req_out: Option<Req>,
    req_both: Option<Req>,
    #[serde(default)]
    kind: HoleKind,
    launch: Option<i32>,
    #[serde(default)]
    new: bool,
    split: Option<Box<Hole>>,
}

impl From<HoleDef> for Hole {
    fn from(def: HoleDef) -> Self {
        let mut hole = Hole::new(def.side, def.idx);
        if let Some(req) = def.req_both {
            hole.set_req_both(req);
        }
        if def.req_in.is_some() {
            hole.req_in = def.req_in;
        }
        if def.req_out.is_some() {
            hole.req_out = def.req_out;
        }
        hole.low_bound = def.low_bound;
        hole.high_bound = def.high_bound;
        hole.high_open = def.high_open;
        hole.kind = def.kind;
        hole.launch = def.launch;
        hole.new = def.new;
        hole.split = def.split;
        hole
    }
}

impl Hole {
    pub fn new(side: ScreenDirection, idx: HoleIdx) -> Self {
        Hole {
            side,
            idx,
            low_bound: None,
            high_bound: None,
            high_open: None,
            req_in: None,
            req_out: None,
            kind: HoleKind::None,
            launch: None,
            new: false,
            split: None,
        }
    }

    pub fn matches(&self, side: ScreenDirection, idx: HoleIdx) -> bool {
        self.side == side && self.idx == idx
    }

    /// Gate both directions with the same requirement.
    pub fn set_req_both(&mut self, req: Req) {
        self.req_in = Some(req.clone());
        self.req_out = Some(req);
    }

    pub fn with_req_both(mut self, req: Req) -> Self {
        self.set_req_both(req);
        self
    }

    /// The combined requirement is write-only; it always reads back as absent.
    pub fn req_both(&self) -> Option<&Req> {
        None
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeSplit {
    TopToBottom,
    BottomToTop,
    LeftToRight,
    RightToLeft,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", from = "InternalEdgeDef")]
pub struct InternalEdge {
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_in: Option<Req>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_out: Option<Req>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<EdgeSplit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collectable: Option<CollectableIdx>,
    pub custom_warp: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InternalEdgeDef {
    to: String,
    warp: Option<String>,
    req_in: Option<Req>,
    req_out: Option<Req>,
    req_both: Option<Req>,
    split: Option<EdgeSplit>,
    collectable: Option<CollectableIdx>,
    #[serde(default)]
    custom_warp: bool,
}

impl From<InternalEdgeDef> for InternalEdge {
    fn from(def: InternalEdgeDef) -> Self {
        let mut edge = InternalEdge::new(&def.to);
        if let Some(req) = def.req_both {
            edge.set_req_both(req);
        }
        if def.req_in.is_some() {
            edge.req_in = def.req_in;
        }
        if def.req_out.is_some() {
            edge.req_out = def.req_out;
        }
        edge.warp = def.warp;
        edge.split = def.split;
        edge.collectable = def.collectable;
        edge.custom_warp = def.custom_warp;
        edge
    }
}

impl InternalEdge {
    pub fn new(to: &str) -> Self {
        InternalEdge {
            to: to.to_string(),
            warp: None,
            req_in: None,
            req_out: None,
            split: None,
            collectable: None,
            custom_warp: false,
        }
    }

    pub fn set_req_both(&mut self, req: Req) {
        self.req_in = Some(req.clone());
        self.req_out = Some(req);
    }

    pub fn with_req_both(mut self, req: Req) -> Self {
        self.set_req_both(req);
        self
    }

    pub fn req_both(&self) -> Option<&Req> {
        None
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecalType {
    #[default]
    None,
    FG,
    BG,
}

/// An edit applied to one entity (or decal) of a room after it is placed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Edit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    pub decal: DecalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<EditUpdate>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EditUpdate {
    pub remove: bool,
    pub add: bool,
    pub default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<EditNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EditNode {
    pub idx: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

/// Per-direction core mode, where each unset direction falls back to `All`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CoreModeOverride {
    pub all: CoreMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    left: Option<CoreMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right: Option<CoreMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    up: Option<CoreMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    down: Option<CoreMode>,
}

impl CoreModeOverride {
    pub fn get(&self, direction: ScreenDirection) -> CoreMode {
        let mode = match direction {
            ScreenDirection::Left => self.left,
            ScreenDirection::Right => self.right,
            ScreenDirection::Up => self.up,
            ScreenDirection::Down => self.down,
        };
        mode.unwrap_or(self.all)
    }

    pub fn set(&mut self, direction: ScreenDirection, mode: CoreMode) {
        let slot = match direction {
            ScreenDirection::Left => &mut self.left,
            ScreenDirection::Right => &mut self.right,
            ScreenDirection::Up => &mut self.up,
            ScreenDirection::Down => &mut self.down,
        };
        *slot = Some(mode);
    }

    pub fn left(&self) -> CoreMode {
        self.get(ScreenDirection::Left)
    }

    pub fn right(&self) -> CoreMode {
        self.get(ScreenDirection::Right)
    }

    pub fn up(&self) -> CoreMode {
        self.get(ScreenDirection::Up)
    }

    pub fn down(&self) -> CoreMode {
        self.get(ScreenDirection::Down)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, NumDashes};

    #[test]
    fn test_req_both_is_write_only() {
        let hole = Hole::new(ScreenDirection::Left, 0).with_req_both(Req::dashes(NumDashes::Two));
        assert!(hole.req_both().is_none());
        assert_eq!(hole.req_in, Some(Req::dashes(NumDashes::Two)));
        assert_eq!(hole.req_out, Some(Req::dashes(NumDashes::Two)));

        let mut edge = InternalEdge::new("b");
        edge.set_req_both(Req::flag("lever"));
        assert!(edge.req_both().is_none());
        assert_eq!(edge.req_in, edge.req_out);
        assert_eq!(edge.req_in, Some(Req::flag("lever")));
    }

    #[test]
    fn test_req_both_in_yaml() {
        let yaml = "
Side: Right
Idx: 1
Kind: inout
ReqBoth:
  Difficulty: Hard
ReqOut:
  Dashes: Zero
";
        let hole: Hole = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(hole.req_in, Some(Req::difficulty(Difficulty::Hard)));
        assert_eq!(hole.req_out, Some(Req::dashes(NumDashes::Zero)));
        let out = serde_yaml::to_string(&hole).unwrap();
        assert!(!out.contains("ReqBoth"));
    }

    #[test]
    fn test_end_alias_sets_req_end() {
        let room: Room = serde_yaml::from_str("Room: a-01\nEnd: true\n").unwrap();
        assert!(room.is_end());
        assert_eq!(room.req_end, Some(Req::default()));

        let room: Room =
            serde_yaml::from_str("Room: a-01\nEnd: true\nReqEnd:\n  Flag: heart\n").unwrap();
        assert_eq!(room.req_end, Some(Req::flag("heart")));

        let room: Room = serde_yaml::from_str("Room: a-02\n").unwrap();
        assert!(!room.is_end());
        assert!(room.holes.is_empty());
        assert!(room.collectables.is_empty());
    }

    #[test]
    fn test_core_mode_fallback() {
        let core: CoreModeOverride = serde_yaml::from_str("All: Hot\nLeft: Cold\n").unwrap();
        assert_eq!(core.left(), CoreMode::Cold);
        assert_eq!(core.right(), CoreMode::Hot);
        assert_eq!(core.up(), CoreMode::Hot);

        let mut core = CoreModeOverride::default();
        assert_eq!(core.down(), CoreMode::None);
        core.set(ScreenDirection::Down, CoreMode::Cold);
        core.all = CoreMode::Hot;
        assert_eq!(core.down(), CoreMode::Cold);
        assert_eq!(core.up(), CoreMode::Hot);
    }

    #[test]
    fn test_walk_visits_subrooms() {
        let mut root = Room::new("a");
        let mut b = Room::new("b");
        b.subrooms = Some(vec![Room::new("c")]);
        root.subrooms = Some(vec![b, Room::new("d")]);
        let mut names = vec![];
        root.walk(&mut |r: &Room| names.push(r.name.clone()));
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert!(root.find_subroom("d").is_some());
        assert!(root.find_subroom("c").is_none());
    }
}
