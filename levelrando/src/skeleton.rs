//! Developer aid: print a starting config for a map from scanned hole data.

use hashbrown::HashMap;
use levelrando_game::ScreenDirection;
use serde::Deserialize;

/// One hole found by scanning a level's geometry.
#[derive(Clone, Debug, Deserialize)]
pub struct ScannedHole {
    pub side: ScreenDirection,
    // Levels found just outside the low and high ends of the hole, if any.
    #[serde(default)]
    pub low_target: Option<String>,
    #[serde(default)]
    pub high_target: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScannedLevel {
    pub name: String,
    #[serde(default)]
    pub dummy: bool,
    #[serde(default)]
    pub holes: Vec<ScannedHole>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ScannedMap {
    pub levels: Vec<ScannedLevel>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ScannedArea {
    #[serde(default)]
    pub a_side: Option<ScannedMap>,
    #[serde(default)]
    pub b_side: Option<ScannedMap>,
    #[serde(default)]
    pub c_side: Option<ScannedMap>,
}

/// Render room entries for every non-dummy level with holes. Holes that lead
/// nowhere known are marked `unknown`, or skipped if `do_unknown` is false.
pub fn yaml_skeleton(map: &ScannedMap, do_unknown: bool) -> Vec<String> {
    let dummy_by_name: HashMap<&str, bool> = map
        .levels
        .iter()
        .map(|l| (l.name.as_str(), l.dummy))
        .collect();
    let is_known = |target: &Option<String>| match target {
        Some(name) => dummy_by_name.get(name.as_str()) == Some(&false),
        None => false,
    };

    let mut lines: Vec<String> = vec![];
    for level in &map.levels {
        if level.dummy {
            continue;
        }
        if !level.holes.is_empty() {
            lines.push(format!("  - Room: \"{}\"", level.name));
            lines.push("    Holes:".to_string());
        }
        let mut last_side = ScreenDirection::Up;
        let mut hole_idx: i32 = -1;
        for hole in &level.holes {
            if hole.side == last_side {
                hole_idx += 1;
            } else {
                hole_idx = 0;
                last_side = hole.side;
            }

            // The low end decides when it hits a level; otherwise fall back to the high end.
            let target = if hole.low_target.is_some() {
                &hole.low_target
            } else {
                &hole.high_target
            };
            let unknown = !is_known(target);
            if unknown && !do_unknown {
                continue;
            }
            lines.push(format!("    - Side: {:?}", hole.side));
            lines.push(format!("      Idx: {hole_idx}"));
            lines.push(format!(
                "      Kind: {}",
                if unknown { "unknown" } else { "inout" }
            ));
        }
    }
    lines
}

/// Render every scanned side under its side header. Printing is left to the caller.
pub fn area_skeleton(area: &ScannedArea, do_unknown: bool) -> Vec<String> {
    let mut lines: Vec<String> = vec![];
    for (header, map) in [
        ("ASide:", &area.a_side),
        ("BSide:", &area.b_side),
        ("CSide:", &area.c_side),
    ] {
        if let Some(map) = map {
            lines.push(header.to_string());
            lines.extend(yaml_skeleton(map, do_unknown));
        }
    }
    lines
}
