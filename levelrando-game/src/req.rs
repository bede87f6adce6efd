use serde::{Deserialize, Serialize};

use crate::{Difficulty, KeyholeId, NumDashes};

/// A traversal gate as written in a room config.
///
/// Every part that is present must hold: `And` children must all be satisfied,
/// at least one `Or` child must be satisfied, and each leaf condition
/// (difficulty, dashes, key, flag) must be met. A `Req` with nothing set is
/// always satisfied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Req {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Vec<Req>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Vec<Req>>,
    #[serde(default, skip_serializing_if = "is_minimum_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashes: Option<NumDashes>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub key: bool,
    #[serde(
        rename = "KeyholeID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub keyhole_id: Option<KeyholeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

fn is_minimum_difficulty(difficulty: &Difficulty) -> bool {
    *difficulty == Difficulty::default()
}

impl Req {
    pub fn all(children: Vec<Req>) -> Req {
        Req {
            and: Some(children),
            ..Req::default()
        }
    }

    pub fn any(children: Vec<Req>) -> Req {
        Req {
            or: Some(children),
            ..Req::default()
        }
    }

    pub fn difficulty(difficulty: Difficulty) -> Req {
        Req {
            difficulty,
            ..Req::default()
        }
    }

    pub fn dashes(dashes: NumDashes) -> Req {
        Req {
            dashes: Some(dashes),
            ..Req::default()
        }
    }

    pub fn key(keyhole_id: Option<KeyholeId>) -> Req {
        Req {
            key: true,
            keyhole_id,
            ..Req::default()
        }
    }

    pub fn flag(name: &str) -> Req {
        Req {
            flag: Some(name.to_string()),
            ..Req::default()
        }
    }

    /// True if this node carries no condition and no children at all.
    pub fn is_free(&self) -> bool {
        self.and.is_none()
            && self.or.is_none()
            && is_minimum_difficulty(&self.difficulty)
            && self.dashes.is_none()
            && !self.key
            && self.flag.is_none()
    }

    /// Depth of the expression tree; a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        let children = self.and.iter().chain(self.or.iter()).flatten();
        1 + children.map(Req::depth).max().unwrap_or(0)
    }
}
