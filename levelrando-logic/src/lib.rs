use hashbrown::HashSet;
use levelrando_game::{Difficulty, KeyholeId, NumDashes, Req, Ruleset};

/// Normalized form of a [`Req`], built once at load time and evaluated many
/// times during search.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Requirement {
    Free,
    Never,
    Difficulty(Difficulty),
    Dashes(NumDashes),
    Key(Option<KeyholeId>),
    Flag(String),
    And(Vec<Requirement>),
    Or(Vec<Requirement>),
}

impl Requirement {
    pub fn make_and(reqs: Vec<Requirement>) -> Requirement {
        let mut out_reqs: Vec<Requirement> = vec![];
        for req in reqs {
            if let Requirement::Never = req {
                return Requirement::Never;
            } else if let Requirement::Free = req {
                continue;
            } else if let Requirement::And(and_reqs) = req {
                out_reqs.extend(and_reqs);
            } else {
                out_reqs.push(req);
            }
        }
        if out_reqs.len() > 1 {
            Requirement::And(out_reqs)
        } else {
            out_reqs.pop().unwrap_or(Requirement::Free)
        }
    }

    pub fn make_or(reqs: Vec<Requirement>) -> Requirement {
        let mut out_reqs: Vec<Requirement> = vec![];
        for req in reqs {
            if let Requirement::Never = req {
                continue;
            } else if let Requirement::Free = req {
                return Requirement::Free;
            } else if let Requirement::Or(or_reqs) = req {
                out_reqs.extend(or_reqs);
            } else {
                out_reqs.push(req);
            }
        }
        if out_reqs.len() > 1 {
            Requirement::Or(out_reqs)
        } else {
            out_reqs.pop().unwrap_or(Requirement::Never)
        }
    }

    /// Every present part of a config node is conjoined: its `And` group, its
    /// `Or` group, and each leaf condition.
    pub fn from_req(req: &Req) -> Requirement {
        let mut parts: Vec<Requirement> = vec![];
        if let Some(children) = &req.and {
            parts.push(Requirement::make_and(
                children.iter().map(Requirement::from_req).collect(),
            ));
        }
        if let Some(children) = &req.or {
            parts.push(Requirement::make_or(
                children.iter().map(Requirement::from_req).collect(),
            ));
        }
        if req.difficulty > Difficulty::Easy {
            parts.push(Requirement::Difficulty(req.difficulty));
        }
        if let Some(dashes) = req.dashes {
            parts.push(Requirement::Dashes(dashes));
        }
        if req.key {
            parts.push(Requirement::Key(req.keyhole_id));
        }
        if let Some(flag) = &req.flag {
            parts.push(Requirement::Flag(flag.clone()));
        }
        Requirement::make_and(parts)
    }

    /// An absent requirement is no gate at all.
    pub fn from_optional(req: Option<&Req>) -> Requirement {
        req.map_or(Requirement::Free, Requirement::from_req)
    }

    pub fn evaluate(&self, ctx: &LogicContext) -> bool {
        match self {
            Requirement::Free => true,
            Requirement::Never => false,
            Requirement::Difficulty(difficulty) => ctx.difficulty >= *difficulty,
            Requirement::Dashes(dashes) => ctx.dashes >= *dashes,
            Requirement::Key(keyhole_id) => ctx.can_open(*keyhole_id),
            Requirement::Flag(flag) => ctx.flags.contains(flag),
            Requirement::And(reqs) => reqs.iter().all(|r| r.evaluate(ctx)),
            Requirement::Or(reqs) => reqs.iter().any(|r| r.evaluate(ctx)),
        }
    }
}

/// The player state a requirement is checked against.
#[derive(Clone, Debug, Default)]
pub struct LogicContext {
    pub difficulty: Difficulty,
    pub dashes: NumDashes,
    pub has_key: bool,
    // Keyholes the player holds a matching key for.
    pub key_ids: HashSet<KeyholeId>,
    pub flags: HashSet<String>,
}

impl LogicContext {
    pub fn new(difficulty: Difficulty, dashes: NumDashes) -> Self {
        LogicContext {
            difficulty,
            dashes,
            ..LogicContext::default()
        }
    }

    pub fn from_ruleset(ruleset: &Ruleset) -> Self {
        LogicContext::new(ruleset.difficulty, ruleset.dashes)
    }

    pub fn with_key(mut self, keyhole_id: Option<KeyholeId>) -> Self {
        self.has_key = true;
        if let Some(id) = keyhole_id {
            self.key_ids.insert(id);
        }
        self
    }

    pub fn with_flag(mut self, flag: &str) -> Self {
        self.flags.insert(flag.to_string());
        self
    }

    pub fn can_open(&self, keyhole_id: Option<KeyholeId>) -> bool {
        match keyhole_id {
            Some(id) => self.key_ids.contains(&id),
            None => self.has_key,
        }
    }
}

/// Evaluate a config requirement directly, without normalizing it first.
pub fn evaluate(req: &Req, ctx: &LogicContext) -> bool {
    if let Some(children) = &req.and {
        if !children.iter().all(|c| evaluate(c, ctx)) {
            return false;
        }
    }
    if let Some(children) = &req.or {
        if !children.iter().any(|c| evaluate(c, ctx)) {
            return false;
        }
    }
    if ctx.difficulty < req.difficulty {
        return false;
    }
    if let Some(dashes) = req.dashes {
        if ctx.dashes < dashes {
            return false;
        }
    }
    if req.key && !ctx.can_open(req.keyhole_id) {
        return false;
    }
    if let Some(flag) = &req.flag {
        if !ctx.flags.contains(flag) {
            return false;
        }
    }
    true
}

pub fn is_satisfied(req: Option<&Req>, ctx: &LogicContext) -> bool {
    req.is_none_or(|r| evaluate(r, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hard_two_dash() -> LogicContext {
        LogicContext::new(Difficulty::Hard, NumDashes::Two)
    }

    #[test]
    fn test_empty_req_is_free() {
        let req = Req::default();
        assert!(evaluate(&req, &LogicContext::default()));
        assert_eq!(Requirement::from_req(&req), Requirement::Free);
        assert!(is_satisfied(None, &LogicContext::default()));
    }

    #[test]
    fn test_leaf_conditions_conjoin() {
        let req = Req {
            difficulty: Difficulty::Hard,
            dashes: Some(NumDashes::Two),
            flag: Some("lever".to_string()),
            ..Req::default()
        };
        assert!(!evaluate(&req, &hard_two_dash()));
        assert!(evaluate(&req, &hard_two_dash().with_flag("lever")));
        let ctx = LogicContext::new(Difficulty::Normal, NumDashes::Two).with_flag("lever");
        assert!(!evaluate(&req, &ctx));
        assert_eq!(
            Requirement::from_req(&req),
            Requirement::And(vec![
                Requirement::Difficulty(Difficulty::Hard),
                Requirement::Dashes(NumDashes::Two),
                Requirement::Flag("lever".to_string()),
            ])
        );
    }

    #[test]
    fn test_keys() {
        let any_key = Req::key(None);
        let specific = Req::key(Some(4));
        let ctx = LogicContext::default();
        assert!(!evaluate(&any_key, &ctx));
        let ctx = ctx.with_key(None);
        assert!(evaluate(&any_key, &ctx));
        assert!(!evaluate(&specific, &ctx));
        let ctx = ctx.with_key(Some(4));
        assert!(evaluate(&specific, &ctx));
    }

    #[test]
    fn test_and_or() {
        let req = Req::any(vec![
            Req::dashes(NumDashes::Two),
            Req::all(vec![Req::difficulty(Difficulty::Expert), Req::flag("f")]),
        ]);
        assert!(evaluate(&req, &hard_two_dash()));
        let ctx = LogicContext::new(Difficulty::Expert, NumDashes::One);
        assert!(!evaluate(&req, &ctx));
        assert!(evaluate(&req, &ctx.with_flag("f")));
    }

    #[test]
    fn test_empty_or_is_never() {
        let req = Req::any(vec![]);
        assert!(!evaluate(&req, &hard_two_dash()));
        assert_eq!(Requirement::from_req(&req), Requirement::Never);
        assert!(evaluate(&Req::all(vec![]), &hard_two_dash()));
    }

    #[test]
    fn test_make_and_flattens() {
        let r = Requirement::make_and(vec![
            Requirement::Free,
            Requirement::And(vec![
                Requirement::Flag("a".to_string()),
                Requirement::Flag("b".to_string()),
            ]),
            Requirement::Dashes(NumDashes::Zero),
        ]);
        assert_eq!(
            r,
            Requirement::And(vec![
                Requirement::Flag("a".to_string()),
                Requirement::Flag("b".to_string()),
                Requirement::Dashes(NumDashes::Zero),
            ])
        );
        assert_eq!(
            Requirement::make_or(vec![Requirement::Never, Requirement::Free]),
            Requirement::Free
        );
    }

    #[test]
    fn test_context_from_ruleset() {
        let mut ruleset = Ruleset::new("Classic");
        ruleset.difficulty = Difficulty::Expert;
        ruleset.dashes = NumDashes::Zero;
        let ctx = LogicContext::from_ruleset(&ruleset);
        assert!(evaluate(&Req::difficulty(Difficulty::Expert), &ctx));
        assert!(!evaluate(&Req::dashes(NumDashes::One), &ctx));
    }
}
