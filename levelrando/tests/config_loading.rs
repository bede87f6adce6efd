use anyhow::{Context, Result, bail};
use levelrando::config::{self, Side};
use levelrando::{ConfigError, ContentIndex, SideState};
use levelrando_game::{AreaMode, HoleKind, NumDashes, Req, Room, ScreenDirection};

const MAP: &str = "Celeste/1-ForsakenCity";

const SIDE_A: &str = r#"
ASide:
  - Room: "1"
    Holes:
      - Side: Right
        Idx: 0
        Kind: inout
  - Room: "2"
    End: true
    Holes:
      - Side: Left
        Idx: 0
        Kind: in
"#;

const SIDE_B: &str = r#"
BSide:
  - Room: "b-00"
    Holes:
      - Side: Up
        Idx: 0
        Kind: out
"#;

fn side_path(side: Side) -> String {
    config::side_path(MAP, side)
}

#[test]
fn test_combined_document_has_priority() -> Result<()> {
    let mut content = ContentIndex::new();
    content.add_yaml("Base", &side_path(Side::A), SIDE_A);
    content.add_yaml(
        "Base",
        &config::combined_path(MAP),
        "ASide:\n  - Room: combined\n",
    );
    let doc = config::load_all(&content, MAP, true)?.context("expected a config")?;
    let rooms = doc.side(Side::A).rooms().context("A-side should be loaded")?;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].name, "combined");
    assert!(doc.side(Side::B).is_absent());
    assert!(doc.side(Side::C).is_absent());
    Ok(())
}

#[test]
fn test_lazy_load_marks_existing_sides_pending() -> Result<()> {
    let mut content = ContentIndex::new();
    content.add_yaml("Base", &side_path(Side::A), SIDE_A);
    let doc = config::load_all(&content, MAP, true)?.context("expected a config")?;
    assert!(doc.side(Side::A).is_pending());
    assert!(doc.side(Side::B).is_absent());
    assert!(doc.side(Side::C).is_absent());

    let mapping = doc
        .room_mapping(AreaMode::Normal)?
        .context("A-side should have a mapping")?;
    assert!(mapping.is_empty());
    assert!(doc.room_mapping(AreaMode::BSide)?.is_none());
    Ok(())
}

#[test]
fn test_eager_load_of_separate_sides() -> Result<()> {
    let mut content = ContentIndex::new();
    content.add_yaml("Base", &side_path(Side::A), SIDE_A);
    content.add_yaml("Base", &side_path(Side::B), SIDE_B);
    let doc = config::load_all(&content, MAP, false)?.context("expected a config")?;
    assert_eq!(doc.side(Side::A).rooms().map(|r| r.len()), Some(2));
    assert_eq!(doc.side(Side::B).rooms().map(|r| r.len()), Some(1));
    assert_eq!(doc.side(Side::C), &SideState::Absent);

    let mapping = doc
        .room_mapping(AreaMode::Normal)?
        .context("A-side should have a mapping")?;
    assert_eq!(mapping.len(), 2);
    assert!(mapping["2"].is_end());
    assert!(!mapping["1"].is_end());
    Ok(())
}

#[test]
fn test_side_document_only_contributes_its_own_side() -> Result<()> {
    let mut content = ContentIndex::new();
    // Extra sides in a per-side document are ignored.
    content.add_yaml(
        "Base",
        &side_path(Side::B),
        &format!("{SIDE_A}{SIDE_B}"),
    );
    let doc = config::load_all(&content, MAP, false)?.context("expected a config")?;
    assert!(doc.side(Side::A).is_absent());
    assert_eq!(doc.side(Side::B).rooms().map(|r| r.len()), Some(1));
    Ok(())
}

#[test]
fn test_map_without_config() -> Result<()> {
    let mut content = ContentIndex::new();
    content.add_yaml("Base", &side_path(Side::A), SIDE_A);
    assert!(config::load_all(&content, "Celeste/2-OldSite", false)?.is_none());
    assert!(config::load_all(&content, "Celeste/2-OldSite", true)?.is_none());
    assert!(config::lazy_reload(&content, "Celeste/2-OldSite", AreaMode::Normal)?.is_none());
    Ok(())
}

#[test]
fn test_malformed_side_reports_path() -> Result<()> {
    let mut content = ContentIndex::new();
    content.add_yaml("Base", &side_path(Side::A), SIDE_A);
    content.add_yaml("Base", &side_path(Side::C), "CSide:\n  - Holes: [\n");
    match config::load_all(&content, MAP, false) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, side_path(Side::C)),
        other => bail!("expected a parse error, got {:?}", other),
    }
    // Lazy loading defers parsing, so the error only surfaces on reload.
    let doc = config::load_all(&content, MAP, true)?.context("expected a config")?;
    assert!(doc.side(Side::C).is_pending());
    assert!(matches!(
        config::lazy_reload(&content, MAP, AreaMode::CSide),
        Err(ConfigError::Parse { .. })
    ));
    Ok(())
}

#[test]
fn test_duplicate_room_names() -> Result<()> {
    let mut content = ContentIndex::new();
    content.add_yaml(
        "Base",
        &side_path(Side::A),
        "ASide:\n  - Room: a\n  - Room: b\n  - Room: a\n",
    );
    let doc = config::load_all(&content, MAP, false)?.context("expected a config")?;
    match doc.room_mapping(AreaMode::Normal) {
        Err(ConfigError::DuplicateRoom { name }) => assert_eq!(name, "a"),
        other => bail!("expected a duplicate room error, got {:?}", other),
    }
    match config::lazy_reload(&content, MAP, AreaMode::Normal) {
        Err(ConfigError::DuplicateRoom { name }) => assert_eq!(name, "a"),
        other => bail!("expected a duplicate room error, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_lazy_reload_maps_rooms() -> Result<()> {
    let mut content = ContentIndex::new();
    content.add_yaml("Base", &side_path(Side::A), SIDE_A);
    content.add_yaml("Base", &side_path(Side::B), SIDE_B);
    let mapping = config::lazy_reload(&content, MAP, AreaMode::BSide)?
        .context("B-side should reload")?;
    assert_eq!(mapping.len(), 1);
    let room = &mapping["b-00"];
    assert_eq!(room.holes[0].side, ScreenDirection::Up);
    assert_eq!(room.holes[0].kind, HoleKind::Out);
    assert!(config::lazy_reload(&content, MAP, AreaMode::CSide)?.is_none());
    Ok(())
}

#[test]
fn test_materialize_pending_side() -> Result<()> {
    let mut content = ContentIndex::new();
    content.add_yaml("Base", &side_path(Side::A), SIDE_A);
    let mut doc = config::load_all(&content, MAP, true)?.context("expected a config")?;
    let rooms = doc
        .materialize(&content, MAP, AreaMode::Normal)?
        .context("A-side should materialize")?;
    assert_eq!(rooms.len(), 2);
    assert_eq!(doc.room_mapping(AreaMode::Normal)?.map(|m| m.len()), Some(2));
    assert!(doc.materialize(&content, MAP, AreaMode::BSide)?.is_none());
    Ok(())
}

#[test]
fn test_later_package_overrides_config() -> Result<()> {
    let mut content = ContentIndex::new();
    content.add_yaml("Base", &side_path(Side::A), SIDE_A);
    content.add_yaml("Patch", &side_path(Side::A), "ASide:\n  - Room: patched\n");
    let mapping = config::lazy_reload(&content, MAP, AreaMode::Normal)?
        .context("A-side should reload")?;
    assert_eq!(mapping.len(), 1);
    assert!(mapping.contains_key("patched"));
    Ok(())
}

#[test]
fn test_directory_content() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let package = dir.path().join("Base");
    let config_dir = package.join("Config/Celeste");
    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(config_dir.join("1-ForsakenCity.A.rando.yaml"), SIDE_A)?;
    std::fs::write(config_dir.join("notes.txt"), "not a config")?;

    let content = ContentIndex::from_directories(&[package])?;
    let doc = config::load_all(&content, MAP, false)?.context("expected a config")?;
    assert_eq!(doc.side(Side::A).rooms().map(|r| r.len()), Some(2));
    Ok(())
}

#[test]
fn test_full_room_round_trip() -> Result<()> {
    let yaml = r#"
Room: a-00
Collectables:
  - Idx: 0
    X: 100
    Y: -20
    MustFly: true
Holes:
  - Side: Right
    Idx: 0
    LowBound: 2
    HighBound: 10
    HighOpen: true
    ReqBoth:
      Dashes: Two
    ReqOut:
      Key: true
      KeyholeID: 3
    Kind: inout
    Launch: 4
    Split:
      Side: Right
      Idx: 0
      Kind: in
Subrooms:
  - Room: a-00b
    ReqEnd:
      Or:
        - Difficulty: Hard
        - Flag: lever
InternalEdges:
  - To: a-00b
    Warp: warp0
    Split: LeftToRight
    Collectable: 0
    CustomWarp: true
    ReqBoth:
      Flag: lever
Hub: true
Tweaks:
  - Name: spikesUp
    ID: 12
    X: 8.0
    Decal: FG
    Update:
      Remove: true
      Nodes:
        - Idx: 1
          X: 4.0
      Values:
        type: ice
Core:
  All: Hot
  Left: Cold
ExtraSpace:
  - X: 0
    Y: 0
    Width: 320
    Height: 180
Worth: 1.5
SpinnersShatter: true
Flags: [lever]
"#;
    let room: Room = serde_yaml::from_str(yaml)?;
    assert_eq!(room.collectables[0].x, Some(100));
    let hole = &room.holes[0];
    assert_eq!(hole.req_in, Some(Req::dashes(NumDashes::Two)));
    assert_eq!(hole.req_out.as_ref().and_then(|r| r.keyhole_id), Some(3));
    assert_eq!(hole.split.as_ref().map(|h| h.kind), Some(HoleKind::In));
    let subroom = room.find_subroom("a-00b").context("subroom")?;
    assert!(subroom.is_end());
    let edge = &room.internal_edges.as_ref().context("edges")?[0];
    assert_eq!(edge.req_in, edge.req_out);
    assert_eq!(edge.collectable, Some(0));
    let core = room.core.as_ref().context("core")?;
    assert_eq!(core.up(), levelrando_game::CoreMode::Hot);
    assert_eq!(core.left(), levelrando_game::CoreMode::Cold);

    let written = serde_yaml::to_string(&room)?;
    assert!(!written.contains("ReqBoth"));
    let reread: Room = serde_yaml::from_str(&written)?;
    assert_eq!(reread, room);
    Ok(())
}

#[test]
fn test_duplicate_extension_keeps_first_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let package = dir.path().join("Base");
    let config_dir = package.join("Config/Celeste");
    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(config_dir.join("1-ForsakenCity.A.rando.yaml"), SIDE_A)?;
    std::fs::write(
        config_dir.join("1-ForsakenCity.A.rando.yml"),
        "ASide:\n  - Room: other\n",
    )?;
    let content = ContentIndex::from_directories(&[package])?;
    let mapping = config::lazy_reload(&content, MAP, AreaMode::Normal)?
        .context("A-side should reload")?;
    assert_eq!(mapping.len(), 2);
    assert!(!mapping.contains_key("other"));
    Ok(())
}
