use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hashbrown::HashSet;
use levelrando::config::{self, Side};
use levelrando::metadata::{self, RandoMetadata};
use levelrando::skeleton::{ScannedArea, area_skeleton};
use levelrando::{ContentIndex, LoaderSettings, SideState};
use levelrando_game::{AreaMode, HoleKind, Room};
use levelrando_logic::{LogicContext, is_satisfied};
use log::info;
use strum::VariantNames;

#[derive(Parser)]
#[command(name = "levelrando-cli", about = "Inspect level randomizer content")]
struct Args {
    /// Content package directories, in load order
    #[arg(long = "content", required = true)]
    content: Vec<PathBuf>,

    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a map's config and summarize each side
    Config {
        #[arg(long)]
        map: String,
        /// Parse every side now instead of deferring
        #[arg(long)]
        eager: bool,
    },
    /// Fully load one side of a map and list its rooms
    Reload {
        #[arg(long)]
        map: String,
        #[arg(long, default_value = "Normal")]
        mode: String,
        /// Ruleset used to report which room ends are reachable
        #[arg(long)]
        ruleset: Option<String>,
        #[arg(long)]
        audio_events: Option<PathBuf>,
    },
    /// Merge metadata from every package and list rulesets
    Metadata {
        /// File listing loadable audio events, one per line; all events are accepted if omitted
        #[arg(long)]
        audio_events: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print a starting config from scanned hole data
    Skeleton {
        #[arg(long)]
        scan: PathBuf,
        #[arg(long)]
        skip_unknown: bool,
    },
}

fn parse_mode(mode: &str) -> Result<AreaMode> {
    match AreaMode::from_str(mode) {
        Ok(mode) => Ok(mode),
        Err(_) => bail!(
            "Unrecognized mode '{}', expected one of {:?}",
            mode,
            AreaMode::VARIANTS
        ),
    }
}

fn load_metadata(content: &ContentIndex, audio_events: Option<&Path>) -> Result<RandoMetadata> {
    let metadata = match audio_events {
        Some(path) => {
            let events_str = std::fs::read_to_string(path)
                .with_context(|| format!("Unable to read audio events at {}", path.display()))?;
            let events: HashSet<String> = events_str
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            RandoMetadata::load_all(content, &events)?
        }
        None => RandoMetadata::load_all(content, &|_: &str| true)?,
    };
    Ok(metadata)
}

fn count_rooms(rooms: &[Room]) -> usize {
    let mut count = 0;
    for room in rooms {
        room.walk(&mut |_: &Room| count += 1);
    }
    count
}

fn describe_side(state: &SideState) -> String {
    match state {
        SideState::Absent => "absent".to_string(),
        SideState::Pending => "pending".to_string(),
        SideState::Loaded(rooms) => {
            let holes: usize = rooms.iter().map(|r| r.holes.len()).sum();
            let unknown = rooms
                .iter()
                .flat_map(|r| r.holes.iter())
                .filter(|h| h.kind == HoleKind::Unknown)
                .count();
            let hubs = rooms.iter().filter(|r| r.hub).count();
            format!(
                "{} rooms ({} including subrooms), {} holes ({} unknown), {} hubs",
                rooms.len(),
                count_rooms(rooms),
                holes,
                unknown,
                hubs
            )
        }
    }
}

fn run_config(content: &ContentIndex, map: &str, lazy: bool) -> Result<()> {
    let Some(doc) = config::load_all(content, map, lazy)
        .with_context(|| format!("Unable to load config for {map}"))?
    else {
        println!("{map}: no randomizer config");
        return Ok(());
    };
    for side in Side::ALL {
        println!("{}-side: {}", side.letter(), describe_side(doc.side(side)));
    }
    Ok(())
}

fn run_reload(
    content: &ContentIndex,
    map: &str,
    mode: AreaMode,
    ctx: Option<&LogicContext>,
) -> Result<()> {
    let Some(mapping) = config::lazy_reload(content, map, mode)
        .with_context(|| format!("Unable to reload {map} ({mode:?})"))?
    else {
        println!("{map}: no {mode:?} config");
        return Ok(());
    };
    let mut names: Vec<&String> = mapping.keys().collect();
    names.sort();
    for name in names {
        let room = &mapping[name];
        let end = match (&room.req_end, ctx) {
            (None, _) => "",
            (Some(_), None) => " [end]",
            (Some(req), Some(ctx)) if is_satisfied(Some(req), ctx) => " [end: reachable]",
            (Some(_), Some(_)) => " [end: gated]",
        };
        println!("{} ({} holes){}", name, room.holes.len(), end);
    }
    Ok(())
}

fn run_metadata(metadata: &RandoMetadata, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "collectable_names": metadata.collectable_names(),
            "music": metadata.music().iter().map(|m| &m.name).collect::<Vec<_>>(),
            "campaigns": metadata.campaigns().iter().map(|c| &c.name).collect::<Vec<_>>(),
            "rulesets": metadata.rulesets().iter().map(|r| &r.name).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    println!(
        "{} collectable names, {} music cues, {} campaigns, {} backgrounds",
        metadata.collectable_names().len(),
        metadata.music().len(),
        metadata.campaigns().len(),
        metadata.backgrounds().len(),
    );
    for ruleset in metadata.rulesets() {
        println!(
            "{}: {} ({:?}, {:?}, {:?} dashes)",
            ruleset.name,
            ruleset.long_name(),
            ruleset.algorithm,
            ruleset.difficulty,
            ruleset.dashes
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let settings = LoaderSettings::load(&args.settings)?;
    let content = ContentIndex::from_directories(&args.content)
        .context("Unable to index content packages")?;

    match args.command {
        Command::Config { map, eager } => {
            let lazy = settings.lazy_loading && !eager;
            info!("Loading {map} (lazy: {lazy})");
            run_config(&content, &map, lazy)
        }
        Command::Reload {
            map,
            mode,
            ruleset,
            audio_events,
        } => {
            let mode = parse_mode(&mode)?;
            let ctx = match ruleset {
                Some(name) => {
                    let metadata = metadata::install(load_metadata(
                        &content,
                        audio_events.as_deref(),
                    )?)?;
                    let Some(ruleset) = metadata.ruleset(&name) else {
                        bail!("Unknown ruleset '{name}'");
                    };
                    Some(LogicContext::from_ruleset(ruleset))
                }
                None => None,
            };
            run_reload(&content, &map, mode, ctx.as_ref())
        }
        Command::Metadata { audio_events, json } => {
            let metadata = metadata::install(load_metadata(&content, audio_events.as_deref())?)?;
            run_metadata(metadata, json)
        }
        Command::Skeleton { scan, skip_unknown } => {
            let scan_str = std::fs::read_to_string(&scan)
                .with_context(|| format!("Unable to read scan at {}", scan.display()))?;
            let area: ScannedArea = serde_json::from_str(&scan_str)
                .with_context(|| format!("Unable to parse scan at {}", scan.display()))?;
            for line in area_skeleton(&area, !skip_unknown) {
                println!("{line}");
            }
            Ok(())
        }
    }
}
