use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollreel::{ChoreoConfig, PageSnapshot, ScrollDriver};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the phase schedule for a page snapshot.
    Schedule(PageArgs),
    /// Print the pose the timeline produces at a scroll offset.
    Scrub(OffsetArgs),
    /// Print the section active at a scroll offset.
    Resolve(OffsetArgs),
    /// Print the scroll offset a jump to a section lands on.
    Locate(LocateArgs),
}

#[derive(Parser, Debug)]
struct PageArgs {
    /// Page snapshot JSON.
    #[arg(long)]
    page: PathBuf,

    /// Choreography config JSON (defaults to the home page layout).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Build the reduced-motion variant.
    #[arg(long)]
    reduced_motion: bool,
}

#[derive(Parser, Debug)]
struct OffsetArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Document scroll offset in pixels.
    #[arg(long, allow_negative_numbers = true)]
    offset: f64,
}

#[derive(Parser, Debug)]
struct LocateArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Section id, e.g. `projects`.
    #[arg(long)]
    section: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Schedule(args) => cmd_schedule(args),
        Command::Scrub(args) => cmd_scrub(args),
        Command::Resolve(args) => cmd_resolve(args),
        Command::Locate(args) => cmd_locate(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    let v = serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))?;
    Ok(v)
}

fn load(args: &PageArgs) -> anyhow::Result<(ChoreoConfig, PageSnapshot)> {
    let config: ChoreoConfig = match &args.config {
        Some(path) => read_json(path, "config")?,
        None => ChoreoConfig::default(),
    };
    config.validate()?;
    let page: PageSnapshot = read_json(&args.page, "page snapshot")?;
    scrollreel::Viewport::new(page.viewport.width, page.viewport.height)?;
    Ok((config, page))
}

fn build(args: &PageArgs) -> anyhow::Result<(ChoreoConfig, ScrollDriver, PageSnapshot)> {
    let (config, mut page) = load(args)?;
    let mut driver = ScrollDriver::new(config.clone(), args.reduced_motion);
    driver.remeasure(&mut page)?;
    if !driver.is_ready() {
        anyhow::bail!("page snapshot is missing panel measurements");
    }
    Ok((config, driver, page))
}

fn print_json<T: serde::Serialize>(v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize output")?;
    println!("{s}");
    Ok(())
}

fn cmd_schedule(args: PageArgs) -> anyhow::Result<()> {
    let (_, driver, _) = build(&args)?;
    let schedule = driver.schedule().context("schedule not ready")?;
    let timeline = driver.timeline().context("timeline not ready")?;

    println!(
        "pin_start={} pin_end={} total={}",
        schedule.pin_start(),
        schedule.pin_end(),
        schedule.total_distance()
    );
    for (phase, seg) in schedule.phases().iter().zip(timeline.segments()) {
        let kind = match phase.kind {
            scrollreel::PhaseKind::Slide { from, to } => format!("slide {from}->{to}"),
            scrollreel::PhaseKind::Internal { motion, .. } => {
                format!("{motion:?}").to_lowercase()
            }
        };
        println!(
            "{:>10.1} {:>10.1}  {:<10} {:<14} {:?}",
            phase.start,
            phase.length,
            phase.section.as_str(),
            kind,
            seg.kind
        );
    }
    Ok(())
}

fn cmd_scrub(args: OffsetArgs) -> anyhow::Result<()> {
    let (_, driver, mut page) = build(&args.page)?;
    let progress = driver
        .scrub(&mut page, args.offset)
        .context("schedule not ready")?;
    eprintln!(
        "offset={} progress={progress:.4} stage={:?}",
        args.offset,
        driver.stage_at(args.offset)
    );
    print_json(&page.record.pose)
}

fn cmd_resolve(args: OffsetArgs) -> anyhow::Result<()> {
    let (_, driver, _) = build(&args.page)?;
    let resolver = driver.resolver().context("schedule not ready")?;
    let section = resolver.decode(args.offset);
    let nav = scrollreel::home_nav_sections();
    match scrollreel::find_nav_section(&nav, &section) {
        Some(entry) => println!("{} {} ({})", entry.index_label, entry.label, section),
        None => println!("{section}"),
    }
    Ok(())
}

fn cmd_locate(args: LocateArgs) -> anyhow::Result<()> {
    let (config, driver, page) = build(&args.page)?;
    let section = scrollreel::SectionId::new(args.section);
    if !config.knows(&section) {
        anyhow::bail!("unknown section '{section}'");
    }
    let resolver = driver.resolver().context("schedule not ready")?;
    let offset = match resolver.encode(&section) {
        Some(scrollreel::JumpTarget::Offset(at)) => at,
        Some(scrollreel::JumpTarget::Document(id)) => {
            use scrollreel::LayoutProbe as _;
            page.section_document_offset(&id)
                .with_context(|| format!("page snapshot has no document box for '{id}'"))?
        }
        None => anyhow::bail!("section '{section}' has no position"),
    };
    println!("{offset}");
    Ok(())
}
