use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "reelkit", version, about = "Batch composer for vertical short-form videos")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter content table with one example row.
    Init(InitArgs),
    /// Render every row of the content table (requires `ffmpeg` unless --dry-run).
    Render(RenderArgs),
    /// Write only the word-timing subtitle JSON of every row.
    Subtitles(CommonArgs),
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Content table to create.
    #[arg(long, default_value = "content.csv")]
    table: PathBuf,

    /// Replace an existing table.
    #[arg(long, default_value_t = false)]
    force: bool,

    /// Config JSON whose row defaults fill the example row.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Content table (CSV).
    #[arg(long, default_value = "content.csv")]
    table: PathBuf,

    /// Output directory.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Config JSON overriding the built-in profile, timing and defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Default brand color for rows that leave it blank.
    #[arg(long, env = "BRAND_COLOR")]
    brand_color: Option<String>,

    /// Default destination URL for rows that leave it blank.
    #[arg(long, env = "SITE_URL")]
    site_url: Option<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Seed for the footage shuffle; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Write composition JSON and a synthesized thumbnail instead of encoding.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Also write `<stem>_subtitles.json` for every row.
    #[arg(long, default_value_t = false)]
    subtitles: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Init(args) => cmd_init(args),
        Command::Render(args) => cmd_render(args),
        Command::Subtitles(args) => cmd_subtitles(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<reelkit::ReelConfig> {
    let cfg = match path {
        Some(p) => reelkit::ReelConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => reelkit::ReelConfig::default(),
    };
    Ok(cfg)
}

fn resolve_config(args: &CommonArgs) -> anyhow::Result<reelkit::ReelConfig> {
    let mut cfg = load_config(args.config.as_ref())?;
    if let Some(hex) = args.brand_color.as_deref() {
        cfg.defaults.brand_color =
            reelkit::Rgb8::parse_hex(hex).context("BRAND_COLOR / --brand-color")?;
    }
    if let Some(url) = args.site_url.as_deref() {
        cfg.defaults.qr_url = url.trim().to_owned();
    }
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn load_rows(table: &std::path::Path) -> anyhow::Result<Vec<reelkit::RawRow>> {
    reelkit::load_table(table).with_context(|| format!("load content table '{}'", table.display()))
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    if args.table.exists() && !args.force {
        anyhow::bail!(
            "'{}' already exists (pass --force to replace it)",
            args.table.display()
        );
    }
    let cfg = load_config(args.config.as_ref())?;
    reelkit::write_starter_table(&args.table, &cfg.defaults)?;
    eprintln!("wrote {}", args.table.display());
    eprintln!("next: edit the table, add footage to the footage folder, then run `reelkit render`");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.common)?;
    let rows = load_rows(&args.common.table)?;
    tracing::info!(rows = rows.len(), table = %args.common.table.display(), "loaded content table");

    let probe = reelkit::FfprobeProbe;
    if !reelkit::is_ffprobe_on_path() {
        if !args.dry_run {
            anyhow::bail!("ffprobe is required for rendering but was not found on PATH (try --dry-run)");
        }
        tracing::warn!("ffprobe not on PATH: footage clips cannot be opened, rows use solid backgrounds");
    }
    let mut order = match args.seed {
        Some(seed) => reelkit::ShuffleOrder::seeded(seed),
        None => reelkit::ShuffleOrder::from_os_rng(),
    };
    let ffmpeg;
    let dry_run;
    let backend: &dyn reelkit::RenderBackend = if args.dry_run {
        dry_run = reelkit::DryRunBackend::new(cfg.badges.clone());
        &dry_run
    } else {
        if !reelkit::is_ffmpeg_on_path() {
            anyhow::bail!("ffmpeg is required for rendering but was not found on PATH (try --dry-run)");
        }
        ffmpeg = reelkit::FfmpegBackend::new(
            cfg.profile.clone(),
            cfg.badges.clone(),
            cfg.font_file.clone(),
        );
        &ffmpeg
    };

    let mut runner = reelkit::BatchRunner {
        cfg: &cfg,
        probe: &probe,
        order: &mut order,
        backend,
        out_dir: args.common.out.clone(),
        subtitles: args.subtitles,
    };
    let report = runner.run(&rows);
    print_report(&report);
    Ok(())
}

fn cmd_subtitles(args: CommonArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args)?;
    let rows = load_rows(&args.table)?;
    let report = reelkit::export_subtitles(&rows, &cfg, &args.out);
    print_report(&report);
    Ok(())
}

fn print_report(report: &reelkit::BatchReport) {
    for r in &report.rows {
        match &r.outcome {
            Ok(_) => eprintln!("ok    row {} {}", r.row, r.output),
            Err(e) => eprintln!("FAIL  row {} {}: {e}", r.row, r.output),
        }
    }
    eprintln!(
        "{} of {} rows succeeded",
        report.succeeded(),
        report.rows.len()
    );
}
