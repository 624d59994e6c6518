use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use aliwisdom::{
    AppConfig, AudioContextSlot, CaptureOptions, CapturePipeline, FfmpegRecorder, FontBook,
    FrameCompositor, LoopingVideo, Quote, RenderSettings, Studio, Surface, TextEngine, Voice,
    catalog, foundation::core::Canvas, media::video::BackgroundSource,
    services::{GeminiClient, PexelsClient, download_to},
};
use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "aliwisdom", version)]
struct Cli {
    /// JSON config file. Every field is optional.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List quote categories, visual templates and narrator voices.
    Catalog,
    /// Fetch a quote (retrying until the service answers) and print it as JSON.
    Quote(QuoteArgs),
    /// Render a single preview frame as a PNG.
    Frame(FrameArgs),
    /// Fetch, narrate and record a full short (requires `ffmpeg` on PATH).
    Produce(ProduceArgs),
}

#[derive(Parser, Debug)]
struct QuoteArgs {
    #[arg(long, default_value = "wisdom")]
    category: String,

    /// Also write the quote JSON here.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Quote JSON, as written by `quote --out`.
    #[arg(long)]
    quote: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Local background video; the gradient is drawn without one.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Background timestamp in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    #[arg(long)]
    no_arabic: bool,
}

#[derive(Parser, Debug)]
struct ProduceArgs {
    #[arg(long)]
    category: Option<String>,

    /// Use this quote JSON instead of fetching one.
    #[arg(long)]
    quote: Option<PathBuf>,

    #[arg(long, default_value = "Charon")]
    voice: Voice,

    #[arg(long)]
    template: Option<String>,

    #[arg(long)]
    no_arabic: bool,

    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Also write the narration as a WAV next to the video.
    #[arg(long)]
    keep_narration: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    aliwisdom::logging::init(cli.verbose);

    match cli.cmd {
        Command::Catalog => cmd_catalog(),
        Command::Quote(args) => cmd_quote(load_config(cli.config.as_deref())?, args).await,
        Command::Frame(args) => cmd_frame(load_config(cli.config.as_deref())?, args),
        Command::Produce(args) => cmd_produce(load_config(cli.config.as_deref())?, args).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let cfg = match path {
        Some(p) => AppConfig::load(p).with_context(|| format!("load config '{}'", p.display()))?,
        None => AppConfig::default(),
    };
    let cfg = cfg.from_process_env();
    cfg.validate()?;
    Ok(cfg)
}

fn read_quote_json(path: &Path) -> anyhow::Result<Quote> {
    let f = File::open(path).with_context(|| format!("open quote '{}'", path.display()))?;
    let quote: Quote =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse quote JSON")?;
    quote.validate()?;
    Ok(quote)
}

fn make_compositor(cfg: &AppConfig) -> anyhow::Result<FrameCompositor> {
    let book = FontBook::load(&cfg.fonts).with_context(
        || "load fonts (set ALIWISDOM_FONTS_DIR or the `fonts` config section)",
    )?;
    let engine = TextEngine::new(&book)?;
    Ok(FrameCompositor::new(Canvas::PORTRAIT_HD, engine))
}

fn make_studio(cfg: &AppConfig) -> Studio<GeminiClient, PexelsClient, GeminiClient> {
    let gemini = GeminiClient::new(&cfg.gemini).with_fallback(cfg.quote_fallback);
    Studio::new(gemini.clone(), PexelsClient::new(&cfg.pexels), gemini)
        .with_retry_delay(cfg.retry_delay())
}

fn cmd_catalog() -> anyhow::Result<()> {
    println!("categories:");
    for c in &catalog::QUOTE_CATEGORIES {
        println!("  {:<10} {} ({})", c.id, c.name, c.description);
    }
    println!("templates:");
    for t in &catalog::TEMPLATES {
        println!("  {:<18} {}", t.id, t.name);
    }
    println!("voices:");
    for v in Voice::ALL {
        println!("  {:<8} {} [{}]", v.id(), v.label(), v.language());
    }
    Ok(())
}

async fn cmd_quote(cfg: AppConfig, args: QuoteArgs) -> anyhow::Result<()> {
    let mut studio = make_studio(&cfg);
    studio.fetch_quote(Some(args.category.as_str())).await?;
    let quote = studio.quote().context("quote fetch finished without a quote")?;

    let json = serde_json::to_string_pretty(quote)?;
    if let Some(out) = &args.out {
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(out, &json).with_context(|| format!("write '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    println!("{json}");
    if let Some(url) = studio.background_url() {
        eprintln!("background: {url}");
    }
    Ok(())
}

fn cmd_frame(cfg: AppConfig, args: FrameArgs) -> anyhow::Result<()> {
    let quote = read_quote_json(&args.quote)?;
    let settings = RenderSettings {
        include_arabic: !args.no_arabic,
        ..RenderSettings::default()
    };

    let background = match &args.background {
        Some(path) => Some(
            aliwisdom::media::video::frame_at(path, args.at)
                .with_context(|| format!("decode background '{}'", path.display()))?,
        ),
        None => None,
    };

    let mut compositor = make_compositor(&cfg)?;
    let mut surface = Surface::new(compositor.canvas())?;
    compositor.try_render_frame(&mut surface, Some(&quote), &settings, background.as_ref())?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    surface
        .to_frame()
        .save_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_produce(cfg: AppConfig, args: ProduceArgs) -> anyhow::Result<()> {
    let mut settings = RenderSettings {
        voice: args.voice,
        include_arabic: !args.no_arabic,
        ..RenderSettings::default()
    };
    if let Some(category) = &args.category {
        if !catalog::is_known_category(category) {
            tracing::warn!(category, "unknown category; using the first one");
        }
        settings.category = catalog::category(category).id.to_string();
    }
    if let Some(template) = &args.template {
        if !catalog::is_known_template(template) {
            tracing::warn!(template, "unknown template; using the first one");
        }
        settings.template_id = catalog::template(template).id.to_string();
    }

    // Fonts load before any remote call.
    let compositor = make_compositor(&cfg)?;

    let mut studio = make_studio(&cfg).with_settings(settings);
    match &args.quote {
        Some(path) => {
            studio.set_quote(read_quote_json(path)?)?;
            studio.refresh_background().await;
        }
        None => studio.fetch_quote(None).await?,
    }

    let scratch = tempfile::tempdir().context("create scratch dir")?;
    let mut looping = match studio.background_url() {
        Some(url) => {
            let http = reqwest::Client::new();
            let dest = scratch.path().join("background.mp4");
            match download_to(&http, url, &dest).await {
                Ok(path) => LoopingVideo::open(&path, cfg.output.fps)
                    .map_err(|e| tracing::warn!(error = %e, "background video unusable"))
                    .ok(),
                Err(e) => {
                    tracing::warn!(error = %e, "background download failed; using gradient");
                    None
                }
            }
        }
        None => None,
    };

    let options = CaptureOptions {
        fps: cfg.output.fps,
        video_bitrate: cfg.output.video_bitrate,
        out_dir: args.out_dir.unwrap_or_else(|| cfg.output.dir.clone()),
        keep_narration: args.keep_narration,
    };
    let mut pipeline = CapturePipeline::new(compositor, FfmpegRecorder::detect(), options);
    let mut audio = AudioContextSlot::new(cfg.sample_rate);

    let background = looping.as_mut().map(|v| v as &mut dyn BackgroundSource);
    let artifact = studio
        .produce(&mut pipeline, background, &mut audio)
        .await
        .cloned();

    match artifact {
        Some(artifact) => {
            eprintln!(
                "wrote {} ({}, {:.1}s, {} frames)",
                artifact.path.display(),
                artifact.mime_type,
                artifact.duration_secs,
                artifact.frame_count
            );
            if let Some(wav) = &artifact.narration_path {
                eprintln!("wrote {}", wav.display());
            }
            Ok(())
        }
        None => anyhow::bail!("{}", studio.status().message),
    }
}
