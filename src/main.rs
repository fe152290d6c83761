use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hexmosaic::assets::{AssetCategory, AssetLoader, AssetSource};
use hexmosaic::error::RenderError;
use hexmosaic::models::{AppConfig, ImageTransform};
use hexmosaic::rendering::RasterImage;
use hexmosaic::services::{RecolorTrigger, Session, DOCUMENT_PALETTE, EXPORT_FILE_NAME};
use mosaic_dither::DitherMode;

#[derive(Parser)]
#[command(name = "hexmosaic")]
#[command(about = "Recolor hexagon mosaics from a photo")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recolor a mosaic from an image and write the result
    Recolor {
        /// Image to sample (PNG, JPEG, BMP, GIF, WebP)
        #[arg(short, long)]
        image: PathBuf,

        /// Mosaic SVG (defaults to MODEL_SVG or the embedded model)
        #[arg(short, long)]
        svg: Option<PathBuf>,

        /// Palette name, or "document" to use the mosaic's own colors
        #[arg(short, long)]
        palette: Option<String>,

        /// Dither mode: none, ordered, floyd-steinberg
        #[arg(short, long)]
        dither: Option<DitherMode>,

        /// Image scale relative to the cover fit
        #[arg(long)]
        scale: Option<f32>,

        /// Horizontal image offset in ViewBox units
        #[arg(long, allow_hyphen_values = true)]
        translate_x: Option<f32>,

        /// Vertical image offset in ViewBox units
        #[arg(long, allow_hyphen_values = true)]
        translate_y: Option<f32>,

        /// Width the mosaic is laid out at when measuring regions
        #[arg(long)]
        display_width: Option<f32>,

        /// Output SVG file path
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,

        /// Also write a PNG preview
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Opacity of the image overlaid on the preview (0 hides it)
        #[arg(long, default_value_t = 0.0)]
        opacity: f32,

        /// Print the pass report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session reading commands from stdin
    Session {
        /// Mosaic SVG (defaults to MODEL_SVG or the embedded model)
        #[arg(short, long)]
        svg: Option<PathBuf>,

        /// Image to load at startup
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// List available palettes
    Palettes,
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract the mosaic model
        #[arg(long)]
        model: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Recolor {
            image,
            svg,
            palette,
            dither,
            scale,
            translate_x,
            translate_y,
            display_width,
            output,
            preview,
            opacity,
            json,
        }) => {
            init_tracing("hexmosaic=warn");
            let options = RecolorOptions {
                palette,
                dither,
                transform: ImageTransform {
                    scale: scale.unwrap_or(1.0),
                    translate_x: translate_x.unwrap_or(0.0),
                    translate_y: translate_y.unwrap_or(0.0),
                },
                display_width,
                preview,
                opacity,
                json,
            };
            run_recolor_command(&image, svg.as_deref(), &output, options)
        }
        Some(Commands::Session { svg, image }) => {
            init_tracing("hexmosaic=info");
            run_session(svg, image).await
        }
        Some(Commands::Palettes) => {
            init_tracing("hexmosaic=warn");
            run_palettes_command();
            Ok(())
        }
        Some(Commands::Init {
            model,
            config,
            force,
            list,
        }) => run_init_command(model, config, force, list),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Config and mosaic text from the environment, with CLI overrides.
fn load_inputs(svg: Option<&Path>) -> anyhow::Result<(AppConfig, String)> {
    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader);
    let text = match svg {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Could not read {}: {e}", path.display()))?,
        None => loader.read_model_string()?,
    };
    Ok((config, text))
}

struct RecolorOptions {
    palette: Option<String>,
    dither: Option<DitherMode>,
    transform: ImageTransform,
    display_width: Option<f32>,
    preview: Option<PathBuf>,
    opacity: f32,
    json: bool,
}

/// One-shot recolor (no debouncing)
fn run_recolor_command(
    image: &Path,
    svg: Option<&Path>,
    output: &Path,
    options: RecolorOptions,
) -> anyhow::Result<()> {
    let (mut config, text) = load_inputs(svg)?;
    if let Some(width) = options.display_width {
        config.display_width = width;
    }

    let mut session = Session::with_config(config);
    session.load_document(&text)?;

    match options.palette.as_deref() {
        Some(name) if name.eq_ignore_ascii_case(DOCUMENT_PALETTE) => {
            session.use_document_palette()?
        }
        Some(name) => {
            session.set_palette(name);
        }
        None => {}
    }
    if let Some(mode) = options.dither {
        session.set_dither(mode);
    }

    let bytes = std::fs::read(image)?;
    session.load_image_bytes(&bytes)?;
    session.set_transform(options.transform);

    let report = session.apply_colors()?;
    std::fs::write(output, session.export_svg()?)?;

    if let Some(path) = &options.preview {
        let png = session.preview_png(options.opacity)?;
        std::fs::write(path, &png)?;
        println!("Preview {} ({} bytes)", path.display(), png.len());
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.status_message());
        if report.skipped > 0 {
            println!("{} regions had no geometry and stayed white.", report.skipped);
        }
        println!("Wrote {}", output.display());
    }
    Ok(())
}

type DecodeResult = Result<RasterImage, RenderError>;

/// Read and decode an image off the session loop.
fn spawn_decode(path: PathBuf, tx: mpsc::Sender<DecodeResult>) {
    tokio::spawn(async move {
        let result = match tokio::fs::read(&path).await {
            Ok(bytes) => tokio::task::spawn_blocking(move || RasterImage::decode(&bytes))
                .await
                .unwrap_or_else(|e| Err(RenderError::Decode(e.to_string()))),
            Err(e) => Err(RenderError::Io(e)),
        };
        if tx.send(result).await.is_err() {
            tracing::debug!(path = %path.display(), "Session closed before decode finished");
        }
    });
}

/// Line-oriented interactive session
async fn run_session(svg: Option<PathBuf>, image: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, text) = load_inputs(svg.as_deref())?;
    let mut session = Session::with_config(config);
    if let Err(e) = session.load_document(&text) {
        tracing::error!(%e, "Starting without a mosaic");
    }
    println!("{}", session.status());

    let (tx, mut rx) = mpsc::channel::<DecodeResult>(4);
    if let Some(path) = image {
        spawn_decode(path, tx.clone());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let due = session.time_until_due();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_command(&mut session, line.trim(), &tx) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => println!("{}", session.status()),
                    Err(e) => eprintln!("{e}"),
                }
            }
            Some(decoded) = rx.recv() => {
                match decoded {
                    Ok(image) => session.install_image(image),
                    Err(e) => session.image_failed(&e),
                }
                println!("{}", session.status());
            }
            _ = tokio::time::sleep(due.unwrap_or(Duration::ZERO)), if due.is_some() => {
                if session.poll().is_some() {
                    println!("{}", session.status());
                }
            }
        }
    }
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

const SESSION_HELP: &str = "\
Commands:
  load <image>             load an image (recolors right away)
  palette <name|document>  switch palette
  dither <mode>            none, ordered, floyd-steinberg
  scale <s>                image scale
  translate <x> <y>        image offset in ViewBox units
  drag <dx> <dy>           move the image by display pixels
  wheel <dy>               zoom like a mouse wheel
  apply                    recolor now
  refresh                  recolor after the debounce delay
  reset                    restore original colors
  save [file]              write the SVG
  preview <file> [alpha]   write a PNG preview
  status                   show current settings
  quit";

fn handle_command(
    session: &mut Session,
    line: &str,
    decode_tx: &mpsc::Sender<DecodeResult>,
) -> anyhow::Result<Flow> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Flow::Continue);
    };
    let args: Vec<&str> = words.collect();
    let number = |i: usize| -> anyhow::Result<f32> {
        let raw = args
            .get(i)
            .ok_or_else(|| anyhow::anyhow!("{command}: missing argument"))?;
        raw.parse::<f32>()
            .map_err(|e| anyhow::anyhow!("{command}: invalid number {raw:?}: {e}"))
    };

    match command {
        "load" => {
            let path = args
                .first()
                .ok_or_else(|| anyhow::anyhow!("load: missing image path"))?;
            spawn_decode(PathBuf::from(path), decode_tx.clone());
        }
        "palette" => match args.first() {
            Some(name) if name.eq_ignore_ascii_case(DOCUMENT_PALETTE) => {
                session.use_document_palette()?
            }
            Some(name) => {
                session.set_palette(name);
            }
            None => println!("{}", session.config().palette_names().join(", ")),
        },
        "dither" => {
            let raw = args
                .first()
                .ok_or_else(|| anyhow::anyhow!("dither: missing mode"))?;
            session.set_dither(raw.parse()?);
        }
        "scale" => {
            let transform = ImageTransform {
                scale: number(0)?,
                ..session.transform()
            };
            session.set_transform(transform);
        }
        "translate" => {
            let transform = ImageTransform {
                translate_x: number(0)?,
                translate_y: number(1)?,
                ..session.transform()
            };
            session.set_transform(transform);
        }
        "drag" => session.pan(number(0)?, number(1)?),
        "wheel" => session.zoom(number(0)?),
        "apply" => {
            if let Err(e) = session.apply_colors() {
                tracing::debug!(%e, "Apply did not run");
            }
        }
        "refresh" => session.request_recolor(RecolorTrigger::Explicit),
        "reset" => session.reset()?,
        "save" => {
            let path = PathBuf::from(args.first().copied().unwrap_or(EXPORT_FILE_NAME));
            let text = session.export_svg()?;
            std::fs::write(&path, text)?;
            println!("Wrote {}", path.display());
        }
        "preview" => {
            let path = args
                .first()
                .ok_or_else(|| anyhow::anyhow!("preview: missing output path"))?;
            let opacity = if args.len() > 1 { number(1)? } else { 0.0 };
            let png = session.preview_png(opacity)?;
            std::fs::write(path, &png)?;
            println!("Wrote {path} ({} bytes)", png.len());
        }
        "status" => print_session_status(session),
        "help" | "?" => println!("{SESSION_HELP}"),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => anyhow::bail!("Unknown command {other:?}, try 'help'"),
    }
    Ok(Flow::Continue)
}

fn print_session_status(session: &Session) {
    let t = session.transform();
    let b = session.bounds();
    match session.document() {
        Some(doc) => {
            let vb = doc.view_box();
            println!(
                "Mosaic:    {} regions ({} recolorable), viewBox {}x{}",
                doc.len(),
                doc.recolorable().len(),
                vb.width,
                vb.height
            );
        }
        None => println!("Mosaic:    (none)"),
    }
    match session.image() {
        Some(img) => println!("Image:     {}x{}", img.width(), img.height()),
        None => println!("Image:     (none)"),
    }
    println!(
        "Palette:   {} ({} colors)",
        session.palette_name(),
        session.palette().len()
    );
    println!("Dither:    {}", session.dither());
    println!(
        "Transform: scale {:.2} [{}..{}], translate {:.0},{:.0} [±{}, ±{}]",
        t.scale, b.scale_min, b.scale_max, t.translate_x, t.translate_y, b.translate_x, b.translate_y
    );
    if session.is_pending() {
        println!("Recolor:   pending");
    }
    if let Some(report) = session.last_report() {
        println!(
            "Last pass: {} updated, {} skipped ({} / {})",
            report.updated, report.skipped, report.palette, report.mode
        );
    }
}

fn run_palettes_command() {
    let config = AppConfig::load_from_assets(&AssetLoader::from_env());
    for name in config.palette_names() {
        match config.palette(&name) {
            Ok(palette) => {
                let colors: Vec<String> = palette
                    .entries()
                    .iter()
                    .map(|e| format!("{} {}", e.hex(), e.label()))
                    .collect();
                println!("{name}:");
                for c in colors {
                    println!("  {c}");
                }
            }
            Err(e) => println!("{name}: invalid ({e})"),
        }
    }
    println!("{DOCUMENT_PALETTE}:\n  (colors taken from the mosaic)");
}

/// Extract embedded assets to filesystem
fn run_init_command(model: bool, config: bool, force: bool, list: bool) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Model:");
        for f in AssetLoader::list_embedded(AssetCategory::Model) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    // Neither flag means both
    let mut categories = Vec::new();
    if model || !config {
        categories.push(AssetCategory::Model);
    }
    if config || !model {
        categories.push(AssetCategory::Config);
    }

    let report = AssetLoader::from_env().init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let model_file = std::env::var("MODEL_SVG").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("hexmosaic v{VERSION}");
    println!("Recolor hexagon mosaics from a photo\n");

    println!("Environment Variables:");
    println!(
        "  MODEL_SVG   = {}",
        model_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    let loader = AssetLoader::from_env();
    let describe = |source: AssetSource, requested: &Option<String>| match (source, requested) {
        (AssetSource::File(path), _) => path.display().to_string(),
        (AssetSource::Embedded, Some(_)) => "embedded (file not found)".to_string(),
        (AssetSource::Embedded, None) => "embedded".to_string(),
    };
    println!("\nAsset Sources:");
    println!("  Model:   {}", describe(loader.model_source(), &model_file));
    println!("  Config:  {}", describe(loader.config_source(), &config_file));

    println!("\nCommands:");
    println!("  hexmosaic recolor    Recolor a mosaic from an image");
    println!("  hexmosaic session    Interactive session on stdin");
    println!("  hexmosaic palettes   List palettes");
    println!("  hexmosaic init       Extract embedded assets");
    println!("\nRun 'hexmosaic --help' for more details.");
}
