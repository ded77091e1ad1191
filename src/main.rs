use clap::{Parser, Subcommand, ValueEnum};
use povframe::config::{self, LayoutMode, StudioConfig};
use povframe::imaging::{CaptionComposer, RustBackend};
use povframe::library::{self, Suitability};
use povframe::{batch, naming, output};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Overlay style, overriding `layout.mode` from the config file.
#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// One centred caption block
    Single,
    /// Label above the caption (e.g. "POV")
    Label,
}

impl From<ModeArg> for LayoutMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => LayoutMode::Single,
            ModeArg::Label => LayoutMode::Label,
        }
    }
}

#[derive(Parser)]
#[command(name = "povframe")]
#[command(about = "Composite outlined captions onto vignetted backgrounds")]
#[command(long_about = "\
Composite outlined captions onto vignetted backgrounds

Each frame is the background, darkened towards the centre, with the caption
wrapped to the frame and drawn in white with a black outline. The label style
puts a short label (\"POV\" by default) above the caption.

Library layout (paths configurable in povframe.toml):

  images/                  # backgrounds (jpg, png, webp), one level deep
  quotes/quotes.txt        # one caption per line
  output/                  # rendered posts + manifest.json

Backgrounds smaller than 640px on an edge or too bright for white text are
skipped. An empty images/ gets a dark sample background.

Run 'povframe gen-config' to generate a documented povframe.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Overlay style (overrides layout.mode)
    #[arg(long, value_enum, global = true)]
    mode: Option<ModeArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one caption onto one background
    Render {
        /// Background image
        background: PathBuf,
        /// Caption text
        caption: String,
        /// Output file (default: named after the background, in library.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render posts from the caption and background library
    Batch {
        /// Number of posts to render
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// Seed for a reproducible caption/background pairing
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate config, font and library without rendering
    Check,
    /// Print a stock povframe.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            background,
            caption,
            output: out,
        } => {
            let config = load_config(&cli.config, cli.mode)?;
            let composer = CaptionComposer::resolve(
                config.fonts.path.as_deref(),
                &config.font_candidates(),
                config.composer_config()?,
            )?;
            debug!(font = %composer.font().path().display(), "font resolved");

            let out = match out {
                Some(path) => path,
                None => config.library.output_dir.join(naming::render_file_name(
                    &background,
                    &composer.config().mode,
                    config.output.format,
                )),
            };
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }

            let summary = composer.render(
                &RustBackend::new(),
                &background,
                &caption,
                &config.encode_params(out),
            )?;
            output::print_render_summary(&summary);
        }
        Command::Batch { count, seed } => {
            let config = load_config(&cli.config, cli.mode)?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_batch_event(&event);
                }
            });
            let result = batch::generate(&config, count, seed, tx);
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let manifest = result?;
            output::print_batch_summary(&manifest, &config.library.output_dir);
        }
        Command::Check => {
            let config = load_config(&cli.config, cli.mode)?;
            let report = check(&config);
            output::print_check_report(&report);
            if !report.is_ready() {
                return Err("library is not ready to render".into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("povframe=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Load the config file, apply CLI overrides, and validate the result.
fn load_config(path: &Path, mode: Option<ModeArg>) -> Result<StudioConfig, config::ConfigError> {
    let mut config = config::load_config(path)?;
    if path.exists() {
        info!(path = %path.display(), "config loaded");
    }
    if let Some(mode) = mode {
        config.layout.mode = mode.into();
        config.validate()?;
    }
    Ok(config)
}

/// Gather everything `check` reports. Nothing is written to disk.
fn check(config: &StudioConfig) -> output::CheckReport {
    let font = povframe::imaging::FontSource::resolve(
        config.fonts.path.as_deref(),
        &config.font_candidates(),
    )
    .map(|font| font.path().to_path_buf());

    let captions = library::load_captions(&config.library.captions_file)
        .map(|c| c.len())
        .map_err(|e| e.to_string());

    let images_dir = &config.library.images_dir;
    let backgrounds = images_dir.is_dir().then(|| {
        let candidates = library::scan_backgrounds(images_dir).unwrap_or_default();
        library::survey_backgrounds(
            &RustBackend::new(),
            &candidates,
            &Suitability::from_config(&config.library),
        )
    });

    output::CheckReport {
        font,
        captions_file: config.library.captions_file.clone(),
        captions,
        backgrounds,
        images_dir: images_dir.clone(),
    }
}
