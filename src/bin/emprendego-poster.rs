//! emprendego-poster - Compose and export a store's QR poster
//!
//! Reads a store record (JSON, as returned by the data layer) and an optional
//! poster config, then writes the composed layout as JSON and/or a PNG.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use emprendego_poster::{
    ColorSlot, ExportAdapter, PosterConfig, PosterCustomizer, PosterElement, PosterStyle, QrSize,
    StoreProfile, SvgExporter,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "emprendego-poster")]
#[command(about = "Compose and export a store's QR poster", long_about = None)]
struct Cli {
    /// Store record (JSON)
    #[arg(short, long)]
    store: PathBuf,

    /// URL encoded into the QR code
    #[arg(short, long)]
    url: String,

    /// Poster config (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the poster style
    #[arg(long, value_enum)]
    style: Option<StyleArg>,

    /// Override the QR size in pixels (180, 256 or 360)
    #[arg(long)]
    qr_size: Option<u32>,

    /// Override the brand colour (#RRGGBB)
    #[arg(long)]
    brand_color: Option<String>,

    /// Hide the logo or initial badge
    #[arg(long)]
    hide_logo: bool,

    /// Hide the display URL
    #[arg(long)]
    hide_url: bool,

    /// Hide the social/contact footer
    #[arg(long)]
    hide_socials: bool,

    /// Write the composed layout as JSON
    #[arg(long)]
    layout_json: Option<PathBuf>,

    /// Write the exported poster as PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Device pixels per layout pixel for PNG export
    #[arg(long, default_value_t = 2.0)]
    scale: f32,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Minimal,
    Brand,
    Poster,
}

impl From<StyleArg> for PosterStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Minimal => Self::Minimal,
            StyleArg::Brand => Self::Brand,
            StyleArg::Poster => Self::Poster,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        error!("Poster export failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.layout_json.is_none() && cli.png.is_none() {
        bail!("nothing to do: pass --layout-json and/or --png");
    }

    let store_json = fs::read_to_string(&cli.store)
        .with_context(|| format!("Failed to read store file {}", cli.store.display()))?;
    let store = StoreProfile::from_json(&store_json).context("Failed to parse store record")?;

    let config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            PosterConfig::from_json(&json).context("Failed to parse poster config")?
        }
        None => PosterConfig::default().with_color(ColorSlot::Brand, store.primary_color),
    };

    let mut customizer = PosterCustomizer::with_config(store, &cli.url, config);
    if let Some(style) = cli.style {
        customizer.update(|c| c.with_style(style.into()));
    }
    if let Some(pixels) = cli.qr_size {
        customizer.update(|c| c.with_qr_size(QrSize::from_pixels(pixels)));
    }
    if let Some(color) = &cli.brand_color {
        customizer
            .try_update(|c| c.set_color_str(ColorSlot::Brand, color))
            .context("Invalid --brand-color")?;
    }
    for (hidden, element) in [
        (cli.hide_logo, PosterElement::Logo),
        (cli.hide_url, PosterElement::Url),
        (cli.hide_socials, PosterElement::Socials),
    ] {
        if hidden {
            customizer.update(|c| c.with_visibility(element, false));
        }
    }

    let layout = customizer.layout();

    if let Some(path) = &cli.layout_json {
        fs::write(path, layout.to_json_pretty()?)
            .with_context(|| format!("Failed to write layout to {}", path.display()))?;
        info!("Wrote layout to {}", path.display());
    }

    if let Some(path) = &cli.png {
        let image = SvgExporter::new(cli.scale)
            .export(&layout)
            .context("Failed to export poster")?;
        fs::write(path, &image.bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(
            "Wrote {}x{} poster for {} to {}",
            image.width,
            image.height,
            layout.header.name,
            path.display()
        );
    }

    Ok(())
}
