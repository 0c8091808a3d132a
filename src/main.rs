mod app;
mod error;
mod geometry;
mod store;
mod surface;
mod tag;

use anyhow::Context as _;
use clap::Parser;
use eframe::egui;
use flexi_logger::{Logger, LoggerHandle};

use crate::store::PlaceholderPolicy;
use crate::surface::SurfaceOptions;

const APP_NAME: &str = "taggable-image";

/// Drag text tags around on top of an image.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Image path, or a file:// / https:// URI
    #[arg(value_name = "SOURCE")]
    source: Option<String>,

    /// Hide the delete button on markers
    #[arg(long)]
    no_remove: bool,

    /// Hide the form for adding tags
    #[arg(long)]
    no_add: bool,

    /// Accept tags with an empty label
    #[arg(long)]
    allow_empty: bool,

    /// Hide the coordinate readout under each label
    #[arg(long)]
    hide_details: bool,

    /// When an empty tag list gets the "temp" hint tag
    #[arg(long, value_enum, default_value_t = PlaceholderPolicy::WheneverEmpty)]
    placeholder: PlaceholderPolicy,

    /// Hover text for the image
    #[arg(long)]
    alt: Option<String>,
}

impl Args {
    fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            removable: !self.no_remove,
            allow_adding_tags: !self.no_add,
            allow_empty_tags: self.allow_empty,
            show_details: !self.hide_details,
            alt: self.alt.clone(),
            ..SurfaceOptions::default()
        }
    }
}

fn start_logger() -> anyhow::Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str("info, eframe=warn, egui_glow=warn, egui_winit=warn")?
        .log_to_stderr()
        .start()?;
    Ok(handle)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = start_logger().context("cannot start logger")?;
    log::info!("starting {APP_NAME} {}", env!("CARGO_PKG_VERSION"));

    let source = args
        .source
        .as_deref()
        .map(app::resolve_source)
        .transpose()
        .context("cannot open image")?;
    let options = args.surface_options();
    let policy = args.placeholder;

    let title = match &args.source {
        Some(source) => format!("{APP_NAME} - {source}"),
        None => APP_NAME.to_owned(),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| Ok(Box::new(app::TaggerApp::new(cc, policy, options, source)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run eframe: {err}"))
}
