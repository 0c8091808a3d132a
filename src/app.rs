use std::path::{Path, PathBuf};

use eframe::egui;

use crate::error::{TaggerError, TaggerResult};
use crate::store::{PlaceholderPolicy, TagStore};
use crate::surface::{SurfaceOptions, TagEvent, TaggableSurface};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Turns a command-line or file-dialog source into a URI the egui loaders accept.
///
/// Anything with a scheme is used as is. Plain paths must exist and decode.
pub fn resolve_source(raw: &str) -> TaggerResult<String> {
    if raw.contains("://") {
        log::info!("using image uri {raw}");
        return Ok(raw.to_owned());
    }

    let path = PathBuf::from(raw);
    if !path.exists() {
        return Err(TaggerError::NotFound(path));
    }
    let (width, height) = image::image_dimensions(&path).map_err(|source| TaggerError::Image {
        path: path.clone(),
        source,
    })?;
    let path = path.canonicalize().unwrap_or(path);
    log::info!("opened {} ({width}x{height})", path.display());
    Ok(file_uri(&path))
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct TaggerApp {
    store: TagStore,
    options: SurfaceOptions,
    source: Option<String>,
    status: Option<String>,
    seen_revision: u64,
    image_size: Option<egui::Vec2>,
}

impl TaggerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        policy: PlaceholderPolicy,
        options: SurfaceOptions,
        source: Option<String>,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        Self::with_config(policy, options, source)
    }

    fn with_config(policy: PlaceholderPolicy, options: SurfaceOptions, source: Option<String>) -> Self {
        let mut store = TagStore::new(policy);
        store.ensure_placeholder();
        Self {
            store,
            options,
            source,
            status: None,
            seen_revision: 0,
            image_size: None,
        }
    }

    fn open(&mut self, raw: &str) {
        match resolve_source(raw) {
            Ok(uri) => {
                self.source = Some(uri);
                self.status = None;
            }
            Err(err) => {
                log::warn!("{err}");
                self.status = Some(err.to_string());
            }
        }
    }

    fn pick_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.open(&path.to_string_lossy());
    }

    fn tags_json(&self) -> TaggerResult<String> {
        Ok(serde_json::to_string_pretty(self.store.tags())?)
    }

    fn copy_json(&mut self, ctx: &egui::Context) {
        match self.tags_json() {
            Ok(json) => {
                ctx.copy_text(json);
                self.status = Some(format!("Copied {} tags", self.store.len()));
            }
            Err(err) => {
                log::error!("{err}");
                self.status = Some(err.to_string());
            }
        }
    }

    fn apply_events(&mut self, events: Vec<TagEvent>) {
        for event in events {
            if let TagEvent::Removed(id) = &event {
                if let Some(tag) = self.store.get(id) {
                    log::info!("removing tag {:?}", tag.content.as_deref().unwrap_or_default());
                }
            }
            self.store.apply(event);
        }
        if self.store.revision() != self.seen_revision {
            self.seen_revision = self.store.revision();
            log::debug!("store at revision {} with {} tags", self.seen_revision, self.store.len());
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open image…").clicked() {
                self.pick_image();
            }
            ui.separator();
            ui.checkbox(&mut self.options.removable, "Removable");
            ui.checkbox(&mut self.options.allow_adding_tags, "Allow adding");
            ui.checkbox(&mut self.options.allow_empty_tags, "Allow empty");
            ui.checkbox(&mut self.options.show_details, "Details");
            ui.separator();
            if ui.add_enabled(!self.store.is_empty(), egui::Button::new("Clear tags")).clicked() {
                self.store.clear();
            }
            if ui.button("Copy JSON").clicked() {
                self.copy_json(ui.ctx());
            }
            ui.separator();
            ui.label(format!("Tags: {}", self.store.len()));
            if let Some(size) = self.image_size {
                ui.label(format!("Image: {:.0}x{:.0}", size.x, size.y));
            }
        });
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for TaggerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}

impl TaggerApp {
    fn ui(&mut self, ctx: &egui::Context) {
        self.store.ensure_placeholder();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));

        if let Some(status) = &self.status {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.label(status.as_str());
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(source) = self.source.clone() else {
                ui.centered_and_justified(|ui| {
                    ui.label("Open an image to start tagging");
                });
                return;
            };

            let output = egui::ScrollArea::both()
                .show(ui, |ui| TaggableSurface::new(source, self.store.tags(), &self.options).show(ui))
                .inner;
            self.image_size = output.image_rect.map(|rect| rect.size());
            self.apply_events(output.events);
        });
    }
}
