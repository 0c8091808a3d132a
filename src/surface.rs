use egui::{pos2, vec2, Color32, CursorIcon, FontId, Id, ImageSource, Painter, Rect, Sense, Stroke, Ui, Vec2};

use crate::geometry::{clamp_to_image, drag_stop_position, marker_origin, percent_to_pixel};
use crate::tag::{Tag, TagId, TagPosition};

// ── Events / Options ────────────────────────────────────────────────────────

/// What the surface asks its owner to do with the tag collection.
#[derive(Clone, Debug, PartialEq)]
pub enum TagEvent {
    Added(String),
    Removed(TagId),
    Updated { id: TagId, position: TagPosition },
}

#[derive(Clone, Debug)]
pub struct SurfaceOptions {
    pub removable: bool,
    pub allow_adding_tags: bool,
    pub allow_empty_tags: bool,
    pub show_details: bool,
    pub delete_icon_color: Color32,
    pub hover_delete_icon_color: Color32,
    pub alt: Option<String>,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            removable: true,
            allow_adding_tags: true,
            allow_empty_tags: false,
            show_details: true,
            delete_icon_color: Color32::BLACK,
            hover_delete_icon_color: Color32::from_rgb(220, 38, 38),
            alt: None,
        }
    }
}

pub struct SurfaceOutput {
    pub events: Vec<TagEvent>,
    /// Where the image ended up on screen; `None` until it has loaded.
    pub image_rect: Option<Rect>,
}

// ── Marker metrics ──────────────────────────────────────────────────────────

const PADDING: f32 = 12.0;
const GAP: f32 = 10.0;
const CLOSE_SIZE: f32 = 18.0;
const LABEL_SIZE: f32 = 22.0;
const DETAIL_SIZE: f32 = 12.0;
const CORNER_RADIUS: f32 = 6.0;

fn overlay_color() -> Color32 {
    Color32::from_black_alpha(64)
}

// ── Surface ─────────────────────────────────────────────────────────────────

fn surface_id(ui: &Ui) -> Id {
    ui.id().with("taggable_surface")
}

fn draft_id(surface_id: Id) -> Id {
    surface_id.with("draft")
}

fn draft_edit_id(surface_id: Id) -> Id {
    surface_id.with("draft_edit")
}

fn marker_id(surface_id: Id, tag: &Tag, index: usize) -> Id {
    match &tag.id {
        Some(id) => surface_id.with(id),
        None => surface_id.with(("unsaved", index)),
    }
}

fn remove_button_id(marker_id: Id) -> Id {
    marker_id.with("remove")
}

/// Screen rect of a marker card. While dragging, the flip uses the ratio the
/// tag would get if released right now, so the card never jumps on release.
fn card_rect(image_rect: Rect, anchor: Vec2, stored: &TagPosition, dragging: bool, size: Vec2) -> Rect {
    let image_size = image_rect.size();
    let (x, y) = if dragging {
        let live = drag_stop_position(anchor, image_size);
        (live.x, live.y)
    } else {
        (stored.x, stored.y)
    };
    Rect::from_min_size(image_rect.min + marker_origin(anchor, x, y, size, image_size), size)
}

/// An image with one draggable marker per tag painted over it.
///
/// Markers are placed from each tag's percentage position. While a marker is
/// dragged its pixel offset lives in egui's temporary memory; the store only
/// hears about it once the pointer is released.
pub struct TaggableSurface<'s, 't> {
    source: ImageSource<'s>,
    tags: &'t [Tag],
    options: &'t SurfaceOptions,
}

impl<'s, 't> TaggableSurface<'s, 't> {
    pub fn new(source: impl Into<ImageSource<'s>>, tags: &'t [Tag], options: &'t SurfaceOptions) -> Self {
        Self {
            source: source.into(),
            tags,
            options,
        }
    }

    pub fn show(self, ui: &mut Ui) -> SurfaceOutput {
        let surface_id = surface_id(ui);
        let mut events = Vec::new();

        if self.options.allow_adding_tags {
            if let Some(content) = self.add_form(ui, surface_id) {
                events.push(TagEvent::Added(content));
            }
            ui.add_space(8.0);
        }

        let image = egui::Image::new(self.source.clone())
            .fit_to_exact_size(vec2(ui.available_width(), f32::INFINITY));

        let image_rect = match image.load_and_calc_size(ui, ui.available_size()) {
            Some(size) => {
                let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
                image.paint_at(ui, rect);
                if let Some(alt) = &self.options.alt {
                    response.on_hover_text(alt.as_str());
                }
                Some(rect)
            }
            None => {
                ui.add(image);
                None
            }
        };

        if let Some(rect) = image_rect {
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 0.0, overlay_color());
            for (index, tag) in self.tags.iter().enumerate() {
                if let Some(event) = self.marker(ui, &painter, surface_id, rect, index, tag) {
                    events.push(event);
                }
            }
        }

        SurfaceOutput { events, image_rect }
    }

    /// Single-line label field. Returns the submitted text.
    fn add_form(&self, ui: &mut Ui, surface_id: Id) -> Option<String> {
        let draft_id = draft_id(surface_id);
        let mut draft: String = ui.data_mut(|d| d.get_temp(draft_id)).unwrap_or_default();
        let mut submitted = false;

        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(&mut draft)
                    .id(draft_edit_id(surface_id))
                    .hint_text("Tag label"),
            );
            let enter = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let accepted = self.options.allow_empty_tags || !draft.trim().is_empty();
            let button = ui.add_enabled(accepted, egui::Button::new("Add"));
            submitted = accepted && (enter || button.clicked());
            if enter {
                edit.request_focus();
            }
        });

        let result = submitted.then(|| std::mem::take(&mut draft));
        ui.data_mut(|d| d.insert_temp(draft_id, draft));
        result
    }

    fn marker(
        &self,
        ui: &mut Ui,
        painter: &Painter,
        surface_id: Id,
        image_rect: Rect,
        index: usize,
        tag: &Tag,
    ) -> Option<TagEvent> {
        let marker_id = marker_id(surface_id, tag, index);
        let drag_id = marker_id.with("drag");
        let image_size = image_rect.size();
        let position = &tag.position;

        let label_color = if tag.is_placeholder() { Color32::GRAY } else { Color32::BLACK };
        let label = painter.layout_no_wrap(
            tag.label(index),
            FontId::proportional(LABEL_SIZE),
            label_color,
        );
        let details = self.options.show_details.then(|| {
            painter.layout_no_wrap(
                format!(
                    "X: {}\nY: {}\ncX: {}\ncY: {}",
                    position.position_x, position.position_y, position.percent_x, position.percent_y
                ),
                FontId::proportional(DETAIL_SIZE),
                Color32::DARK_GRAY,
            )
        });

        let close_width = if self.options.removable { GAP + CLOSE_SIZE } else { 0.0 };
        let header = vec2(
            label.size().x + close_width,
            label.size().y.max(if self.options.removable { CLOSE_SIZE } else { 0.0 }),
        );
        let body = match &details {
            Some(details) => vec2(header.x.max(details.size().x), header.y + GAP + details.size().y),
            None => header,
        };
        let marker_size = body + Vec2::splat(PADDING * 2.0);

        let live: Option<Vec2> = ui.data_mut(|d| d.get_temp(drag_id));
        let mut anchor = live
            .unwrap_or_else(|| percent_to_pixel(position.percent_x, position.percent_y, Some(image_size)));
        let marker_rect = card_rect(image_rect, anchor, position, live.is_some(), marker_size);

        let response = ui.interact(marker_rect, marker_id, Sense::drag());
        let mut event = None;
        let mut dragging = live.is_some();

        if response.dragged() {
            anchor = clamp_to_image(anchor + response.drag_delta(), image_size);
            ui.data_mut(|d| d.insert_temp(drag_id, anchor));
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            dragging = true;
        } else if response.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }

        if response.drag_stopped() {
            ui.data_mut(|d| d.remove::<Vec2>(drag_id));
            let position = drag_stop_position(anchor, image_size);
            match &tag.id {
                Some(id) => event = Some(TagEvent::Updated { id: id.clone(), position }),
                None => log::debug!("tag {index} has no id, drop not reported"),
            }
        }

        let marker_rect = card_rect(image_rect, anchor, position, dragging, marker_size);
        painter.rect_filled(
            marker_rect.translate(vec2(0.0, 2.0)),
            CORNER_RADIUS,
            Color32::from_black_alpha(40),
        );
        painter.rect_filled(marker_rect, CORNER_RADIUS, Color32::WHITE);

        let content_min = marker_rect.min + Vec2::splat(PADDING);
        let label_height = label.size().y;
        painter.galley(
            content_min + vec2(0.0, (header.y - label_height) / 2.0),
            label,
            label_color,
        );
        if let Some(details) = details {
            painter.galley(content_min + vec2(0.0, header.y + GAP), details, Color32::DARK_GRAY);
        }

        if self.options.removable {
            let close_rect = Rect::from_min_size(
                pos2(
                    marker_rect.max.x - PADDING - CLOSE_SIZE,
                    content_min.y + (header.y - CLOSE_SIZE) / 2.0,
                ),
                Vec2::splat(CLOSE_SIZE),
            );
            let close = ui.interact(close_rect, remove_button_id(marker_id), Sense::click());
            let color = if close.hovered() {
                ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
                self.options.hover_delete_icon_color
            } else {
                self.options.delete_icon_color
            };
            paint_cross(painter, close_rect.shrink(3.0), color);

            if close.clicked() {
                match &tag.id {
                    Some(id) => event = Some(TagEvent::Removed(id.clone())),
                    None => log::debug!("tag {index} has no id, removal not reported"),
                }
            }
        }

        event
    }
}

fn paint_cross(painter: &Painter, rect: Rect, color: Color32) {
    let stroke = Stroke::new(2.0, color);
    painter.line_segment([rect.left_top(), rect.right_bottom()], stroke);
    painter.line_segment([rect.right_top(), rect.left_bottom()], stroke);
}
