//! Conversions between the three ways a tag position is expressed: pixels
//! inside the rendered image, percentages of its size, and 0..1 ratios.

use egui::{vec2, Vec2};

use crate::tag::{Percent, TagPosition};

/// Markers past this ratio on an axis flip to the other side of their anchor.
pub const FLIP_THRESHOLD: f32 = 0.6;

/// Rounds to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

fn ratio(offset: f32, dimension: f32) -> f32 {
    if dimension > 0.0 {
        offset / dimension
    } else {
        0.0
    }
}

fn percent_of(offset: f32, dimension: f32) -> Percent {
    if dimension > 0.0 {
        Percent::new(offset * 100.0 / dimension)
    } else {
        Percent::ZERO
    }
}

/// Pixel offset of a percentage position inside an image of `image_size`.
/// An image that has not been measured yet places everything at the origin.
pub fn percent_to_pixel(percent_x: Percent, percent_y: Percent, image_size: Option<Vec2>) -> Vec2 {
    match image_size {
        Some(size) => vec2(percent_x.of(size.x), percent_y.of(size.y)),
        None => Vec2::ZERO,
    }
}

/// Keeps a drag offset inside the image rectangle.
pub fn clamp_to_image(offset: Vec2, image_size: Vec2) -> Vec2 {
    vec2(
        offset.x.clamp(0.0, image_size.x.max(0.0)),
        offset.y.clamp(0.0, image_size.y.max(0.0)),
    )
}

/// Position fields for a tag released at `offset`, relative to the image's top-left.
pub fn drag_stop_position(offset: Vec2, image_size: Vec2) -> TagPosition {
    let offset = clamp_to_image(offset, image_size);
    TagPosition {
        x: round_to_tenth(ratio(offset.x, image_size.x)),
        y: round_to_tenth(ratio(offset.y, image_size.y)),
        position_x: offset.x,
        position_y: offset.y,
        percent_x: percent_of(offset.x, image_size.x),
        percent_y: percent_of(offset.y, image_size.y),
    }
}

/// How far a marker's box moves from its anchor so it stays readable near the
/// right and bottom edges.
pub fn anti_clip_shift(x: f32, y: f32, marker_size: Vec2) -> Vec2 {
    let dx = if x > FLIP_THRESHOLD { -marker_size.x } else { 0.0 };
    let dy = if y > FLIP_THRESHOLD { -marker_size.y } else { 0.0 };
    vec2(dx, dy)
}

/// Top-left corner of a marker card relative to the image. The card is moved
/// away from the right and bottom edges, then kept entirely inside the image.
pub fn marker_origin(anchor: Vec2, x: f32, y: f32, marker_size: Vec2, image_size: Vec2) -> Vec2 {
    let origin = anchor + anti_clip_shift(x, y, marker_size);
    let max = (image_size - marker_size).max(Vec2::ZERO);
    vec2(origin.x.clamp(0.0, max.x), origin.y.clamp(0.0, max.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_to_pixel_scales_by_rendered_size() {
        let px = percent_to_pixel(Percent::new(23.0), Percent::new(15.0), Some(vec2(800.0, 400.0)));
        assert_eq!(px, vec2(184.0, 60.0));
    }

    #[test]
    fn unmeasured_image_places_at_origin() {
        let px = percent_to_pixel(Percent::new(50.0), Percent::new(50.0), None);
        assert_eq!(px, Vec2::ZERO);
    }

    #[test]
    fn drag_stop_matches_reference_scenario() {
        let pos = drag_stop_position(vec2(850.0, 200.0), vec2(1000.0, 1000.0));
        assert_eq!(pos.percent_x.to_string(), "85%");
        assert_eq!(pos.percent_y.to_string(), "20%");
        assert_eq!(pos.x, 0.9);
        assert_eq!(pos.y, 0.2);
        assert_eq!(pos.position_x, 850.0);
        assert_eq!(pos.position_y, 200.0);
    }

    #[test]
    fn percent_and_pixel_round_trip() {
        let size = vec2(1237.0, 691.0);
        for px in [0.0_f32, 1.0, 333.3, 618.5, 1237.0] {
            let pos = drag_stop_position(vec2(px, px.min(691.0)), size);
            let back = percent_to_pixel(pos.percent_x, pos.percent_y, Some(size));
            assert!((back.x - px).abs() < 1e-3, "{px} came back as {}", back.x);
            assert!((back.y - px.min(691.0)).abs() < 1e-3);
        }
    }

    #[test]
    fn drag_stop_clamps_outside_offsets() {
        let pos = drag_stop_position(vec2(-20.0, 1300.0), vec2(1000.0, 1000.0));
        assert_eq!(pos.position_x, 0.0);
        assert_eq!(pos.position_y, 1000.0);
        assert_eq!(pos.x, 0.0);
        assert_eq!(pos.y, 1.0);
        assert_eq!(pos.percent_y.to_string(), "100%");
    }

    #[test]
    fn zero_sized_image_yields_zero_ratios() {
        let pos = drag_stop_position(vec2(10.0, 10.0), Vec2::ZERO);
        assert_eq!(pos.x, 0.0);
        assert_eq!(pos.percent_x, Percent::ZERO);
        assert_eq!(pos.position_x, 0.0);
    }

    #[test]
    fn normalized_values_keep_one_decimal() {
        assert_eq!(round_to_tenth(0.04), 0.0);
        assert_eq!(round_to_tenth(0.25), 0.3);
        assert_eq!(round_to_tenth(0.61), 0.6);
        assert_eq!(round_to_tenth(1.0), 1.0);
    }

    #[test]
    fn markers_flip_near_right_and_bottom_edges() {
        let size = vec2(120.0, 80.0);
        assert_eq!(anti_clip_shift(0.2, 0.2, size), Vec2::ZERO);
        assert_eq!(anti_clip_shift(0.7, 0.2, size), vec2(-120.0, 0.0));
        assert_eq!(anti_clip_shift(0.7, 0.9, size), vec2(-120.0, -80.0));
        assert_eq!(anti_clip_shift(0.6, 0.7, size), vec2(0.0, -80.0));
    }

    #[test]
    fn marker_card_stays_inside_image() {
        let image = vec2(1000.0, 800.0);
        let card = vec2(120.0, 80.0);

        // right edge, not yet past the flip threshold after rounding
        let origin = marker_origin(vec2(620.0, 100.0), 0.6, 0.1, card, image);
        assert_eq!(origin, vec2(620.0, 100.0));

        let origin = marker_origin(vec2(1000.0, 100.0), 1.0, 0.1, card, image);
        assert_eq!(origin, vec2(880.0, 100.0));

        // stale ratios that did not flip still end up inside
        let origin = marker_origin(vec2(990.0, 790.0), 0.2, 0.2, card, image);
        assert_eq!(origin, vec2(880.0, 720.0));

        let origin = marker_origin(vec2(10.0, 10.0), 0.9, 0.9, card, image);
        assert_eq!(origin, Vec2::ZERO);
    }

    #[test]
    fn card_larger_than_image_pins_to_origin() {
        let origin = marker_origin(vec2(30.0, 20.0), 0.5, 0.5, vec2(200.0, 200.0), vec2(100.0, 100.0));
        assert_eq!(origin, Vec2::ZERO);
    }
}
