//! Street lamp standing in for a day without activity.

use bevy::prelude::*;

use super::{DrawBatch, Part, Shape, Style};
use crate::config::LampParams;
use crate::palette::{alpha, Palette};
use crate::projection::Projector;

/// Glow ellipse at the base, the post, then the lantern head.
///
/// Fixed size: an empty lot has nothing to scale by.
pub fn push_lamp(
    batch: &mut DrawBatch,
    projector: &Projector,
    params: &LampParams,
    palette: &Palette,
    slot: Vec2,
) {
    let base = projector.project_ground(slot.x, slot.y);
    let top = projector.project(slot.x, slot.y, params.height);

    batch.push(
        Part::LampGlow,
        Shape::Ellipse {
            center: base,
            radii: params.glow_radii,
        },
        Style::fill(palette.lamp_glow).with_opacity(alpha(palette.lamp_glow)),
    );

    batch.push(
        Part::LampPost,
        Shape::Rect {
            min: Vec2::new(base.x - params.post_width * 0.5, top.y),
            size: Vec2::new(params.post_width, base.y - top.y),
        },
        Style::fill(palette.lamp_post),
    );

    batch.push(
        Part::LampHead,
        Shape::Rect {
            min: Vec2::new(top.x - params.head_size.x * 0.5, top.y - params.head_size.y),
            size: params.head_size,
        },
        Style::fill(palette.lamp_head),
    );
}
