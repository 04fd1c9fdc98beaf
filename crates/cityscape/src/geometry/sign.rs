//! Roadside sign: a short post and a plate standing along grid X.

use bevy::prelude::*;

use super::{DrawBatch, Part, Shape, Style};
use crate::config::SignParams;
use crate::palette::Palette;
use crate::projection::Projector;

pub fn push_sign(
    batch: &mut DrawBatch,
    projector: &Projector,
    params: &SignParams,
    palette: &Palette,
    at: Vec2,
) {
    let foot = projector.project_ground(at.x, at.y);
    let plate_bottom = projector.project(at.x, at.y, params.bottom);
    batch.push(
        Part::SignPost,
        Shape::Rect {
            min: Vec2::new(foot.x - params.post_width * 0.5, plate_bottom.y),
            size: Vec2::new(params.post_width, foot.y - plate_bottom.y),
        },
        Style::fill(palette.sign_post),
    );

    let (x0, x1) = (at.x - params.half_width, at.x + params.half_width);
    let plate = vec![
        projector.project(x0, at.y, params.bottom),
        projector.project(x1, at.y, params.bottom),
        projector.project(x1, at.y, params.top),
        projector.project(x0, at.y, params.top),
    ];
    batch.push(
        Part::SignPlate,
        Shape::Polygon(plate),
        Style::fill(palette.sign_plate).with_stroke(palette.sign_post, 1.5),
    );
}
