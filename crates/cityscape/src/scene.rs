//! Scene assembly: background, fixtures, one cluster per day, props, summary.
//!
//! `assemble` only emits. Every drawable carries its depth key and the scene
//! stays in emission order; ordering by depth is the compositor's job.

use bevy::prelude::*;

use crate::config::SceneConfig;
use crate::geometry::{
    push_box, BoxShading, DrawBatch, Drawable, EntityBuilder, Layer, Part, Shape, Style,
};
use crate::label::{GlyphSet, LabelAnchor, LabelRenderer, LabelStyle, TextAnchor};
use crate::rng::WindowRng;
use crate::week::Week;

// ---------------------------------------------------------------------------
// Fixed scenery, as fractions of the canvas
// ---------------------------------------------------------------------------

/// Star positions (x, y as canvas fractions) and radius as a fraction of the
/// canvas height.
const STARS: [(f32, f32, f32); 18] = [
    (0.04, 0.05, 0.0020),
    (0.09, 0.27, 0.0015),
    (0.21, 0.04, 0.0025),
    (0.26, 0.31, 0.0015),
    (0.33, 0.09, 0.0020),
    (0.38, 0.22, 0.0030),
    (0.45, 0.05, 0.0015),
    (0.51, 0.15, 0.0020),
    (0.57, 0.03, 0.0025),
    (0.62, 0.19, 0.0015),
    (0.68, 0.08, 0.0030),
    (0.73, 0.26, 0.0020),
    (0.79, 0.04, 0.0015),
    (0.84, 0.17, 0.0025),
    (0.89, 0.09, 0.0020),
    (0.93, 0.29, 0.0015),
    (0.97, 0.13, 0.0025),
    (0.16, 0.17, 0.0020),
];

const MOON_AT: Vec2 = Vec2::new(0.12, 0.14);
const MOON_RADIUS: f32 = 0.03;
/// Offset of the sky-coloured disc that carves the crescent, in moon radii.
const CRESCENT_SHIFT: Vec2 = Vec2::new(0.45, -0.2);

/// Road centre dashes, in grid units.
const DASH_LENGTH: f32 = 0.5;
const DASH_GAP: f32 = 0.5;
const DASH_HALF_WIDTH: f32 = 0.04;

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Every drawable of one render in emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub canvas: Vec2,
    drawables: Vec<Drawable>,
}

impl Scene {
    pub fn new(canvas: Vec2) -> Self {
        Self {
            canvas,
            drawables: Vec::new(),
        }
    }

    pub fn push_batch(&mut self, batch: DrawBatch) {
        self.drawables.extend(batch.into_drawables());
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn into_drawables(self) -> Vec<Drawable> {
        self.drawables
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn in_layer(&self, layer: Layer) -> impl Iterator<Item = &Drawable> {
        self.drawables.iter().filter(move |d| d.layer == layer)
    }

    /// Day indices that produced a cluster, in emission order.
    pub fn entity_days(&self) -> Vec<usize> {
        let mut days: Vec<usize> = Vec::new();
        for d in &self.drawables {
            if let Layer::Entity(day) = d.layer {
                if days.last() != Some(&day) {
                    days.push(day);
                }
            }
        }
        days
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build the scene for `week`.
///
/// Days are laid out oldest first at `layout.slot(i)`; each cluster's depth is
/// that slot's `gx + gy`. The week is expected to already hold `config.days`
/// days (see `resolve_week`).
pub fn assemble(
    week: &Week,
    config: &SceneConfig,
    glyphs: Option<&GlyphSet>,
    rng: &mut WindowRng,
) -> Scene {
    let mut scene = Scene::new(config.canvas);
    let labels = LabelRenderer::new(config, glyphs);

    push_sky(&mut scene, config);
    push_fixtures(&mut scene, config);

    let builder = EntityBuilder::new(config, &labels);
    for (i, day) in week.days().iter().enumerate() {
        let mut batch = DrawBatch::new(config.layout.slot_depth(i), Layer::Entity(i));
        builder.build(&mut batch, day, config.layout.slot(i), rng);
        scene.push_batch(batch);
    }

    push_vehicles(&mut scene, config);
    push_summary(&mut scene, config, &labels, week);
    scene
}

fn push_sky(scene: &mut Scene, config: &SceneConfig) {
    let canvas = config.canvas;
    let palette = &config.palette;
    let depth = &config.depth;

    let mut sky = DrawBatch::new(depth.sky, Layer::Background);
    sky.push(
        Part::Sky,
        Shape::Rect {
            min: Vec2::ZERO,
            size: canvas,
        },
        Style::fill(palette.sky),
    );
    scene.push_batch(sky);

    let mut stars = DrawBatch::new(depth.stars, Layer::Background);
    for (fx, fy, fr) in STARS {
        stars.push(
            Part::Star,
            Shape::Circle {
                center: Vec2::new(fx, fy) * canvas,
                radius: fr * canvas.y,
            },
            Style::fill(palette.star),
        );
    }
    scene.push_batch(stars);

    let mut moon = DrawBatch::new(depth.moon, Layer::Background);
    let center = MOON_AT * canvas;
    let radius = MOON_RADIUS * canvas.y;
    moon.push(
        Part::Moon,
        Shape::Circle { center, radius },
        Style::fill(palette.moon),
    );
    moon.push(
        Part::Moon,
        Shape::Circle {
            center: center + CRESCENT_SHIFT * radius,
            radius: radius * 0.9,
        },
        Style::fill(palette.sky),
    );
    scene.push_batch(moon);
}

fn push_fixtures(scene: &mut Scene, config: &SceneConfig) {
    let projector = &config.projector;
    let palette = &config.palette;
    let layout = &config.layout;
    let ground_quad = |corners: [Vec2; 4]| -> Vec<Vec2> {
        corners
            .iter()
            .map(|c| projector.project_ground(c.x, c.y))
            .collect()
    };

    let mut ground = DrawBatch::new(config.depth.ground, Layer::Fixture);
    ground.push(
        Part::Ground,
        Shape::Polygon(ground_quad(layout.ground.corners())),
        Style::fill(palette.ground),
    );
    scene.push_batch(ground);

    let mut road = DrawBatch::new(config.depth.road, Layer::Fixture);
    road.push(
        Part::Road,
        Shape::Polygon(ground_quad(layout.road.corners())),
        Style::fill(palette.road),
    );

    let mid = (layout.road.min.y + layout.road.max.y) * 0.5;
    let mut x = layout.road.min.x + DASH_GAP * 0.5;
    while x + DASH_LENGTH <= layout.road.max.x {
        let dash = [
            Vec2::new(x, mid - DASH_HALF_WIDTH),
            Vec2::new(x + DASH_LENGTH, mid - DASH_HALF_WIDTH),
            Vec2::new(x + DASH_LENGTH, mid + DASH_HALF_WIDTH),
            Vec2::new(x, mid + DASH_HALF_WIDTH),
        ];
        road.push(
            Part::RoadMarking,
            Shape::Polygon(ground_quad(dash)),
            Style::fill(palette.road_marking),
        );
        x += DASH_LENGTH + DASH_GAP;
    }
    scene.push_batch(road);
}

fn push_vehicles(scene: &mut Scene, config: &SceneConfig) {
    let mut batch = DrawBatch::new(config.depth.foreground, Layer::Foreground);
    for (i, vehicle) in config.vehicles.iter().enumerate() {
        push_box(
            &mut batch,
            &config.projector,
            vehicle.at - vehicle.half_size,
            vehicle.at + vehicle.half_size,
            vehicle.height,
            config.palette.vehicle(i),
            BoxShading::default(),
            (Part::Vehicle, Part::Vehicle),
        );
    }
    scene.push_batch(batch);
}

/// Two caption/value lines: the long-window total, then the week's sum.
fn push_summary(scene: &mut Scene, config: &SceneConfig, labels: &LabelRenderer, week: &Week) {
    let summary = &config.summary;
    let palette = &config.palette;
    let caption = LabelStyle {
        color: palette.caption_text,
        size: summary.caption_size,
        anchor: TextAnchor::Start,
        bold: false,
    };
    let value = LabelStyle {
        color: palette.value_text,
        size: summary.value_size,
        bold: true,
        ..caption
    };

    let lines = [
        (&summary.total_caption, week.total_contributions()),
        (&summary.week_caption, week.week_sum()),
    ];
    let mut batch = DrawBatch::new(config.depth.overlay, Layer::Overlay);
    for (row, (text, n)) in lines.into_iter().enumerate() {
        let at = summary.anchor + Vec2::new(0.0, row as f32 * summary.line_spacing);
        labels.render(&mut batch, LabelAnchor::Screen(at), text, &caption);
        labels.render(
            &mut batch,
            LabelAnchor::Screen(at + Vec2::new(summary.value_offset, 0.0)),
            &n.to_string(),
            &value,
        );
    }
    scene.push_batch(batch);
}
