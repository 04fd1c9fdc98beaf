//! Text on signs and in the summary corner.
//!
//! Three interchangeable strategies produce the same logical label:
//! native `<text>`, the 5x7 bitmap font rasterised into quads, or per-glyph
//! SVG fragments. World-anchored labels sit on a sign plate and are
//! centred vertically on their anchor; screen-anchored labels are summary
//! text with the anchor on the baseline.

pub mod bitmap_font;
mod fragments;

use bevy::log::warn;
use bevy::prelude::*;

pub use fragments::{extract_svg_inner, GlyphSet};

use crate::config::{LabelStrategy, SceneConfig};
use crate::geometry::{DrawBatch, Part, Shape, Style};
use bitmap_font::{runs, text_width, GLYPH_HEIGHT};

/// Native text baseline drop, as a fraction of font size, that centres the
/// cap height on a world anchor.
const NATIVE_CENTER_SHIFT: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
}

impl TextAnchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
        }
    }
}

/// Where a label is placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelAnchor {
    /// Grid position plus elevation; the label lies in the sign plane.
    World(Vec3),
    /// Canvas coordinates.
    Screen(Vec2),
}

impl LabelAnchor {
    fn part(self) -> Part {
        match self {
            LabelAnchor::World(_) => Part::Label,
            LabelAnchor::Screen(_) => Part::Summary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub color: Color,
    pub size: f32,
    pub anchor: TextAnchor,
    pub bold: bool,
}

pub struct LabelRenderer<'a> {
    config: &'a SceneConfig,
    glyphs: Option<&'a GlyphSet>,
}

impl<'a> LabelRenderer<'a> {
    pub fn new(config: &'a SceneConfig, glyphs: Option<&'a GlyphSet>) -> Self {
        Self { config, glyphs }
    }

    pub fn strategy(&self) -> LabelStrategy {
        self.config.labels.strategy
    }

    /// Emit `text` into `batch` with the configured strategy.
    ///
    /// Glyph fragments apply to sign labels only; without a loaded glyph set,
    /// or for screen anchors, they degrade to native text.
    pub fn render(&self, batch: &mut DrawBatch, anchor: LabelAnchor, text: &str, style: &LabelStyle) {
        match (self.strategy(), anchor) {
            (LabelStrategy::BitmapFont, LabelAnchor::World(at)) => self.bitmap_world(batch, at, text, style),
            (LabelStrategy::BitmapFont, LabelAnchor::Screen(at)) => {
                self.bitmap_screen(batch, at, text, style)
            }
            (LabelStrategy::GlyphFragments, LabelAnchor::World(at)) => match self.glyphs {
                Some(glyphs) => self.fragments(batch, glyphs, at, text, style),
                None => {
                    warn!("No glyph set loaded, drawing '{text}' as text");
                    self.native(batch, anchor, text, style);
                }
            },
            _ => self.native(batch, anchor, text, style),
        }
    }

    fn native(&self, batch: &mut DrawBatch, anchor: LabelAnchor, text: &str, style: &LabelStyle) {
        let at = match anchor {
            LabelAnchor::World(p) => {
                self.config.projector.project_point(p) + Vec2::new(0.0, style.size * NATIVE_CENTER_SHIFT)
            }
            LabelAnchor::Screen(p) => p,
        };
        batch.push(
            anchor.part(),
            Shape::Text {
                at,
                content: text.to_string(),
                size: style.size,
                family: self.config.labels.font_family.clone(),
                anchor: style.anchor,
                bold: style.bold,
            },
            Style::fill(style.color),
        );
    }

    /// Dot-font text lying in the sign plane: pixel columns advance along
    /// grid X, rows descend in elevation.
    fn bitmap_world(&self, batch: &mut DrawBatch, at: Vec3, text: &str, style: &LabelStyle) {
        let mut px = self.config.labels.world_pixel;
        let projector = &self.config.projector;
        // Long counts are squeezed along X to stay on the plate.
        let plate = 2.0 * self.config.sign.half_width;
        let columns = text_width(text) as f32;
        if columns * px.x > plate {
            px.x = plate / columns;
        }
        let width = columns * px.x;
        let x0 = match style.anchor {
            TextAnchor::Start => at.x,
            TextAnchor::Middle => at.x - width * 0.5,
        };
        let top = at.z + GLYPH_HEIGHT as f32 * px.y * 0.5;

        for run in runs(text) {
            let xa = x0 + run.start as f32 * px.x;
            let xb = xa + run.len as f32 * px.x;
            let z1 = top - run.row as f32 * px.y;
            let z0 = z1 - px.y;
            let quad = vec![
                projector.project(xa, at.y, z0),
                projector.project(xb, at.y, z0),
                projector.project(xb, at.y, z1),
                projector.project(xa, at.y, z1),
            ];
            batch.push(Part::Label, Shape::Polygon(quad), Style::fill(style.color));
        }
    }

    /// Dot-font text on the canvas with the anchor on the baseline.
    fn bitmap_screen(&self, batch: &mut DrawBatch, at: Vec2, text: &str, style: &LabelStyle) {
        let px = self.config.labels.screen_pixel;
        let width = text_width(text) as f32 * px;
        let x0 = match style.anchor {
            TextAnchor::Start => at.x,
            TextAnchor::Middle => at.x - width * 0.5,
        };
        let top = at.y - GLYPH_HEIGHT as f32 * px;

        for run in runs(text) {
            batch.push(
                Part::Summary,
                Shape::Rect {
                    min: Vec2::new(x0 + run.start as f32 * px, top + run.row as f32 * px),
                    size: Vec2::new(run.len as f32 * px, px),
                },
                Style::fill(style.color),
            );
        }
    }

    /// A whole-word fragment when the set has one, otherwise one fragment per
    /// character stepped along the projected grid X direction. Missing
    /// glyphs are logged and leave a gap.
    fn fragments(&self, batch: &mut DrawBatch, glyphs: &GlyphSet, at: Vec3, text: &str, style: &LabelStyle) {
        let center = self.config.projector.project_point(at);
        let style_fill = Style::fill(style.color);

        if let Ok(markup) = glyphs.get(text) {
            batch.push(
                Part::Label,
                Shape::Fragment {
                    at: center,
                    markup: markup.to_string(),
                },
                style_fill,
            );
            return;
        }

        let advance = self.config.labels.fragment_advance;
        let n = text.chars().count();
        let start = match style.anchor {
            TextAnchor::Start => center,
            TextAnchor::Middle => center - advance * (n.saturating_sub(1) as f32 * 0.5),
        };
        for (i, c) in text.chars().enumerate() {
            if c == ' ' {
                continue;
            }
            match glyphs.get(&c.to_string()) {
                Ok(markup) => batch.push(
                    Part::Label,
                    Shape::Fragment {
                        at: start + advance * i as f32,
                        markup: markup.to_string(),
                    },
                    style_fill,
                ),
                Err(e) => warn!("{e}, skipping"),
            }
        }
    }
}
