//! Drawable primitives and the per-day entity geometry builder.
//!
//! Everything here emits into a [`DrawBatch`]. A batch carries one depth key
//! and one layer for all of its drawables, so the order of `push` calls is
//! the only z-order inside an entity.

mod building;
mod lamp;
mod sign;

use std::fmt;

use bevy::prelude::*;

pub use building::{push_box, push_building, push_windows, BoxShading};
pub use lamp::push_lamp;
pub use sign::push_sign;

use crate::config::SceneConfig;
use crate::label::{LabelAnchor, LabelRenderer, LabelStyle, TextAnchor};
use crate::rng::WindowRng;
use crate::tier::Tier;
use crate::week::DaySample;

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Vec<Vec2>),
    Rect {
        min: Vec2,
        size: Vec2,
    },
    Circle {
        center: Vec2,
        radius: f32,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
    },
    Text {
        at: Vec2,
        content: String,
        size: f32,
        family: String,
        anchor: TextAnchor,
        bold: bool,
    },
    /// Pre-built SVG markup placed with a translation.
    Fragment {
        at: Vec2,
        markup: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Color,
    pub stroke: Option<Stroke>,
    pub opacity: f32,
}

impl Style {
    pub fn fill(fill: Color) -> Self {
        Self {
            fill,
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_stroke(mut self, color: Color, width: f32) -> Self {
        self.stroke = Some(Stroke { color, width });
        self
    }
}

/// What a drawable depicts. Used for SVG classes and for inspecting scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Sky,
    Star,
    Moon,
    Ground,
    Road,
    RoadMarking,
    Footprint,
    Wall,
    Roof,
    Window,
    LampGlow,
    LampPost,
    LampHead,
    SignPost,
    SignPlate,
    Label,
    Vehicle,
    Summary,
}

impl Part {
    pub fn class_name(self) -> &'static str {
        match self {
            Part::Sky => "sky",
            Part::Star => "star",
            Part::Moon => "moon",
            Part::Ground => "ground",
            Part::Road => "road",
            Part::RoadMarking => "road-marking",
            Part::Footprint => "footprint",
            Part::Wall => "wall",
            Part::Roof => "roof",
            Part::Window => "window",
            Part::LampGlow => "lamp-glow",
            Part::LampPost => "lamp-post",
            Part::LampHead => "lamp-head",
            Part::SignPost => "sign-post",
            Part::SignPlate => "sign-plate",
            Part::Label => "label",
            Part::Vehicle => "vehicle",
            Part::Summary => "summary",
        }
    }

    /// Parts that only a lamp (empty-day) entity emits.
    pub fn is_lamp(self) -> bool {
        matches!(self, Part::LampGlow | Part::LampPost | Part::LampHead)
    }

    /// Parts that only a building entity emits.
    pub fn is_building(self) -> bool {
        matches!(
            self,
            Part::Footprint | Part::Wall | Part::Roof | Part::Window
        )
    }
}

/// Scene partition a drawable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Fixture,
    /// Cluster of the day at this index of the week.
    Entity(usize),
    Foreground,
    Overlay,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Background => write!(f, "background"),
            Layer::Fixture => write!(f, "fixture"),
            Layer::Entity(day) => write!(f, "day-{day}"),
            Layer::Foreground => write!(f, "foreground"),
            Layer::Overlay => write!(f, "overlay"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub shape: Shape,
    pub style: Style,
    pub part: Part,
    pub layer: Layer,
    /// Painter's-algorithm key; lower draws first.
    pub depth: f32,
}

// ---------------------------------------------------------------------------
// DrawBatch
// ---------------------------------------------------------------------------

/// Drawables sharing one depth key and layer, kept in emission order.
#[derive(Debug, Clone)]
pub struct DrawBatch {
    depth: f32,
    layer: Layer,
    items: Vec<Drawable>,
}

impl DrawBatch {
    pub fn new(depth: f32, layer: Layer) -> Self {
        Self {
            depth,
            layer,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, part: Part, shape: Shape, style: Style) {
        self.items.push(Drawable {
            shape,
            style,
            part,
            layer: self.layer,
            depth: self.depth,
        });
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Drawable] {
        &self.items
    }

    pub fn into_drawables(self) -> Vec<Drawable> {
        self.items
    }
}

// ---------------------------------------------------------------------------
// Entity builder
// ---------------------------------------------------------------------------

/// Builds one day's cluster: building or lamp, then its sign and labels.
pub struct EntityBuilder<'a> {
    config: &'a SceneConfig,
    labels: &'a LabelRenderer<'a>,
}

impl<'a> EntityBuilder<'a> {
    pub fn new(config: &'a SceneConfig, labels: &'a LabelRenderer<'a>) -> Self {
        Self { config, labels }
    }

    /// Emit the cluster for `day` standing at grid `slot` into `batch`.
    ///
    /// Order: building faces (or lamp), windows, sign, day name, count.
    pub fn build(
        &self,
        batch: &mut DrawBatch,
        day: &DaySample,
        slot: Vec2,
        rng: &mut WindowRng,
    ) {
        let config = self.config;
        let projector = &config.projector;
        let tier = Tier::classify(day.count);

        if tier.is_empty() {
            push_lamp(batch, projector, &config.lamp, &config.palette, slot);
        } else {
            push_building(batch, config, tier, day.count, slot, rng);
        }

        let sign_at = slot + config.layout.sign_offset;
        push_sign(batch, projector, &config.sign, &config.palette, sign_at);

        let text_color = config.palette.label_text;
        let name_style = LabelStyle {
            color: text_color,
            size: config.labels.day_font_size,
            anchor: TextAnchor::Middle,
            bold: true,
        };
        let count_style = LabelStyle {
            size: config.labels.count_font_size,
            ..name_style
        };
        self.labels.render(
            batch,
            LabelAnchor::World(sign_at.extend(config.sign.name_z())),
            day.weekday_name(),
            &name_style,
        );
        self.labels.render(
            batch,
            LabelAnchor::World(sign_at.extend(config.sign.count_z())),
            &day.count.to_string(),
            &count_style,
        );
    }
}
