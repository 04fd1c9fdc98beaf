//! Scene configuration.
//!
//! One [`SceneConfig`] describes a whole render: canvas, projection, the
//! day-slot layout, every size the geometry builder uses, label strategy,
//! palette and the fixed depth bands of static scenery. The two presets cover
//! the large seven-day poster and the small six-day card.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::CityError;
use crate::palette::Palette;
use crate::projection::Projector;
use crate::tier::Tier;

// ---------------------------------------------------------------------------
// Depth bands
// ---------------------------------------------------------------------------

/// Depth keys of static scenery.
///
/// Data-driven slots use `gx + gy` of their grid position. `validate` checks
/// that background < ground/road < every slot < foreground < overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthBands {
    pub sky: f32,
    pub stars: f32,
    pub moon: f32,
    pub ground: f32,
    pub road: f32,
    pub foreground: f32,
    pub overlay: f32,
}

impl Default for DepthBands {
    fn default() -> Self {
        Self {
            sky: -1000.0,
            stars: -990.0,
            moon: -980.0,
            ground: -500.0,
            road: -400.0,
            foreground: 1000.0,
            overlay: 2000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Grid-space layout
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle on the ground plane, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl GridRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Corners in drawing order: far, right, near, left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.min.x, self.min.y),
            Vec2::new(self.max.x, self.min.y),
            Vec2::new(self.max.x, self.max.y),
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

/// Where each day's entity goes: `base + index * stride`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotLayout {
    pub base: Vec2,
    pub stride: Vec2,
    /// Offset from a slot to its roadside sign, in grid units.
    pub sign_offset: Vec2,
    pub road: GridRect,
    pub ground: GridRect,
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self {
            base: Vec2::new(1.0, -1.6),
            stride: Vec2::new(2.0, 0.0),
            sign_offset: Vec2::new(0.0, 3.0),
            road: GridRect::new(Vec2::new(-0.5, -0.6), Vec2::new(14.5, 0.6)),
            ground: GridRect::new(Vec2::new(-0.5, -2.8), Vec2::new(14.5, 2.2)),
        }
    }
}

impl SlotLayout {
    pub fn slot(&self, index: usize) -> Vec2 {
        self.base + self.stride * index as f32
    }

    /// Depth key shared by every drawable of the entity in `index`.
    pub fn slot_depth(&self, index: usize) -> f32 {
        let s = self.slot(index);
        s.x + s.y
    }
}

// ---------------------------------------------------------------------------
// Entity sizes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingParams {
    pub base_height: f32,
    pub height_per_count: f32,
    pub max_height: f32,
    /// Half footprint in grid units for XSmall, Small, Medium, Large.
    pub footprint: [f32; 4],
    /// Height of one window row band.
    pub window_band: f32,
    /// Window columns per visible wall, per tier.
    pub window_columns: [usize; 4],
    /// Wall left blank below the first row.
    pub window_bottom_pad: f32,
    /// Wall left blank under the roof.
    pub window_top_pad: f32,
    /// Probability that a window is lit, per tier.
    pub lit_chance: [f64; 4],
}

impl Default for BuildingParams {
    fn default() -> Self {
        Self {
            base_height: 60.0,
            height_per_count: 18.0,
            max_height: 280.0,
            footprint: [0.45, 0.55, 0.62, 0.72],
            window_band: 26.0,
            window_columns: [2, 2, 3, 3],
            window_bottom_pad: 8.0,
            window_top_pad: 10.0,
            lit_chance: [0.55, 0.65, 0.75, 0.85],
        }
    }
}

impl BuildingParams {
    /// `min(max_height, base_height + count * height_per_count)`.
    pub fn height(&self, count: u32) -> f32 {
        (self.base_height + count as f32 * self.height_per_count).min(self.max_height)
    }

    /// Smallest count at which `height` reaches the cap.
    pub fn saturation_count(&self) -> u32 {
        if self.height_per_count <= 0.0 {
            return 0;
        }
        ((self.max_height - self.base_height) / self.height_per_count)
            .ceil()
            .max(0.0) as u32
    }

    fn tier_slot(tier: Tier) -> usize {
        tier.index().saturating_sub(1).min(3)
    }

    pub fn half_footprint(&self, tier: Tier) -> f32 {
        self.footprint[Self::tier_slot(tier)]
    }

    pub fn columns(&self, tier: Tier) -> usize {
        self.window_columns[Self::tier_slot(tier)]
    }

    pub fn lit_probability(&self, tier: Tier) -> f64 {
        self.lit_chance[Self::tier_slot(tier)].clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LampParams {
    pub height: f32,
    /// Screen width of the post.
    pub post_width: f32,
    /// Screen size of the lantern head.
    pub head_size: Vec2,
    /// Screen radii of the glow ellipse at the base.
    pub glow_radii: Vec2,
}

impl Default for LampParams {
    fn default() -> Self {
        Self {
            height: 90.0,
            post_width: 6.0,
            head_size: Vec2::new(16.0, 14.0),
            glow_radii: Vec2::new(40.0, 20.0),
        }
    }
}

/// Roadside sign carrying the day name and count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignParams {
    /// Half width of the plate along grid X.
    pub half_width: f32,
    pub bottom: f32,
    pub top: f32,
    pub post_width: f32,
}

impl Default for SignParams {
    fn default() -> Self {
        Self {
            half_width: 0.55,
            bottom: 24.0,
            top: 96.0,
            post_width: 5.0,
        }
    }
}

impl SignParams {
    /// Elevation of the day-name line.
    pub fn name_z(&self) -> f32 {
        self.bottom + (self.top - self.bottom) * 0.72
    }

    /// Elevation of the count line.
    pub fn count_z(&self) -> f32 {
        self.bottom + (self.top - self.bottom) * 0.3
    }
}

/// Small box props on the road, drawn in the foreground band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub at: Vec2,
    pub half_size: Vec2,
    pub height: f32,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStrategy {
    /// `<text>` elements at projected anchors.
    NativeText,
    /// 5x7 dot font, rasterised into projected pixel quads.
    BitmapFont,
    /// Per-character SVG fragments loaded from disk.
    GlyphFragments,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelParams {
    pub strategy: LabelStrategy,
    pub font_family: String,
    pub day_font_size: f32,
    pub count_font_size: f32,
    /// Bitmap pixel on a sign: grid units along X, elevation units up.
    pub world_pixel: Vec2,
    /// Bitmap pixel in screen space (summary labels).
    pub screen_pixel: f32,
    /// Advance per character for glyph fragments, in screen units.
    pub fragment_advance: Vec2,
}

impl Default for LabelParams {
    fn default() -> Self {
        Self {
            strategy: LabelStrategy::BitmapFont,
            font_family: "monospace".to_string(),
            day_font_size: 26.0,
            count_font_size: 30.0,
            world_pixel: Vec2::new(0.05, 4.0),
            screen_pixel: 4.0,
            fragment_advance: Vec2::new(18.0, 10.0),
        }
    }
}

/// The two totals in the corner of the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryParams {
    /// Baseline-left of the first caption.
    pub anchor: Vec2,
    pub line_spacing: f32,
    /// Horizontal distance from caption to value.
    pub value_offset: f32,
    pub caption_size: f32,
    pub value_size: f32,
    pub total_caption: String,
    pub week_caption: String,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            anchor: Vec2::new(50.0, 1180.0),
            line_spacing: 50.0,
            value_offset: 170.0,
            caption_size: 40.0,
            value_size: 48.0,
            total_caption: "TOTAL:".to_string(),
            week_caption: "WEEK:".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Canvas width and height.
    pub canvas: Vec2,
    pub projector: Projector,
    /// Number of days in the rendered window.
    pub days: usize,
    pub layout: SlotLayout,
    pub building: BuildingParams,
    pub lamp: LampParams,
    pub sign: SignParams,
    pub labels: LabelParams,
    pub summary: SummaryParams,
    pub palette: Palette,
    pub depth: DepthBands,
    pub vehicles: Vec<VehicleSpec>,
    /// Window RNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl SceneConfig {
    /// 2166x1280, seven days, bitmap-font labels.
    pub fn classic() -> Self {
        Self {
            canvas: Vec2::new(2166.0, 1280.0),
            projector: Projector::new(98.0, 56.0, Vec2::new(400.0, 340.0)),
            days: 7,
            layout: SlotLayout::default(),
            building: BuildingParams::default(),
            lamp: LampParams::default(),
            sign: SignParams::default(),
            labels: LabelParams::default(),
            summary: SummaryParams::default(),
            palette: Palette::default(),
            depth: DepthBands::default(),
            vehicles: vec![
                VehicleSpec {
                    at: Vec2::new(4.0, -0.28),
                    half_size: Vec2::new(0.35, 0.18),
                    height: 16.0,
                },
                VehicleSpec {
                    at: Vec2::new(10.0, 0.28),
                    half_size: Vec2::new(0.35, 0.18),
                    height: 16.0,
                },
            ],
            seed: None,
        }
    }

    /// 800x400, six days, native text labels.
    pub fn compact() -> Self {
        Self {
            canvas: Vec2::new(800.0, 400.0),
            projector: Projector::new(30.0, 17.0, Vec2::new(150.0, 130.0)),
            days: 6,
            layout: SlotLayout {
                road: GridRect::new(Vec2::new(-0.5, -0.6), Vec2::new(12.5, 0.6)),
                ground: GridRect::new(Vec2::new(-0.5, -2.8), Vec2::new(12.5, 2.2)),
                ..SlotLayout::default()
            },
            building: BuildingParams {
                base_height: 20.0,
                height_per_count: 6.0,
                max_height: 90.0,
                window_band: 9.0,
                window_bottom_pad: 3.0,
                window_top_pad: 3.0,
                ..BuildingParams::default()
            },
            lamp: LampParams {
                height: 28.0,
                post_width: 2.0,
                head_size: Vec2::new(5.0, 4.0),
                glow_radii: Vec2::new(12.0, 6.0),
            },
            sign: SignParams {
                half_width: 0.55,
                bottom: 8.0,
                top: 32.0,
                post_width: 2.0,
            },
            labels: LabelParams {
                strategy: LabelStrategy::NativeText,
                day_font_size: 8.0,
                count_font_size: 9.0,
                world_pixel: Vec2::new(0.05, 1.4),
                screen_pixel: 1.5,
                fragment_advance: Vec2::new(6.0, 3.5),
                ..LabelParams::default()
            },
            summary: SummaryParams {
                anchor: Vec2::new(620.0, 40.0),
                line_spacing: 24.0,
                value_offset: 70.0,
                caption_size: 16.0,
                value_size: 18.0,
                ..SummaryParams::default()
            },
            palette: Palette::default(),
            depth: DepthBands::default(),
            vehicles: vec![
                VehicleSpec {
                    at: Vec2::new(3.0, -0.28),
                    half_size: Vec2::new(0.35, 0.18),
                    height: 5.0,
                },
                VehicleSpec {
                    at: Vec2::new(8.0, 0.28),
                    half_size: Vec2::new(0.35, 0.18),
                    height: 5.0,
                },
            ],
            seed: None,
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Result<Self, CityError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::classic()),
            "compact" => Ok(Self::compact()),
            other => Err(CityError::Config(format!("unknown preset '{other}'"))),
        }
    }

    /// Parse a JSON config; missing fields take the classic values.
    pub fn from_json(text: &str) -> Result<Self, CityError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a correctly ordered scene.
    pub fn validate(&self) -> Result<(), CityError> {
        let fail = |msg: String| Err(CityError::Config(msg));

        if self.canvas.x <= 0.0 || self.canvas.y <= 0.0 {
            return fail(format!("canvas {}x{} is empty", self.canvas.x, self.canvas.y));
        }
        if self.projector.tile_w <= 0.0 || self.projector.tile_h <= 0.0 {
            return fail("tile dimensions must be positive".to_string());
        }
        if !(1..=7).contains(&self.days) {
            return fail(format!("day window {} outside 1..=7", self.days));
        }
        let stride = self.layout.stride;
        if stride.x + stride.y <= 0.0 {
            return fail("slot stride must increase depth from day to day".to_string());
        }
        let b = &self.building;
        if b.max_height < b.base_height || b.height_per_count < 0.0 {
            return fail("building height must be non-decreasing and capped".to_string());
        }
        if b.window_band <= 0.0 {
            return fail("window band must be positive".to_string());
        }

        let d = &self.depth;
        let first = self.layout.slot_depth(0);
        let last = self.layout.slot_depth(self.days - 1);
        let ordered = d.sky <= d.stars
            && d.stars <= d.moon
            && d.moon < d.ground
            && d.ground <= d.road
            && d.road < first
            && last < d.foreground
            && d.foreground <= d.overlay;
        if !ordered {
            return fail(format!(
                "depth bands out of order around slot depths {first}..{last}"
            ));
        }
        Ok(())
    }
}
