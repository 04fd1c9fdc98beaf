//! Isometric "contribution city" rendering.
//!
//! A week of daily activity counts becomes a small night-time city: each
//! day is a building (or a street lamp on a day without activity) with a
//! roadside sign, laid out along a road in an isometric projection and
//! written out as a single SVG document.
//!
//! Pipeline: [`Week`] -> [`Tier`] per day -> entity geometry through the
//! [`Projector`] -> [`assemble`] into a [`Scene`] -> [`compose`] (stable
//! depth sort + SVG) -> [`Document`].

pub mod calendar;
pub mod compose;
pub mod config;
pub mod error;
pub mod geometry;
pub mod label;
pub mod palette;
pub mod plugin;
pub mod projection;
pub mod rng;
pub mod scene;
pub mod tier;
pub mod week;

pub use calendar::ContributionCalendar;
pub use compose::{compose, depth_sort, Document};
pub use config::{DepthBands, LabelStrategy, SceneConfig};
pub use error::CityError;
pub use label::GlyphSet;
pub use plugin::{render_week, run_pipeline, CityRender, CityscapePlugin, FallbackWeek, PendingWeek};
pub use projection::Projector;
pub use rng::WindowRng;
pub use scene::{assemble, Scene};
pub use tier::Tier;
pub use week::{resolve_week, DaySample, RawDay, Week};
