//! Bevy integration: resolve the week and render it once at `Startup`.
//!
//! Callers insert the fetched week (`PendingWeek`), optionally a
//! `FallbackWeek`, a `SceneConfig`, a `WindowRng` and a `GlyphSet`, then run
//! the app. The finished document, or the error that stopped it, is left in
//! `CityRender`.

use bevy::log::{error, info};
use bevy::prelude::*;

use crate::compose::{compose, Document};
use crate::config::SceneConfig;
use crate::error::CityError;
use crate::label::GlyphSet;
use crate::rng::WindowRng;
use crate::scene::assemble;
use crate::week::{log_week, resolve_week, Week};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Result of the external fetch step, consumed by the render.
#[derive(Resource, Default)]
pub struct PendingWeek(pub Option<Result<Week, CityError>>);

/// Week rendered when the fetched one is unavailable.
#[derive(Resource, Debug, Clone)]
pub struct FallbackWeek(pub Week);

/// Output of the render system.
#[derive(Resource, Default)]
pub struct CityRender {
    pub week: Option<Week>,
    pub document: Option<Document>,
    pub error: Option<CityError>,
}

impl CityRender {
    pub fn svg(&self) -> Option<&str> {
        self.document.as_ref().map(Document::svg)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Assemble and compose one week.
pub fn render_week(
    week: &Week,
    config: &SceneConfig,
    glyphs: Option<&GlyphSet>,
    rng: &mut WindowRng,
) -> Document {
    compose(assemble(week, config, glyphs, rng))
}

/// Validate the config, pick the week, report it, render it.
pub fn run_pipeline(
    fetched: Result<Week, CityError>,
    fallback: impl FnOnce() -> Week,
    config: &SceneConfig,
    glyphs: Option<&GlyphSet>,
    rng: &mut WindowRng,
) -> Result<(Week, Document), CityError> {
    config.validate()?;
    let week = resolve_week(fetched, config.days, fallback)?;
    log_week(&week);
    let document = render_week(&week, config, glyphs, rng);
    info!(
        "Composed {} drawables on a {}x{} canvas",
        document.drawables().len(),
        config.canvas.x,
        config.canvas.y
    );
    Ok((week, document))
}

fn render_city(
    config: Res<SceneConfig>,
    mut pending: ResMut<PendingWeek>,
    fallback_week: Option<Res<FallbackWeek>>,
    glyphs: Option<Res<GlyphSet>>,
    rng: Option<ResMut<WindowRng>>,
    mut render: ResMut<CityRender>,
) {
    let fetched = pending.0.take().unwrap_or_else(|| {
        Err(CityError::DataUnavailable(
            "no activity data supplied".to_string(),
        ))
    });
    let days = config.days;
    let fallback = || match fallback_week {
        Some(week) => week.0.clone(),
        None => Week::sample(chrono::Local::now().date_naive(), days),
    };

    let mut local_rng;
    let rng: &mut WindowRng = match rng {
        Some(r) => r.into_inner(),
        None => {
            local_rng = WindowRng::from_optional_seed(config.seed);
            &mut local_rng
        }
    };

    match run_pipeline(fetched, fallback, &config, glyphs.as_deref(), rng) {
        Ok((week, document)) => {
            render.week = Some(week);
            render.document = Some(document);
        }
        Err(e) => {
            error!("Render failed: {e}");
            render.error = Some(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct CityscapePlugin;

impl Plugin for CityscapePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneConfig>()
            .init_resource::<PendingWeek>()
            .init_resource::<CityRender>()
            .add_systems(Startup, render_city);
    }
}
