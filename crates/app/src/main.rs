//! `contribution-city`: render the saved contribution calendar as an SVG.
//!
//! The fetch step runs outside this program and saves its GraphQL response
//! to `CITY_CALENDAR`. Without a usable calendar the fallback week is drawn.

mod settings;

use std::fs;
use std::path::PathBuf;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::{error, info, LogPlugin};
use bevy::prelude::*;

use cityscape::{CityRender, CityscapePlugin, FallbackWeek, PendingWeek, WindowRng};
use settings::Settings;

/// Where the finished document is written.
#[derive(Resource, Debug, Clone)]
struct OutputPath(PathBuf);

fn write_output(
    render: Res<CityRender>,
    output: Res<OutputPath>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(svg) = render.svg() else {
        // The render system has already logged the cause.
        exit.send(AppExit::error());
        return;
    };
    match fs::write(&output.0, svg) {
        Ok(()) => {
            info!("Wrote {}", output.0.display());
            exit.send(AppExit::Success);
        }
        Err(e) => {
            error!("Cannot write {}: {e}", output.0.display());
            exit.send(AppExit::error());
        }
    }
}

fn main() -> AppExit {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_once()),
        LogPlugin::default(),
    ));

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            return AppExit::error();
        }
    };
    let config = match settings.scene_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return AppExit::error();
        }
    };

    let mut rng = WindowRng::from_optional_seed(config.seed);
    let fetched = settings.fetched_week(config.days);
    let fallback = settings.fallback_week(config.days, &mut rng);
    if let Some(glyphs) = settings.glyphs() {
        app.insert_resource(glyphs);
    }

    app.insert_resource(config)
        .insert_resource(PendingWeek(Some(fetched)))
        .insert_resource(FallbackWeek(fallback))
        .insert_resource(rng)
        .insert_resource(OutputPath(settings.output))
        .add_plugins(CityscapePlugin)
        .add_systems(Update, write_output);

    app.run()
}
