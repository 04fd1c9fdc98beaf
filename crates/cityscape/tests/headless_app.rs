//! Drives `CityscapePlugin` through a headless Bevy `App`, the way the
//! binary does.

use bevy::prelude::*;
use chrono::NaiveDate;

use cityscape::{
    CityError, CityRender, CityscapePlugin, FallbackWeek, GlyphSet, LabelStrategy, PendingWeek,
    SceneConfig, Week, WindowRng,
};

fn end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 8).expect("valid date")
}

/// Headless app with the plugin, rendered once.
struct TestRender {
    app: App,
}

impl TestRender {
    fn new(config: SceneConfig, fetched: Result<Week, CityError>) -> Self {
        Self::with_resources(config, fetched, |_| {})
    }

    fn with_resources(
        config: SceneConfig,
        fetched: Result<Week, CityError>,
        setup: impl FnOnce(&mut App),
    ) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(config);
        app.insert_resource(PendingWeek(Some(fetched)));
        app.insert_resource(WindowRng::from_seed_u64(11));
        setup(&mut app);
        app.add_plugins(CityscapePlugin);
        // Startup systems run on the first update.
        app.update();
        Self { app }
    }

    fn render(&self) -> &CityRender {
        self.app.world().resource::<CityRender>()
    }

    fn svg(&self) -> &str {
        self.render().svg().expect("document rendered")
    }
}

#[test]
fn test_plugin_renders_fetched_week() {
    let mut config = SceneConfig::classic();
    config.labels.strategy = LabelStrategy::NativeText;
    let city = TestRender::new(config, Ok(Week::sample(end(), 7)));
    assert!(city.render().error.is_none());
    assert_eq!(city.render().week.as_ref().map(Week::len), Some(7));
    assert!(city.svg().contains(">1234</text>"));
    assert!(city.svg().contains(">40</text>"));
}

#[test]
fn test_plugin_uses_fallback_week_when_unavailable() {
    let fallback = Week::new(
        Week::sample(end(), 6)
            .days()
            .iter()
            .map(|d| cityscape::DaySample { count: 2, ..d.clone() })
            .collect(),
        99,
    )
    .expect("valid fallback");
    let city = TestRender::with_resources(
        SceneConfig::compact(),
        Err(CityError::DataUnavailable("bad credentials".into())),
        |app| {
            app.insert_resource(FallbackWeek(fallback.clone()));
        },
    );
    assert_eq!(city.render().week.as_ref(), Some(&fallback));
    assert!(city.svg().contains(">99</text>"));
    assert!(city.svg().contains(">12</text>"));
}

#[test]
fn test_plugin_without_fallback_uses_sample_counts() {
    let city = TestRender::new(
        SceneConfig::compact(),
        Err(CityError::DataUnavailable("offline".into())),
    );
    let week = city.render().week.as_ref().expect("sample week");
    let counts: Vec<u32> = week.days().iter().map(|d| d.count).collect();
    assert_eq!(counts, vec![4, 1, 10, 6, 5, 11]);
}

#[test]
fn test_plugin_reports_invalid_sample() {
    let city = TestRender::new(
        SceneConfig::classic(),
        Err(CityError::InvalidSample {
            index: 2,
            reason: "negative count -1".into(),
        }),
    );
    assert!(city.render().document.is_none());
    assert!(matches!(
        city.render().error,
        Some(CityError::InvalidSample { index: 2, .. })
    ));
}

#[test]
fn test_plugin_places_glyph_fragments() {
    let mut config = SceneConfig::classic();
    config.labels.strategy = LabelStrategy::GlyphFragments;
    let mut glyphs = GlyphSet::new();
    for digit in '0'..='9' {
        glyphs.insert(&digit.to_string(), format!("<path d=\"M0 0h{digit}\"/>"));
    }
    let city = TestRender::with_resources(config, Ok(Week::sample(end(), 7)), |app| {
        app.insert_resource(glyphs);
    });
    let svg = city.svg();
    assert!(svg.contains(r#"<g class="day-3 label""#));
    assert!(svg.contains("<path d=\"M0 0h1\"/>"));
    // Weekday names have no fragments and are skipped, not drawn as text.
    assert!(!svg.contains(r#"<text class="day-"#));
}

#[test]
fn test_plugin_rejects_invalid_config() {
    let mut config = SceneConfig::classic();
    config.days = 9;
    let city = TestRender::new(config, Ok(Week::sample(end(), 7)));
    assert!(matches!(city.render().error, Some(CityError::Config(_))));
}
