//! End-to-end scenarios: week in, composed document out.
//!
//! Run: cargo test -p cityscape --test scenario

use chrono::NaiveDate;

use cityscape::geometry::{Layer, Part, Shape};
use cityscape::{
    render_week, run_pipeline, CityError, ContributionCalendar, DaySample, Document,
    LabelStrategy, SceneConfig, Tier, Week, WindowRng,
};

fn end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 8).expect("valid date")
}

fn render(config: &SceneConfig, week: &Week) -> Document {
    render_week(week, config, None, &mut WindowRng::from_seed_u64(2024))
}

fn first_position(doc: &Document, layer: Layer) -> usize {
    doc.position(|d| d.layer == layer)
        .unwrap_or_else(|| panic!("{layer} missing"))
}

fn last_position(doc: &Document, layer: Layer) -> usize {
    doc.drawables()
        .iter()
        .rposition(|d| d.layer == layer)
        .unwrap_or_else(|| panic!("{layer} missing"))
}

/// Height of a day's building from its first wall: bottom-left minus
/// top-left vertex on screen.
fn building_height(doc: &Document, day: usize) -> Option<f32> {
    doc.drawables()
        .iter()
        .find(|d| d.layer == Layer::Entity(day) && d.part == Part::Wall)
        .and_then(|d| match &d.shape {
            Shape::Polygon(points) => Some(points[0].y - points[3].y),
            _ => None,
        })
}

// ---------------------------------------------------------------------------
// Reference week [3, 4, 1, 10, 6, 5, 11]
// ---------------------------------------------------------------------------

#[test]
fn test_reference_week_tiers() {
    let week = Week::sample(end(), 7);
    let tiers: Vec<Tier> = week.days().iter().map(DaySample::tier).collect();
    assert_eq!(
        tiers,
        vec![
            Tier::XSmall,
            Tier::Small,
            Tier::XSmall,
            Tier::Large,
            Tier::Small,
            Tier::Small,
            Tier::Large,
        ]
    );
    assert_eq!(week.week_sum(), 40);
}

#[test]
fn test_seven_clusters_in_increasing_depth() {
    let config = SceneConfig::classic();
    let doc = render(&config, &Week::sample(end(), 7));

    let mut clusters: Vec<usize> = Vec::new();
    for d in doc.drawables() {
        if let Layer::Entity(day) = d.layer {
            if clusters.last() != Some(&day) {
                clusters.push(day);
            }
        }
    }
    assert_eq!(clusters, (0..7).collect::<Vec<_>>(), "one contiguous run per day");

    let depths: Vec<f32> = (0..7)
        .map(|i| doc.drawables()[first_position(&doc, Layer::Entity(i))].depth)
        .collect();
    assert!(depths.windows(2).all(|w| w[0] < w[1]), "{depths:?}");
}

#[test]
fn test_saturday_is_tallest_and_drawn_after_sunday() {
    let config = SceneConfig::classic();
    let doc = render(&config, &Week::sample(end(), 7));

    let heights: Vec<f32> = (0..7)
        .map(|i| building_height(&doc, i).expect("every reference day has a building"))
        .collect();
    let saturday = heights[6];
    assert!(
        heights[..6].iter().all(|&h| h < saturday),
        "heights {heights:?}"
    );
    assert!(first_position(&doc, Layer::Entity(6)) > last_position(&doc, Layer::Entity(0)));
}

#[test]
fn test_fixtures_behind_clusters_and_props_in_front() {
    let config = SceneConfig::classic();
    let doc = render(&config, &Week::sample(end(), 7));
    assert!(last_position(&doc, Layer::Background) < first_position(&doc, Layer::Fixture));
    assert!(last_position(&doc, Layer::Fixture) < first_position(&doc, Layer::Entity(0)));
    assert!(last_position(&doc, Layer::Entity(6)) < first_position(&doc, Layer::Foreground));
    assert!(last_position(&doc, Layer::Foreground) < first_position(&doc, Layer::Overlay));
}

#[test]
fn test_windows_follow_walls_and_roof_in_every_cluster() {
    let config = SceneConfig::classic();
    let doc = render(&config, &Week::sample(end(), 7));
    for day in 0..7 {
        let parts: Vec<Part> = doc
            .drawables()
            .iter()
            .filter(|d| d.layer == Layer::Entity(day))
            .map(|d| d.part)
            .collect();
        let roof = parts.iter().position(|&p| p == Part::Roof).expect("roof");
        let last_wall = parts.iter().rposition(|&p| p == Part::Wall).expect("walls");
        assert!(last_wall < roof, "day {day}");
        if let Some(first_window) = parts.iter().position(|&p| p == Part::Window) {
            assert!(roof < first_window, "day {day}");
        }
        let plate = parts.iter().position(|&p| p == Part::SignPlate).expect("plate");
        let first_label = parts.iter().position(|&p| p == Part::Label).expect("label");
        assert!(plate < first_label, "day {day}");
    }
}

// ---------------------------------------------------------------------------
// Empty days
// ---------------------------------------------------------------------------

#[test]
fn test_zero_count_day_is_lamp_without_windows() {
    let counts = [0, 2, 0, 5, 0, 9, 12];
    let days: Vec<DaySample> = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| DaySample::new(end() - chrono::Days::new(6 - i as u64), c))
        .collect();
    let week = Week::new(days, 28).expect("valid week");
    let doc = render(&SceneConfig::classic(), &week);

    for (day, &count) in counts.iter().enumerate() {
        let parts: Vec<Part> = doc
            .drawables()
            .iter()
            .filter(|d| d.layer == Layer::Entity(day))
            .map(|d| d.part)
            .collect();
        if count == 0 {
            assert!(!parts.iter().any(|p| p.is_building()), "day {day}: {parts:?}");
            assert_eq!(parts.iter().filter(|p| p.is_lamp()).count(), 3);
        } else {
            assert!(!parts.iter().any(|p| p.is_lamp()), "day {day}");
        }
    }
}

// ---------------------------------------------------------------------------
// Summary labels
// ---------------------------------------------------------------------------

#[test]
fn test_native_summary_shows_total_and_week_sum() {
    let mut config = SceneConfig::classic();
    config.labels.strategy = LabelStrategy::NativeText;
    let doc = render(&config, &Week::sample(end(), 7));
    let svg = doc.svg();
    assert!(svg.contains(">1234</text>"));
    assert!(svg.contains(">40</text>"));
    assert!(svg.contains(">TOTAL:</text>"));
    assert!(svg.contains(">WEEK:</text>"));
}

#[test]
fn test_bitmap_preset_emits_no_text_elements() {
    let doc = render(&SceneConfig::classic(), &Week::sample(end(), 7));
    assert!(!doc.svg().contains("<text"));
    assert!(doc.svg().contains("overlay summary"));
}

#[test]
fn test_compact_preset_six_days_on_small_canvas() {
    let config = SceneConfig::compact();
    let doc = render(&config, &Week::sample(end(), 6));
    assert!(doc
        .svg()
        .starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="400""#));
    assert!(doc.position(|d| d.layer == Layer::Entity(5)).is_some());
    assert!(doc.position(|d| d.layer == Layer::Entity(6)).is_none());
    // Counts 4, 1, 10, 6, 5, 11 total 37.
    assert!(doc.svg().contains(">37</text>"));
}

// ---------------------------------------------------------------------------
// Input paths
// ---------------------------------------------------------------------------

#[test]
fn test_calendar_payload_to_document() {
    let payload = r#"{"data":{"user":{"contributionsCollection":{"contributionCalendar":{
        "totalContributions": 1234,
        "weeks": [
            {"contributionDays": [
                {"contributionCount": 3, "date": "2024-06-02", "weekday": 0},
                {"contributionCount": 4, "date": "2024-06-03", "weekday": 1},
                {"contributionCount": 1, "date": "2024-06-04", "weekday": 2},
                {"contributionCount": 10, "date": "2024-06-05", "weekday": 3},
                {"contributionCount": 6, "date": "2024-06-06", "weekday": 4},
                {"contributionCount": 5, "date": "2024-06-07", "weekday": 5},
                {"contributionCount": 11, "date": "2024-06-08", "weekday": 6}
            ]}
        ]
    }}}}}"#;
    let fetched = ContributionCalendar::from_json(payload).and_then(|c| c.last_days(7));
    let mut config = SceneConfig::classic();
    config.labels.strategy = LabelStrategy::NativeText;
    let (week, doc) = run_pipeline(
        fetched,
        || panic!("fetched week is complete"),
        &config,
        None,
        &mut WindowRng::from_seed_u64(1),
    )
    .expect("render");
    assert_eq!(week, Week::sample(end(), 7));
    assert!(doc.svg().contains(">SAT</text>"));
}

#[test]
fn test_invalid_sample_is_not_rendered() {
    let payload = r#"{"weeks":[{"contributionDays":[
        {"contributionCount": 3, "date": "2024-06-07", "weekday": 9}
    ]}]}"#;
    let fetched = ContributionCalendar::from_json(payload).and_then(|c| c.last_days(1));
    let mut config = SceneConfig::classic();
    config.days = 1;
    let err = run_pipeline(
        fetched,
        || panic!("invalid samples never fall back"),
        &config,
        None,
        &mut WindowRng::from_seed_u64(1),
    )
    .unwrap_err();
    assert!(matches!(err, CityError::InvalidSample { index: 0, .. }));
}

#[test]
fn test_same_seed_same_document() {
    let config = SceneConfig::classic();
    let week = Week::sample(end(), 7);
    assert_eq!(render(&config, &week).svg(), render(&config, &week).svg());
    let other = render_week(&week, &config, None, &mut WindowRng::from_seed_u64(7));
    // Only window fills may differ between seeds.
    assert_eq!(other.drawables().len(), render(&config, &week).drawables().len());
}

#[test]
fn test_all_geometry_within_canvas_width() {
    for config in [SceneConfig::classic(), SceneConfig::compact()] {
        let doc = render(&config, &Week::sample(end(), config.days));
        for d in doc.drawables() {
            if let Shape::Polygon(points) = &d.shape {
                for p in points {
                    assert!(
                        p.x >= -1.0 && p.x <= config.canvas.x + 1.0,
                        "{:?} at {p:?} outside {:?}",
                        d.part,
                        config.canvas
                    );
                    assert!(p.y <= config.canvas.y + 1.0, "{:?} at {p:?}", d.part);
                }
            }
        }
    }
}
