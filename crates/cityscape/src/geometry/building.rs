//! Extruded buildings: ground footprint, two visible walls, roof, windows.

use bevy::prelude::*;
use rand::Rng;

use super::{DrawBatch, Part, Shape, Style};
use crate::config::{BuildingParams, SceneConfig};
use crate::palette::{darken, lighten, Palette};
use crate::projection::Projector;
use crate::rng::WindowRng;
use crate::tier::Tier;

/// Shading factors of the three visible faces of a box.
#[derive(Debug, Clone, Copy)]
pub struct BoxShading {
    pub left: f32,
    pub right: f32,
    pub roof: f32,
}

impl Default for BoxShading {
    fn default() -> Self {
        Self {
            left: 0.85,
            right: 0.65,
            roof: 1.25,
        }
    }
}

/// Footprint shadow extends this far past the walls, in grid units.
const FOOTPRINT_MARGIN: f32 = 0.08;
const FOOTPRINT_OPACITY: f32 = 0.45;

/// Window quad inside its cell, as fractions of the cell.
const WINDOW_SPAN: (f32, f32) = (0.22, 0.78);
const WINDOW_RISE: (f32, f32) = (0.25, 0.75);

/// Emit the left wall (facing +y), right wall (facing +x) and roof of a box
/// spanning `min..max` on the ground and `0..height` upward.
///
/// The viewer looks from +x/+y, so only these three faces are visible and they
/// never overlap each other on screen.
#[allow(clippy::too_many_arguments)]
pub fn push_box(
    batch: &mut DrawBatch,
    projector: &Projector,
    min: Vec2,
    max: Vec2,
    height: f32,
    color: Color,
    shading: BoxShading,
    faces: (Part, Part),
) {
    let (wall_part, roof_part) = faces;
    let p = |x: f32, y: f32, z: f32| projector.project(x, y, z);

    let left = vec![
        p(min.x, max.y, 0.0),
        p(max.x, max.y, 0.0),
        p(max.x, max.y, height),
        p(min.x, max.y, height),
    ];
    batch.push(
        wall_part,
        Shape::Polygon(left),
        Style::fill(darken(color, shading.left)),
    );

    let right = vec![
        p(max.x, max.y, 0.0),
        p(max.x, min.y, 0.0),
        p(max.x, min.y, height),
        p(max.x, max.y, height),
    ];
    batch.push(
        wall_part,
        Shape::Polygon(right),
        Style::fill(darken(color, shading.right)),
    );

    let roof = vec![
        p(min.x, min.y, height),
        p(max.x, min.y, height),
        p(max.x, max.y, height),
        p(min.x, max.y, height),
    ];
    batch.push(
        roof_part,
        Shape::Polygon(roof),
        Style::fill(lighten(color, shading.roof)),
    );
}

/// Footprint, walls, roof, then the window grid of one building.
pub fn push_building(
    batch: &mut DrawBatch,
    config: &SceneConfig,
    tier: Tier,
    count: u32,
    slot: Vec2,
    rng: &mut WindowRng,
) {
    let params = &config.building;
    let projector = &config.projector;
    let half = params.half_footprint(tier);
    let min = slot - Vec2::splat(half);
    let max = slot + Vec2::splat(half);
    let height = params.height(count);

    let shadow_min = min - Vec2::splat(FOOTPRINT_MARGIN);
    let shadow_max = max + Vec2::splat(FOOTPRINT_MARGIN);
    let footprint: Vec<Vec2> = [
        Vec2::new(shadow_min.x, shadow_min.y),
        Vec2::new(shadow_max.x, shadow_min.y),
        Vec2::new(shadow_max.x, shadow_max.y),
        Vec2::new(shadow_min.x, shadow_max.y),
    ]
    .iter()
    .map(|c| projector.project_ground(c.x, c.y))
    .collect();
    batch.push(
        Part::Footprint,
        Shape::Polygon(footprint),
        Style::fill(darken(config.palette.ground, 0.5)).with_opacity(FOOTPRINT_OPACITY),
    );

    push_box(
        batch,
        projector,
        min,
        max,
        height,
        config.palette.wall(tier),
        BoxShading::default(),
        (Part::Wall, Part::Roof),
    );

    push_windows(
        batch,
        projector,
        params,
        &config.palette,
        tier,
        (min, max),
        height,
        rng,
    );
}

/// Number of window rows that fit on a wall of `height`.
pub fn window_rows(params: &BuildingParams, height: f32) -> usize {
    let usable = height - params.window_bottom_pad - params.window_top_pad;
    if usable <= 0.0 {
        return 0;
    }
    (usable / params.window_band).floor() as usize
}

/// Windows on the left wall, then on the right wall, row by row from the
/// ground up. Lit state is an independent draw per window.
#[allow(clippy::too_many_arguments)]
pub fn push_windows(
    batch: &mut DrawBatch,
    projector: &Projector,
    params: &BuildingParams,
    palette: &Palette,
    tier: Tier,
    (min, max): (Vec2, Vec2),
    height: f32,
    rng: &mut WindowRng,
) {
    let rows = window_rows(params, height);
    let columns = params.columns(tier);
    if rows == 0 || columns == 0 {
        return;
    }
    let lit_p = params.lit_probability(tier);
    let band = params.window_band;

    // Each wall is parameterised by t in 0..1 along its run.
    let left_wall = |t: f32, z: f32| projector.project(min.x + (max.x - min.x) * t, max.y, z);
    let right_wall = |t: f32, z: f32| projector.project(max.x, max.y + (min.y - max.y) * t, z);
    let walls: [&dyn Fn(f32, f32) -> Vec2; 2] = [&left_wall, &right_wall];

    for wall in walls {
        for row in 0..rows {
            let z_cell = params.window_bottom_pad + row as f32 * band;
            let z0 = z_cell + band * WINDOW_RISE.0;
            let z1 = z_cell + band * WINDOW_RISE.1;
            for col in 0..columns {
                let t0 = (col as f32 + WINDOW_SPAN.0) / columns as f32;
                let t1 = (col as f32 + WINDOW_SPAN.1) / columns as f32;
                let quad = vec![wall(t0, z0), wall(t1, z0), wall(t1, z1), wall(t0, z1)];
                let lit = rng.0.gen_bool(lit_p);
                let color = if lit {
                    palette.window_lit
                } else {
                    palette.window_dark
                };
                batch.push(Part::Window, Shape::Polygon(quad), Style::fill(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Layer;

    fn batch() -> DrawBatch {
        DrawBatch::new(1.0, Layer::Entity(0))
    }

    #[test]
    fn test_box_emits_walls_before_roof() {
        let config = SceneConfig::classic();
        let mut b = batch();
        push_box(
            &mut b,
            &config.projector,
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            50.0,
            Color::WHITE,
            BoxShading::default(),
            (Part::Wall, Part::Roof),
        );
        let parts: Vec<Part> = b.items().iter().map(|d| d.part).collect();
        assert_eq!(parts, vec![Part::Wall, Part::Wall, Part::Roof]);
    }

    #[test]
    fn test_roof_vertices_are_raised_by_height() {
        let config = SceneConfig::classic();
        let p = &config.projector;
        let mut b = batch();
        push_box(
            &mut b,
            p,
            Vec2::new(2.0, -1.0),
            Vec2::new(3.0, 0.0),
            120.0,
            Color::WHITE,
            BoxShading::default(),
            (Part::Wall, Part::Roof),
        );
        let Shape::Polygon(roof) = &b.items()[2].shape else {
            panic!("roof should be a polygon");
        };
        assert_eq!(roof[0], p.project(2.0, -1.0, 120.0));
        assert_eq!(roof[0].y, p.project_ground(2.0, -1.0).y - 120.0);
    }

    #[test]
    fn test_building_order_footprint_walls_roof_windows() {
        let config = SceneConfig::classic();
        let mut rng = WindowRng::from_seed_u64(1);
        let mut b = batch();
        push_building(&mut b, &config, Tier::Large, 11, Vec2::new(13.0, -1.6), &mut rng);
        let parts: Vec<Part> = b.items().iter().map(|d| d.part).collect();
        assert_eq!(parts[0], Part::Footprint);
        assert_eq!(&parts[1..3], &[Part::Wall, Part::Wall]);
        assert_eq!(parts[3], Part::Roof);
        assert!(parts[4..].iter().all(|&p| p == Part::Window));
        assert!(parts.len() > 4, "a large building has windows");
    }

    #[test]
    fn test_window_count_matches_rows_and_columns() {
        let config = SceneConfig::classic();
        let params = &config.building;
        let mut rng = WindowRng::from_seed_u64(2);
        let mut b = batch();
        push_building(&mut b, &config, Tier::Medium, 8, Vec2::new(5.0, -1.6), &mut rng);
        let windows = b.items().iter().filter(|d| d.part == Part::Window).count();
        let rows = window_rows(params, params.height(8));
        assert_eq!(windows, 2 * rows * params.columns(Tier::Medium));
    }

    #[test]
    fn test_windows_stay_below_roof() {
        let config = SceneConfig::classic();
        let params = &config.building;
        for count in [1, 5, 9, 40] {
            let height = params.height(count);
            let rows = window_rows(params, height);
            let top = params.window_bottom_pad + rows as f32 * params.window_band;
            assert!(top <= height - params.window_top_pad + 1e-3, "count {count}");
        }
    }

    #[test]
    fn test_windows_are_deterministic_for_a_seed() {
        let config = SceneConfig::classic();
        let build = |seed| {
            let mut rng = WindowRng::from_seed_u64(seed);
            let mut b = batch();
            push_building(&mut b, &config, Tier::Large, 12, Vec2::new(7.0, -1.6), &mut rng);
            b.into_drawables()
        };
        assert_eq!(build(77), build(77));
    }

    #[test]
    fn test_fully_lit_when_chance_is_one() {
        let mut config = SceneConfig::classic();
        config.building.lit_chance = [1.0; 4];
        let mut rng = WindowRng::from_seed_u64(3);
        let mut b = batch();
        push_building(&mut b, &config, Tier::Small, 5, Vec2::new(3.0, -1.6), &mut rng);
        assert!(b
            .items()
            .iter()
            .filter(|d| d.part == Part::Window)
            .all(|d| d.style.fill == config.palette.window_lit));
    }
}
