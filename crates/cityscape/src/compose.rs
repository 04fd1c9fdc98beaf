//! Depth sorting and SVG serialisation.
//!
//! The sort is stable: drawables with equal depth keep the order the scene
//! emitted them in. Inside one day cluster that order is the only thing
//! keeping walls under windows and plates under labels.

use std::fmt::{self, Write};

use bevy::prelude::*;

use crate::geometry::{Drawable, Shape, Style};
use crate::palette::svg_hex;
use crate::scene::Scene;

/// A finished render: drawables in paint order and their SVG text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub canvas: Vec2,
    drawables: Vec<Drawable>,
    svg: String,
}

impl Document {
    /// Drawables in the order they are painted.
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn into_svg(self) -> String {
        self.svg
    }

    /// Paint position of the first drawable matching `pred`.
    pub fn position(&self, pred: impl Fn(&Drawable) -> bool) -> Option<usize> {
        self.drawables.iter().position(pred)
    }
}

/// Stable ascending sort by depth key.
pub fn depth_sort(drawables: &mut [Drawable]) {
    drawables.sort_by(|a, b| a.depth.total_cmp(&b.depth));
}

pub fn compose(scene: Scene) -> Document {
    let canvas = scene.canvas;
    let mut drawables = scene.into_drawables();
    depth_sort(&mut drawables);

    let svg = render_svg(canvas, &drawables);

    Document {
        canvas,
        drawables,
        svg,
    }
}

// ---------------------------------------------------------------------------
// SVG writer
// ---------------------------------------------------------------------------

/// The full SVG document for already sorted drawables.
pub fn render_svg(canvas: Vec2, drawables: &[Drawable]) -> String {
    let mut svg = String::new();
    write_document(&mut svg, canvas, drawables).expect("writing to a String cannot fail");
    svg
}

fn write_document(out: &mut String, canvas: Vec2, drawables: &[Drawable]) -> fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.x,
        h = canvas.y
    )?;
    for d in drawables {
        write_drawable(out, d)?;
    }
    writeln!(out, "</svg>")
}

fn paint(style: &Style) -> String {
    let mut attrs = format!(r#"fill="{}""#, svg_hex(style.fill));
    if style.opacity < 1.0 {
        attrs.push_str(&format!(r#" fill-opacity="{:.2}""#, style.opacity));
    }
    if let Some(stroke) = style.stroke {
        attrs.push_str(&format!(
            r#" stroke="{}" stroke-width="{:.2}""#,
            svg_hex(stroke.color),
            stroke.width
        ));
    }
    attrs
}

fn write_drawable(out: &mut String, d: &Drawable) -> fmt::Result {
    let class = format!("{} {}", d.layer, d.part.class_name());
    let paint = paint(&d.style);
    match &d.shape {
        Shape::Polygon(points) => {
            let points: Vec<String> = points
                .iter()
                .map(|p| format!("{:.2},{:.2}", p.x, p.y))
                .collect();
            writeln!(
                out,
                r#"  <polygon class="{class}" points="{}" {paint}/>"#,
                points.join(" ")
            )
        }
        Shape::Rect { min, size } => writeln!(
            out,
            r#"  <rect class="{class}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {paint}/>"#,
            min.x, min.y, size.x, size.y
        ),
        Shape::Circle { center, radius } => writeln!(
            out,
            r#"  <circle class="{class}" cx="{:.2}" cy="{:.2}" r="{:.2}" {paint}/>"#,
            center.x, center.y, radius
        ),
        Shape::Ellipse { center, radii } => writeln!(
            out,
            r#"  <ellipse class="{class}" cx="{:.2}" cy="{:.2}" rx="{:.2}" ry="{:.2}" {paint}/>"#,
            center.x, center.y, radii.x, radii.y
        ),
        Shape::Text {
            at,
            content,
            size,
            family,
            anchor,
            bold,
        } => {
            let weight = if *bold { r#" font-weight="bold""# } else { "" };
            writeln!(
                out,
                r#"  <text class="{class}" x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" text-anchor="{}"{weight} {paint}>{}</text>"#,
                at.x,
                at.y,
                escape_xml(family),
                size,
                anchor.as_svg(),
                escape_xml(content)
            )
        }
        Shape::Fragment { at, markup } => writeln!(
            out,
            r#"  <g class="{class}" transform="translate({:.2}, {:.2})" {paint}>{markup}</g>"#,
            at.x, at.y
        ),
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
