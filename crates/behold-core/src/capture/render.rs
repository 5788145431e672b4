//! Snapshot Rendering
//!
//! Draws captured peeps into a standalone SVG document. Output depends only
//! on the visuals passed in, so identical captures give byte-identical
//! documents.

use behold_events::{Mood, Shape};
use serde::{Deserialize, Serialize};

use crate::components::geometry::Vec2;
use crate::components::peep::Peep;

const BACKGROUND: &str = "#EAEAEA";
const PATTERN_PATH: &str = "M0 40L40 0H20L0 20M40 40V20L20 40";
const ANGRY_HEAD: &str = "#fca5a5";
const HEAD_SIZE: f32 = 40.0;
const BODY_WIDTH: f32 = 24.0;
const BODY_HEIGHT: f32 = 20.0;

/// How one captured peep is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeepVisual {
    pub shape: Shape,
    pub mood: Mood,
    pub has_hat: bool,
    /// Open shouting mouth instead of the mood's face
    pub yelling: bool,
    /// Top-left corner relative to the capture window
    pub offset: Vec2,
}

impl PeepVisual {
    pub fn of(peep: &Peep, window_origin: Vec2) -> Self {
        Self {
            shape: peep.shape,
            mood: peep.mood,
            has_hat: peep.has_hat,
            yelling: peep.event_kind().is_some_and(|kind| kind.is_yelling()),
            offset: peep.position - window_origin,
        }
    }
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
fn num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn body(out: &mut String, visual: &PeepVisual, peep_size: f32) {
    let x = (peep_size - BODY_WIDTH) / 2.0;
    let y = peep_size - BODY_HEIGHT;
    let bottom = y + BODY_HEIGHT;
    let right = x + BODY_WIDTH;
    let base = match visual.shape {
        Shape::Circle => format!(
            "Q{} {} {} {}",
            num(x + BODY_WIDTH / 2.0),
            num(bottom + 12.0),
            num(right),
            num(bottom)
        ),
        Shape::Square => format!("L{} {}", num(right), num(bottom)),
    };
    out.push_str(&format!(
        r#"<path d="M{} {}L{} {}{}L{} {}" fill="white" stroke="black" stroke-width="2"/>"#,
        num(x),
        num(y),
        num(x),
        num(bottom),
        base,
        num(right),
        num(y)
    ));
}

fn head(out: &mut String, visual: &PeepVisual, head_x: f32) {
    let fill = if visual.mood == Mood::Angry {
        ANGRY_HEAD
    } else {
        "white"
    };
    match visual.shape {
        Shape::Circle => out.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" stroke="black" stroke-width="2"/>"#,
            num(head_x + HEAD_SIZE / 2.0),
            num(HEAD_SIZE / 2.0),
            num(HEAD_SIZE / 2.0),
            fill
        )),
        Shape::Square => out.push_str(&format!(
            r#"<rect x="{}" y="0" width="{}" height="{}" fill="{}" stroke="black" stroke-width="2"/>"#,
            num(head_x),
            num(HEAD_SIZE),
            num(HEAD_SIZE),
            fill
        )),
    }
}

fn face(out: &mut String, visual: &PeepVisual, head_x: f32) {
    for eye in [14.0, 26.0] {
        out.push_str(&format!(
            r#"<circle cx="{}" cy="16" r="2.5" fill="black"/>"#,
            num(head_x + eye)
        ));
    }

    let face_y = 24.0;
    if visual.yelling {
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="16" height="10" fill="black"/>"#,
            num(head_x + 12.0),
            num(face_y + 2.0)
        ));
        return;
    }

    let stroke = r#"stroke="black" stroke-width="1.5""#;
    match visual.mood {
        Mood::Angry => out.push_str(&format!(
            r#"<path d="M{} {}L{} {}M{} {}L{} {}" fill="none" {}/>"#,
            num(head_x + 10.0),
            num(face_y + 4.0),
            num(head_x + 18.0),
            num(face_y),
            num(head_x + 30.0),
            num(face_y + 4.0),
            num(head_x + 22.0),
            num(face_y),
            stroke
        )),
        Mood::Scared => out.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="5" fill="none" {}/>"#,
            num(head_x + HEAD_SIZE / 2.0),
            num(face_y + 2.0),
            stroke
        )),
        _ => out.push_str(&format!(
            r#"<path d="M{} {}L{} {}" fill="none" {}/>"#,
            num(head_x + 12.0),
            num(face_y + 4.0),
            num(head_x + 28.0),
            num(face_y + 4.0),
            stroke
        )),
    }
}

fn hat(out: &mut String, head_x: f32) {
    let center = head_x + HEAD_SIZE / 2.0;
    out.push_str(&format!(
        r#"<rect x="{}" y="-2" width="32" height="4" fill="black"/>"#,
        num(center - 16.0)
    ));
    out.push_str(&format!(
        r#"<rect x="{}" y="-12" width="20" height="10" fill="black"/>"#,
        num(center - 10.0)
    ));
}

fn peep(out: &mut String, visual: &PeepVisual, peep_size: f32) {
    let half = num(peep_size / 2.0);
    let mut transform = format!("translate({} {})", num(visual.offset.x), num(visual.offset.y));
    if visual.mood.is_fallen() {
        transform.push_str(&format!(" rotate(90 {} {})", half, half));
    }
    out.push_str(&format!(r#"<g transform="{}">"#, transform));

    let head_x = (peep_size - HEAD_SIZE) / 2.0;
    if !visual.mood.is_fallen() {
        body(out, visual, peep_size);
    }
    head(out, visual, head_x);
    // Fallen peeps are drawn as a bare, rotated head.
    if !visual.mood.is_fallen() {
        face(out, visual, head_x);
        if visual.has_hat {
            hat(out, head_x);
        }
    }

    out.push_str("</g>");
}

/// Renders the capture window as an SVG document.
pub fn render_snapshot(window_size: f32, peep_size: f32, visuals: &[PeepVisual]) -> String {
    let size = num(window_size);
    let mut out = String::with_capacity(512 + visuals.len() * 640);

    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}">"#,
        s = size
    ));
    out.push_str(&format!(
        r##"<defs><pattern id="diagonal" width="40" height="40" patternUnits="userSpaceOnUse"><g fill="#d8d8d8" fill-opacity="0.4" fill-rule="evenodd"><path d="{}"/></g></pattern></defs>"##,
        PATTERN_PATH
    ));
    out.push_str(&format!(
        r#"<rect width="{s}" height="{s}" fill="{}"/><rect width="{s}" height="{s}" fill="url(#diagonal)"/>"#,
        BACKGROUND,
        s = size
    ));

    for visual in visuals {
        peep(&mut out, visual, peep_size);
    }

    out.push_str("</svg>");
    out
}
