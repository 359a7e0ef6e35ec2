//! Stat meter geometry and value tiering. Pure functions of their inputs.

use gloam_engine::coords::{CanvasPoint, CanvasSize};
use gloam_engine::paint::Color;

use crate::anchor::{Anchor, Edge};

/// How the value is drawn.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Style {
    /// A bar filled in proportion to the value.
    #[default]
    Progress,
    /// One glyph or bitmap per whole unit of value.
    Units,
    /// A single blended-color gem or one frame of a multi-frame bitmap.
    Gem,
}

impl Style {
    pub fn parse(raw: &str) -> Option<Style> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "progress" => Some(Style::Progress),
            "units" => Some(Style::Units),
            "gem" => Some(Style::Gem),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Orient {
    #[default]
    Horizontal,
    Vertical,
}

impl Orient {
    pub fn parse(raw: &str) -> Option<Orient> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "horiz" => Some(Orient::Horizontal),
            "vert" => Some(Orient::Vertical),
            _ => None,
        }
    }
}

/// Coarse classification of a value against the low/high brackets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tier {
    Low,
    Medium,
    High,
}

/// `pct` is in `[0, 1]`; `low` and `high` are percentages.
pub fn tier(pct: f32, low: i32, high: i32) -> Tier {
    let percent = pct * 100.0;
    if percent <= low as f32 {
        Tier::Low
    } else if percent >= high as f32 {
        Tier::High
    } else {
        Tier::Medium
    }
}

/// Two-segment gradient: low to medium over the bottom half, medium to high over the top.
pub fn blend(pct: f32, low: Color, med: Color, high: Color) -> Color {
    if pct < 0.5 {
        Color::interpolate(low, med, pct * 2.0)
    } else {
        Color::interpolate(med, high, (pct - 0.5) * 2.0)
    }
}

/// Nominal size of one meter unit.
///
/// A bitmap image dictates the size. Otherwise the style default (128×32,
/// or 32 wide for units) is overridden by positive `width`/`height`.
pub fn request_size(style: Style, bitmap: Option<CanvasSize>, width: i32, height: i32) -> CanvasSize {
    if let Some(size) = bitmap {
        return size;
    }
    let mut size = CanvasSize::new(128, 32);
    if style == Style::Units {
        size.w = 32;
    }
    if width > 0 {
        size.w = width;
    }
    if height > 0 {
        size.h = height;
    }
    size
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutInput {
    pub canvas: CanvasSize,
    /// Label size; ignored when `has_text` is false.
    pub text: CanvasSize,
    pub has_text: bool,
    pub request: CanvasSize,
    pub style: Style,
    pub orient: Orient,
    pub value_int: i32,
    pub spacing: i32,
    pub anchor: Anchor,
    pub offset: CanvasPoint,
    pub margin: i32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MeterLayout {
    pub meter_size: CanvasSize,
    pub element_size: CanvasSize,
    /// Canvas position of the element, offset applied.
    pub element_pos: CanvasPoint,
    /// Meter origin within the element.
    pub meter_pos: CanvasPoint,
    /// Label origin within the element.
    pub text_pos: CanvasPoint,
    /// The label is drawn only for horizontal meters with text.
    pub show_text: bool,
    /// Units drawn by a units meter: the value, capped to what fits on the canvas.
    pub units: i32,
}

/// Length of `count` units of `unit` pixels with `spacing` between them.
/// Saturates instead of overflowing.
fn units_extent(count: i32, unit: i32, spacing: i32) -> i32 {
    count.saturating_mul(unit).saturating_add(count.saturating_sub(1).saturating_mul(spacing))
}

/// Most units whose extent still fits in `canvas` pixels.
fn units_fitting(canvas: i32, unit: i32, spacing: i32) -> i32 {
    let pitch = unit.saturating_add(spacing);
    if pitch <= 0 {
        return i32::MAX;
    }
    canvas.saturating_add(spacing).max(0) / pitch
}

pub fn compute_layout(input: &LayoutInput) -> MeterLayout {
    let LayoutInput { canvas, text, request, spacing, .. } = *input;

    let mut meter = request;
    let mut units = 0;
    match (input.style, input.orient) {
        (Style::Units, Orient::Horizontal) => {
            units = input.value_int.min(units_fitting(canvas.w, request.w, spacing)).max(0);
            meter.w = units_extent(units, request.w, spacing);
        }
        (Style::Units, Orient::Vertical) => {
            units = input.value_int.min(units_fitting(canvas.h, request.h, spacing)).max(0);
            meter.h = units_extent(units, request.h, spacing);
        }
        (_, Orient::Vertical) => meter = request.swapped(),
        (_, Orient::Horizontal) => {}
    }
    let meter = meter.clamped();

    let show_text = input.orient == Orient::Horizontal && input.has_text;
    let element = if show_text {
        CanvasSize::new(meter.w.max(text.w), meter.h + spacing + text.h)
    } else {
        meter
    };

    let mut element_pos = CanvasPoint::ORIGIN;
    let mut meter_pos = CanvasPoint::ORIGIN;
    let mut text_pos = CanvasPoint::ORIGIN;

    element_pos.x = input.anchor.horizontal().place(canvas.w, element.w, input.margin);
    match input.anchor.horizontal() {
        Edge::Start => {}
        Edge::Center => {
            meter_pos.x = ((text.w - meter.w) / 2).max(0);
            text_pos.x = ((meter.w - text.w) / 2).max(0);
        }
        Edge::End => {
            meter_pos.x = (text.w - meter.w).max(0);
            text_pos.x = (meter.w - text.w).max(0);
        }
    }

    element_pos.y = input.anchor.vertical().place(canvas.h, element.h, input.margin);
    match input.anchor.vertical() {
        // Label below the meter.
        Edge::Start | Edge::Center => text_pos.y = meter.h + spacing,
        // Label above the meter.
        Edge::End => {
            meter_pos.y = if show_text { text.h + spacing } else { 0 };
        }
    }

    MeterLayout {
        meter_size: meter,
        element_size: element,
        element_pos: element_pos + input.offset,
        meter_pos,
        text_pos,
        show_text,
        units,
    }
}
