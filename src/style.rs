use crate::dataset::{Algorithm, Family};
use plotters::style::RGBColor;

pub const ROYAL_BLUE: RGBColor = RGBColor(65, 105, 225);
pub const DARK_ORANGE: RGBColor = RGBColor(255, 140, 0);
pub const FOREST_GREEN: RGBColor = RGBColor(34, 139, 34);
pub const CRIMSON: RGBColor = RGBColor(220, 20, 60);
pub const DEEP_PINK: RGBColor = RGBColor(255, 20, 147);
pub const FUCHSIA: RGBColor = RGBColor(255, 0, 255);
pub const SLATE_GREY: RGBColor = RGBColor(112, 128, 144);
pub const IVORY: RGBColor = RGBColor(255, 255, 240);

/// Point marker drawn on top of a series line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Large filled circle, used for the complete family.
    Circle,
    /// Small dot, used everywhere else.
    Dot,
}

impl Marker {
    pub fn for_family(family: Family) -> Marker {
        if family == Family::Complete {
            Marker::Circle
        } else {
            Marker::Dot
        }
    }
}

/// Fixed drawing style for one algorithm's series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesStyle {
    pub color: RGBColor,
    pub marker: Marker,
    pub label: &'static str,
}

fn palette(marker: Marker, labels: [&'static str; 4]) -> Vec<(Algorithm, SeriesStyle)> {
    let colors = [ROYAL_BLUE, DARK_ORANGE, FOREST_GREEN, CRIMSON];
    Algorithm::compared()
        .iter()
        .zip(colors)
        .zip(labels)
        .map(|((&alg, color), label)| {
            (
                alg,
                SeriesStyle {
                    color,
                    marker,
                    label,
                },
            )
        })
        .collect()
}

/// Series styles for the raw-metric comparison charts.
pub fn approx_series(marker: Marker) -> Vec<(Algorithm, SeriesStyle)> {
    palette(
        marker,
        [
            "Poranen's Rule",
            "New Rule",
            "Schmid's Rule",
            "Calinescu's Rule",
        ],
    )
}

/// Series styles for the approximation-ratio charts.
pub fn ratio_series(marker: Marker) -> Vec<(Algorithm, SeriesStyle)> {
    palette(marker, ["CA_P", "CA_W", "CA_S", "CA"])
}
