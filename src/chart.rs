use crate::aggregate::{AggFn, AggregatedRow, VarianceRow};
use crate::dataset::{Algorithm, Family, Metric};
use crate::style::{
    approx_series, ratio_series, Marker, SeriesStyle, DEEP_PINK, FUCHSIA, IVORY, SLATE_GREY,
};
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::path::{Path, PathBuf};

// 10x6 inch figure at 300 DPI.
const CHART_SIZE: (u32, u32) = (3000, 1800);

const TITLE_FONT_SIZE: u32 = 72;
const AXIS_LABEL_FONT_SIZE: u32 = 52;
const TICK_LABEL_FONT_SIZE: u32 = 40;
const LEGEND_FONT_SIZE: u32 = 44;

const LINE_WIDTH: u32 = 5;
// Short dash, wide gap: the series lines read as dotted.
const DASH_LEN: u32 = 6;
const DASH_GAP: u32 = 14;

/// Times are recorded in milliseconds and scaled by this before plotting.
const TIME_PLOT_SCALE: f64 = 0.001;

/// Known lower bound on the achievable approximation ratio.
const RATIO_REFERENCE: f64 = 4.0 / 9.0;

/// Multiplier of the optimal edge count reached by the best known rule.
const LOWER_BOUND_FACTOR: f64 = 0.393;

/// Family label used by the ratio pipeline's fixed input file.
const RATIO_FAMILY: &str = "3-regular";

/// Render the comparison chart for one (metric, family) pair.
pub fn render_approx(
    agg: &[AggregatedRow],
    variance: &[VarianceRow],
    metric: Metric,
    family: Family,
    func: AggFn,
    output_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).context("Failed to create output directory")?;
    let path = output_dir.join(format!(
        "{}_{}_{}_approx.png",
        func.label(),
        metric.column(),
        family.label()
    ));

    match metric {
        Metric::Time => approx_time_chart(agg, family, func, &path)?,
        Metric::Edges if family == Family::Complete => {
            approx_edges_complete_chart(agg, func, &path)?
        }
        Metric::Edges => approx_edges_variance_chart(agg, variance, family, func, &path)?,
    }

    println!("Generated: {}", path.display());
    Ok(path)
}

/// Render the approximation-ratio chart for one metric.
pub fn render_ratio(
    agg: &[AggregatedRow],
    metric: Metric,
    func: AggFn,
    output_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).context("Failed to create output directory")?;
    let path = output_dir.join(format!(
        "{}_{}_{}_ratio.png",
        func.label(),
        metric.column(),
        RATIO_FAMILY
    ));

    match metric {
        Metric::Time => ratio_time_chart(agg, func, &path)?,
        Metric::Edges => ratio_edges_chart(agg, func, &path)?,
    }

    println!("Generated: {}", path.display());
    Ok(path)
}

/// One algorithm's plotted points, sorted by vertex count.
fn series_points(agg: &[AggregatedRow], alg: Algorithm, scale: f64) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = agg
        .iter()
        .filter(|r| r.alg == alg)
        .map(|r| (r.n as f64, scale * r.value))
        .collect();
    points.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap());
    points
}

fn styled_series(
    agg: &[AggregatedRow],
    styles: Vec<(Algorithm, SeriesStyle)>,
    scale: f64,
) -> Vec<(SeriesStyle, Vec<(f64, f64)>)> {
    styles
        .into_iter()
        .map(|(alg, style)| (style, series_points(agg, alg, scale)))
        .collect()
}

/// Padded x-axis range over every plotted point.
fn x_bounds<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> (f64, f64) {
    let (mut x_min, mut x_max) = (f64::MAX, f64::MIN);
    for &(x, _) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
    }
    let pad = ((x_max - x_min) * 0.05).max(1.0);
    (x_min - pad, x_max + pad)
}

fn marker_radius(marker: Marker) -> u32 {
    match marker {
        Marker::Circle => 14,
        Marker::Dot => 7,
    }
}

fn approx_time_chart(
    agg: &[AggregatedRow],
    family: Family,
    func: AggFn,
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let marker = Marker::for_family(family);
    let series = styled_series(agg, approx_series(marker), TIME_PLOT_SCALE);

    if series.iter().all(|(_, points)| points.is_empty()) {
        root.present()?;
        return Ok(());
    }

    let (x_min, x_max) = x_bounds(series.iter().flat_map(|(_, points)| points));
    let y_min = series
        .iter()
        .flat_map(|(_, points)| points)
        .map(|&(_, y)| y)
        .filter(|&y| y > 0.0)
        .fold(f64::MAX, f64::min)
        .max(1e-9);
    let y_max = series
        .iter()
        .flat_map(|(_, points)| points)
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max)
        * 2.0;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "{} time comparison on {} graphs",
                func.label(),
                family.label()
            ),
            ("sans-serif", TITLE_FONT_SIZE),
        )
        .margin(40)
        .x_label_area_size(130)
        .y_label_area_size(170)
        .build_cartesian_2d(x_min..x_max, (y_min * 0.5..y_max).log_scale())?;

    chart.plotting_area().fill(&IVORY)?;

    chart
        .configure_mesh()
        .x_desc("Number of vertices")
        .y_desc(format!("{} time (ms)", func.label()))
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    for (style, points) in &series {
        if points.is_empty() {
            continue;
        }
        let color = style.color;
        chart
            .draw_series(DashedLineSeries::new(
                points.iter().copied(),
                DASH_LEN,
                DASH_GAP,
                color.stroke_width(LINE_WIDTH),
            ))?
            .label(style.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 40, y)], color.stroke_width(LINE_WIDTH))
            });
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), marker_radius(style.marker), color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}

fn approx_edges_complete_chart(agg: &[AggregatedRow], func: AggFn, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let marker = Marker::for_family(Family::Complete);
    let series = styled_series(agg, approx_series(marker), 1.0);

    // Theoretical curves over the distinct vertex counts of the table.
    let mut unique_n: Vec<f64> = agg.iter().map(|r| r.n as f64).collect();
    unique_n.sort_by(|a, b| a.partial_cmp(b).unwrap());
    unique_n.dedup();
    let optimal: Vec<(f64, f64)> = unique_n.iter().map(|&n| (n, 3.0 * n - 6.0)).collect();
    let lower_bound: Vec<(f64, f64)> = optimal
        .iter()
        .map(|&(n, opt)| (n, LOWER_BOUND_FACTOR * opt))
        .collect();

    let all_points: Vec<(f64, f64)> = series
        .iter()
        .flat_map(|(_, points)| points.iter().copied())
        .chain(optimal.iter().copied())
        .chain(lower_bound.iter().copied())
        .collect();

    if all_points.is_empty() {
        root.present()?;
        return Ok(());
    }

    let (x_min, x_max) = x_bounds(all_points.iter());
    let y_min = all_points.iter().map(|&(_, y)| y).fold(f64::MAX, f64::min);
    let y_max = all_points.iter().map(|&(_, y)| y).fold(f64::MIN, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} edges comparison on complete graphs", func.label()),
            ("sans-serif", TITLE_FONT_SIZE),
        )
        .margin(40)
        .x_label_area_size(130)
        .y_label_area_size(170)
        .build_cartesian_2d(x_min..x_max, y_min * 0.9..y_max * 1.1 + 1.0)?;

    chart.plotting_area().fill(&IVORY)?;

    chart
        .configure_mesh()
        .x_desc("Number of vertices")
        .y_desc(format!("{} number of edges", func.label()))
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    for (style, points) in &series {
        if points.is_empty() {
            continue;
        }
        let color = style.color;
        chart
            .draw_series(DashedLineSeries::new(
                points.iter().copied(),
                DASH_LEN,
                DASH_GAP,
                color.stroke_width(LINE_WIDTH),
            ))?
            .label(style.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 40, y)], color.stroke_width(LINE_WIDTH))
            });
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), marker_radius(style.marker), color.filled())),
        )?;
    }

    for (curve, label, color) in [
        (&optimal, "Optimal solution", DEEP_PINK),
        (&lower_bound, "13/33 * Optimal solution", FUCHSIA),
    ] {
        chart
            .draw_series(DashedLineSeries::new(
                curve.iter().copied(),
                DASH_LEN,
                DASH_GAP,
                color.stroke_width(LINE_WIDTH),
            ))?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 40, y)], color.stroke_width(LINE_WIDTH))
            });
        chart.draw_series(
            curve
                .iter()
                .map(|&(x, y)| Circle::new((x, y), marker_radius(marker), color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}

fn approx_edges_variance_chart(
    agg: &[AggregatedRow],
    variance: &[VarianceRow],
    family: Family,
    func: AggFn,
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let marker = Marker::for_family(family);
    let series = styled_series(agg, approx_series(marker), 1.0);

    if series.iter().all(|(_, points)| points.is_empty()) {
        root.present()?;
        return Ok(());
    }

    let (x_min, x_max) = x_bounds(series.iter().flat_map(|(_, points)| points));
    let y_min = series
        .iter()
        .flat_map(|(_, points)| points)
        .map(|&(_, y)| y)
        .fold(f64::MAX, f64::min);
    let y_max = series
        .iter()
        .flat_map(|(_, points)| points)
        .map(|&(_, y)| y)
        .fold(f64::MIN, f64::max);

    let variance_points: Vec<(f64, f64)> = variance
        .iter()
        .map(|v| (v.n as f64, v.variance))
        .collect();
    let variance_max = variance_points
        .iter()
        .map(|&(_, v)| v)
        .fold(0.0_f64, f64::max)
        * 1.1
        + 1.0;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "{} edges comparison on {} graphs",
                func.label(),
                family.label()
            ),
            ("sans-serif", TITLE_FONT_SIZE),
        )
        .margin(40)
        .x_label_area_size(130)
        .y_label_area_size(170)
        .right_y_label_area_size(170)
        .build_cartesian_2d(x_min..x_max, y_min * 0.9..y_max * 1.1 + 1.0)?
        .set_secondary_coord(x_min..x_max, 0.0..variance_max);

    chart.plotting_area().fill(&IVORY)?;

    chart
        .configure_mesh()
        .x_desc("Number of vertices")
        .y_desc(format!("{} number of edges", func.label()))
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Variance of edges for each graph and different algorithms")
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    for (style, points) in &series {
        if points.is_empty() {
            continue;
        }
        let color = style.color;
        chart
            .draw_series(DashedLineSeries::new(
                points.iter().copied(),
                DASH_LEN,
                DASH_GAP,
                color.stroke_width(LINE_WIDTH),
            ))?
            .label(style.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 40, y)], color.stroke_width(LINE_WIDTH))
            });
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), marker_radius(style.marker), color.filled())),
        )?;
    }

    // Per-instance variance as a marker-only scatter on the right axis.
    chart.draw_secondary_series(
        variance_points
            .iter()
            .map(|&(x, y)| Cross::new((x, y), 14, BLACK.stroke_width(4))),
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}

fn ratio_time_chart(agg: &[AggregatedRow], func: AggFn, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let series = styled_series(agg, ratio_series(Marker::Dot), 1.0);

    if series.iter().all(|(_, points)| points.is_empty()) {
        root.present()?;
        return Ok(());
    }

    let (x_min, x_max) = x_bounds(series.iter().flat_map(|(_, points)| points));
    let y_min = series
        .iter()
        .flat_map(|(_, points)| points)
        .map(|&(_, y)| y)
        .filter(|&y| y > 0.0)
        .fold(f64::MAX, f64::min)
        .min(RATIO_REFERENCE)
        .max(1e-9);
    let y_max = series
        .iter()
        .flat_map(|(_, points)| points)
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max)
        .max(RATIO_REFERENCE)
        * 2.0;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "{} approximation ratio on {} graphs",
                func.label(),
                RATIO_FAMILY
            ),
            ("sans-serif", TITLE_FONT_SIZE),
        )
        .margin(40)
        .x_label_area_size(130)
        .y_label_area_size(170)
        .build_cartesian_2d(x_min..x_max, (y_min * 0.5..y_max).log_scale())?;

    chart.plotting_area().fill(&IVORY)?;

    chart
        .configure_mesh()
        .x_desc("Number of vertices")
        .y_desc(format!("{} time (ms)", func.label()))
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    for (style, points) in &series {
        if points.is_empty() {
            continue;
        }
        let color = style.color;
        chart
            .draw_series(DashedLineSeries::new(
                points.iter().copied(),
                DASH_LEN,
                DASH_GAP,
                color.stroke_width(LINE_WIDTH),
            ))?
            .label(style.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 40, y)], color.stroke_width(LINE_WIDTH))
            });
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), marker_radius(style.marker), color.filled())),
        )?;
    }

    draw_ratio_reference_line(&mut chart, x_min, x_max)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}

fn ratio_edges_chart(agg: &[AggregatedRow], func: AggFn, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let series = styled_series(agg, ratio_series(Marker::Dot), 1.0);

    if series.iter().all(|(_, points)| points.is_empty()) {
        root.present()?;
        return Ok(());
    }

    let (x_min, x_max) = x_bounds(series.iter().flat_map(|(_, points)| points));
    let y_min = series
        .iter()
        .flat_map(|(_, points)| points)
        .map(|&(_, y)| y)
        .fold(f64::MAX, f64::min)
        .min(RATIO_REFERENCE);
    let y_max = series
        .iter()
        .flat_map(|(_, points)| points)
        .map(|&(_, y)| y)
        .fold(f64::MIN, f64::max)
        .max(RATIO_REFERENCE);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "{} approximation ratio on {} graphs",
                func.label(),
                RATIO_FAMILY
            ),
            ("sans-serif", TITLE_FONT_SIZE),
        )
        .margin(40)
        .x_label_area_size(130)
        .y_label_area_size(170)
        .build_cartesian_2d(x_min..x_max, y_min * 0.9..y_max * 1.1)?;

    chart.plotting_area().fill(&IVORY)?;

    chart
        .configure_mesh()
        .x_desc("Number of vertices")
        .y_desc(format!("{} approximation ratio", func.label()))
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    for (style, points) in &series {
        if points.is_empty() {
            continue;
        }
        let color = style.color;
        chart
            .draw_series(DashedLineSeries::new(
                points.iter().copied(),
                DASH_LEN,
                DASH_GAP,
                color.stroke_width(LINE_WIDTH),
            ))?
            .label(style.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 40, y)], color.stroke_width(LINE_WIDTH))
            });
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), marker_radius(style.marker), color.filled())),
        )?;
    }

    draw_ratio_reference_line(&mut chart, x_min, x_max)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Horizontal dashed line at y = 4/9 with its own legend entry.
fn draw_ratio_reference_line<CT>(
    chart: &mut ChartContext<BitMapBackend, CT>,
    x_min: f64,
    x_max: f64,
) -> Result<()>
where
    CT: plotters::coord::CoordTranslate<From = (f64, f64)>,
{
    chart
        .draw_series(DashedLineSeries::new(
            [(x_min, RATIO_REFERENCE), (x_max, RATIO_REFERENCE)],
            24,
            16,
            SLATE_GREY.stroke_width(LINE_WIDTH),
        ))?
        .label("4/9")
        .legend(|(x, y)| {
            PathElement::new(
                vec![(x, y), (x + 40, y)],
                SLATE_GREY.stroke_width(LINE_WIDTH),
            )
        });
    Ok(())
}
