use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use plotters::{
    coord::Shift,
    prelude::*,
    series::DashedLineSeries,
    style::{
        FontDesc, FontFamily, FontStyle, FontTransform,
        text_anchor::{HPos, Pos, VPos},
    },
};
use tracing::debug;

use crate::{
    axis::TickAxis,
    config::Settings,
    descriptor::{ChartDescriptor, HAlign},
    palette::Palette,
    panel::{Panel, XScale, running_max, select_panels},
    results::{LineStyle, ResultsDocument},
};

const WHITESMOKE: RGBColor = RGBColor(245, 245, 245);

/// A descriptor and the panels selected for it
pub struct ChartJob<'a> {
    pub filepath: PathBuf,
    pub descriptor: &'a ChartDescriptor,
    pub panels: Vec<Panel>,
}

/// Selects panels and renders `descriptor` into `plot_path`.
/// Returns `None` when the descriptor is skipped, in which case no file is written.
pub fn render_descriptor(
    descriptor: &ChartDescriptor,
    results: &ResultsDocument,
    palette: &Palette,
    plot_path: &Path,
    settings: &Settings,
) -> Result<Option<PathBuf>> {
    let Some(panels) = select_panels(descriptor, results) else {
        return Ok(None);
    };
    let job = ChartJob {
        filepath: plot_path.join(descriptor.filename()),
        descriptor,
        panels,
    };
    render_chart(&job, palette, settings)?;
    Ok(Some(job.filepath))
}

pub fn render_chart(job: &ChartJob<'_>, palette: &Palette, settings: &Settings) -> Result<()> {
    for series in job.panels.iter().flat_map(|p| p.series.iter()) {
        palette.style(&series.framework_name)?;
    }

    let descriptor = job.descriptor;
    let y_axis = TickAxis::y_axis(descriptor, &job.panels)
        .context(format!("Ticks for {}", descriptor.id))?;
    debug!(
        "Rendering {} with {} panels, max {}",
        descriptor.id,
        job.panels.len(),
        running_max(&job.panels)
    );

    if let Some(parent) = job.filepath.parent()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(&job.filepath, settings.figure_pixels(descriptor.fig_size))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((1, job.panels.len().max(1)));
    for (panel, area) in job.panels.iter().zip(areas.iter()) {
        draw_panel(area, panel, descriptor, palette, settings, &y_axis)
            .context(format!("Draw {} panel {}", descriptor.id, panel.name))?;
    }

    root.present()
        .context(format!("Write {}", job.filepath.display()))?;
    Ok(())
}

fn font_desc(family: &str, size: f64) -> FontDesc<'_> {
    FontDesc::new(FontFamily::from(family), size, FontStyle::Normal)
}

/// Plotters only rotates text by quarter turns; angles are counter-clockwise
fn quarter_turn(degrees: f64) -> FontTransform {
    match ((degrees / 90.0).round() as i64).rem_euclid(4) {
        1 => FontTransform::Rotate270,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate90,
        _ => FontTransform::None,
    }
}

/// Dash length and gap in pixels
fn dash_pattern(linestyle: LineStyle, scale: f64) -> Option<(i32, i32)> {
    let px = |points: f64| ((points * scale).round() as i32).max(1);
    match linestyle {
        LineStyle::Solid => None,
        LineStyle::Dashed => Some((px(3.7), px(1.6))),
        LineStyle::Dotted => Some((px(1.0), px(1.65))),
        LineStyle::DashDot => Some((px(6.4), px(1.6))),
    }
}

fn h_pos(align: HAlign) -> HPos {
    match align {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
        HAlign::Right => HPos::Right,
    }
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    panel: &Panel,
    descriptor: &ChartDescriptor,
    palette: &Palette,
    settings: &Settings,
    y_axis: &TickAxis,
) -> Result<()> {
    let scale = settings.point_scale();
    let px = |points: f64| (points * scale).round() as i32;
    let font = settings.font();

    let x_scale = XScale::of(panel);

    let mut chart = ChartBuilder::on(area)
        .caption(descriptor.caption(&panel.name), font_desc(font, 9.0 * scale))
        .margin(px(6.0))
        .x_label_area_size(px(36.0))
        .y_label_area_size(px(40.0))
        .build_cartesian_2d(TickAxis::x_axis(&x_scale), y_axis.clone())?;

    let x_label_fmt = |v: &f64| x_scale.tick_label(*v);
    let y_label_fmt = |v: &f64| format!("{v}");
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(descriptor.x_label.as_str())
        .y_desc(descriptor.y_label.as_str())
        .axis_desc_style(font_desc(font, 8.0 * scale))
        .x_label_style(
            font_desc(font, 7.0 * scale).transform(quarter_turn(descriptor.x_ticks_rotation)),
        )
        .y_label_style(
            font_desc(font, 7.0 * scale).transform(quarter_turn(descriptor.y_ticks_rotation)),
        )
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .draw()?;

    let annotation = &descriptor.annotation;
    let marker_radius = px(descriptor.marker_size as f64 / 2.0).max(1);
    let pad = px(2.0).max(1);

    for (series_idx, series) in panel.series.iter().enumerate() {
        let style = palette.style(&series.framework_name)?;
        let color = style.color;
        let points = series
            .points
            .iter()
            .map(|(x, y)| (x_scale.position(x), *y))
            .collect::<Vec<_>>();

        let stroke = color.stroke_width(settings.line_width());
        let anno = match dash_pattern(style.linestyle, scale) {
            None => chart.draw_series(LineSeries::new(points.clone(), stroke))?,
            Some((size, spacing)) => chart.draw_series(DashedLineSeries::new(
                points.clone(),
                size,
                spacing,
                stroke,
            ))?,
        };
        anno.label(series.framework_name.as_str()).legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
        });

        chart.draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, marker_radius, color.filled())),
        )?;
        chart.draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, marker_radius, BLACK.stroke_width(1))),
        )?;

        let texts = annotation.texts(&series.values());
        for (point_idx, (&point, text)) in points.iter().zip(texts).enumerate() {
            let anchor = annotation.placement.anchor(series_idx, point_idx);
            let text_style = font_desc(font, annotation.font_size * scale)
                .transform(quarter_turn(annotation.rotation))
                .color(&BLACK)
                .pos(Pos::new(h_pos(anchor.align), VPos::Bottom));
            let (w, h) = chart.plotting_area().estimate_text_size(&text, &text_style)?;
            let (w, h) = (w as i32, h as i32);

            let (dx, dy) = (px(anchor.dx), -px(anchor.dy));
            let left = match anchor.align {
                HAlign::Left => dx,
                HAlign::Center => dx - w / 2,
                HAlign::Right => dx - w,
            };
            let corners = [(left - pad, dy - h - pad), (left + w + pad, dy + pad)];

            let element = EmptyElement::at(point)
                + Rectangle::new(corners, WHITESMOKE.filled())
                + Rectangle::new(corners, BLACK.stroke_width(1))
                + Text::new(text, (dx, dy), text_style);
            chart.draw_series(std::iter::once(element))?;
        }
    }

    if !panel.series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITESMOKE)
            .border_style(&BLACK)
            .label_font(font_desc(font, 8.5 * scale))
            .draw()?;
    }

    Ok(())
}
