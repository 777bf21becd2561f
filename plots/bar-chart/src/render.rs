use std::path::Path;

use common::util::{NumberLocale, Palette, Rgb};
use eyre::Result;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    layout::{
        BarLayout, LEGEND_FONT_SIZE, LEGEND_PADDING, LEGEND_ROW_HEIGHT, LEGEND_SWATCH,
        axis_decimals, legend_geometry, legend_origin, quarter_turns,
    },
    options::PlotOptions,
};

const FONT: &str = "sans-serif";
/// ggplot panel background
const PANEL: RGBColor = RGBColor(229, 229, 229);
const LEGEND_BORDER: RGBColor = RGBColor(204, 204, 204);
const TICK_FONT_SIZE: i32 = 12;
const TICK_LINE_HEIGHT: i32 = 14;
const LABEL_FONT_SIZE: i32 = 14;
const VALUE_FONT_SIZE: i32 = 10;
const ERROR_CAP_WIDTH: u32 = 8;
const LEGEND_MARGIN: i32 = 8;
const Y_LABELS: usize = 6;

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn font_transform(degrees: f64) -> FontTransform {
    match quarter_turns(degrees) {
        1 => FontTransform::Rotate270,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate90,
        _ => FontTransform::None,
    }
}

/// Draws `layout` as a grouped bar chart with error bars into an SVG file
pub fn draw_bar_chart(
    path: &Path,
    layout: &BarLayout,
    options: &PlotOptions,
    palette: &Palette,
    locale: &NumberLocale,
) -> Result<()> {
    let root = SVGBackend::new(path, options.pixel_size()).into_drawing_area();
    root.fill(&WHITE)?;

    let tick_lines = layout.tick_lines() as i32;
    let x_desc_height = if options.x_label.is_empty() {
        0
    } else {
        LABEL_FONT_SIZE + 6
    };
    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(10)
        .x_label_area_size(8 + tick_lines * TICK_LINE_HEIGHT + x_desc_height)
        .y_label_area_size(70);
    if let Some(title) = &options.title {
        builder.caption(title, (FONT, 18).into_font());
    }
    let mut chart = builder.build_cartesian_2d(layout.x_range.clone(), layout.y_range.clone())?;
    let y_decimals = axis_decimals(&layout.y_range, Y_LABELS);

    chart.plotting_area().fill(&PANEL)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(WHITE)
        .light_line_style(WHITE.mix(0.5))
        .x_labels(1)
        .x_label_formatter(&|_| String::new())
        .y_labels(Y_LABELS)
        .y_label_formatter(&|y| locale.format(*y, y_decimals))
        .y_label_style((FONT, TICK_FONT_SIZE).into_font())
        .y_desc(options.y_label.as_str())
        .axis_desc_style((FONT, LABEL_FONT_SIZE).into_font())
        .draw()?;

    for index in 0..layout.series.len() {
        let color = rgb(palette.color(index));
        chart.draw_series(
            layout
                .bars
                .iter()
                .filter(|bar| bar.series == index)
                .map(|bar| {
                    Rectangle::new([(bar.left(), 0.0), (bar.right(), bar.height)], color.filled())
                }),
        )?;
    }

    chart.draw_series(layout.bars.iter().map(|bar| {
        ErrorBar::new_vertical(
            bar.x,
            bar.height - bar.error,
            bar.height,
            bar.height + bar.error,
            BLACK.stroke_width(1),
            ERROR_CAP_WIDTH,
        )
    }))?;

    let value_style = TextStyle::from(
        (FONT, VALUE_FONT_SIZE)
            .into_font()
            .transform(font_transform(options.number_rotation)),
    )
    .pos(Pos::new(HPos::Left, VPos::Center));
    for bar in &layout.bars {
        chart.plotting_area().draw(&Text::new(
            bar.label.clone(),
            bar.label_anchor(options.number_y_offset),
            value_style.clone(),
        ))?;
    }

    let (x_pixels, y_pixels) = chart.plotting_area().get_pixel_range();
    let tick_style =
        TextStyle::from((FONT, TICK_FONT_SIZE).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for tick in &layout.ticks {
        let (x, _) = chart.plotting_area().map_coordinate(&(tick.x, layout.y_range.start));
        for (line_index, line) in tick.lines.iter().enumerate() {
            root.draw(&Text::new(
                line.as_str(),
                (x, y_pixels.end + 6 + line_index as i32 * TICK_LINE_HEIGHT),
                tick_style.clone(),
            ))?;
        }
    }
    if !options.x_label.is_empty() {
        root.draw(&Text::new(
            options.x_label.as_str(),
            (
                (x_pixels.start + x_pixels.end) / 2,
                y_pixels.end + 8 + tick_lines * TICK_LINE_HEIGHT,
            ),
            TextStyle::from((FONT, LABEL_FONT_SIZE).into_font())
                .pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;
    }

    if options.legend {
        let geometry = legend_geometry(&layout.series, options.legend_ncol);
        let origin = legend_origin(
            options.legend_location,
            options.legend_bounding_box,
            (x_pixels, y_pixels),
            (geometry.width, geometry.height),
            LEGEND_MARGIN,
        );
        draw_legend(&root, origin, &layout.series, options.legend_ncol, palette)?;
    }

    root.present()?;
    Ok(())
}

/// Draws a framed legend with its top left corner at `origin`
pub fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    origin: (i32, i32),
    labels: &[String],
    ncol: usize,
    palette: &Palette,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let geometry = legend_geometry(labels, ncol);
    let (x, y) = origin;
    area.draw(&Rectangle::new(
        [(x, y), (x + geometry.width, y + geometry.height)],
        WHITE.mix(0.9).filled(),
    ))?;
    area.draw(&Rectangle::new(
        [(x, y), (x + geometry.width, y + geometry.height)],
        LEGEND_BORDER.stroke_width(1),
    ))?;

    let label_style =
        TextStyle::from((FONT, LEGEND_FONT_SIZE).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    for (index, (label, (dx, dy))) in labels.iter().zip(geometry.entries).enumerate() {
        let center_y = y + dy + LEGEND_ROW_HEIGHT / 2;
        area.draw(&Rectangle::new(
            [
                (x + dx, center_y - LEGEND_SWATCH / 2),
                (x + dx + LEGEND_SWATCH, center_y + LEGEND_SWATCH / 2),
            ],
            rgb(palette.color(index)).filled(),
        ))?;
        area.draw(&Text::new(
            label.as_str(),
            (x + dx + LEGEND_SWATCH + LEGEND_PADDING, center_y),
            label_style.clone(),
        ))?;
    }
    Ok(())
}

/// Writes a legend on its own, sized to fit its entries
pub fn draw_standalone_legend(
    path: &Path,
    labels: &[String],
    ncol: usize,
    palette: &Palette,
) -> Result<()> {
    let geometry = legend_geometry(labels, ncol);
    let size = (
        (geometry.width + 2 * LEGEND_MARGIN) as u32,
        (geometry.height + 2 * LEGEND_MARGIN) as u32,
    );
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    draw_legend(&root, (LEGEND_MARGIN, LEGEND_MARGIN), labels, ncol, palette)?;
    root.present()?;
    Ok(())
}
