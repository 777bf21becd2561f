//! Chart geometry in data and pixel units, independent of the drawing backend

use std::{collections::HashMap, ops::Range};

use common::{
    config::{BenchmarkDefinition, RunParams},
    util::NumberLocale,
};
use jmh::{JmhError, RunKey, RunValue, resolve_configs};

use crate::options::{LegendLocation, PlotOptions};

pub const BAR_WIDTH: f64 = 0.8;
/// Room left above the tallest bar for its value label
const HEADROOM: f64 = 1.25;

pub const LEGEND_FONT_SIZE: i32 = 12;
pub const LEGEND_SWATCH: i32 = 12;
pub const LEGEND_ROW_HEIGHT: i32 = 18;
pub const LEGEND_PADDING: i32 = 6;
const LEGEND_COLUMN_GAP: i32 = 12;
const LEGEND_LABEL_GAP: i32 = 6;

/// Centres of the bars of the `index`-th configuration, one per parameter set
///
/// Groups hold one bar per configuration and are separated by one empty slot.
pub fn bar_positions(params: usize, configs: usize, index: usize) -> Vec<f64> {
    (0..params)
        .map(|group| (group * (configs + 1) + 1 + index) as f64)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub height: f64,
    pub error: f64,
    /// Index of the configuration, selects the colour
    pub series: usize,
    pub label: String,
}

impl Bar {
    pub fn left(&self) -> f64 {
        self.x - BAR_WIDTH / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + BAR_WIDTH / 2.0
    }

    /// Where the value label starts, two thirds into the bar
    pub fn label_anchor(&self, y_offset: f64) -> (f64, f64) {
        (self.left() + BAR_WIDTH * 2.0 / 3.0, self.height + y_offset)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub x: f64,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    /// Configuration labels, in legend order
    pub series: Vec<String>,
    pub bars: Vec<Bar>,
    pub ticks: Vec<Tick>,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
}

impl BarLayout {
    /// Lays out one bar per (configuration, parameter set)
    ///
    /// Fails with [`JmhError::MissingRun`] when `runs` lacks a requested combination.
    pub fn new(
        benchmark_name: &str,
        benchmark: &BenchmarkDefinition,
        configs: &[String],
        params: &[RunParams],
        runs: &HashMap<RunKey, RunValue>,
        options: &PlotOptions,
        locale: &NumberLocale,
    ) -> Result<Self, JmhError> {
        let config_files = resolve_configs(benchmark_name, benchmark, configs)?;

        let mut bars = Vec::with_capacity(configs.len() * params.len());
        for (index, (config, config_file)) in configs.iter().zip(config_files).enumerate() {
            let positions = bar_positions(params.len(), configs.len(), index);
            for (x, run_params) in positions.into_iter().zip(params) {
                let run = runs
                    .get(&RunKey::new(config_file, *run_params))
                    .ok_or_else(|| JmhError::MissingRun {
                        config: config.clone(),
                        params: *run_params,
                    })?;
                bars.push(Bar {
                    x,
                    height: run.score,
                    error: run.error,
                    series: index,
                    label: locale.format(run.score, options.number_decimals),
                });
            }
        }

        let group_width = configs.len() + 1;
        let ticks = (0..params.len())
            .map(|group| Tick {
                x: (group * group_width + 1) as f64 + (configs.len() as f64 - 1.0) / 2.0,
                lines: options
                    .x_tick_labels
                    .get(group)
                    .map(|label| label.lines().map(str::to_owned).collect())
                    .unwrap_or_default(),
            })
            .collect();

        let top = bars
            .iter()
            .map(|bar| (bar.height + bar.error).max(bar.height + options.number_y_offset))
            .fold(f64::NEG_INFINITY, f64::max);
        let top = if top.is_finite() && top > 0.0 {
            top * HEADROOM
        } else {
            1.0
        };
        let bottom = bars
            .iter()
            .map(|bar| bar.height - bar.error)
            .fold(0.0, f64::min);

        Ok(Self {
            series: configs.to_vec(),
            bars,
            ticks,
            x_range: 0.0..(params.len() * group_width) as f64,
            y_range: bottom..top,
        })
    }

    /// Most lines used by a single tick label
    pub fn tick_lines(&self) -> usize {
        self.ticks
            .iter()
            .map(|tick| tick.lines.len())
            .max()
            .unwrap_or(0)
    }
}

/// Approximate width of `text` in pixels
pub fn text_width(text: &str, font_size: i32) -> i32 {
    (text.chars().count() as f64 * font_size as f64 * 0.6).ceil() as i32
}

/// Size of a legend box and the offset of each entry inside it
#[derive(Debug, Clone, PartialEq)]
pub struct LegendGeometry {
    pub width: i32,
    pub height: i32,
    pub entries: Vec<(i32, i32)>,
}

/// Lays out legend entries column by column in `ncol` columns
///
/// The first `len % ncol` columns hold one entry more than the others.
pub fn legend_geometry(labels: &[String], ncol: usize) -> LegendGeometry {
    let ncol = ncol.clamp(1, labels.len().max(1));
    let rows = labels.len().div_ceil(ncol);
    let (short_rows, longer) = (labels.len() / ncol, labels.len() % ncol);
    let column_width = LEGEND_SWATCH
        + LEGEND_LABEL_GAP
        + labels
            .iter()
            .map(|label| text_width(label, LEGEND_FONT_SIZE))
            .max()
            .unwrap_or(0);

    let entries = (0..labels.len())
        .map(|i| {
            let (col, row) = legend_cell(i, short_rows, longer);
            let (col, row) = (col as i32, row as i32);
            (
                LEGEND_PADDING + col * (column_width + LEGEND_COLUMN_GAP),
                LEGEND_PADDING + row * LEGEND_ROW_HEIGHT,
            )
        })
        .collect();

    let ncol = ncol as i32;
    LegendGeometry {
        width: 2 * LEGEND_PADDING + ncol * column_width + (ncol - 1) * LEGEND_COLUMN_GAP,
        height: 2 * LEGEND_PADDING + rows as i32 * LEGEND_ROW_HEIGHT,
        entries,
    }
}

/// Column and row of the `index`-th entry when `longer` leading columns hold
/// `short_rows + 1` entries and the rest `short_rows`
fn legend_cell(index: usize, short_rows: usize, longer: usize) -> (usize, usize) {
    let long_entries = longer * (short_rows + 1);
    if index < long_entries {
        (index / (short_rows + 1), index % (short_rows + 1))
    } else {
        let rest = index - long_entries;
        (longer + rest / short_rows, rest % short_rows)
    }
}

/// Top left pixel of a legend of `size` placed in the plot `area`
///
/// Without a bounding box the legend sits inside the area, `margin` pixels from
/// the edges named by `location`. With one, the point named by `location` on the
/// legend is put on the anchor, given as area fractions from the bottom left.
pub fn legend_origin(
    location: LegendLocation,
    bounding_box: Option<[f64; 2]>,
    area: (Range<i32>, Range<i32>),
    size: (i32, i32),
    margin: i32,
) -> (i32, i32) {
    let (fx, fy) = location.fractions();
    let (x_range, y_range) = area;
    let (width, height) = size;
    match bounding_box {
        None => {
            let free_x = (x_range.end - x_range.start - 2 * margin - width) as f64;
            let free_y = (y_range.end - y_range.start - 2 * margin - height) as f64;
            (
                x_range.start + margin + (fx * free_x).round() as i32,
                y_range.start + margin + (fy * free_y).round() as i32,
            )
        }
        Some([bx, by]) => {
            let anchor_x = x_range.start as f64 + bx * (x_range.end - x_range.start) as f64;
            let anchor_y = y_range.end as f64 - by * (y_range.end - y_range.start) as f64;
            (
                (anchor_x - fx * width as f64).round() as i32,
                (anchor_y - fy * height as f64).round() as i32,
            )
        }
    }
}

/// Decimals needed to tell apart the ticks of an axis over `range` with at most
/// `labels` labels
///
/// Tick steps are never finer than `len / labels`, so its leading digit decides.
pub fn axis_decimals(range: &Range<f64>, labels: usize) -> usize {
    let step = (range.end - range.start) / labels.max(1) as f64;
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    (-step.log10()).ceil().max(0.0) as usize
}

/// Counter-clockwise quarter turns closest to `degrees`, in `0..4`
pub fn quarter_turns(degrees: f64) -> u8 {
    ((degrees / 90.0).round() as i64).rem_euclid(4) as u8
}
