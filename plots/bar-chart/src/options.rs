use jmh::{LoadOptions, MetricMode};
use serde::{Deserialize, Serialize};

/// Corner or edge of the plot area a legend is attached to
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendLocation {
    /// Resolves to `upper right`
    #[default]
    Best,
    #[serde(rename = "upper right")]
    UpperRight,
    #[serde(rename = "upper left")]
    UpperLeft,
    #[serde(rename = "lower left")]
    LowerLeft,
    #[serde(rename = "lower right")]
    LowerRight,
    Right,
    #[serde(rename = "center left")]
    CenterLeft,
    #[serde(rename = "center right")]
    CenterRight,
    #[serde(rename = "lower center")]
    LowerCenter,
    #[serde(rename = "upper center")]
    UpperCenter,
    Center,
}

impl LegendLocation {
    /// Fractions of the anchor box, `(0, 0)` being top left, that the legend is aligned to
    pub fn fractions(&self) -> (f64, f64) {
        match self {
            Self::Best | Self::UpperRight => (1.0, 0.0),
            Self::UpperLeft => (0.0, 0.0),
            Self::LowerLeft => (0.0, 1.0),
            Self::LowerRight => (1.0, 1.0),
            Self::Right | Self::CenterRight => (1.0, 0.5),
            Self::CenterLeft => (0.0, 0.5),
            Self::LowerCenter => (0.5, 1.0),
            Self::UpperCenter => (0.5, 0.0),
            Self::Center => (0.5, 0.5),
        }
    }
}

fn default_y_label() -> String {
    "Operations / sec".to_owned()
}

fn default_confidence() -> f64 {
    0.95
}

fn default_scale() -> f64 {
    1000.0
}

fn default_figure_size() -> [f64; 2] {
    [8.0, 3.0]
}

fn default_dpi() -> f64 {
    100.0
}

fn default_rotation() -> f64 {
    75.0
}

fn default_true() -> bool {
    true
}

fn default_ncol() -> usize {
    2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub x_label: String,
    /// One label per parameter set, `\n` starts a new line
    #[serde(default)]
    pub x_tick_labels: Vec<String>,
    #[serde(default = "default_y_label")]
    pub y_label: String,

    #[serde(default = "default_confidence")]
    pub confidence_interval: f64,
    #[serde(default)]
    pub mode: MetricMode,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Width and height in inches
    #[serde(default = "default_figure_size")]
    pub figure_size: [f64; 2],
    #[serde(default = "default_dpi")]
    pub dpi: f64,

    #[serde(default)]
    pub number_decimals: usize,
    /// Counter-clockwise, in degrees
    #[serde(default = "default_rotation")]
    pub number_rotation: f64,
    /// Gap between a bar and its value label, in data units
    #[serde(default)]
    pub number_y_offset: f64,

    #[serde(default = "default_true")]
    pub legend: bool,
    #[serde(default)]
    pub legend_location: LegendLocation,
    /// Anchor point in plot area fractions, `(0, 0)` being bottom left
    #[serde(default)]
    pub legend_bounding_box: Option<[f64; 2]>,
    #[serde(default = "default_ncol")]
    pub legend_ncol: usize,

    pub filename: String,
}

impl PlotOptions {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            title: None,
            x_label: String::new(),
            x_tick_labels: Vec::new(),
            y_label: default_y_label(),
            confidence_interval: default_confidence(),
            mode: MetricMode::default(),
            scale: default_scale(),
            figure_size: default_figure_size(),
            dpi: default_dpi(),
            number_decimals: 0,
            number_rotation: default_rotation(),
            number_y_offset: 0.0,
            legend: true,
            legend_location: LegendLocation::default(),
            legend_bounding_box: None,
            legend_ncol: default_ncol(),
            filename: filename.into(),
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            mode: self.mode,
            scale: self.scale,
            confidence: self.confidence_interval,
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        let [width, height] = self.figure_size;
        (
            (width * self.dpi).round().max(1.0) as u32,
            (height * self.dpi).round().max(1.0) as u32,
        )
    }
}
