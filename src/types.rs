//! Record, result, and plot-option types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::schema::CHANNEL_COUNT;

/// One data line of the log: a wall-clock stamp plus the 17 numeric channels
/// in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub hst: NaiveDateTime,
    pub channels: [f64; CHANNEL_COUNT],
}

impl LogRecord {
    /// Raw reading of the channel at the given schema index (0 = `b3_pll`).
    pub fn channel(&self, index: usize) -> f64 {
        self.channels[index]
    }
}

/// Binned observation-time counts returned by the histogram operations.
///
/// `edges` has one more entry than `counts`; bucket `i` spans
/// `edges[i] .. edges[i + 1]`, with the final bucket closed on the right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramResult {
    pub counts: Vec<u64>,
    pub edges: Vec<NaiveDateTime>,
}

impl HistogramResult {
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total records across all buckets.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Appearance of the rendered figures.
///
/// Easily loadable from JSON while keeping complexity minimal.
///
/// # Example
///
/// ```rust
/// use namakanui_templog::PlotOptions;
///
/// // Create default options
/// let options = PlotOptions::default();
/// assert!(options.reference_line);
///
/// // Load from JSON; omitted fields keep their defaults
/// let json = r#"{
///     "width": 1024,
///     "caption": "b6 PLL, last night"
/// }"#;
/// let options: PlotOptions = serde_json::from_str(json).unwrap();
/// assert_eq!(options.height, 600);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotOptions {
    /// Canvas width in pixels.
    #[serde(default = "PlotOptions::default_width")]
    pub width: u32,

    /// Canvas height in pixels.
    #[serde(default = "PlotOptions::default_height")]
    pub height: u32,

    /// Scatter marker radius in pixels.
    #[serde(default = "PlotOptions::default_point_size")]
    pub point_size: u32,

    /// Optional figure caption.
    #[serde(default)]
    pub caption: Option<String>,

    /// Draw the red PLL lock-alarm reference line on scatter figures.
    #[serde(default = "PlotOptions::default_reference_line")]
    pub reference_line: bool,
}

impl PlotOptions {
    const fn default_width() -> u32 {
        800
    }

    const fn default_height() -> u32 {
        600
    }

    const fn default_point_size() -> u32 {
        2
    }

    const fn default_reference_line() -> bool {
        true
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_point_size(mut self, point_size: u32) -> Self {
        self.point_size = point_size;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn without_reference_line(mut self) -> Self {
        self.reference_line = false;
        self
    }

    /// Canvas dimensions as the (width, height) pair plotting backends take.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            point_size: Self::default_point_size(),
            caption: None,
            reference_line: Self::default_reference_line(),
        }
    }
}
