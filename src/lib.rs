//! Temperature-log analysis for the Namakanui multi-band receiver.
//!
//! Loads the instrument's fixed-format temperature log once, answers
//! time-window queries against the per-band PLL sensors, and renders scatter
//! plots and observation-time histograms through an injected renderer.
//!
//! ```rust,no_run
//! use namakanui_templog::{LogReader, SvgRenderer, PlotOptions, parse_timestamp};
//!
//! let log = LogReader::open("namakanui_temp.log")?;
//! let start = parse_timestamp("2019-10-11T06:10:00")?;
//! let end = parse_timestamp("2019-10-11T20:20:00")?;
//!
//! let mut figure = SvgRenderer::new("b6_pll.svg", PlotOptions::default());
//! let (min_c, max_c) = log.pll_temperature_range("b6_pll", start, end, Some(&mut figure))?;
//! figure.save()?;
//! println!("b6 PLL stayed within {min_c:.2} .. {max_c:.2} °C");
//! # Ok::<(), namakanui_templog::TempLogError>(())
//! ```

pub mod error;
pub mod reader;
pub mod render;
pub mod schema;
pub mod types;

pub use error::{Result, TempLogError};

pub use reader::{DEFAULT_HIST_BINS, LogReader, TIMESTAMP_FORMAT, parse_timestamp};

pub use render::{BitmapRenderer, NullRenderer, Renderer, ScatterSeries, SvgRenderer};

pub use schema::{
    CHANNEL_COUNT, COLUMN_COUNT, COLUMNS, ChannelKind, Column, DEFAULT_SENSOR, KELVIN_OFFSET,
    PLL_ALARM_KELVIN, PllSensor, Unit,
};

pub use types::{HistogramResult, LogRecord, PlotOptions};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{LogReader, Result, TempLogError, parse_timestamp};

    pub use crate::{NullRenderer, PlotOptions, Renderer, SvgRenderer};

    pub use crate::{DEFAULT_SENSOR, PllSensor};

    pub use crate::{HistogramResult, LogRecord};

    pub use chrono::NaiveDateTime;
}
