//! Time-range queries: PLL temperature summaries and observation-time
//! histograms.

use chrono::{Duration, Local, NaiveDateTime};

use crate::error::{Result, TempLogError};
use crate::render::{Renderer, ScatterSeries};
use crate::schema::{KELVIN_OFFSET, PLL_ALARM_KELVIN, PllSensor};
use crate::types::{HistogramResult, LogRecord};

use super::LogReader;

/// Bin count used when the caller has no opinion.
pub const DEFAULT_HIST_BINS: usize = 12;

impl LogReader {
    /// Records with `start < hst < end`, both bounds strictly exclusive.
    ///
    /// Shared by the summary and histogram operations so the two cannot
    /// drift apart. An inverted window selects nothing.
    fn select(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> impl Iterator<Item = &LogRecord> {
        self.records()
            .iter()
            .filter(move |record| start < record.hst && record.hst < end)
    }

    /// Minimum and maximum of a PLL sensor over a time window, in Celsius.
    ///
    /// `sensor` must be one of `b3_pll`, `b6_pll`, `b7_pll`; anything else
    /// fails with [`TempLogError::UnknownSensor`] regardless of the window.
    /// The summary converts kelvin to Celsius; the rendered scatter series
    /// keeps the raw kelvin readings, with the lock-alarm reference line at
    /// 318.15 K and the x-axis pinned to `[start, end]`.
    ///
    /// A window selecting no records fails with
    /// [`TempLogError::EmptySelection`]; nothing is rendered in that case.
    ///
    /// When `renderer` is given, the series accumulates onto it; drawing and
    /// figure lifecycle stay with the caller (see [`crate::render`]).
    pub fn pll_temperature_range(
        &self,
        sensor: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        renderer: Option<&mut dyn Renderer>,
    ) -> Result<(f64, f64)> {
        let sensor: PllSensor = sensor.parse()?;
        let index = sensor.channel_index();

        let points: Vec<(NaiveDateTime, f64)> = self
            .select(start, end)
            .map(|record| (record.hst, record.channel(index)))
            .collect();

        if points.is_empty() {
            return Err(TempLogError::EmptySelection { start, end });
        }

        let mut min_k = f64::INFINITY;
        let mut max_k = f64::NEG_INFINITY;
        for &(_, value) in &points {
            min_k = min_k.min(value);
            max_k = max_k.max(value);
        }

        if let Some(renderer) = renderer {
            log::debug!("rendering {} points for {sensor}", points.len());
            renderer.scatter(&ScatterSeries {
                label: sensor.name().to_string(),
                points,
                window: (start, end),
                reference_line: Some(PLL_ALARM_KELVIN),
            })?;
        }

        Ok((min_k - KELVIN_OFFSET, max_k - KELVIN_OFFSET))
    }

    /// [`Self::pll_temperature_range`] over the last 24 hours, with the
    /// window anchored to local wall-clock time at the moment of the call.
    pub fn pll_temperature_range_1day(
        &self,
        sensor: &str,
        renderer: Option<&mut dyn Renderer>,
    ) -> Result<(f64, f64)> {
        let (start, end) = last_day_window();
        self.pll_temperature_range(sensor, start, end, renderer)
    }

    /// Observation-time histogram over a time window.
    ///
    /// Uses the same strictly exclusive selection as the summary
    /// operations, then bins the selected timestamps into `bins` equal-width
    /// buckets spanning the selected range (min to max of what matched).
    /// The final bucket is closed on the right, so the latest selected
    /// timestamp is counted.
    ///
    /// An empty selection returns all-zero counts with edges spanning the
    /// query window itself. This operation always renders.
    pub fn timestamp_histogram(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        bins: usize,
        renderer: &mut dyn Renderer,
    ) -> Result<HistogramResult> {
        if bins == 0 {
            return Err(TempLogError::InvalidBins);
        }

        let stamps: Vec<NaiveDateTime> = self.select(start, end).map(|record| record.hst).collect();

        let (lo, hi) = match (stamps.iter().min(), stamps.iter().max()) {
            (Some(&lo), Some(&hi)) if lo < hi => (lo, hi),
            // Degenerate span: widen so edges stay strictly increasing.
            (Some(&lo), Some(_)) => (lo, lo + Duration::seconds(1)),
            _ if start < end => (start, end),
            _ => (start, start + Duration::seconds(1)),
        };

        let total_ms = (hi - lo).num_milliseconds();
        let edges: Vec<NaiveDateTime> = (0..=bins)
            .map(|i| lo + Duration::milliseconds(total_ms * i as i64 / bins as i64))
            .collect();

        let mut counts = vec![0_u64; bins];
        for stamp in &stamps {
            let offset_ms = (*stamp - lo).num_milliseconds();
            let bucket = ((offset_ms * bins as i64 / total_ms) as usize).min(bins - 1);
            counts[bucket] += 1;
        }

        let result = HistogramResult { counts, edges };
        renderer.histogram(&result)?;
        Ok(result)
    }

    /// [`Self::timestamp_histogram`] over the last 24 hours.
    pub fn timestamp_histogram_1day(
        &self,
        bins: usize,
        renderer: &mut dyn Renderer,
    ) -> Result<HistogramResult> {
        let (start, end) = last_day_window();
        self.timestamp_histogram(start, end, bins, renderer)
    }
}

/// `[now - 24h, now]` in local wall-clock time. The log's stamps are HST
/// wall-clock with no zone marker, so the comparison must be against local
/// time, not UTC.
fn last_day_window() -> (NaiveDateTime, NaiveDateTime) {
    let end = Local::now().naive_local();
    (end - Duration::days(1), end)
}
