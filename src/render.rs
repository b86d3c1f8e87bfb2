//! Rendering seam for the query operations.
//!
//! The source of truth for figure lifecycle is the caller, not the library:
//! query methods emit series into an injected [`Renderer`], and the plotters
//! backends accumulate them until [`SvgRenderer::save`] /
//! [`BitmapRenderer::save`] draws everything onto one canvas. Successive
//! query calls against the same renderer therefore stack onto the same
//! figure; start a fresh renderer for a fresh figure.
//!
//! [`NullRenderer`] records series without drawing, for tests and callers
//! who only want the numbers.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use plotters::coord::types::RangedDateTime;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{Result, TempLogError};
use crate::types::{HistogramResult, PlotOptions};

/// One scatter trace: raw kelvin readings against time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    /// Legend label, the sensor's column name.
    pub label: String,
    pub points: Vec<(NaiveDateTime, f64)>,
    /// X-axis window the query was made with; the plot is pinned to it.
    pub window: (NaiveDateTime, NaiveDateTime),
    /// Horizontal alarm threshold, in the same raw unit as the points.
    pub reference_line: Option<f64>,
}

/// Sink for the plotting side effects of query operations.
pub trait Renderer {
    fn scatter(&mut self, series: &ScatterSeries) -> Result<()>;
    fn histogram(&mut self, histogram: &HistogramResult) -> Result<()>;
}

/// Renderer that draws nothing and keeps what it was given.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub scatter: Vec<ScatterSeries>,
    pub histograms: Vec<HistogramResult>,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for NullRenderer {
    fn scatter(&mut self, series: &ScatterSeries) -> Result<()> {
        self.scatter.push(series.clone());
        Ok(())
    }

    fn histogram(&mut self, histogram: &HistogramResult) -> Result<()> {
        self.histograms.push(histogram.clone());
        Ok(())
    }
}

/// Plotters-backed renderer writing an SVG file on [`Self::save`].
pub struct SvgRenderer {
    path: PathBuf,
    options: PlotOptions,
    scatter: Vec<ScatterSeries>,
    histograms: Vec<HistogramResult>,
}

impl SvgRenderer {
    pub fn new<P: AsRef<Path>>(path: P, options: PlotOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
            scatter: Vec::new(),
            histograms: Vec::new(),
        }
    }

    /// Draw every accumulated series and write the file.
    pub fn save(&self) -> Result<()> {
        let area = SVGBackend::new(&self.path, self.options.size()).into_drawing_area();
        draw_figure(&area, &self.scatter, &self.histograms, &self.options)?;
        area.present().map_err(to_render_err)
    }
}

impl Renderer for SvgRenderer {
    fn scatter(&mut self, series: &ScatterSeries) -> Result<()> {
        self.scatter.push(series.clone());
        Ok(())
    }

    fn histogram(&mut self, histogram: &HistogramResult) -> Result<()> {
        self.histograms.push(histogram.clone());
        Ok(())
    }
}

/// Plotters-backed renderer writing a PNG file on [`Self::save`].
pub struct BitmapRenderer {
    path: PathBuf,
    options: PlotOptions,
    scatter: Vec<ScatterSeries>,
    histograms: Vec<HistogramResult>,
}

impl BitmapRenderer {
    pub fn new<P: AsRef<Path>>(path: P, options: PlotOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
            scatter: Vec::new(),
            histograms: Vec::new(),
        }
    }

    /// Draw every accumulated series and write the file.
    pub fn save(&self) -> Result<()> {
        let area = BitMapBackend::new(&self.path, self.options.size()).into_drawing_area();
        draw_figure(&area, &self.scatter, &self.histograms, &self.options)?;
        area.present().map_err(to_render_err)
    }
}

impl Renderer for BitmapRenderer {
    fn scatter(&mut self, series: &ScatterSeries) -> Result<()> {
        self.scatter.push(series.clone());
        Ok(())
    }

    fn histogram(&mut self, histogram: &HistogramResult) -> Result<()> {
        self.histograms.push(histogram.clone());
        Ok(())
    }
}

fn to_render_err<E: std::fmt::Display>(err: E) -> TempLogError {
    TempLogError::Render(err.to_string())
}

fn draw_figure<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scatter: &[ScatterSeries],
    histograms: &[HistogramResult],
    options: &PlotOptions,
) -> Result<()> {
    area.fill(&WHITE).map_err(to_render_err)?;

    match (scatter.is_empty(), histograms.is_empty()) {
        (false, true) => draw_scatter(area, scatter, options),
        (true, false) => draw_histograms(area, histograms, options),
        (false, false) => {
            let halves = area.split_evenly((2, 1));
            draw_scatter(&halves[0], scatter, options)?;
            draw_histograms(&halves[1], histograms, options)
        }
        (true, true) => Ok(()),
    }
}

fn draw_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scatter: &[ScatterSeries],
    options: &PlotOptions,
) -> Result<()> {
    let x_lo = scatter.iter().map(|s| s.window.0).min();
    let x_hi = scatter.iter().map(|s| s.window.1).max();
    let (x_lo, x_hi) = match (x_lo, x_hi) {
        (Some(lo), Some(hi)) if lo < hi => (lo, hi),
        _ => return Ok(()),
    };

    let mut y_lo = f64::INFINITY;
    let mut y_hi = f64::NEG_INFINITY;
    for series in scatter {
        for &(_, value) in &series.points {
            y_lo = y_lo.min(value);
            y_hi = y_hi.max(value);
        }
        if options.reference_line {
            if let Some(value) = series.reference_line {
                y_lo = y_lo.min(value);
                y_hi = y_hi.max(value);
            }
        }
    }
    if !y_lo.is_finite() || !y_hi.is_finite() {
        return Ok(());
    }
    let pad = ((y_hi - y_lo) * 0.05).max(0.5);

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50);
    if let Some(caption) = &options.caption {
        builder.caption(caption, ("sans-serif", 20));
    }
    let mut chart = builder
        .build_cartesian_2d(RangedDateTime::from(x_lo..x_hi), (y_lo - pad)..(y_hi + pad))
        .map_err(to_render_err)?;

    chart
        .configure_mesh()
        .x_desc("HST")
        .y_desc("(K)")
        .x_labels(6)
        .x_label_formatter(&|stamp: &NaiveDateTime| stamp.format("%m-%d %H:%M").to_string())
        .draw()
        .map_err(to_render_err)?;

    for (index, series) in scatter.iter().enumerate() {
        let color = Palette99::pick(index).mix(0.9);
        chart
            .draw_series(
                series
                    .points
                    .iter()
                    .map(|&(stamp, value)| {
                        Circle::new((stamp, value), options.point_size as i32, color.filled())
                    }),
            )
            .map_err(to_render_err)?
            .label(series.label.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 3, color.filled()));
    }

    if options.reference_line {
        let mut thresholds: Vec<f64> = scatter.iter().filter_map(|s| s.reference_line).collect();
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        for value in thresholds {
            chart
                .draw_series(LineSeries::new(vec![(x_lo, value), (x_hi, value)], &RED))
                .map_err(to_render_err)?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE)
        .border_style(&BLACK)
        .draw()
        .map_err(to_render_err)
}

fn draw_histograms<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    histograms: &[HistogramResult],
    options: &PlotOptions,
) -> Result<()> {
    let x_lo = histograms.iter().filter_map(|h| h.edges.first()).min();
    let x_hi = histograms.iter().filter_map(|h| h.edges.last()).max();
    let (x_lo, x_hi) = match (x_lo, x_hi) {
        (Some(&lo), Some(&hi)) if lo < hi => (lo, hi),
        _ => return Ok(()),
    };
    let y_hi = histograms
        .iter()
        .flat_map(|h| h.counts.iter().copied())
        .max()
        .unwrap_or(0)
        + 1;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50);
    if let Some(caption) = &options.caption {
        builder.caption(caption, ("sans-serif", 20));
    }
    let mut chart = builder
        .build_cartesian_2d(RangedDateTime::from(x_lo..x_hi), 0_u64..y_hi)
        .map_err(to_render_err)?;

    chart
        .configure_mesh()
        .x_desc("HST")
        .y_desc("count")
        .x_labels(6)
        .x_label_formatter(&|stamp: &NaiveDateTime| stamp.format("%m-%d %H:%M").to_string())
        .draw()
        .map_err(to_render_err)?;

    for histogram in histograms {
        chart
            .draw_series(histogram.counts.iter().enumerate().map(|(index, &count)| {
                Rectangle::new(
                    [
                        (histogram.edges[index], 0),
                        (histogram.edges[index + 1], count),
                    ],
                    BLUE.mix(0.4).filled(),
                )
            }))
            .map_err(to_render_err)?;
    }

    Ok(())
}
