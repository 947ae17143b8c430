//! Static Chart Renderer
//! Draws a query result as a line chart, one series per country.
//!
//! Layout:
//! 1. Title centered on top
//! 2. Mesh with "Year" on the x axis and "GDP Per Capita" on the y axis
//! 3. One coloured line per country, legend in the upper left corner

use crate::query::QueryResult;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "GDP Per Capita over Time";
pub const X_LABEL: &str = "Year";
pub const Y_LABEL: &str = "GDP Per Capita";

/// Series colours, cycled in country order.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),  // Blue
    RGBColor(231, 76, 60),   // Red
    RGBColor(46, 204, 113),  // Green
    RGBColor(155, 89, 182),  // Purple
    RGBColor(243, 156, 18),  // Orange
    RGBColor(26, 188, 156),  // Teal
    RGBColor(233, 30, 99),   // Pink
    RGBColor(0, 188, 212),   // Cyan
    RGBColor(121, 85, 72),   // Brown
    RGBColor(96, 125, 139),  // Blue Grey
];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

/// Output image format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ImageFormat::Svg,
            _ => ImageFormat::Png,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Axis ranges for a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub x: (i32, i32),
    pub y: (f64, f64),
}

impl ChartBounds {
    /// Years: the requested range clamped to the years present, or the
    /// requested range itself when nothing matched. Values: zero up to the
    /// maximum plus 5% headroom.
    pub fn for_result(result: &QueryResult) -> Self {
        let range = result.range;
        let (mut low, mut high) = match result.year_span() {
            Some((min, max)) => (range.low.max(min), range.high.min(max)),
            None => (range.low.min(range.high), range.low.max(range.high)),
        };
        if low >= high {
            low = low.saturating_sub(1);
            high = high.saturating_add(1);
        }

        let y_max = match result.max_value() {
            Some(max) if max > 0 => max as f64 * 1.05,
            _ => 1.0,
        };

        Self {
            x: (low, high),
            y: (0.0, y_max),
        }
    }
}

pub fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the result to `path` as PNG or SVG depending on the extension.
    pub fn render_to_file(
        result: &QueryResult,
        options: &ChartOptions,
        path: &Path,
    ) -> Result<(), RenderError> {
        let size = (options.width, options.height);
        let format = ImageFormat::from_path(path);

        match format {
            ImageFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                Self::draw(&root, result, options)?;
            }
            ImageFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                Self::draw(&root, result, options)?;
            }
        }

        tracing::info!(
            path = %path.display(),
            format = ?format,
            series = result.series_by_country().len(),
            "Rendered chart"
        );
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        result: &QueryResult,
        options: &ChartOptions,
    ) -> Result<(), RenderError> {
        let draw_err = |e: DrawingAreaErrorKind<DB::ErrorType>| RenderError::Draw(e.to_string());

        root.fill(&WHITE).map_err(draw_err)?;

        let bounds = ChartBounds::for_result(result);
        let mut chart = ChartBuilder::on(root)
            .caption(&options.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(bounds.x.0..bounds.x.1, bounds.y.0..bounds.y.1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .x_label_formatter(&|year| year.to_string())
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(draw_err)?;

        let series = result.series_by_country();
        for (idx, (country, points)) in series.iter().enumerate() {
            let color = series_color(idx);
            chart
                .draw_series(LineSeries::new(
                    points.iter().map(|&(year, value)| (year, value as f64)),
                    color.stroke_width(2),
                ))
                .map_err(draw_err)?
                .label(*country)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        if !series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }
}
