//! Static Chart Renderer
//! Draws labelled bar charts with plotters and saves them through `image`.
//!
//! Layout mirrors a matplotlib 8x5 figure at 100 dpi:
//! 1. Title centered on top
//! 2. One sky-blue bar per label, in the order given
//! 3. Axis descriptions under the x-axis and beside the y-axis

use image::RgbImage;
use log::info;
use plotters::prelude::*;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

/// Default canvas size in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 500;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Chart '{0}' has no bars to draw")]
    Empty(String),
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Failed to write chart image: {0}")]
    Image(#[from] image::ImageError),
}

/// A labelled set of values to draw as bars.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, f64)>,
    pub width: u32,
    pub height: u32,
}

impl BarChart {
    pub fn new<I, L>(title: &str, x_label: &str, y_label: &str, bars: I) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
        L: Into<String>,
    {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            bars: bars.into_iter().map(|(l, v)| (l.into(), v)).collect(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `chart` and write it to `path`; the image format follows the
    /// file extension.
    pub fn render_bar_chart(chart: &BarChart, path: &Path) -> Result<(), ChartError> {
        if chart.bars.is_empty() {
            return Err(ChartError::Empty(chart.title.clone()));
        }

        let mut img = RgbImage::new(chart.width, chart.height);
        Self::draw_bars(chart, &mut img)?;
        img.save(path)?;

        info!("Saved chart '{}' to {}", chart.title, path.display());
        Ok(())
    }

    fn draw_bars(chart: &BarChart, buffer: &mut [u8]) -> Result<(), ChartError> {
        let root =
            BitMapBackend::with_buffer(buffer, (chart.width, chart.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let labels: Vec<&str> = chart.bars.iter().map(|(l, _)| l.as_str()).collect();
        let (y_min, y_max) = Self::get_y_range(&chart.bars);

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 22).into_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d((0..chart.bars.len()).into_segmented(), y_min..y_max)
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(chart.bars.len())
            .x_label_formatter(&|v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) => {
                    labels.get(*i).map(|s| s.to_string()).unwrap_or_default()
                }
                _ => String::new(),
            })
            .x_desc(chart.x_label.clone())
            .y_desc(chart.y_label.clone())
            .draw()
            .map_err(draw_err)?;

        ctx.draw_series(
            Histogram::vertical(&ctx)
                .style(SKY_BLUE.filled())
                .margin(12)
                .data(
                    chart
                        .bars
                        .iter()
                        .enumerate()
                        .map(|(i, (_, v))| (i, Self::bar_height(*v))),
                ),
        )
        .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Value axis bounds: always includes zero, padded 10% past the extremes.
    fn get_y_range(bars: &[(String, f64)]) -> (f64, f64) {
        let mut min = 0.0f64;
        let mut max = 0.0f64;
        for &(_, v) in bars {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min == 0.0 && max == 0.0 {
            return (0.0, 1.0);
        }
        (min * 1.1, max * 1.1)
    }

    fn bar_height(value: f64) -> f64 {
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

fn draw_err<E: Display>(err: E) -> ChartError {
    ChartError::Draw(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chart_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let chart = BarChart::new("Nothing", "x", "y", Vec::<(String, f64)>::new());

        let err = StaticChartRenderer::render_bar_chart(&chart, &path).unwrap_err();
        assert!(matches!(err, ChartError::Empty(_)));
        assert!(!path.exists());
    }

    #[test]
    fn y_range_includes_zero_and_pads_max() {
        let bars = vec![("a".to_string(), 100.0), ("b".to_string(), 50.0)];
        let (lo, hi) = StaticChartRenderer::get_y_range(&bars);
        assert_eq!(lo, 0.0);
        assert!((hi - 110.0).abs() < 1e-9);
    }

    #[test]
    fn y_range_ignores_non_finite_values() {
        let bars = vec![("a".to_string(), f64::NAN), ("b".to_string(), 0.0)];
        assert_eq!(StaticChartRenderer::get_y_range(&bars), (0.0, 1.0));
        assert_eq!(StaticChartRenderer::bar_height(f64::NAN), 0.0);
    }

    #[test]
    fn bars_keep_input_order() {
        let chart = BarChart::new(
            "Order",
            "Category",
            "Value",
            vec![("Overweight", 1.0), ("Normal", 2.0), ("Obese", 3.0)],
        );

        let labels: Vec<&str> = chart.bars.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Overweight", "Normal", "Obese"]);
    }

    #[test]
    fn renders_png_at_default_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.png");
        let chart = BarChart::new(
            "Average Healthcare Charges by Region",
            "Region",
            "Average Charges ($)",
            vec![("northeast", 13406.38), ("southeast", 14735.41), ("southwest", 12346.94)],
        );

        StaticChartRenderer::render_bar_chart(&chart, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert!(img.pixels().any(|p| p.0 == [135, 206, 235]));
    }

    #[test]
    fn unwritable_path_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("chart.png");
        let chart = BarChart::new("Denied", "Insurance Type", "Percent", vec![("Commercial", 30.0)]);

        let err = StaticChartRenderer::render_bar_chart(&chart, &path).unwrap_err();
        assert!(matches!(err, ChartError::Image(_)));
    }
}
