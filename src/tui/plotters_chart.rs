//! Plotters-powered series chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call (see
/// `SeriesChartData`), which keeps `render()` focused on drawing.
pub struct SeriesPlottersChart<'a> {
    /// Runs of consecutive known values; each run is drawn as one line.
    pub segments: &'a [Vec<(f64, f64)>],
    /// Every known observation.
    pub points: &'a [(f64, f64)],
    /// X bounds (years).
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl Widget for SeriesPlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            for segment in self.segments {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &line_color))?;
            }

            // `Circle` radii are mis-scaled by the backend; a `Pixel` gives a clean dot.
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Precomputed series, split at unknown values, with padded bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesChartData {
    pub segments: Vec<Vec<(f64, f64)>>,
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl SeriesChartData {
    /// `None` when the series has no known value.
    pub fn from_series(series: &[(i32, Option<f64>)]) -> Option<Self> {
        let mut segments = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        let mut points = Vec::new();

        for (year, value) in series {
            match value.filter(|v| v.is_finite()) {
                Some(v) => {
                    let p = (f64::from(*year), v);
                    current.push(p);
                    points.push(p);
                }
                None => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        if points.is_empty() {
            return None;
        }

        let bounds = |values: &mut dyn Iterator<Item = f64>, pad_frac: f64| {
            let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
            let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
            let pad = (hi - lo) * pad_frac;
            [lo - pad, hi + pad]
        };
        let x_bounds = bounds(&mut points.iter().map(|p| p.0), 0.0);
        let y_bounds = bounds(&mut points.iter().map(|p| p.1), 0.05);

        Some(Self {
            segments,
            points,
            x_bounds,
            y_bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_unknown_values() {
        let series = vec![
            (1995, Some(1.0)),
            (1996, Some(2.0)),
            (1997, None),
            (1998, Some(4.0)),
            (1999, Some(f64::NAN)),
        ];
        let data = SeriesChartData::from_series(&series).unwrap();
        assert_eq!(data.segments.len(), 2);
        assert_eq!(data.segments[0], vec![(1995.0, 1.0), (1996.0, 2.0)]);
        assert_eq!(data.points.len(), 3);
        assert_eq!(data.x_bounds, [1995.0, 1998.0]);
        assert!((data.y_bounds[0] - 0.85).abs() < 1e-12);
        assert!((data.y_bounds[1] - 4.15).abs() < 1e-12);
    }

    #[test]
    fn no_known_values() {
        assert!(SeriesChartData::from_series(&[(2000, None)]).is_none());
        let single = SeriesChartData::from_series(&[(2000, Some(3.0))]).unwrap();
        assert_eq!(single.x_bounds, [1999.5, 2000.5]);
    }
}
