//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - known observations: `o`
//! - segments between consecutive known years: `-`
//!
//! An unknown value breaks the line; the neighbours are not joined across it.

/// Render one yearly series.
pub fn render_series_plot(title: &str, series: &[(i32, Option<f64>)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let known: Vec<(f64, f64)> = series
        .iter()
        .filter_map(|(year, v)| v.filter(|v| v.is_finite()).map(|v| (f64::from(*year), v)))
        .collect();
    if known.is_empty() {
        return format!("{title}: no known values\n");
    }

    let (x_min, x_max) = widen(range(known.iter().map(|p| p.0)));
    let (y_min, y_max) = widen(range(known.iter().map(|p| p.1)));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Segments first, so points overlay them.
    let mut prev: Option<(usize, usize)> = None;
    for (year, value) in series {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            prev = None;
            continue;
        };
        let x = map_x(f64::from(*year), x_min, x_max, width);
        let y = map_y(v, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '-');
        }
        prev = Some((x, y));
    }

    for &(t, v) in &known {
        let x = map_x(t, x_min, x_max, width);
        let y = map_y(v, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{title}: year=[{:.0}, {:.0}] | y=[{y_min:.2}, {y_max:.2}]\n",
        known.iter().map(|p| p.0).fold(f64::INFINITY, f64::min),
        known.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// A degenerate range (single year, constant series) gets unit width.
fn widen((min, max): (f64, f64)) -> (f64, f64) {
    if max > min { (min, max) } else { (min - 0.5, max + 0.5) }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let series = vec![(1995, Some(0.0)), (2000, Some(10.0))];
        let txt = render_series_plot("GROWTH", &series, 10, 5);
        let expected = concat!(
            "GROWTH: year=[1995, 2000] | y=[-0.50, 10.50]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn unknown_values_break_the_line() {
        let series = vec![(1995, Some(0.0)), (1996, None), (2000, Some(10.0))];
        let txt = render_series_plot("REM", &series, 10, 5);
        let body: String = txt.lines().skip(1).collect();
        assert_eq!(body.matches('o').count(), 2);
        assert_eq!(body.matches('-').count(), 0);
    }

    #[test]
    fn empty_and_single_point_series() {
        assert_eq!(render_series_plot("INF", &[(1995, None)], 10, 5), "INF: no known values\n");
        let txt = render_series_plot("INF", &[(1995, Some(3.0))], 10, 5);
        assert_eq!(txt.lines().count(), 6);
        assert_eq!(txt.matches('o').count(), 1);
    }
}
