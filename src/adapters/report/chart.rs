//! Chart rendering for reports.
//!
//! Draws the price path as a Typst path figure with entry/exit markers
//! overlaid, and the running price-path drawdown as a second figure.

use crate::domain::signal::SignaledRow;

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 200.0;
const PADDING: f64 = 40.0;

struct Scale {
    min: f64,
    scale_x: f64,
    scale_y: f64,
}

fn scale_for(values: &[f64]) -> Scale {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max - min;
    Scale {
        min,
        scale_x: if values.len() > 1 {
            plot_width / (values.len() - 1) as f64
        } else {
            0.0
        },
        scale_y: if range > 0.0 { plot_height / range } else { 1.0 },
    }
}

fn point(i: usize, value: f64, scale: &Scale) -> (f64, f64) {
    let x = PADDING + i as f64 * scale.scale_x;
    let y = HEIGHT - PADDING - (value - scale.min) * scale.scale_y;
    (x, y)
}

fn figure(polyline: &str, markers: &str, stroke: &str, caption: &str) -> String {
    let plot_height = HEIGHT - 2.0 * PADDING;
    let plot_width = WIDTH - 2.0 * PADDING;
    format!(
        r#"#figure(
  box(
    width: {WIDTH:.0}pt,
    height: {HEIGHT:.0}pt,
    fill: white,
    {{
      move(dx: {PADDING:.0}pt, dy: {PADDING:.0}pt, line(length: {plot_height:.0}pt, start: (0, 0), end: (0, {plot_height:.0}pt)))
      move(dx: {PADDING:.0}pt, dy: {axis_y:.0}pt, line(length: {plot_width:.0}pt, start: (0, 0), end: ({plot_width:.0}pt, 0)))
      move(dx: {PADDING:.0}pt, dy: {PADDING:.0}pt, path(
        fill: none,
        stroke: {stroke} + 1pt,
        ({polyline})
      ))
{markers}    }}
  ),
  caption: [{caption}]
)
"#,
        axis_y = HEIGHT - PADDING,
    )
}

/// Price path with entry markers in green and exit markers in red, the
/// chart the dashboard draws as a line plus buy/sell scatter.
pub fn format_price_chart(rows: &[SignaledRow]) -> String {
    if rows.is_empty() {
        return "_No price data._\n".to_string();
    }

    let prices: Vec<f64> = rows.iter().map(|r| r.price()).collect();
    let scale = scale_for(&prices);

    let polyline = prices
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let (x, y) = point(i, p, &scale);
            format!("({:.1}pt, {:.1}pt)", x - PADDING, y - PADDING)
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut markers = String::new();
    for (i, row) in rows.iter().enumerate() {
        let fill = if row.entry {
            "green"
        } else if row.exit {
            "red"
        } else {
            continue;
        };
        let (x, y) = point(i, row.price(), &scale);
        markers.push_str(&format!(
            "      move(dx: {:.1}pt, dy: {:.1}pt, circle(radius: 2pt, fill: {fill}, stroke: none))\n",
            x - 2.0,
            y - 2.0,
        ));
    }

    figure(&polyline, &markers, "blue", "Price with entry/exit markers")
}

/// Running decline from the price's running maximum, percent below peak.
pub fn format_drawdown_chart(rows: &[SignaledRow]) -> String {
    if rows.is_empty() {
        return "_No drawdown data._\n".to_string();
    }

    let mut peak = f64::NEG_INFINITY;
    let drawdowns: Vec<f64> = rows
        .iter()
        .map(|r| {
            let price = r.price();
            if price > peak {
                peak = price;
            }
            if peak > 0.0 {
                -(peak - price) / peak * 100.0
            } else {
                0.0
            }
        })
        .collect();

    let scale = scale_for(&drawdowns);
    let polyline = drawdowns
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let (x, y) = point(i, d, &scale);
            format!("({:.1}pt, {:.1}pt)", x - PADDING, y - PADDING)
        })
        .collect::<Vec<_>>()
        .join(", ");

    figure(&polyline, "", "red", "Price-path drawdown (%)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::IndicatorRow;
    use crate::domain::scoring::{ScoredRow, Strength};
    use chrono::NaiveDate;

    fn row(month: u32, price: f64, entry: bool, exit: bool) -> SignaledRow {
        SignaledRow {
            scored: ScoredRow {
                row: IndicatorRow {
                    period: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
                    price,
                    confidence: None,
                    confidence_change: None,
                    pmi: None,
                    claims: None,
                    claims_yoy: None,
                    yield_curve: None,
                },
                score: 0,
                strength: Strength::None,
            },
            entry,
            exit,
        }
    }

    #[test]
    fn empty_rows() {
        assert_eq!(format_price_chart(&[]), "_No price data._\n");
        assert_eq!(format_drawdown_chart(&[]), "_No drawdown data._\n");
    }

    #[test]
    fn price_chart_has_figure_and_path() {
        let rows = vec![row(1, 100.0, false, false), row(2, 110.0, false, false)];
        let out = format_price_chart(&rows);
        assert!(out.contains("#figure"));
        assert!(out.contains("path"));
        assert!(out.contains("entry/exit markers"));
    }

    #[test]
    fn markers_follow_flags() {
        let rows = vec![
            row(1, 100.0, true, false),
            row(2, 110.0, false, false),
            row(3, 105.0, false, true),
        ];
        let out = format_price_chart(&rows);
        assert!(out.contains("fill: green"));
        assert!(out.contains("fill: red"));
    }

    #[test]
    fn no_markers_without_flags() {
        let rows = vec![row(1, 100.0, false, false), row(2, 110.0, false, false)];
        let out = format_price_chart(&rows);
        assert!(!out.contains("circle"));
    }

    #[test]
    fn drawdown_chart_renders() {
        let rows = vec![
            row(1, 100.0, false, false),
            row(2, 80.0, false, false),
            row(3, 90.0, false, false),
        ];
        let out = format_drawdown_chart(&rows);
        assert!(out.contains("#figure"));
        assert!(out.contains("drawdown"));
    }

    #[test]
    fn single_point_does_not_panic() {
        let rows = vec![row(1, 100.0, true, false)];
        assert!(format_price_chart(&rows).contains("#figure"));
        assert!(format_drawdown_chart(&rows).contains("#figure"));
    }
}
