use serde::{Deserialize, Serialize};

use crate::models::PricePoint;

/// Logical canvas the path is drawn in. The renderer scales it.
pub const CANVAS_WIDTH: f64 = 200.0;
pub const CANVAS_HEIGHT: f64 = 50.0;

/// Space kept clear above the highest and below the lowest point.
const MARGIN: f64 = 5.0;

/// Point count for the placeholder trend drawn when there is no history.
const SYNTHETIC_POINTS: usize = 20;

const POSITIVE_STROKE: &str = "#137333";
const NEGATIVE_STROKE: &str = "#d93025";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Ordered points in canvas coordinates (y grows downward).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSpec {
    pub points: Vec<Point>,
}

impl PathSpec {
    /// SVG path data: `M x,y L x,y ...`.
    pub fn to_svg_path(&self) -> String {
        let coords: Vec<String> = self
            .points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect();

        if coords.is_empty() {
            return String::new();
        }
        format!("M {}", coords.join(" L "))
    }

    /// The line closed along the bottom edge, for the gradient fill under it.
    pub fn to_area_path(&self) -> String {
        if self.points.is_empty() {
            return String::new();
        }
        format!(
            "{} L {},{} L 0,{} Z",
            self.to_svg_path(),
            CANVAS_WIDTH,
            CANVAS_HEIGHT,
            CANVAS_HEIGHT
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn stroke_color(trend_is_positive: bool) -> &'static str {
    if trend_is_positive {
        POSITIVE_STROKE
    } else {
        NEGATIVE_STROKE
    }
}

/// Builds the sparkline for `series`. With no usable prices a cosmetic
/// placeholder trend is drawn instead, rising or falling per
/// `trend_is_positive`.
pub fn build_path(series: &[PricePoint], trend_is_positive: bool) -> PathSpec {
    let prices: Vec<f64> = series
        .iter()
        .map(|p| p.price)
        .filter(|p| p.is_finite())
        .collect();

    match prices.len() {
        0 => synthesize(trend_is_positive),
        // a lone price has no slope; draw it flat across the canvas
        1 => PathSpec {
            points: vec![
                Point { x: 0.0, y: CANVAS_HEIGHT / 2.0 },
                Point { x: CANVAS_WIDTH, y: CANVAS_HEIGHT / 2.0 },
            ],
        },
        _ => normalize(&prices),
    }
}

fn normalize(prices: &[f64]) -> PathSpec {
    let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let price_range = max_price - min_price;

    let price_norm = |price: f64| -> f64 {
        if price_range > 0.0 {
            (price - min_price) / price_range
        } else {
            0.5
        }
    };

    let last = (prices.len() - 1) as f64;
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| Point {
            x: i as f64 / last * CANVAS_WIDTH,
            y: CANVAS_HEIGHT - price_norm(price) * (CANVAS_HEIGHT - 2.0 * MARGIN) - MARGIN,
        })
        .collect();

    PathSpec { points }
}

fn synthesize(trend_is_positive: bool) -> PathSpec {
    let baseline = CANVAS_HEIGHT * 0.7;
    let last = (SYNTHETIC_POINTS - 1) as f64;

    let points = (0..SYNTHETIC_POINTS)
        .map(|i| {
            let step = i as f64;
            let wiggle = (step * 0.5).sin() * 10.0;
            let drift = step * 0.5;

            let y = if trend_is_positive {
                baseline - wiggle - drift
            } else {
                baseline + wiggle + drift
            };

            Point {
                x: step / last * CANVAS_WIDTH,
                y: y.clamp(MARGIN, CANVAS_HEIGHT - MARGIN),
            }
        })
        .collect();

    PathSpec { points }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        prices.iter().map(|&p| PricePoint::new(p)).collect()
    }

    fn mean_y(points: &[Point]) -> f64 {
        points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64
    }

    #[test]
    fn test_peak_maps_to_smallest_y() {
        let path = build_path(&series(&[10.0, 20.0, 10.0]), false);

        assert_eq!(path.len(), 3);
        assert!(path.points[1].y < path.points[0].y);
        assert!(path.points[1].y < path.points[2].y);
        assert_eq!(path.points[1].y, MARGIN);
        assert_eq!(path.points[0].y, CANVAS_HEIGHT - MARGIN);
    }

    #[test]
    fn test_x_evenly_spaced() {
        let path = build_path(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), true);
        let xs: Vec<f64> = path.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 50.0, 100.0, 150.0, 200.0]);
    }

    #[test]
    fn test_flat_series_sits_at_midpoint() {
        let path = build_path(&series(&[42.0, 42.0, 42.0]), true);
        assert!(path.points.iter().all(|p| p.y == CANVAS_HEIGHT / 2.0));
    }

    #[test]
    fn test_single_price_draws_flat_line() {
        let path = build_path(&series(&[42.0]), true);
        assert_eq!(
            path.points,
            vec![Point { x: 0.0, y: 25.0 }, Point { x: 200.0, y: 25.0 }]
        );
    }

    #[test]
    fn test_non_finite_prices_are_ignored() {
        let path = build_path(&series(&[f64::NAN, 1.0, 2.0]), true);
        assert_eq!(path.len(), 2);
        assert!(path.points.iter().all(|p| p.y.is_finite()));
    }

    #[test]
    fn test_empty_rising_trend() {
        let path = build_path(&[], true);

        assert_eq!(path.len(), SYNTHETIC_POINTS);
        let (early, late) = path.points.split_at(SYNTHETIC_POINTS / 2);
        assert!(mean_y(late) < mean_y(early));
        assert!(path.points.last().unwrap().y < path.points[0].y);
    }

    #[test]
    fn test_empty_falling_trend() {
        let path = build_path(&[], false);

        assert_eq!(path.len(), SYNTHETIC_POINTS);
        let (early, late) = path.points.split_at(SYNTHETIC_POINTS / 2);
        assert!(mean_y(late) > mean_y(early));
    }

    #[test]
    fn test_synthetic_points_stay_in_bounds() {
        for positive in [true, false] {
            let path = build_path(&[], positive);
            assert_eq!(path.points[0].x, 0.0);
            assert_eq!(path.points[SYNTHETIC_POINTS - 1].x, CANVAS_WIDTH);
            assert!(path
                .points
                .iter()
                .all(|p| p.y >= MARGIN && p.y <= CANVAS_HEIGHT - MARGIN));
        }
    }

    #[test]
    fn test_svg_rendering() {
        let path = build_path(&series(&[10.0, 20.0]), true);

        assert_eq!(path.to_svg_path(), "M 0,45 L 200,5");
        assert_eq!(path.to_area_path(), "M 0,45 L 200,5 L 200,50 L 0,50 Z");
    }

    #[test]
    fn test_empty_path_renders_nothing() {
        let path = PathSpec { points: vec![] };
        assert_eq!(path.to_svg_path(), "");
        assert_eq!(path.to_area_path(), "");
    }

    #[test]
    fn test_stroke_color() {
        assert_eq!(stroke_color(true), "#137333");
        assert_eq!(stroke_color(false), "#d93025");
    }
}
