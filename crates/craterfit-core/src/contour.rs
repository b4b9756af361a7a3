//! Closed polygon contours and the measurements the candidate filter needs
//! from them: enclosed area, perimeter and minimum enclosing circle.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::circle::Circle;

/// Relative slack used when testing points against a trial enclosing circle.
const MEC_EPS: f64 = 1e-9;

/// External boundary of a region, as a closed polygon (the last point connects back to the first).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contour {
    pub points: Vec<Point2<f64>>,
}

impl Contour {
    pub fn new(points: Vec<Point2<f64>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area (shoelace formula), independent of winding direction.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0.0;
        for (i, p) in self.points.iter().enumerate() {
            let q = self.points[(i + 1) % n];
            twice += p.x * q.y - q.x * p.y;
        }
        0.5 * twice.abs()
    }

    /// Length of the closed polyline.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| nalgebra::distance(p, &self.points[(i + 1) % n]))
            .sum()
    }

    pub fn min_enclosing_circle(&self) -> Option<Circle> {
        min_enclosing_circle(&self.points)
    }
}

/// Smallest circle containing every point (incremental Welzl construction).
///
/// Returns `None` for an empty point set; a single point yields a zero-radius circle.
pub fn min_enclosing_circle(points: &[Point2<f64>]) -> Option<Circle> {
    let (&first, _) = points.split_first()?;
    let mut circle = Circle {
        center: first,
        radius: 0.0,
    };

    for (i, &pi) in points.iter().enumerate().skip(1) {
        if encloses(&circle, pi) {
            continue;
        }
        circle = Circle {
            center: pi,
            radius: 0.0,
        };
        for (j, &pj) in points[..i].iter().enumerate() {
            if encloses(&circle, pj) {
                continue;
            }
            circle = diameter_circle(pi, pj);
            for &pk in &points[..j] {
                if !encloses(&circle, pk) {
                    circle = circle_through(pi, pj, pk);
                }
            }
        }
    }

    Some(circle)
}

#[inline]
fn encloses(circle: &Circle, p: Point2<f64>) -> bool {
    circle.contains(p, MEC_EPS * circle.radius.max(1.0))
}

fn diameter_circle(a: Point2<f64>, b: Point2<f64>) -> Circle {
    Circle {
        center: nalgebra::center(&a, &b),
        radius: 0.5 * nalgebra::distance(&a, &b),
    }
}

/// Circumscribed circle of three points; collinear triples fall back to the
/// circle spanning the two farthest points.
fn circle_through(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Circle {
    let ab = b - a;
    let ac = c - a;
    let det = 2.0 * (ab.x * ac.y - ab.y * ac.x);
    let scale = ab.norm_squared().max(ac.norm_squared());

    if det.abs() <= 1e-12 * scale.max(1.0) {
        let pairs = [(a, b), (a, c), (b, c)];
        let (p, q) = pairs
            .into_iter()
            .max_by(|(p0, q0), (p1, q1)| {
                nalgebra::distance_squared(p0, q0).total_cmp(&nalgebra::distance_squared(p1, q1))
            })
            .unwrap_or((a, b));
        return diameter_circle(p, q);
    }

    let ab2 = ab.norm_squared();
    let ac2 = ac.norm_squared();
    let ux = (ac.y * ab2 - ab.y * ac2) / det;
    let uy = (ab.x * ac2 - ac.x * ab2) / det;
    Circle {
        center: Point2::new(a.x + ux, a.y + uy),
        radius: (ux * ux + uy * uy).sqrt(),
    }
}
