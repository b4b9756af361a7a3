use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::image::ImageSize;

/// A circle in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: Point2::new(x, y),
            radius,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.center.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.center.y
    }

    /// Disk area `π·r²`.
    #[inline]
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    /// Whether `p` lies inside the disk, allowing `tol` pixels of slack on the radius.
    #[inline]
    pub fn contains(&self, p: Point2<f64>, tol: f64) -> bool {
        nalgebra::distance(&self.center, &p) <= self.radius + tol
    }

    /// Whether the whole disk stays at least `margin` pixels inside the image on all four sides.
    ///
    /// Touching the margin exactly is allowed.
    pub fn fits_inside(&self, size: ImageSize, margin: f64) -> bool {
        let (w, h) = (size.width as f64, size.height as f64);
        let (x, y, r) = (self.center.x, self.center.y, self.radius);
        !(x - r < margin || y - r < margin || x + r > w - margin || y + r > h - margin)
    }
}

/// Exact intersection-over-union of two disks (closed-form lens geometry, no rasterization).
///
/// Cases are checked in order: separated disks (`d ≥ r1 + r2`) give `0`, nested
/// disks (`d ≤ |r1 − r2|`) give `min(r)² / max(r)²`, everything else goes through the
/// two-segment lens decomposition. `acos` arguments are clamped to `[-1, 1]`.
///
/// Radii are put in a canonical order first, so `circle_iou(a, b)` and
/// `circle_iou(b, a)` are bitwise identical.
pub fn circle_iou(a: &Circle, b: &Circle) -> f64 {
    let (r1, r2) = if a.radius >= b.radius {
        (a.radius, b.radius)
    } else {
        (b.radius, a.radius)
    };
    let d = nalgebra::distance(&a.center, &b.center);

    if d >= r1 + r2 {
        return 0.0;
    }
    if d <= r1 - r2 {
        // r1 >= r2, so this is the containment test d <= |r1 - r2|.
        return (r2 * r2) / (r1 * r1);
    }

    let d2 = d * d;
    let (r1_sq, r2_sq) = (r1 * r1, r2 * r2);
    let cos1 = ((d2 + r1_sq - r2_sq) / (2.0 * d * r1)).clamp(-1.0, 1.0);
    let cos2 = ((d2 + r2_sq - r1_sq) / (2.0 * d * r2)).clamp(-1.0, 1.0);

    let a1 = r1_sq * cos1.acos();
    let a2 = r2_sq * cos2.acos();
    let kite = (-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2);
    let a3 = 0.5 * kite.max(0.0).sqrt();

    let intersection = a1 + a2 - a3;
    let union = std::f64::consts::PI * r1_sq + std::f64::consts::PI * r2_sq - intersection;
    (intersection / union).clamp(0.0, 1.0)
}
