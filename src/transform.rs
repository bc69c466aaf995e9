//! 2D transformation matrices for content positioning.

use crate::rect::Rect;
use crate::units::*;
use std::io::Write;

/// A transformation matrix in PDF user space, where (0,0) is at the bottom-left.
///
/// The matrix is represented as [a, b, c, d, e, f] corresponding to:
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
///
/// Transforms are chained with [`then`](Transform::then) or
/// [`with_translate`](Transform::with_translate); operations apply in the order they're
/// chained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Identity transform (no transformation)
    pub fn identity() -> Self {
        Transform {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Create a translation transform
    pub fn translate(x: Pt, y: Pt) -> Self {
        Transform {
            e: *x,
            f: *y,
            ..Transform::identity()
        }
    }

    /// Create a scaling transform
    pub fn scale(sx: f32, sy: f32) -> Self {
        Transform {
            a: sx,
            d: sy,
            ..Transform::identity()
        }
    }

    /// Combine this transform with another (self * other)
    pub fn then(self, other: Transform) -> Self {
        Transform {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Add a translation to this transform
    pub fn with_translate(self, x: Pt, y: Pt) -> Self {
        self.then(Transform::translate(x, y))
    }

    /// Map a point through the transform
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Write the transform as a `cm` operator
    #[allow(clippy::write_with_newline)]
    pub fn write_to_content(&self, content: &mut Vec<u8>) -> std::io::Result<()> {
        write!(
            content,
            "{} {} {} {} {} {} cm\n",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

/// A frame whose origin is the top-left corner of `rect` and whose `y` axis points down
/// the page, so content can be drawn in layout space
pub fn flip_frame(rect: &Rect, page_height: Pt) -> Transform {
    Transform::scale(1.0, -1.0).with_translate(rect.x1, page_height - rect.y1)
}

/// Map the unit square onto `rect`, which is how images are sized
pub fn image_frame(rect: &Rect, page_height: Pt) -> Transform {
    Transform::scale(*rect.width(), *rect.height()).with_translate(rect.x1, page_height - rect.y2)
}
