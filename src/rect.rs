use crate::units::*;

/// A rectangle in label layout space, specified by two opposite corners.
///
/// Layout space is top-down: the origin is the top-left corner of the page and `y` grows
/// downwards, so `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right one.
/// Use [Rect::to_pdf] to convert into PDF's bottom-up user space.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the left edge
    pub x1: Pt,
    /// The y-coordinate of the top edge
    pub y1: Pt,
    /// The x-coordinate of the right edge
    pub x2: Pt,
    /// The y-coordinate of the bottom edge
    pub y2: Pt,
}

impl Rect {
    pub fn from_xywh(x: Pt, y: Pt, width: Pt, height: Pt) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    pub fn mid_x(&self) -> Pt {
        self.x1 + self.width() / 2.0
    }

    pub fn mid_y(&self) -> Pt {
        self.y1 + self.height() / 2.0
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width() <= Pt(0.0) || self.height() <= Pt(0.0)
    }

    /// Whether `other` lies entirely within this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.x1 >= self.x1 && other.y1 >= self.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    /// Convert to PDF user space (origin bottom-left, `y` up) on a page of the given height
    pub fn to_pdf(&self, page_height: Pt) -> pdf_writer::Rect {
        pdf_writer::Rect {
            x1: *self.x1,
            y1: *(page_height - self.y2),
            x2: *self.x2,
            y2: *(page_height - self.y1),
        }
    }
}

/// Scale a `(width, height)` source uniformly to the largest size that fits inside
/// `bounds`, centred. Degenerate sources fill the bounds.
pub fn aspect_fit(source: (f32, f32), bounds: Rect) -> Rect {
    let (w, h) = source;
    if !(w > 0.0 && h > 0.0) {
        return bounds;
    }
    let scale = (*bounds.width() / w).min(*bounds.height() / h);
    let fitted_w = Pt(w * scale);
    let fitted_h = Pt(h * scale);
    Rect::from_xywh(
        bounds.mid_x() - fitted_w / 2.0,
        bounds.mid_y() - fitted_h / 2.0,
        fitted_w,
        fitted_h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_fit_centres_a_square_in_a_wide_zone() {
        let zone = Rect::from_xywh(Pt(10.0), Pt(0.0), Pt(200.0), Pt(100.0));
        let fitted = aspect_fit((50.0, 50.0), zone);
        assert_eq!(fitted.width(), Pt(100.0));
        assert_eq!(fitted.height(), Pt(100.0));
        assert_eq!(fitted.x1, Pt(60.0));
        assert_eq!(fitted.y1, Pt(0.0));
    }

    #[test]
    fn aspect_fit_preserves_ratio_in_a_tall_zone() {
        let zone = Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(50.0), Pt(200.0));
        let fitted = aspect_fit((100.0, 50.0), zone);
        assert_eq!(fitted.width(), Pt(50.0));
        assert_eq!(fitted.height(), Pt(25.0));
        assert_eq!(fitted.mid_y(), Pt(100.0));
    }

    #[test]
    fn aspect_fit_degenerate_source_fills_bounds() {
        let zone = Rect::from_xywh(Pt(1.0), Pt(2.0), Pt(3.0), Pt(4.0));
        assert_eq!(aspect_fit((0.0, 10.0), zone), zone);
    }

    #[test]
    fn to_pdf_flips_vertically() {
        let r = Rect::from_xywh(Pt(10.0), Pt(20.0), Pt(30.0), Pt(40.0));
        let pdf = r.to_pdf(Pt(144.0));
        assert_eq!(pdf.x1, 10.0);
        assert_eq!(pdf.y1, 84.0);
        assert_eq!(pdf.x2, 40.0);
        assert_eq!(pdf.y2, 124.0);
    }
}
