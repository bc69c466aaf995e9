use crate::rect::Rect;
use crate::units::Pt;

/// Fraction of the page height left blank around every edge of a label
pub const MARGIN_RATIO: f32 = 0.06;

/// Margins around the content area of a page. Nothing stops drawing outside them; the
/// planner uses them to find the content rectangle, and the clip overflow policy clips to it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// The margins of a label with the given page height
    pub fn for_label(page_height: Pt) -> Margins {
        Margins::all(page_height * MARGIN_RATIO)
    }

    /// The area of `page` inside these margins
    pub fn apply(&self, page: Rect) -> Rect {
        let x1 = page.x1 + self.left;
        let y1 = page.y1 + self.top;
        Rect {
            x1,
            y1,
            x2: (page.x2 - self.right).max(x1),
            y2: (page.y2 - self.bottom).max(y1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_margins_scale_with_height() {
        let margins = Margins::for_label(Pt(100.0));
        assert!((*margins.top - 6.0).abs() < 1e-4);
        assert_eq!(margins.top, margins.left);

        let content = Margins::all(Pt(6.0))
            .apply(Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(200.0), Pt(100.0)));
        assert_eq!(content, Rect::from_xywh(Pt(6.0), Pt(6.0), Pt(188.0), Pt(88.0)));
    }

    #[test]
    fn oversized_margins_collapse_the_content() {
        let content = Margins::all(Pt(60.0))
            .apply(Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(200.0), Pt(100.0)));
        assert!(content.is_empty());
        assert_eq!(content.height(), Pt(0.0));
    }
}
