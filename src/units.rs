use derive_more::{Add, AddAssign, Deref, DerefMut, Display, From, Into, Sub, SubAssign, Sum};

/// A length in page points. On a label page one physical inch spans `dpi` points, so a
/// point is only 1/72 inch when rendering at 72 DPI.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Display,
    From,
    Into,
    Deref,
    DerefMut,
)]
pub struct Pt(pub f32);

/// A length in physical inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, From, Into)]
pub struct In(pub f32);

impl In {
    /// Convert to points at the given output resolution
    pub fn at_dpi(self, dpi: f32) -> Pt {
        Pt(self.0 * dpi)
    }
}

impl std::ops::Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl std::ops::MulAssign<f32> for Pt {
    fn mul_assign(&mut self, rhs: f32) {
        self.0 *= rhs;
    }
}

impl std::ops::Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

impl std::ops::Div<Pt> for Pt {
    type Output = f32;

    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}

impl Pt {
    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    /// Round up to the next whole point
    pub fn ceil(self) -> Pt {
        Pt(self.0.ceil())
    }
}
