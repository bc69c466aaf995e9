use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ResolvedFont, StandardFont, Typeface};
use crate::units::Pt;

/// What a piece of label text is, as far as typesetting is concerned
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontRole {
    /// Patient name, the largest line on the label
    PatientName,
    /// Medication name and dose
    Medication,
    /// Secondary ingredient concentration
    SecondaryIngredient,
    /// Numeric amounts that should line up, e.g. the dispense amount
    Monospaced,
    /// Directions for use
    Sig,
    PrescriberName,
    PrescriberPhone,
    ClinicAddress,
    /// The pharmacy fill amount at the bottom of the text column
    PharmacyFill,
    /// Pharmacy name banner or identifier
    Pharmacy,
}

/// Size of a font that scales with the page but never exceeds `cap`
pub fn capped_font_size(cap: Pt, ratio: f32, page_height: Pt) -> Pt {
    cap.min(page_height * ratio)
}

/// How one role is typeset: a face, and a size rule relative to the page height
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub typeface: Typeface,
    /// Largest size the role is ever set at
    pub cap: Pt,
    /// Size as a fraction of the page height, before capping
    pub ratio: f32,
}

impl FontSpec {
    pub fn new<T: Into<Typeface>>(typeface: T, cap: f32, ratio: f32) -> FontSpec {
        FontSpec {
            typeface: typeface.into(),
            cap: Pt(cap),
            ratio,
        }
    }

    /// Resolve to a concrete size on a page of the given height, multiplied by `scale`
    pub fn resolve(&self, page_height: Pt, scale: f32) -> ResolvedFont {
        ResolvedFont {
            typeface: self.typeface.clone(),
            size: capped_font_size(self.cap, self.ratio, page_height) * scale,
        }
    }
}

/// Maps every [FontRole] to the [FontSpec] it is set in
#[derive(Debug, Clone, PartialEq)]
pub struct FontCatalogue {
    specs: BTreeMap<FontRole, FontSpec>,
}

impl FontCatalogue {
    /// Fonts for the rich layout, which fits many lines next to a captioned code
    pub fn rich() -> FontCatalogue {
        use StandardFont::*;
        let specs = BTreeMap::from([
            (FontRole::PatientName, FontSpec::new(HelveticaBold, 18.0, 0.26)),
            (FontRole::Medication, FontSpec::new(Helvetica, 14.0, 0.20)),
            (FontRole::SecondaryIngredient, FontSpec::new(HelveticaOblique, 11.0, 0.16)),
            (FontRole::Monospaced, FontSpec::new(Courier, 14.0, 0.20)),
            (FontRole::Sig, FontSpec::new(Courier, 14.0, 0.20)),
            (FontRole::PrescriberName, FontSpec::new(HelveticaBold, 13.0, 0.18)),
            (FontRole::PrescriberPhone, FontSpec::new(Helvetica, 13.0, 0.18)),
            (FontRole::ClinicAddress, FontSpec::new(Helvetica, 12.0, 0.16)),
            (FontRole::PharmacyFill, FontSpec::new(HelveticaBold, 12.0, 0.16)),
            (FontRole::Pharmacy, FontSpec::new(Helvetica, 8.0, 0.10)),
        ]);
        FontCatalogue { specs }
    }

    /// Fonts for the simple four line layout
    pub fn simple() -> FontCatalogue {
        use StandardFont::*;
        let mut catalogue = FontCatalogue::rich();
        catalogue.set(FontRole::PatientName, FontSpec::new(HelveticaBold, 14.0, 0.22));
        catalogue.set(FontRole::Medication, FontSpec::new(HelveticaBold, 12.0, 0.18));
        catalogue.set(FontRole::Sig, FontSpec::new(Helvetica, 10.0, 0.16));
        catalogue.set(FontRole::Pharmacy, FontSpec::new(HelveticaOblique, 9.0, 0.14));
        catalogue
    }

    /// Replace the spec for a role
    pub fn set(&mut self, role: FontRole, spec: FontSpec) -> &mut Self {
        self.specs.insert(role, spec);
        self
    }

    pub fn get(&self, role: FontRole) -> &FontSpec {
        // both constructors populate every role and `set` only ever replaces
        &self.specs[&role]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FontRole, &FontSpec)> {
        self.specs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_page_height_until_capped() {
        assert_eq!(capped_font_size(Pt(18.0), 0.25, Pt(40.0)), Pt(10.0));
        assert_eq!(capped_font_size(Pt(18.0), 0.25, Pt(144.0)), Pt(18.0));
    }

    #[test]
    fn every_role_is_populated() {
        let roles = [
            FontRole::PatientName,
            FontRole::Medication,
            FontRole::SecondaryIngredient,
            FontRole::Monospaced,
            FontRole::Sig,
            FontRole::PrescriberName,
            FontRole::PrescriberPhone,
            FontRole::ClinicAddress,
            FontRole::PharmacyFill,
            FontRole::Pharmacy,
        ];
        for catalogue in [FontCatalogue::rich(), FontCatalogue::simple()] {
            assert_eq!(catalogue.iter().count(), roles.len());
            for role in roles {
                let _ = catalogue.get(role);
            }
        }
    }

    #[test]
    fn scale_shrinks_resolved_size() {
        let spec = FontSpec::new(StandardFont::Helvetica, 10.0, 0.5);
        assert_eq!(spec.resolve(Pt(144.0), 0.5).size, Pt(5.0));
    }
}
