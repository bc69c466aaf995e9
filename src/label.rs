//! The medication label record the renderer consumes.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::qr::{self, CodeError};
use crate::RenderConfig;

/// Everything printed on one medication label. The surrounding application owns the
/// record; rendering only reads it.
///
/// Empty strings are allowed everywhere. Optional fields that are `None` (or empty) make
/// the corresponding line disappear from the label rather than print blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelContent {
    /// Identifier for the pharmacy, e.g. an NCPDP number or internal slug
    pub pharmacy_identifier: String,
    /// Prescription number
    pub rx_number: String,
    /// Identifier used to build the code payload URL
    pub medication_identifier: String,
    /// Display name of the patient, "Last, First" is printed when empty
    pub patient_name: String,
    pub medication_name: String,
    /// Dose strength text, e.g. "500 mg"
    pub dose: String,
    /// Numeric dose used for the fill calculation
    pub dose_amount: f64,
    /// Quantity dispensed
    pub dispense_amount: f64,
    /// Millilitres to draw, see [fill_amount_for]
    pub fill_amount: f64,
    /// Concentration of a secondary ingredient, if the medication has one
    pub secondary_concentration: Option<f64>,
    /// Directions for use
    pub sig: String,
    pub prescriber_name: Option<String>,
    pub prescriber_phone: Option<String>,
    pub clinic_address: Option<String>,
    /// Caption printed above the code in the rich layout
    pub pharmacy_name: Option<String>,
    /// A pre-rendered code image (PNG or JPEG); preferred over `code_payload`
    #[serde(default, with = "base64_bytes")]
    pub code_image: Option<Vec<u8>>,
    /// Text to encode as a QR code when there is no usable pre-rendered image
    pub code_payload: Option<String>,
}

/// Millilitres to draw for a dose, given the primary ingredient concentration per ml.
/// Zero when the concentration cannot be divided by.
pub fn fill_amount_for(dose_amount: f64, primary_concentration: f64) -> f64 {
    if primary_concentration.is_finite() && primary_concentration > 0.0 {
        dose_amount / primary_concentration
    } else {
        0.0
    }
}

/// Amount of the secondary ingredient delivered alongside a dose of the primary one
pub fn secondary_amount_for(
    dose_amount: f64,
    primary_concentration: f64,
    secondary_concentration: f64,
) -> f64 {
    if secondary_concentration.is_finite() {
        fill_amount_for(dose_amount, primary_concentration) * secondary_concentration
    } else {
        0.0
    }
}

/// The page a medication's QR code points to: `https://<host>/medications/<identifier>`
pub fn medication_url(host: &str, medication_identifier: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("https://{host}/"))?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push("medications")
        .push(medication_identifier);
    Ok(url)
}

/// Format a number with exactly one decimal place, the way every amount on a label is shown
pub fn single_decimal(value: f64) -> String {
    format!("{value:.1}")
}

impl LabelContent {
    pub fn builder() -> LabelContentBuilder {
        LabelContentBuilder::default()
    }

    /// The medication line: name and dose, or a stand-in when no name is known
    pub fn medication_line(&self) -> String {
        let mut line = if self.medication_name.is_empty() {
            "Some Medication".to_string()
        } else {
            self.medication_name.clone()
        };
        if !self.dose.is_empty() {
            line.push(' ');
            line.push_str(&self.dose);
        }
        line
    }

    /// The secondary concentration line, if there is anything to print
    pub fn secondary_line(&self) -> Option<String> {
        self.secondary_concentration
            .filter(|c| c.is_finite())
            .map(single_decimal)
    }

    /// The URL for this label's medication page on `host`, built from
    /// `medication_identifier`. Assign it to `code_payload` to have the code point there.
    pub fn payload_url(&self, host: &str) -> Result<Url, url::ParseError> {
        medication_url(host, &self.medication_identifier)
    }

    /// Generate a QR code from `code_payload` and store it as the pre-rendered image.
    /// The stored image is left untouched when there is no payload or generation fails.
    pub fn regenerate_code(&mut self, scale: u32) -> Result<(), CodeError> {
        let Some(payload) = self.code_payload.as_deref() else {
            return Err(CodeError::MissingPayload);
        };
        self.code_image = Some(qr::generate(payload, scale)?);
        Ok(())
    }

    /// Render this label with the default layout at the given DPI. Any failure is logged
    /// and reported as `None`; there is never partial output.
    pub fn generate_pdf_label(&self, dpi: f32) -> Option<Vec<u8>> {
        let config = RenderConfig {
            dpi,
            ..RenderConfig::default()
        };
        crate::render(self, &config)
            .inspect_err(|err| tracing::warn!(%err, "label could not be rendered"))
            .ok()
    }
}

/// Builder for [LabelContent]
#[derive(Debug, Default, Clone)]
pub struct LabelContentBuilder {
    content: LabelContent,
}

impl LabelContentBuilder {
    pub fn pharmacy_identifier<S: ToString>(mut self, value: S) -> Self {
        self.content.pharmacy_identifier = value.to_string();
        self
    }

    pub fn rx_number<S: ToString>(mut self, value: S) -> Self {
        self.content.rx_number = value.to_string();
        self
    }

    pub fn medication_identifier<S: ToString>(mut self, value: S) -> Self {
        self.content.medication_identifier = value.to_string();
        self
    }

    pub fn patient_name<S: ToString>(mut self, value: S) -> Self {
        self.content.patient_name = value.to_string();
        self
    }

    pub fn medication_name<S: ToString>(mut self, value: S) -> Self {
        self.content.medication_name = value.to_string();
        self
    }

    pub fn dose<S: ToString>(mut self, value: S) -> Self {
        self.content.dose = value.to_string();
        self
    }

    pub fn dose_amount(mut self, value: f64) -> Self {
        self.content.dose_amount = value;
        self
    }

    pub fn dispense_amount(mut self, value: f64) -> Self {
        self.content.dispense_amount = value;
        self
    }

    pub fn fill_amount(mut self, value: f64) -> Self {
        self.content.fill_amount = value;
        self
    }

    /// Derive the fill amount from the dose and the primary concentration per ml
    pub fn fill_from_concentration(mut self, primary_concentration: f64) -> Self {
        self.content.fill_amount =
            fill_amount_for(self.content.dose_amount, primary_concentration);
        self
    }

    pub fn secondary_concentration(mut self, value: f64) -> Self {
        self.content.secondary_concentration = Some(value);
        self
    }

    pub fn sig<S: ToString>(mut self, value: S) -> Self {
        self.content.sig = value.to_string();
        self
    }

    pub fn prescriber_name<S: ToString>(mut self, value: S) -> Self {
        self.content.prescriber_name = Some(value.to_string());
        self
    }

    pub fn prescriber_phone<S: ToString>(mut self, value: S) -> Self {
        self.content.prescriber_phone = Some(value.to_string());
        self
    }

    pub fn clinic_address<S: ToString>(mut self, value: S) -> Self {
        self.content.clinic_address = Some(value.to_string());
        self
    }

    pub fn pharmacy_name<S: ToString>(mut self, value: S) -> Self {
        self.content.pharmacy_name = Some(value.to_string());
        self
    }

    pub fn code_image(mut self, png: Vec<u8>) -> Self {
        self.content.code_image = Some(png);
        self
    }

    pub fn code_payload<S: ToString>(mut self, value: S) -> Self {
        self.content.code_payload = Some(value.to_string());
        self
    }

    pub fn build(self) -> LabelContent {
        self.content
    }
}

/// Code images travel as base64 text when labels are exchanged as JSON or TOML
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => s.serialize_some(&BASE64.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|text| BASE64.decode(text.trim()).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_amount_divides_dose_by_concentration() {
        assert_eq!(fill_amount_for(50.0, 25.0), 2.0);
        assert_eq!(fill_amount_for(50.0, 0.0), 0.0);
        assert_eq!(fill_amount_for(50.0, f64::NAN), 0.0);
        assert_eq!(secondary_amount_for(50.0, 25.0, 1.5), 3.0);
    }

    #[test]
    fn amounts_have_one_decimal() {
        assert_eq!(single_decimal(30.0), "30.0");
        assert_eq!(single_decimal(3.14159), "3.1");
        assert_eq!(single_decimal(0.0), "0.0");
    }

    #[test]
    fn medication_url_has_expected_shape() {
        let url = medication_url("example.com", "MED1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/medications/MED1");
        let url = medication_url("example.com", "a b").unwrap();
        assert_eq!(url.as_str(), "https://example.com/medications/a%20b");
    }

    #[test]
    fn payload_url_uses_the_medication_identifier() {
        let content = LabelContent::builder().medication_identifier("MED1").build();
        let url = content.payload_url("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/medications/MED1");
    }

    #[test]
    fn medication_line_falls_back() {
        let content = LabelContent::builder().dose("500 mg").build();
        assert_eq!(content.medication_line(), "Some Medication 500 mg");
        let content = LabelContent::builder().medication_name("Amoxicillin").build();
        assert_eq!(content.medication_line(), "Amoxicillin");
    }

    #[test]
    fn secondary_line_skips_missing_values() {
        assert_eq!(LabelContent::default().secondary_line(), None);
        let content = LabelContent::builder().secondary_concentration(0.3333).build();
        assert_eq!(content.secondary_line().as_deref(), Some("0.3"));
        let content = LabelContent::builder()
            .secondary_concentration(f64::INFINITY)
            .build();
        assert_eq!(content.secondary_line(), None);
    }

    #[test]
    fn regenerate_code_stores_png() {
        let mut content = LabelContent::builder()
            .code_payload("https://example.com/medications/MED1")
            .build();
        content.regenerate_code(qr::DEFAULT_SCALE).unwrap();
        let png = content.code_image.unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn regenerate_code_without_payload_keeps_image() {
        let mut content = LabelContent::builder().code_image(vec![1, 2, 3]).build();
        assert!(matches!(
            content.regenerate_code(6),
            Err(CodeError::MissingPayload)
        ));
        assert_eq!(content.code_image, Some(vec![1, 2, 3]));
    }

    #[test]
    fn round_trips_through_json() {
        let content = LabelContent::builder()
            .patient_name("Jane Doe")
            .code_image(vec![0, 1, 2, 250])
            .build();
        let json = serde_json::to_string(&content).unwrap();
        let back: LabelContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, content);
    }
}
