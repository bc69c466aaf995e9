//! Layout and PDF rendering for 2 x 1 inch medication labels.
//!
//! A [LabelContent] record goes in, a single page PDF comes out. The left of the label
//! holds a QR code; the right holds the patient, medication, directions and whatever else
//! the chosen [LayoutVariant] shows, flowed top to bottom and measured before anything is
//! drawn. Rendering is a pure function of the content and the [RenderConfig]: the same
//! inputs give byte-identical output.
//!
//! ```
//! use rx_label::{render, LabelContent, RenderConfig};
//!
//! let label = LabelContent::builder()
//!     .patient_name("Jane Doe")
//!     .medication_name("Amoxicillin")
//!     .dose("500 mg")
//!     .dispense_amount(30.0)
//!     .sig("Take one capsule twice daily")
//!     .code_payload("https://example.com/medications/MED1")
//!     .build();
//!
//! let pdf = render(&label, &RenderConfig::default()).expect("label renders");
//! assert!(pdf.starts_with(b"%PDF"));
//! ```

mod colour;
pub use colour::*;

mod config;
pub use config::*;

mod content;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

mod label;
pub use label::*;

pub mod layout;

mod page;
pub use page::*;

pub mod qr;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod render;
pub use render::*;

mod transform;
pub use transform::*;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
