//! Measuring text and deciding where everything on a label goes.
//!
//! Layout happens entirely in top-down layout space, before anything is drawn. [plan]
//! splits the page into a code zone and a text column, wraps every field with
//! [wrap_lines], and flows the resulting [TextBlock]s down the column. The compositor then
//! draws exactly the lines that were measured.
//!
//! # Example
//!
//! ```
//! use rx_label::{LabelContent, RenderConfig};
//! use rx_label::layout::{plan, Field};
//!
//! let content = LabelContent::builder()
//!     .patient_name("Jane Doe")
//!     .medication_name("Amoxicillin")
//!     .sig("Take one capsule twice daily")
//!     .build();
//!
//! let plan = plan(&content, &RenderConfig::default());
//! assert_eq!(plan.placements[0].field, Field::PatientName);
//! assert!(!plan.overflows);
//! ```

mod margins;
mod plan;
mod text;

pub use margins::*;
pub use plan::*;
pub use text::*;
