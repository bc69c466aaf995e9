use crate::config::{LayoutVariant, OverflowPolicy, RenderConfig};
use crate::font::{FontCatalogue, FontRole};
use crate::label::{single_decimal, LabelContent};
use crate::rect::Rect;
use crate::units::Pt;

use super::{Margins, TextBlock};

/// Smallest font scale the shrink policy will try
pub const MIN_FONT_SCALE: f32 = 0.5;
/// How much the shrink policy reduces the font scale per attempt
pub const FONT_SCALE_STEP: f32 = 0.05;

/// Gap between the code zone and the text column, as a fraction of the margin
const COLUMN_GAP_RATIO: f32 = 0.6;
/// Width of the rich layout's code column, as a fraction of the content width
const RICH_CODE_COLUMN_RATIO: f32 = 0.48;

/// Slack allowed when comparing the flow against the content area
const FIT_TOLERANCE: Pt = Pt(0.01);

const PATIENT_PLACEHOLDER: &str = "Last, First";
const PHARMACY_PLACEHOLDER: &str = "Pharmacy";

/// The piece of label content a placement shows
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    /// Pharmacy name above the code
    Caption,
    PatientName,
    Medication,
    SecondaryIngredient,
    DispenseAmount,
    Sig,
    PrescriberName,
    PrescriberPhone,
    ClinicAddress,
    PharmacyFill,
    PharmacyIdentifier,
}

/// One block of text at its final position
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Where the text goes, in layout space. Lines start at the left edge.
    pub rect: Rect,
    pub field: Field,
    pub role: FontRole,
    pub block: TextBlock,
}

/// The result of laying out one label: where everything goes, and whether it fits
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlan {
    pub page: Rect,
    /// The page inside the label margins
    pub content: Rect,
    /// Where the code image is fitted
    pub code_zone: Rect,
    /// Text in drawing order. The caption, if any, comes first.
    pub placements: Vec<Placement>,
    /// Multiplier applied to every catalogue font size
    pub font_scale: f32,
    /// Height the text column needs, measured from the top of the content area
    pub needed_height: Pt,
    /// Whether the text column runs past the bottom of the content area
    pub overflows: bool,
}

impl LabelPlan {
    /// Placements in the text column, i.e. everything but the caption
    pub fn text_placements(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(|p| p.field != Field::Caption)
    }

    pub fn fields(&self) -> Vec<Field> {
        self.placements.iter().map(|p| p.field).collect()
    }

    pub fn placement(&self, field: Field) -> Option<&Placement> {
        self.placements.iter().find(|p| p.field == field)
    }
}

/// The fixed parts of the page that don't depend on the text
struct Frame {
    page: Rect,
    content: Rect,
    margin: Pt,
}

impl Frame {
    fn new(config: &RenderConfig) -> Frame {
        let page = config.page_rect();
        let margins = Margins::for_label(page.height());
        let content = margins.apply(page);
        Frame {
            page,
            content,
            margin: margins.left,
        }
    }

    /// Text column for a code zone ending at `code_right`
    fn text_column(&self, code_right: Pt) -> (Pt, Pt) {
        let x = code_right + self.margin * COLUMN_GAP_RATIO;
        let width = (self.content.x2 - x).max(Pt(0.0));
        (x, width)
    }
}

/// A cursor flowing down a column, turning text into placements as it goes
struct Flow<'a> {
    fonts: &'a FontCatalogue,
    page_height: Pt,
    scale: f32,
    x: Pt,
    width: Pt,
    cursor: Pt,
    spacing: Pt,
    placements: Vec<Placement>,
}

impl<'a> Flow<'a> {
    fn block(&self, role: FontRole, text: &str, max_width: Pt) -> TextBlock {
        let font = self.fonts.get(role).resolve(self.page_height, self.scale);
        TextBlock::layout(text, font, max_width)
    }

    /// Place `text` across the full column width and move the cursor below it
    fn push(&mut self, field: Field, role: FontRole, text: &str) {
        let block = self.block(role, text, self.width);
        let rect = Rect::from_xywh(self.x, self.cursor, self.width, block.height);
        tracing::trace!(?field, y = *rect.y1, height = *rect.y2 - *rect.y1, "placed");
        self.cursor = rect.y2 + self.spacing;
        self.placements.push(Placement {
            rect,
            field,
            role,
            block,
        });
    }

    /// The prescriber line: the name on the left, the phone number right aligned, both
    /// limited to half the column
    fn push_prescriber(&mut self, name: Option<&str>, phone: Option<&str>) {
        if name.is_none() && phone.is_none() {
            return;
        }

        let half = self.width / 2.0;
        let mut tallest = Pt(0.0);

        if let Some(name) = name {
            let block = self.block(FontRole::PrescriberName, name, half);
            let rect = Rect::from_xywh(self.x, self.cursor, half, block.height);
            tallest = tallest.max(block.height);
            self.placements.push(Placement {
                rect,
                field: Field::PrescriberName,
                role: FontRole::PrescriberName,
                block,
            });
        }

        if let Some(phone) = phone {
            let block = self.block(FontRole::PrescriberPhone, phone, half);
            let x = self.x + self.width - block.width;
            let rect = Rect::from_xywh(x, self.cursor, block.width, block.height);
            tallest = tallest.max(block.height);
            self.placements.push(Placement {
                rect,
                field: Field::PrescriberPhone,
                role: FontRole::PrescriberPhone,
                block,
            });
        }

        self.cursor = self.cursor + tallest + self.spacing;
    }

    /// Bottom edge of the last placement, or the top of the column when nothing was placed
    fn bottom(&self, top: Pt) -> Pt {
        self.placements
            .iter()
            .map(|p| p.rect.y2)
            .fold(top, Pt::max)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Lay out a label.
///
/// Pure and deterministic: the same content and configuration always give the same plan.
/// With [OverflowPolicy::Shrink] the fonts are scaled down in steps of [FONT_SCALE_STEP]
/// until the text fits or [MIN_FONT_SCALE] is reached; the plan reports the scale it used
/// and whether it still overflows.
pub fn plan(content: &LabelContent, config: &RenderConfig) -> LabelPlan {
    let frame = Frame::new(config);

    let steps = match config.overflow {
        OverflowPolicy::Shrink => ((1.0 - MIN_FONT_SCALE) / FONT_SCALE_STEP).round() as usize,
        OverflowPolicy::Clip | OverflowPolicy::Fail => 0,
    };

    let mut attempt = plan_at_scale(content, config, &frame, 1.0);
    for step in 1..=steps {
        if !attempt.overflows {
            break;
        }
        let scale = 1.0 - FONT_SCALE_STEP * step as f32;
        attempt = plan_at_scale(content, config, &frame, scale.max(MIN_FONT_SCALE));
    }

    tracing::debug!(
        variant = ?config.variant,
        font_scale = attempt.font_scale,
        placements = attempt.placements.len(),
        needed = *attempt.needed_height,
        overflows = attempt.overflows,
        "planned label"
    );
    attempt
}

fn plan_at_scale(
    content: &LabelContent,
    config: &RenderConfig,
    frame: &Frame,
    scale: f32,
) -> LabelPlan {
    let area = frame.content;
    let page_height = frame.page.height();

    let mut caption = None;
    let (code_zone, spacing) = match config.variant {
        LayoutVariant::Simple => {
            let side = area.height();
            (Rect::from_xywh(area.x1, area.y1, side, side), Pt(2.0))
        }
        LayoutVariant::Rich => {
            let spacing = Pt(4.0);
            let column = Rect::from_xywh(
                area.x1,
                area.y1,
                area.width() * RICH_CODE_COLUMN_RATIO,
                area.height(),
            );
            let mut zone = column;
            if config.caption {
                let text = non_empty(&content.pharmacy_name).unwrap_or(PHARMACY_PLACEHOLDER);
                let font = config
                    .fonts
                    .get(FontRole::Pharmacy)
                    .resolve(page_height, scale);
                let block = TextBlock::layout(text, font, column.width());
                let rect = Rect::from_xywh(
                    column.mid_x() - block.width / 2.0,
                    column.y1,
                    block.width,
                    block.height,
                );
                let top = (rect.y2 + spacing).min(column.y2);
                zone = Rect {
                    y1: top,
                    ..column
                };
                caption = Some(Placement {
                    rect,
                    field: Field::Caption,
                    role: FontRole::Pharmacy,
                    block,
                });
            }
            (zone, spacing)
        }
    };

    let (x, width) = frame.text_column(code_zone.x2);
    let mut flow = Flow {
        fonts: &config.fonts,
        page_height,
        scale,
        x,
        width,
        cursor: area.y1,
        spacing,
        placements: Vec::new(),
    };

    let patient = if content.patient_name.is_empty() {
        PATIENT_PLACEHOLDER
    } else {
        content.patient_name.as_str()
    };

    match config.variant {
        LayoutVariant::Simple => {
            flow.push(Field::PatientName, FontRole::PatientName, patient);
            flow.push(Field::Medication, FontRole::Medication, &content.medication_name);
            flow.push(Field::Sig, FontRole::Sig, &content.sig);
            flow.push(
                Field::PharmacyIdentifier,
                FontRole::Pharmacy,
                &content.pharmacy_identifier,
            );
        }
        LayoutVariant::Rich => {
            flow.push(Field::PatientName, FontRole::PatientName, patient);
            flow.push(
                Field::Medication,
                FontRole::Medication,
                &content.medication_line(),
            );
            if let Some(secondary) = content.secondary_line() {
                flow.push(
                    Field::SecondaryIngredient,
                    FontRole::SecondaryIngredient,
                    &secondary,
                );
            }
            flow.push(
                Field::DispenseAmount,
                FontRole::Monospaced,
                &single_decimal(content.dispense_amount),
            );
            flow.push(Field::Sig, FontRole::Sig, &content.sig);
            flow.push_prescriber(
                non_empty(&content.prescriber_name),
                non_empty(&content.prescriber_phone),
            );
            if let Some(address) = non_empty(&content.clinic_address) {
                flow.push(Field::ClinicAddress, FontRole::ClinicAddress, address);
            }
            flow.push(
                Field::PharmacyFill,
                FontRole::PharmacyFill,
                &single_decimal(content.fill_amount),
            );
        }
    }

    let needed_height = flow.bottom(area.y1) - area.y1;
    let overflows = needed_height > area.height() + FIT_TOLERANCE;

    let mut placements = Vec::with_capacity(flow.placements.len() + 1);
    placements.extend(caption);
    placements.append(&mut flow.placements);

    LabelPlan {
        page: frame.page,
        content: area,
        code_zone,
        placements,
        font_scale: scale,
        needed_height,
        overflows,
    }
}
