use crate::{
    font::Typeface,
    image::Image,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
    LabelError,
};
use id_arena::{Arena, Id};
use pdf_writer::Pdf;
use std::io::Write;

/// A single page PDF document, holding the page along with the fonts and images it uses,
/// then rendering it out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub page: Page,
    pub fonts: Arena<Typeface>,
    pub images: Arena<Image>,
}

impl Document {
    pub fn new(page: Page) -> Document {
        Document {
            info: None,
            page,
            fonts: Arena::new(),
            images: Arena::new(),
        }
    }

    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a font to the document, returning its id. Adding a typeface that is already
    /// present returns the existing id, so each face is written once.
    pub fn add_font(&mut self, typeface: Typeface) -> Id<Typeface> {
        if let Some((id, _)) = self.fonts.iter().find(|(_, font)| **font == typeface) {
            return id;
        }
        self.fonts.alloc(typeface)
    }

    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Write the entire document to the writer. The document is rendered in memory first,
    /// and object ids are handed out in a fixed order, so the same document always produces
    /// the same bytes.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), LabelError> {
        let Document {
            info,
            page,
            fonts,
            images,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);
        let page_id = refs.gen(RefType::Page);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        writer.pages(page_tree_id).count(1).kids([page_id]);

        for (i, font) in fonts.iter() {
            font.write(&mut refs, i.index(), &mut writer);
        }

        for (i, image) in images.iter() {
            image.write(&mut refs, i.index(), &mut writer);
        }

        page.write(&mut refs, &fonts, &images, &mut writer)?;

        writer.catalog(catalog_id).pages(page_tree_id);

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFont;
    use crate::rect::Rect;
    use crate::units::Pt;

    fn empty_page() -> Page {
        let media = Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(288.0), Pt(144.0));
        Page::new(media, media)
    }

    #[test]
    fn fonts_are_deduplicated() {
        let mut doc = Document::new(empty_page());
        let a = doc.add_font(StandardFont::Helvetica.into());
        let b = doc.add_font(StandardFont::Courier.into());
        let c = doc.add_font(StandardFont::Helvetica.into());
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(doc.fonts.len(), 2);
    }

    #[test]
    fn writes_a_pdf() {
        let mut doc = Document::new(empty_page());
        doc.add_font(StandardFont::Helvetica.into());
        let mut out = Vec::new();
        doc.write(&mut out).unwrap();
        assert!(out.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.contains("/MediaBox [0 0 288 144]"));
    }
}
