use crate::colour::Colour;
use crate::content::render_contents;
use crate::font::Typeface;
use crate::image::Image;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::LabelError;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Typeface>,
    pub size: Pt,
}

/// A block of lines drawn in a frame whose origin is the top-left corner of `frame`
#[derive(Clone, PartialEq, Debug)]
pub struct TextLayout {
    pub frame: Rect,
    /// Each line with its baseline, measured down from the top of the frame
    pub lines: Vec<(String, Pt)>,
    pub font: SpanFont,
    pub colour: Colour,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub position: Rect,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(TextLayout),
    Image(ImageLayout),
    /// Contents that are not allowed to paint outside `clip`
    Clipped {
        clip: Rect,
        contents: Vec<PageContents>,
    },
}

/// A single label page. Everything is positioned in layout space; the conversion to PDF
/// space happens when the page is written.
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(media_box: Rect, content_box: Rect) -> Page {
        Page {
            media_box,
            content_box,
            contents: Vec::default(),
        }
    }

    pub fn height(&self) -> Pt {
        self.media_box.height()
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub fn add_clipped(&mut self, clip: Rect, contents: Vec<PageContents>) {
        if !contents.is_empty() {
            self.contents.push(PageContents::Clipped { clip, contents });
        }
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        fonts: &Arena<Typeface>,
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), LabelError> {
        let rendered = render_contents(&self.contents, self.height(), fonts)?;

        let id = refs.get_or_gen(RefType::Page);
        let parent = refs.get_or_gen(RefType::PageTree);
        let content_id = refs.gen(RefType::ContentForPage);

        let mut page = writer.page(id);
        page.media_box(self.media_box.to_pdf(self.height()));
        page.art_box(self.content_box.to_pdf(self.height()));
        page.parent(parent);
        page.contents(content_id);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (i, _) in fonts.iter() {
            if let Some(font_ref) = refs.get(RefType::Font(i.index())) {
                resource_fonts.pair(Name(format!("F{}", i.index()).as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for (i, _) in images.iter() {
            if let Some(image_ref) = refs.get(RefType::Image(i.index())) {
                resource_xobjects.pair(Name(format!("I{}", i.index()).as_bytes()), image_ref);
            }
        }
        resource_xobjects.finish();
        resources.finish();
        page.finish();

        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}
