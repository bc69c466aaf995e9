//! Turns laid out page contents into a PDF content stream.

use crate::font::Typeface;
use crate::page::{ImageLayout, PageContents, TextLayout};
use crate::rect::Rect;
use crate::transform::{flip_frame, image_frame};
use crate::units::Pt;
use crate::LabelError;
use id_arena::Arena;
use std::io::Write;

/// Renders page contents to a PDF content stream. Every item saves and restores the
/// graphics state around itself, so nothing leaks from one item into the next.
pub(crate) fn render_contents(
    contents: &[PageContents],
    page_height: Pt,
    fonts: &Arena<Typeface>,
) -> Result<Vec<u8>, LabelError> {
    let mut content: Vec<u8> = Vec::default();
    write_contents(&mut content, contents, page_height, fonts)?;
    Ok(content)
}

fn write_contents(
    content: &mut Vec<u8>,
    contents: &[PageContents],
    page_height: Pt,
    fonts: &Arena<Typeface>,
) -> Result<(), LabelError> {
    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(text) => render_text(content, text, page_height, fonts)?,
            PageContents::Image(image) => render_image(content, image, page_height)?,
            PageContents::Clipped { clip, contents } => {
                writeln!(content, "q")?;
                write_clip(content, clip, page_height)?;
                write_contents(content, contents, page_height, fonts)?;
                writeln!(content, "Q")?;
            }
        }
    }
    Ok(())
}

fn write_clip(content: &mut Vec<u8>, clip: &Rect, page_height: Pt) -> std::io::Result<()> {
    let r = clip.to_pdf(page_height);
    writeln!(
        content,
        "{} {} {} {} re W n",
        r.x1,
        r.y1,
        r.x2 - r.x1,
        r.y2 - r.y1
    )
}

fn render_image(
    content: &mut Vec<u8>,
    image: &ImageLayout,
    page_height: Pt,
) -> std::io::Result<()> {
    writeln!(content, "q")?;
    image_frame(&image.position, page_height).write_to_content(content)?;
    writeln!(content, "/I{} Do", image.image_id.index())?;
    writeln!(content, "Q")
}

/// Text is drawn in a frame flipped to run top-down, so every line's text matrix flips the
/// glyphs back upright at its baseline
fn render_text(
    content: &mut Vec<u8>,
    text: &TextLayout,
    page_height: Pt,
    fonts: &Arena<Typeface>,
) -> Result<(), LabelError> {
    let lines: Vec<&(String, Pt)> = text.lines.iter().filter(|(s, _)| !s.is_empty()).collect();
    if lines.is_empty() {
        return Ok(());
    }

    let typeface = &fonts[text.font.id];

    writeln!(content, "q")?;
    flip_frame(&text.frame, page_height).write_to_content(content)?;
    text.colour.write_fill(content)?;
    writeln!(content, "BT")?;
    writeln!(content, "/F{} {} Tf", text.font.id.index(), *text.font.size)?;
    for (line, baseline) in lines {
        writeln!(content, "1 0 0 -1 0 {} Tm", **baseline)?;
        write!(content, "<")?;
        for byte in typeface.encode(line)? {
            write!(content, "{byte:02x}")?;
        }
        writeln!(content, "> Tj")?;
    }
    writeln!(content, "ET")?;
    writeln!(content, "Q")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;
    use crate::font::StandardFont;
    use crate::page::SpanFont;

    fn text_layout(fonts: &mut Arena<Typeface>) -> TextLayout {
        let id = fonts.alloc(StandardFont::Helvetica.into());
        TextLayout {
            frame: Rect::from_xywh(Pt(10.0), Pt(20.0), Pt(100.0), Pt(12.0)),
            lines: vec![("Hi".to_string(), Pt(7.5)), (String::new(), Pt(17.5))],
            font: SpanFont { id, size: Pt(10.0) },
            colour: colours::BLACK,
        }
    }

    #[test]
    fn text_is_drawn_in_a_flipped_frame() {
        let mut fonts = Arena::new();
        let text = text_layout(&mut fonts);
        let stream =
            render_contents(&[PageContents::Text(text)], Pt(144.0), &fonts).unwrap();
        let stream = String::from_utf8(stream).unwrap();
        assert_eq!(
            stream,
            "q\n1 0 0 -1 10 124 cm\n0 g\nBT\n/F0 10 Tf\n1 0 0 -1 0 7.5 Tm\n<4869> Tj\nET\nQ\n"
        );
    }

    #[test]
    fn clipped_contents_are_wrapped_in_a_clip_path() {
        let mut fonts = Arena::new();
        let text = text_layout(&mut fonts);
        let clipped = PageContents::Clipped {
            clip: Rect::from_xywh(Pt(8.0), Pt(8.0), Pt(272.0), Pt(128.0)),
            contents: vec![PageContents::Text(text)],
        };
        let stream = render_contents(&[clipped], Pt(144.0), &fonts).unwrap();
        let stream = String::from_utf8(stream).unwrap();
        assert!(stream.starts_with("q\n8 8 272 128 re W n\nq\n"));
        assert!(stream.ends_with("Q\nQ\n"));
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut fonts = Arena::new();
        let mut text = text_layout(&mut fonts);
        text.lines.retain(|(s, _)| s.is_empty());
        let stream =
            render_contents(&[PageContents::Text(text)], Pt(144.0), &fonts).unwrap();
        assert!(stream.is_empty());
    }
}
