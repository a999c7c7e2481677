//! PDF session summary.
//!
//! Letter pages set in the two standard Helvetica faces, one text-only
//! content stream per page. Layout is computed first, then serialized with
//! `pdf-writer`.

use std::path::Path;

use anyhow::{Context, Result};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use interviewsim_core::session::QaItem;

use crate::json::SessionMeta;

/// Default file name for the PDF export.
pub const DEFAULT_DOCUMENT_FILE: &str = "interview_summary.pdf";

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 40.0;
/// A new page starts before any question block that would begin below this line.
const PAGE_BREAK_Y: f32 = 120.0;

const QUESTION_CHARS: usize = 100;
const ANSWER_CHARS: usize = 180;
const FEEDBACK_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"F1"),
            Font::Bold => Name(b"F2"),
        }
    }
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq)]
struct Line {
    font: Font,
    size: f32,
    y: f32,
    text: String,
}

/// Places lines top-down, page by page.
struct PageWriter {
    pages: Vec<Vec<Line>>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn line(&mut self, font: Font, size: f32, text: &str, advance: f32) {
        let line = Line {
            font,
            size,
            y: self.y,
            text: sanitize(text),
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(line);
        }
        self.y -= advance;
    }
}

/// First `max` characters of `s`.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Anything outside printable ASCII becomes `?`; the standard fonts carry
/// no Unicode mapping.
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if matches!(c, ' '..='~') { c } else { '?' })
        .collect()
}

fn layout(meta: &SessionMeta, items: &[QaItem]) -> Vec<Vec<Line>> {
    let mut writer = PageWriter::new();

    writer.line(
        Font::Bold,
        16.0,
        &format!("Interview Summary - {} ({})", meta.role, meta.mode),
        28.0,
    );
    writer.line(
        Font::Regular,
        11.0,
        &format!(
            "Domain: {}   Questions: {}   Avg score: {:.2}",
            meta.domain,
            items.len(),
            meta.avg_score
        ),
        20.0,
    );

    for (i, item) in items.iter().enumerate() {
        if writer.y < PAGE_BREAK_Y {
            writer.new_page();
        }

        writer.line(
            Font::Bold,
            12.0,
            &format!("Q{}: {}", i + 1, truncate_chars(&item.question, QUESTION_CHARS)),
            14.0,
        );

        let answer = if item.skipped || item.answer.is_empty() {
            "(skipped)".to_string()
        } else {
            truncate_chars(&item.answer, ANSWER_CHARS).replace(['\n', '\r'], " ")
        };
        writer.line(Font::Regular, 10.0, &format!("Answer: {answer}"), 14.0);

        writer.line(
            Font::Regular,
            10.0,
            &format!(
                "Score: {:.1}  Feedback: {}",
                item.eval.score,
                truncate_chars(&item.eval.feedback, FEEDBACK_CHARS)
            ),
            20.0,
        );
    }

    writer.pages
}

/// Render the session summary as PDF bytes.
pub fn to_document(meta: &SessionMeta, items: &[QaItem]) -> Vec<u8> {
    let pages = layout(meta, items);

    let catalog_id = Ref::new(1);
    let tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    // Each page object is followed by its content stream.
    let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32)
        .map(|i| (Ref::new(5 + i * 2), Ref::new(6 + i * 2)))
        .collect();

    let mut pdf = Pdf::new();
    pdf.set_version(1, 4);
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|&(page_id, _)| page_id))
        .count(page_ids.len() as i32);
    pdf.type1_font(regular_id).base_font(Name(b"Helvetica"));
    pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));

    for (lines, &(page_id, content_id)) in pages.iter().zip(&page_ids) {
        {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            page.parent(tree_id);
            page.contents(content_id);
            page.resources()
                .fonts()
                .pair(Font::Regular.resource(), regular_id)
                .pair(Font::Bold.resource(), bold_id);
        }

        let mut content = Content::new();
        for line in lines {
            content.begin_text();
            content.set_font(line.font.resource(), line.size);
            content.next_line(MARGIN, line.y);
            content.show(Str(line.text.as_bytes()));
            content.end_text();
        }
        pdf.stream(content_id, &content.finish());
    }

    pdf.finish()
}

/// Write the PDF export to `path`, creating parent directories.
pub fn write_document_export(meta: &SessionMeta, items: &[QaItem], path: &Path) -> Result<()> {
    let bytes = to_document(meta, items);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write PDF summary to {}", path.display()))?;
    Ok(())
}
