//! Page composition: places the layout regions onto A4 pages as positioned
//! text runs and horizontal rules. Pure geometry; no PDF objects here.
//!
//! Coordinates are PDF user space (points, origin bottom-left). The cursor
//! moves down the page; a new page starts whenever the next block would run
//! into the bottom margin, so output is as long as the content needs.

use crate::render::layout::ResumeLayout;
use crate::render::text_metrics::{get_metrics, FontFace};

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 42.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const FOOTER_BAND: f32 = 18.0;
const LEADING: f32 = 1.3;

const NAME_SIZE: f32 = 22.0;
const CONTACT_SIZE: f32 = 9.5;
const HEADING_SIZE: f32 = 11.0;
const TITLE_SIZE: f32 = 10.5;
const BODY_SIZE: f32 = 9.5;
const FOOTER_SIZE: f32 = 7.5;
const BULLET_INDENT: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

pub const INK: Rgb = Rgb(0.13, 0.13, 0.13);
pub const MUTED: Rgb = Rgb(0.42, 0.42, 0.42);
pub const ACCENT: Rgb = Rgb(0.11, 0.33, 0.55);

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub marks: Vec<Mark>,
}

#[cfg(test)]
impl Page {
    /// All text on the page, in drawing order.
    pub fn text(&self) -> Vec<&str> {
        self.marks
            .iter()
            .filter_map(|m| match m {
                Mark::Text { text, .. } => Some(text.as_str()),
                Mark::Rule { .. } => None,
            })
            .collect()
    }
}

struct Composer {
    pages: Vec<Page>,
    cursor_y: f32,
}

impl Composer {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            cursor_y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn page(&mut self) -> &mut Page {
        // `pages` starts non-empty and only grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Starts a new page if `height` points do not fit above the footer band.
    fn reserve(&mut self, height: f32) {
        if self.cursor_y - height < MARGIN + FOOTER_BAND && !self.page().marks.is_empty() {
            self.pages.push(Page::default());
            self.cursor_y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn gap(&mut self, points: f32) {
        self.cursor_y -= points;
    }

    fn put(&mut self, x: f32, face: FontFace, size: f32, color: Rgb, text: &str) {
        let y = self.cursor_y - size;
        self.page().marks.push(Mark::Text {
            x,
            y,
            face,
            size,
            color,
            text: text.to_string(),
        });
    }

    /// One line of text plus an optional right-aligned companion (dates, years).
    fn line(&mut self, left: (&str, FontFace, f32, Rgb), right: Option<(&str, Rgb)>) {
        let (text, face, size, color) = left;
        self.reserve(size * LEADING);
        self.put(MARGIN, face, size, color, text);
        if let Some((right_text, right_color)) = right {
            let width = get_metrics(FontFace::Regular).measure_str(right_text, BODY_SIZE);
            self.put(
                PAGE_WIDTH - MARGIN - width,
                FontFace::Regular,
                BODY_SIZE,
                right_color,
                right_text,
            );
        }
        self.cursor_y -= size * LEADING;
    }

    fn paragraph(&mut self, text: &str, face: FontFace, size: f32, color: Rgb, indent: f32) {
        let lines = get_metrics(face).wrap_lines(text, size, CONTENT_WIDTH - indent);
        for line in lines {
            self.reserve(size * LEADING);
            self.put(MARGIN + indent, face, size, color, &line);
            self.cursor_y -= size * LEADING;
        }
    }

    fn bullet(&mut self, text: &str) {
        let lines = get_metrics(FontFace::Regular).wrap_lines(
            text,
            BODY_SIZE,
            CONTENT_WIDTH - BULLET_INDENT,
        );
        for (i, line) in lines.iter().enumerate() {
            self.reserve(BODY_SIZE * LEADING);
            if i == 0 {
                self.put(MARGIN + 3.0, FontFace::Regular, BODY_SIZE, ACCENT, "•");
            }
            self.put(MARGIN + BULLET_INDENT, FontFace::Regular, BODY_SIZE, INK, line);
            self.cursor_y -= BODY_SIZE * LEADING;
        }
    }

    /// "Label: items" with the label in bold and the items wrapping under it.
    fn labelled(&mut self, label: &str, body: &str) {
        let label = format!("{label}: ");
        let label_width = get_metrics(FontFace::Bold).measure_str(&label, BODY_SIZE);
        let lines = get_metrics(FontFace::Regular).wrap_lines_hanging(
            body,
            BODY_SIZE,
            CONTENT_WIDTH - label_width,
            CONTENT_WIDTH,
        );
        self.reserve(BODY_SIZE * LEADING);
        self.put(MARGIN, FontFace::Bold, BODY_SIZE, INK, &label);
        if lines.is_empty() {
            self.cursor_y -= BODY_SIZE * LEADING;
        }
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.reserve(BODY_SIZE * LEADING);
            }
            let x = if i == 0 { MARGIN + label_width } else { MARGIN };
            self.put(x, FontFace::Regular, BODY_SIZE, INK, line);
            self.cursor_y -= BODY_SIZE * LEADING;
        }
    }

    fn heading(&mut self, title: &str) {
        // Keep a heading together with at least two lines of its section.
        self.reserve(HEADING_SIZE * LEADING + 6.0 + 2.0 * TITLE_SIZE * LEADING);
        self.gap(8.0);
        self.put(MARGIN, FontFace::Bold, HEADING_SIZE, ACCENT, title);
        self.cursor_y -= HEADING_SIZE * LEADING;
        let y = self.cursor_y + 2.0;
        self.page().marks.push(Mark::Rule {
            x1: MARGIN,
            x2: PAGE_WIDTH - MARGIN,
            y,
            width: 0.6,
            color: ACCENT,
        });
        self.gap(4.0);
    }

    /// Stamps "generated at" and page numbers into every page's footer band.
    fn finish(mut self, generated_at: &str) -> Vec<Page> {
        let total = self.pages.len();
        let metrics = get_metrics(FontFace::Regular);
        for (i, page) in self.pages.iter_mut().enumerate() {
            let footer = if generated_at.is_empty() {
                format!("Page {} of {total}", i + 1)
            } else {
                format!("Generated on {generated_at}  ·  Page {} of {total}", i + 1)
            };
            let width = metrics.measure_str(&footer, FOOTER_SIZE);
            page.marks.push(Mark::Text {
                x: (PAGE_WIDTH - width) / 2.0,
                y: MARGIN / 2.0,
                face: FontFace::Regular,
                size: FOOTER_SIZE,
                color: MUTED,
                text: footer,
            });
        }
        self.pages
    }
}

/// Lays the résumé out onto one or more pages. Empty regions are skipped.
pub fn compose(layout: &ResumeLayout) -> Vec<Page> {
    let mut c = Composer::new();
    let info = &layout.personal_info;

    // Header
    if !info.name.is_empty() {
        c.line((info.name.as_str(), FontFace::Bold, NAME_SIZE, INK), None);
    }
    let contacts = info.contact_line().join("  |  ");
    if !contacts.is_empty() {
        c.paragraph(&contacts, FontFace::Regular, CONTACT_SIZE, MUTED, 0.0);
    }

    if let Some(summary) = &layout.summary {
        c.heading("PROFESSIONAL SUMMARY");
        c.paragraph(summary, FontFace::Regular, BODY_SIZE, INK, 0.0);
    }

    if !layout.experience.is_empty() {
        c.heading("EXPERIENCE");
        for job in &layout.experience {
            let duration = job.duration.as_deref().map(|d| (d, MUTED));
            c.line((job.role.as_str(), FontFace::Bold, TITLE_SIZE, INK), duration);
            if !job.company.is_empty() {
                c.line((job.company.as_str(), FontFace::Regular, BODY_SIZE, ACCENT), None);
            }
            for achievement in &job.achievements {
                c.bullet(achievement);
            }
            c.gap(4.0);
        }
    }

    if !layout.skills.is_empty() {
        c.heading("SKILLS");
        for group in &layout.skills {
            c.labelled(&group.category, &group.items.join(", "));
        }
    }

    if !layout.education.is_empty() {
        c.heading("EDUCATION");
        for school in &layout.education {
            let year = school.graduation_year.as_deref().map(|y| (y, MUTED));
            c.line((school.school.as_str(), FontFace::Bold, TITLE_SIZE, INK), year);
            if !school.degree.is_empty() {
                c.line((school.degree.as_str(), FontFace::Regular, BODY_SIZE, INK), None);
            }
            c.gap(2.0);
        }
    }

    c.finish(&layout.generated_at)
}
