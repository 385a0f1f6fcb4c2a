//! lopdf backend: serialises composed pages into a PDF 1.7 file using the
//! standard Helvetica faces (no font embedding).

use async_trait::async_trait;
use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::render::composer::{compose, Mark, Page, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use crate::render::layout::ResumeLayout;
use crate::render::text_metrics::FontFace;
use crate::render::{PdfBackend, RenderError};

const BACKEND_NAME: &str = "lopdf";

/// Document information dictionary entries.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    /// PDF date string, e.g. "D:20260304091500".
    pub created: String,
}

impl DocumentInfo {
    pub fn for_layout(layout: &ResumeLayout) -> Self {
        let name = &layout.personal_info.name;
        Self {
            title: if name.is_empty() {
                "Resume".to_string()
            } else {
                format!("{name} - Resume")
            },
            author: name.clone(),
            created: Local::now().format("D:%Y%m%d%H%M%S").to_string(),
        }
    }
}

pub struct LopdfBackend;

#[async_trait]
impl PdfBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn render(&self, layout: &ResumeLayout) -> Result<Vec<u8>, RenderError> {
        // Owned copy for the 'static closure.
        let layout = layout.clone();
        tokio::task::spawn_blocking(move || render_blocking(&layout))
            .await
            .map_err(|e| RenderError::Backend {
                backend: BACKEND_NAME,
                message: format!("render task panicked: {e}"),
            })?
    }
}

/// Composes and serialises `layout` on the current thread.
pub fn render_blocking(layout: &ResumeLayout) -> Result<Vec<u8>, RenderError> {
    let pages = compose(layout);
    debug!(pages = pages.len(), "Composed resume layout");
    build_document(&pages, &DocumentInfo::for_layout(layout))
}

pub fn build_document(pages: &[Page], info: &DocumentInfo) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(FontFace::Regular));
    let bold_id = doc.add_object(font_dictionary(FontFace::Bold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontFace::Regular.resource_name() => regular_id,
            FontFace::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(page);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(&info.title),
        "Author" => text_string(&info.author),
        "Producer" => text_string(concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(info.created.as_str()),
    });
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(|e| RenderError::Backend {
        backend: BACKEND_NAME,
        message: e.to_string(),
    })?;
    Ok(bytes)
}

fn font_dictionary(face: FontFace) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn page_content(page: &Page) -> Content {
    let mut operations = Vec::new();
    for mark in &page.marks {
        match mark {
            Mark::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![face.resource_name().into(), (*size).into()],
                ));
                operations.push(Operation::new("rg", rgb_operands(*color)));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                operations.push(Operation::new("Tj", vec![text_string(text)]));
                operations.push(Operation::new("ET", vec![]));
            }
            Mark::Rule {
                x1,
                x2,
                y,
                width,
                color,
            } => {
                operations.push(Operation::new("RG", rgb_operands(*color)));
                operations.push(Operation::new("w", vec![(*width).into()]));
                operations.push(Operation::new("m", vec![(*x1).into(), (*y).into()]));
                operations.push(Operation::new("l", vec![(*x2).into(), (*y).into()]));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }
    Content { operations }
}

fn rgb_operands(Rgb(r, g, b): Rgb) -> Vec<Object> {
    vec![r.into(), g.into(), b.into()]
}

fn text_string(text: &str) -> Object {
    Object::String(encode_win_ansi(text), StringFormat::Literal)
}

/// Encodes `text` for a WinAnsiEncoding font. Characters outside the code page
/// become '?', control characters become spaces.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            c if c.is_control() => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8a,
            '‹' => 0x8b,
            'Œ' => 0x8c,
            'Ž' => 0x8e,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9a,
            '›' => 0x9b,
            'œ' => 0x9c,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            _ => b'?',
        })
        .collect()
}
