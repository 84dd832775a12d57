//! Backend de PDF
//!
//! Serializa las páginas ya maquetadas a un PDF con `lopdf`: árbol de
//! páginas explícito, fuentes Type1 integradas del visor (Helvetica y
//! Helvetica-Bold con WinAnsiEncoding) y flujos de contenido construidos
//! operación a operación. No toma decisiones de maquetado; todo llega
//! posicionado.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::error::ExportError;
use crate::layout::engine::{PageElement, PageLayout, PAGE_HEIGHT, PAGE_WIDTH};
use crate::render::Color;

/// Codifica texto a WinAnsi (superconjunto de Latin-1 con puntuación
/// tipográfica en 0x80..0x9F). Lo que no tiene código se sustituye por
/// `?` en vez de romper el flujo.
fn winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) <= 0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn rgb(color: Color) -> (f32, f32, f32) {
    (
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
    )
}

/// Flujo de contenido de una página
fn page_content(page: &PageLayout) -> Content {
    let mut operations = Vec::new();
    // Primero los rectángulos, después el texto, para que ninguna banda
    // tape una corrida ya escrita
    for element in &page.elements {
        if let PageElement::Rect(rect) = element {
            let y = PAGE_HEIGHT - rect.y - rect.height;
            if let Some(fill) = rect.fill {
                let (r, g, b) = rgb(fill);
                operations.push(Operation::new(
                    "rg",
                    vec![Object::Real(r), Object::Real(g), Object::Real(b)],
                ));
            }
            if let Some(stroke) = rect.stroke {
                let (r, g, b) = rgb(stroke);
                operations.push(Operation::new(
                    "RG",
                    vec![Object::Real(r), Object::Real(g), Object::Real(b)],
                ));
            }
            operations.push(Operation::new(
                "re",
                vec![
                    Object::Real(rect.x),
                    Object::Real(y),
                    Object::Real(rect.width),
                    Object::Real(rect.height),
                ],
            ));
            let op = match (rect.fill.is_some(), rect.stroke.is_some()) {
                (true, true) => "B",
                (true, false) => "f",
                _ => "S",
            };
            operations.push(Operation::new(op, vec![]));
        }
    }
    for element in &page.elements {
        if let PageElement::Text(text) = element {
            let (r, g, b) = rgb(text.color);
            let font = if text.bold { "F2" } else { "F1" };
            let baseline = PAGE_HEIGHT - text.y - text.size;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "rg",
                vec![Object::Real(r), Object::Real(g), Object::Real(b)],
            ));
            operations.push(Operation::new(
                "Tf",
                vec![font.into(), Object::Real(text.size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(text.x), Object::Real(baseline)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(winansi(&text.text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
    }
    Content { operations }
}

/// Serializa las páginas maquetadas a bytes de PDF
///
/// # Parámetros
/// - `pages`: páginas con todos los elementos posicionados
/// - `title`: título del documento para los metadatos
///
/// El resultado es determinista: no se escribe fecha de creación, así que
/// el mismo maquetado produce los mismos bytes.
pub fn render(pages: &[PageLayout], title: &str) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_regular,
            "F2" => font_bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let content = page_content(page);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
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
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(PAGE_WIDTH),
                Object::Real(PAGE_HEIGHT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(winansi(title), StringFormat::Literal),
        "Producer" => Object::string_literal("Planeador NEM"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
