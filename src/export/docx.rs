//! Backend de documento Word (OOXML)
//!
//! Word es un formato de flujo, no de páginas fijas, así que este
//! adaptador consume los primitivos directamente: los bloques de texto se
//! vuelven párrafos, las tablas se vuelven `w:tbl` y la numeración de
//! hojas se delega a los campos `PAGE`/`NUMPAGES` del pie de página, que
//! el visor resuelve al paginar. El paquete se arma a mano: un ZIP con
//! las partes XML mínimas del formato.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;
use crate::render::{Align, Primitive, Table, TextBlock};

/// Ancho útil de página A4 con márgenes de 18 mm, en veinteavos de punto
const CONTENT_TWIPS: f32 = 9866.0;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:cs="Arial"/><w:sz w:val="16"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="60"/></w:pPr></w:pPrDefault></w:docDefaults></w:styles>"#;

/// Pie con numeración por campos: "Hoja PAGE de NUMPAGES | ..."
const FOOTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:sz w:val="14"/><w:color w:val="969696"/></w:rPr><w:t xml:space="preserve">Hoja </w:t></w:r><w:fldSimple w:instr=" PAGE "><w:r><w:rPr><w:sz w:val="14"/><w:color w:val="969696"/></w:rPr><w:t>1</w:t></w:r></w:fldSimple><w:r><w:rPr><w:sz w:val="14"/><w:color w:val="969696"/></w:rPr><w:t xml:space="preserve"> de </w:t></w:r><w:fldSimple w:instr=" NUMPAGES "><w:r><w:rPr><w:sz w:val="14"/><w:color w:val="969696"/></w:rPr><w:t>1</w:t></w:r></w:fldSimple><w:r><w:rPr><w:sz w:val="14"/><w:color w:val="969696"/></w:rPr><w:t xml:space="preserve"> | Planeador Maestro NEM Pro+</w:t></w:r></w:p></w:ftr>"#;

fn xml_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Docx(e.to_string())
}

/// Escritor de XML con los eventos de `quick-xml`
struct Xml {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl Xml {
    fn new() -> Result<Self, ExportError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)?;
        Ok(Self { writer })
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        let mut el = BytesStart::new(name);
        for attr in attrs {
            el.push_attribute(*attr);
        }
        self.writer.write_event(Event::Start(el)).map_err(xml_err)
    }

    fn close(&mut self, name: &str) -> Result<(), ExportError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        let mut el = BytesStart::new(name);
        for attr in attrs {
            el.push_attribute(*attr);
        }
        self.writer.write_event(Event::Empty(el)).map_err(xml_err)
    }

    fn text(&mut self, content: &str) -> Result<(), ExportError> {
        self.writer
            .write_event(Event::Text(BytesText::new(content)))
            .map_err(xml_err)
    }

    fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner().into_inner()
    }
}

/// Medias unidades de punto de OOXML
fn half_points(size: f32) -> String {
    ((size * 2.0).round() as u32).to_string()
}

fn twips(points: f32) -> String {
    ((points * 20.0).round() as i64).to_string()
}

/// Corridas de un texto; los saltos de línea internos se vuelven `w:br`
fn write_runs(
    xml: &mut Xml,
    text: &str,
    size: f32,
    bold: bool,
    color: Option<&str>,
) -> Result<(), ExportError> {
    xml.open("w:r", &[])?;
    xml.open("w:rPr", &[])?;
    if bold {
        xml.empty("w:b", &[])?;
    }
    xml.empty("w:sz", &[("w:val", half_points(size).as_str())])?;
    if let Some(hex) = color {
        xml.empty("w:color", &[("w:val", hex)])?;
    }
    xml.close("w:rPr")?;
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            xml.empty("w:br", &[])?;
        }
        xml.open("w:t", &[("xml:space", "preserve")])?;
        xml.text(line)?;
        xml.close("w:t")?;
    }
    xml.close("w:r")
}

fn write_text_block(xml: &mut Xml, block: &TextBlock) -> Result<(), ExportError> {
    xml.open("w:p", &[])?;
    xml.open("w:pPr", &[])?;
    if let Some(fill) = block.band_fill {
        let hex = fill.to_hex();
        xml.empty(
            "w:shd",
            &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", hex.as_str())],
        )?;
    }
    xml.empty("w:spacing", &[("w:after", twips(block.space_after).as_str())])?;
    xml.close("w:pPr")?;
    write_runs(
        xml,
        &block.text,
        block.size,
        block.bold,
        Some(&block.color.to_hex()),
    )?;
    xml.close("w:p")
}

fn write_page_break(xml: &mut Xml) -> Result<(), ExportError> {
    xml.open("w:p", &[])?;
    xml.open("w:r", &[])?;
    xml.empty("w:br", &[("w:type", "page")])?;
    xml.close("w:r")?;
    xml.close("w:p")
}

fn write_table(xml: &mut Xml, table: &Table) -> Result<(), ExportError> {
    let col_twips: Vec<String> = table
        .widths
        .iter()
        .map(|f| ((f * CONTENT_TWIPS).round() as i64).to_string())
        .collect();

    xml.open("w:tbl", &[])?;
    xml.open("w:tblPr", &[])?;
    xml.empty("w:tblW", &[("w:w", "9866"), ("w:type", "dxa")])?;
    xml.empty("w:tblLayout", &[("w:type", "fixed")])?;
    xml.open("w:tblBorders", &[])?;
    for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        xml.empty(
            side,
            &[("w:val", "single"), ("w:sz", "4"), ("w:color", "B4B4B4")],
        )?;
    }
    xml.close("w:tblBorders")?;
    xml.close("w:tblPr")?;

    xml.open("w:tblGrid", &[])?;
    for w in &col_twips {
        xml.empty("w:gridCol", &[("w:w", w.as_str())])?;
    }
    xml.close("w:tblGrid")?;

    if let Some(band) = &table.band {
        let span = table.widths.len().max(1).to_string();
        let fill = band.fill.to_hex();
        xml.open("w:tr", &[])?;
        xml.open("w:tc", &[])?;
        xml.open("w:tcPr", &[])?;
        xml.empty("w:gridSpan", &[("w:val", span.as_str())])?;
        xml.empty(
            "w:shd",
            &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill.as_str())],
        )?;
        xml.close("w:tcPr")?;
        xml.open("w:p", &[])?;
        write_runs(xml, &band.text, table.font_size + 0.5, true, Some("FFFFFF"))?;
        xml.close("w:p")?;
        xml.close("w:tc")?;
        xml.close("w:tr")?;
    }

    for row in &table.rows {
        xml.open("w:tr", &[])?;
        for (cell, width) in row.cells.iter().zip(&col_twips) {
            xml.open("w:tc", &[])?;
            xml.open("w:tcPr", &[])?;
            xml.empty("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
            if let Some(fill) = cell.fill {
                let hex = fill.to_hex();
                xml.empty(
                    "w:shd",
                    &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", hex.as_str())],
                )?;
            }
            xml.close("w:tcPr")?;
            xml.open("w:p", &[])?;
            if cell.align == Align::Center {
                xml.open("w:pPr", &[])?;
                xml.empty("w:jc", &[("w:val", "center")])?;
                xml.close("w:pPr")?;
            }
            let color_hex = cell.color.map(|c| c.to_hex());
            write_runs(
                xml,
                &cell.text,
                table.font_size,
                cell.bold,
                color_hex.as_deref(),
            )?;
            xml.close("w:p")?;
            xml.close("w:tc")?;
        }
        xml.close("w:tr")?;
    }
    xml.close("w:tbl")?;
    // Separador entre tablas consecutivas
    xml.open("w:p", &[])?;
    xml.close("w:p")
}

/// Parte principal del documento
fn document_xml(primitives: &[Primitive]) -> Result<Vec<u8>, ExportError> {
    let mut xml = Xml::new()?;
    xml.open(
        "w:document",
        &[
            (
                "xmlns:w",
                "http://schemas.openxmlformats.org/wordprocessingml/2006/main",
            ),
            (
                "xmlns:r",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
            ),
        ],
    )?;
    xml.open("w:body", &[])?;

    for primitive in primitives {
        match primitive {
            Primitive::Text(block) => write_text_block(&mut xml, block)?,
            Primitive::Table(table) => write_table(&mut xml, table)?,
            Primitive::PageBreak => write_page_break(&mut xml)?,
        }
    }

    xml.open("w:sectPr", &[])?;
    xml.empty(
        "w:footerReference",
        &[("w:type", "default"), ("r:id", "rId2")],
    )?;
    xml.empty("w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", "1020"),
            ("w:right", "1020"),
            ("w:bottom", "1020"),
            ("w:left", "1020"),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.close("w:sectPr")?;
    xml.close("w:body")?;
    xml.close("w:document")?;
    Ok(xml.into_bytes())
}

/// Metadatos del paquete
fn core_xml(title: &str) -> Result<Vec<u8>, ExportError> {
    let mut xml = Xml::new()?;
    xml.open(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.open("dc:title", &[])?;
    xml.text(title)?;
    xml.close("dc:title")?;
    xml.open("dc:creator", &[])?;
    xml.text("Planeador NEM")?;
    xml.close("dc:creator")?;
    xml.open("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")])?;
    xml.text(&chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string())?;
    xml.close("dcterms:created")?;
    xml.close("cp:coreProperties")?;
    Ok(xml.into_bytes())
}

/// Serializa los primitivos a un paquete Word
pub fn render(primitives: &[Primitive], title: &str) -> Result<Vec<u8>, ExportError> {
    let document = document_xml(primitives)?;
    let core = core_xml(title)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("word/document.xml", document.as_slice()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
        ("word/styles.xml", STYLES.as_bytes()),
        ("word/footer1.xml", FOOTER.as_bytes()),
        ("docProps/core.xml", core.as_slice()),
    ];
    for (name, bytes) in parts {
        zip.start_file(name, options)?;
        zip.write_all(bytes)
            .map_err(|e| ExportError::Docx(e.to_string()))?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use crate::render::{build_sections, Theme};
    use serde_json::json;
    use std::io::Read;
    use zip::ZipArchive;

    fn leer_parte(bytes: &[u8], nombre: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut parte = archive.by_name(nombre).unwrap();
        let mut contenido = String::new();
        parte.read_to_string(&mut contenido).unwrap();
        contenido
    }

    #[test]
    fn test_paquete_word_completo() {
        let plan = normalize(&json!({
            "titulo_proyecto": "Huerto & Escuela",
            "nombre_escuela": "Esc. Benito Juárez",
            "nombre_docente": "María Pérez"
        }))
        .unwrap();
        let prims = build_sections(&plan, &Theme::default());
        let bytes = render(&prims, &plan.titulo_proyecto).unwrap();

        // Firma ZIP y partes obligatorias del paquete
        assert!(bytes.starts_with(b"PK\x03\x04"));
        let mut archive = ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        for nombre in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/footer1.xml",
            "docProps/core.xml",
        ] {
            assert!(archive.by_name(nombre).is_ok(), "falta {}", nombre);
        }

        let doc = leer_parte(&bytes, "word/document.xml");
        assert!(doc.contains("MALLA CURRICULAR"));
        assert!(doc.contains("ESC. BENITO JUÁREZ"));
        // El ampersand del título viaja escapado
        assert!(doc.contains("HUERTO &amp; ESCUELA"));
        // Salto de página explícito antes de la secuencia
        assert!(doc.contains(r#"<w:br w:type="page"/>"#));

        let core = leer_parte(&bytes, "docProps/core.xml");
        assert!(core.contains("Huerto &amp; Escuela"));
    }

    #[test]
    fn test_pie_con_campos_de_numeracion() {
        assert!(FOOTER.contains(" PAGE "));
        assert!(FOOTER.contains(" NUMPAGES "));
    }
}
