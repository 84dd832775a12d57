//! Motor de paginación
//!
//! Máquina de estados sobre un cursor `(página actual, desplazamiento
//! vertical)`: acumula elementos mientras queda espacio y salta de página
//! cuando el siguiente elemento no cabe o cuando llega una sugerencia
//! explícita de salto. Reglas:
//!
//! - Un bloque de texto se parte línea a línea, así que un párrafo largo
//!   puede continuar en la página siguiente.
//! - Una fila de tabla es atómica: nunca se parte entre dos páginas,
//!   aunque la tabla completa sí puede repartirse en varias.
//! - La numeración ("Hoja N de TOTAL") se estampa en una pasada final,
//!   cuando ya se conoce el total de páginas.
//!
//! Las coordenadas internas crecen hacia abajo desde el borde superior;
//! el backend de PDF hace la conversión a su sistema de ejes.

use crate::layout::metrics::{text_width, wrap_text};
use crate::render::{Align, Color, Primitive, Row, Table, TextBlock, Theme};

/// Tamaño de página A4 vertical, en puntos
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

/// Interlineado relativo al tamaño de letra
const LINE_FACTOR: f32 = 1.35;
/// Relleno interior de las celdas
const CELL_PAD: f32 = 4.0;
/// Separación tras cada tabla
const TABLE_SPACING: f32 = 8.0;
/// Espacio reservado al pie para la numeración
const BOTTOM_RESERVE: f32 = 42.0;
/// Línea base del pie, medida desde el borde inferior
const FOOTER_BASELINE: f32 = 28.0;
const FOOTER_SIZE: f32 = 7.0;

/// Color del trazo de la retícula de tablas
const GRID: Color = Color::new(180, 180, 180);

/// Texto ya posicionado
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    /// Borde superior de la línea, medido desde arriba
    pub y: f32,
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub color: Color,
}

/// Rectángulo ya posicionado (relleno, trazo o ambos)
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageElement {
    Text(PlacedText),
    Rect(PlacedRect),
}

/// Página maquetada
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub elements: Vec<PageElement>,
}

/// Motor de maquetado de una exportación
///
/// Se construye, coloca todos los primitivos y se consume con
/// [`LayoutEngine::finish`]. Cada exportación crea el suyo; no hay estado
/// compartido entre llamadas concurrentes.
pub struct LayoutEngine<'a> {
    theme: &'a Theme,
    pages: Vec<PageLayout>,
    cursor_y: f32,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            pages: vec![PageLayout::default()],
            cursor_y: theme.margen,
        }
    }

    fn content_width(&self) -> f32 {
        PAGE_WIDTH - 2.0 * self.theme.margen
    }

    fn content_bottom(&self) -> f32 {
        PAGE_HEIGHT - BOTTOM_RESERVE
    }

    fn current_page(&mut self) -> &mut PageLayout {
        self.pages.last_mut().expect("siempre hay una página activa")
    }

    fn break_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.cursor_y = self.theme.margen;
    }

    /// Coloca toda la secuencia de primitivos en orden
    pub fn place_all(&mut self, primitives: &[Primitive]) {
        for primitive in primitives {
            match primitive {
                Primitive::Text(block) => self.place_text(block),
                Primitive::Table(table) => self.place_table(table),
                Primitive::PageBreak => self.break_page(),
            }
        }
    }

    /// Coloca un bloque de texto, línea a línea
    ///
    /// Si el bloque lleva banda, cada línea dibuja su tramo de banda a
    /// todo lo ancho de la página; las líneas contiguas forman una banda
    /// continua.
    fn place_text(&mut self, block: &TextBlock) {
        let line_h = block.size * LINE_FACTOR;
        let lines = wrap_text(&block.text, self.content_width(), block.size, block.bold);
        let margen = self.theme.margen;

        for line in lines {
            if self.cursor_y + line_h > self.content_bottom() {
                self.break_page();
            }
            let y = self.cursor_y;
            if let Some(fill) = block.band_fill {
                self.current_page().elements.push(PageElement::Rect(PlacedRect {
                    x: 0.0,
                    y,
                    width: PAGE_WIDTH,
                    height: line_h + block.space_after,
                    fill: Some(fill),
                    stroke: None,
                }));
            }
            self.current_page().elements.push(PageElement::Text(PlacedText {
                x: margen,
                y,
                text: line,
                size: block.size,
                bold: block.bold,
                color: block.color,
            }));
            self.cursor_y += line_h;
        }
        self.cursor_y += block.space_after;
    }

    /// Coloca una tabla con filas atómicas
    fn place_table(&mut self, table: &Table) {
        let content_w = self.content_width();
        let col_widths: Vec<f32> = table.widths.iter().map(|f| f * content_w).collect();

        if let Some(band) = &table.band {
            self.place_table_band(table, &band.text, band.fill, &col_widths);
        }

        for row in &table.rows {
            self.place_table_row(table, row, &col_widths);
        }
        self.cursor_y += TABLE_SPACING;
    }

    /// Banda de título de la tabla
    ///
    /// Para no dejar una banda huérfana al pie, se comprueba que quepa la
    /// banda junto con la primera fila antes de colocarla.
    fn place_table_band(&mut self, table: &Table, text: &str, fill: Color, col_widths: &[f32]) {
        let size = table.font_size + 0.5;
        let line_h = size * LINE_FACTOR;
        let content_w: f32 = col_widths.iter().sum();
        let lines = wrap_text(text, content_w - 2.0 * CELL_PAD, size, true);
        let band_h = lines.len() as f32 * line_h + 2.0 * CELL_PAD;

        let first_row_h = table
            .rows
            .first()
            .map(|row| self.row_height(table, row, col_widths))
            .unwrap_or(0.0);
        if self.cursor_y + band_h + first_row_h > self.content_bottom() {
            self.break_page();
        }

        let x = self.theme.margen;
        let y = self.cursor_y;
        self.current_page().elements.push(PageElement::Rect(PlacedRect {
            x,
            y,
            width: content_w,
            height: band_h,
            fill: Some(fill),
            stroke: Some(GRID),
        }));
        for (i, line) in lines.iter().enumerate() {
            self.current_page().elements.push(PageElement::Text(PlacedText {
                x: x + CELL_PAD,
                y: y + CELL_PAD + i as f32 * line_h,
                text: line.clone(),
                size,
                bold: true,
                color: crate::render::WHITE,
            }));
        }
        self.cursor_y += band_h;
    }

    fn row_height(&self, table: &Table, row: &Row, col_widths: &[f32]) -> f32 {
        let line_h = table.font_size * LINE_FACTOR;
        let mut max_lines = 1usize;
        for (cell, width) in row.cells.iter().zip(col_widths) {
            let lines = wrap_text(&cell.text, width - 2.0 * CELL_PAD, table.font_size, cell.bold);
            max_lines = max_lines.max(lines.len());
        }
        max_lines as f32 * line_h + 2.0 * CELL_PAD
    }

    /// Coloca una fila completa o salta de página
    ///
    /// La fila nunca se parte: si no cabe en el espacio restante se pasa
    /// íntegra a una página nueva. Una fila más alta que una página entera
    /// se coloca al inicio de página limpia tal cual.
    fn place_table_row(&mut self, table: &Table, row: &Row, col_widths: &[f32]) {
        let line_h = table.font_size * LINE_FACTOR;
        let row_h = self.row_height(table, row, col_widths);

        let available_full = self.content_bottom() - self.theme.margen;
        if self.cursor_y + row_h > self.content_bottom()
            && (row_h <= available_full || self.cursor_y > self.theme.margen)
        {
            self.break_page();
        }

        let y = self.cursor_y;
        let mut x = self.theme.margen;
        for (cell, &width) in row.cells.iter().zip(col_widths) {
            self.current_page().elements.push(PageElement::Rect(PlacedRect {
                x,
                y,
                width,
                height: row_h,
                fill: cell.fill,
                stroke: Some(GRID),
            }));
            let text_color = cell.color.unwrap_or(self.theme.color_texto);
            let lines = wrap_text(&cell.text, width - 2.0 * CELL_PAD, table.font_size, cell.bold);
            for (i, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let line_x = match cell.align {
                    Align::Left => x + CELL_PAD,
                    Align::Center => {
                        let w = text_width(line, table.font_size, cell.bold);
                        x + (width - w) / 2.0
                    }
                };
                self.current_page().elements.push(PageElement::Text(PlacedText {
                    x: line_x,
                    y: y + CELL_PAD + i as f32 * line_h,
                    text: line.clone(),
                    size: table.font_size,
                    bold: cell.bold,
                    color: text_color,
                }));
            }
            x += width;
        }
        self.cursor_y += row_h;
    }

    /// Pasada final: estampa "Hoja N de TOTAL" en cada página
    ///
    /// El total solo se conoce al terminar el maquetado, por eso la
    /// numeración no puede hacerse en línea.
    pub fn finish(mut self) -> Vec<PageLayout> {
        let total = self.pages.len();
        let footer_y = PAGE_HEIGHT - FOOTER_BASELINE;
        let pie = self.theme.pie_pagina.clone();
        let color = self.theme.color_tenue;
        for (i, page) in self.pages.iter_mut().enumerate() {
            let text = format!("Hoja {} de {} | {}", i + 1, total, pie);
            let w = text_width(&text, FOOTER_SIZE, false);
            page.elements.push(PageElement::Text(PlacedText {
                x: (PAGE_WIDTH - w) / 2.0,
                y: footer_y,
                text,
                size: FOOTER_SIZE,
                bold: false,
                color,
            }));
        }
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Band, Cell, Primitive, Row, Table, TextBlock, Theme};

    fn texts(page: &PageLayout) -> Vec<&PlacedText> {
        page.elements
            .iter()
            .filter_map(|e| match e {
                PageElement::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn simple_table(rows: usize, cell_text: &str) -> Table {
        Table {
            band: Some(Band {
                text: "FASE DE PRUEBA".to_string(),
                fill: Color::new(15, 23, 42),
            }),
            rows: (0..rows)
                .map(|i| {
                    Row::new(vec![
                        Cell::text(format!("SESIÓN {}", i + 1)).bold().centered(),
                        Cell::text(cell_text),
                    ])
                })
                .collect(),
            widths: vec![0.15, 0.85],
            font_size: 7.0,
        }
    }

    #[test]
    fn test_salto_explicito_abre_pagina_nueva() {
        let theme = Theme::default();
        let mut engine = LayoutEngine::new(&theme);
        engine.place_all(&[
            Primitive::Text(TextBlock::new("uno", 10.0, theme.color_texto)),
            Primitive::PageBreak,
            Primitive::Text(TextBlock::new("dos", 10.0, theme.color_texto)),
        ]);
        let pages = engine.finish();
        assert_eq!(pages.len(), 2);
        assert!(texts(&pages[1]).iter().any(|t| t.text == "dos"));
    }

    #[test]
    fn test_tabla_larga_reparte_filas_sin_partirlas() {
        let theme = Theme::default();
        let relleno = "Actividad extensa de indagación con registro en bitácora, \
                       discusión por equipos y elaboración de conclusiones para \
                       compartir con la comunidad escolar. "
            .repeat(4);
        let mut engine = LayoutEngine::new(&theme);
        engine.place_all(&[Primitive::Table(simple_table(12, &relleno))]);
        let pages = engine.finish();
        assert!(pages.len() >= 2, "doce sesiones largas exceden una página");

        // Ninguna fila invade la reserva del pie: todo rectángulo de
        // celda termina por encima del área de numeración
        for page in &pages {
            for element in &page.elements {
                if let PageElement::Rect(r) = element {
                    assert!(r.y + r.height <= PAGE_HEIGHT - BOTTOM_RESERVE + 0.01);
                }
            }
        }
        // Las doce sesiones siguen presentes y en orden
        let ordinales: Vec<String> = pages
            .iter()
            .flat_map(|p| texts(p))
            .filter(|t| t.text.starts_with("SESIÓN "))
            .map(|t| t.text.clone())
            .collect();
        assert_eq!(ordinales.len(), 12);
        assert_eq!(ordinales[0], "SESIÓN 1");
        assert_eq!(ordinales[11], "SESIÓN 12");
    }

    #[test]
    fn test_numeracion_estampa_cada_pagina_una_vez() {
        let theme = Theme::default();
        let mut engine = LayoutEngine::new(&theme);
        engine.place_all(&[
            Primitive::Text(TextBlock::new("portada", 10.0, theme.color_texto)),
            Primitive::PageBreak,
            Primitive::Text(TextBlock::new("interior", 10.0, theme.color_texto)),
            Primitive::PageBreak,
            Primitive::Text(TextBlock::new("final", 10.0, theme.color_texto)),
        ]);
        let pages = engine.finish();
        assert_eq!(pages.len(), 3);
        for (i, page) in pages.iter().enumerate() {
            let pies: Vec<_> = texts(page)
                .into_iter()
                .filter(|t| t.text.starts_with("Hoja "))
                .collect();
            assert_eq!(pies.len(), 1);
            assert!(pies[0]
                .text
                .starts_with(&format!("Hoja {} de 3", i + 1)));
        }
    }

    #[test]
    fn test_parrafo_largo_continua_en_la_siguiente_pagina() {
        let theme = Theme::default();
        let largo = "El diagnóstico socioeducativo de la comunidad escolar ".repeat(120);
        let mut engine = LayoutEngine::new(&theme);
        engine.place_all(&[Primitive::Text(TextBlock::new(largo, 10.0, theme.color_texto))]);
        let pages = engine.finish();
        assert!(pages.len() >= 2);
        // Todas las líneas quedan dentro del área de contenido
        for page in &pages {
            for t in texts(page) {
                assert!(t.y >= theme.margen - 0.01);
                assert!(t.y <= PAGE_HEIGHT - FOOTER_BASELINE + 0.01);
            }
        }
    }

    #[test]
    fn test_mismo_documento_mismo_maquetado() {
        let theme = Theme::default();
        let prims = vec![Primitive::Table(simple_table(5, "contenido de sesión"))];
        let run = |prims: &[Primitive]| {
            let mut engine = LayoutEngine::new(&theme);
            engine.place_all(prims);
            engine.finish()
        };
        assert_eq!(run(&prims), run(&prims));
    }
}
