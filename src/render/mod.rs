//! Construcción de secciones - capa de presentación
//!
//! Los renderizadores de sección convierten el plan normalizado en una
//! secuencia ordenada de primitivos de maquetado, independientes del
//! formato binario final. Los dos formatos de exportación consumen la
//! misma secuencia: el PDF la pagina con el motor de maquetado y el
//! documento Word la traduce a su modelo de flujo.
//!
//! Primitivos disponibles:
//! - [`TextBlock`]: corrida de texto con estilo (y banda de color opcional)
//! - [`Table`]: tabla plana de filas y celdas, con banda de título opcional
//! - [`Primitive::PageBreak`]: sugerencia explícita de salto de página

pub mod grouping;
pub mod sections;

pub use grouping::{group_by_subject, SubjectGroup};
pub use sections::build_sections;

/// Color RGB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Representación hexadecimal sin `#`, como la pide OOXML
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const WHITE: Color = Color::new(255, 255, 255);

/// Alineación horizontal de una celda
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Corrida de texto con estilo
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    /// Tamaño en puntos
    pub size: f32,
    pub bold: bool,
    pub color: Color,
    /// Banda de color a todo lo ancho detrás del texto
    pub band_fill: Option<Color>,
    /// Espacio vertical tras el bloque, en puntos
    pub space_after: f32,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            size,
            bold: false,
            color,
            band_fill: None,
            space_after: 2.0,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn on_band(mut self, fill: Color) -> Self {
        self.band_fill = Some(fill);
        self
    }

    pub fn space_after(mut self, pts: f32) -> Self {
        self.space_after = pts;
        self
    }
}

/// Celda de tabla
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub bold: bool,
    pub align: Align,
    pub fill: Option<Color>,
    /// Color del texto; si falta se usa el del tema
    pub color: Option<Color>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            align: Align::Left,
            fill: None,
            color: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn filled(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Fila de tabla (siempre plana; los agrupados visuales se logran
/// dejando en blanco celdas repetidas)
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

/// Banda de título a todo lo ancho de una tabla
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub text: String,
    pub fill: Color,
}

/// Tabla
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub band: Option<Band>,
    pub rows: Vec<Row>,
    /// Fracciones del ancho de contenido; deben sumar 1
    pub widths: Vec<f32>,
    /// Tamaño de letra de las celdas, en puntos
    pub font_size: f32,
}

/// Primitivo de maquetado
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Text(TextBlock),
    Table(Table),
    PageBreak,
}

/// Tema de presentación
///
/// Todo lo variable de la apariencia vive aquí; los renderizadores no
/// conocen colores ni márgenes sueltos.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Color principal (banda de cabecera, bandas de fase)
    pub color_primario: Color,
    /// Color de las bandas secundarias (asignaturas, encabezados de tabla)
    pub color_banda: Color,
    /// Relleno de celdas de rótulo
    pub relleno_claro: Color,
    /// Relleno suave de celdas de contenido agrupado
    pub relleno_suave: Color,
    /// Color de texto normal
    pub color_texto: Color,
    /// Color tenue (pie de página, líneas secundarias de la cabecera)
    pub color_tenue: Color,
    /// Margen de página en puntos
    pub margen: f32,
    /// Texto del pie de página (se antepone "Hoja N de TOTAL | ")
    pub pie_pagina: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            color_primario: Color::new(15, 23, 42),
            color_banda: Color::new(51, 65, 85),
            relleno_claro: Color::new(241, 245, 249),
            relleno_suave: Color::new(250, 250, 250),
            color_texto: Color::new(15, 23, 42),
            color_tenue: Color::new(150, 150, 150),
            margen: 51.0,
            pie_pagina: "Planeador Maestro NEM Pro+".to_string(),
        }
    }
}
