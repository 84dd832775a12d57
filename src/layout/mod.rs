//! Motor de maquetado - paginación de primitivos
//!
//! Convierte la secuencia de primitivos en páginas A4 con elementos ya
//! posicionados. El estado es un cursor vertical explícito que vive solo
//! dentro de una exportación; no hay contadores globales.

pub mod engine;
pub mod metrics;

pub use engine::{LayoutEngine, PageElement, PageLayout, PlacedRect, PlacedText};
pub use metrics::{text_width, wrap_text};
