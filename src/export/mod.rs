//! Orquestador de exportación
//!
//! Punto único que encadena construcción de secciones, maquetado y
//! serialización para producir un artefacto binario con nombre. Los dos
//! formatos comparten la misma secuencia de primitivos, así que el
//! contenido es idéntico aunque el maquetado difiera.
//!
//! Cualquier fallo de renderizado o serialización se reporta como error
//! de exportación clasificado; no hay recuperación por sección porque un
//! artefacto binario parcial no es una salida válida.

pub mod docx;
pub mod pdf;

use regex::Regex;
use tracing::{debug, info};

use crate::error::ExportError;
use crate::layout::engine::LayoutEngine;
use crate::models::plan::LessonPlan;
use crate::render::{build_sections, Theme};

/// Formato de exportación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "Word",
        })
    }
}

/// Artefacto binario con nombre sugerido de descarga
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Nombre de archivo sugerido
///
/// Prefijo de la herramienta, título truncado a 15 caracteres y espacios
/// a guiones bajos.
pub fn suggested_filename(title: &str, extension: &str) -> String {
    let truncated: String = title.chars().take(15).collect();
    let re = Regex::new(r"\s+").expect("expresión regular fija");
    let slug = re.replace_all(truncated.trim(), "_");
    format!("Planeacion_NEM_{}.{}", slug, extension)
}

/// Exporta un plan normalizado al formato pedido
///
/// # Parámetros
/// - `plan`: documento ya normalizado, de solo lectura
/// - `format`: formato de destino
///
/// # Retorna
/// El artefacto con sus bytes y nombre, o el error de exportación.
///
/// La función es pura salvo por el registro: todo el estado de maquetado
/// vive en valores locales, así que dos exportaciones concurrentes del
/// mismo plan no comparten nada.
pub fn export_plan(plan: &LessonPlan, format: ExportFormat) -> Result<Artifact, ExportError> {
    let theme = Theme::default();
    let sections = build_sections(plan, &theme);
    debug!("{} primitivos construidos para {}", sections.len(), format);

    let bytes = match format {
        ExportFormat::Pdf => {
            let mut engine = LayoutEngine::new(&theme);
            engine.place_all(&sections);
            let pages = engine.finish();
            debug!("maquetado en {} páginas", pages.len());
            pdf::render(&pages, &plan.titulo_proyecto)?
        }
        ExportFormat::Docx => docx::render(&sections, &plan.titulo_proyecto)?,
    };

    let filename = suggested_filename(&plan.titulo_proyecto, format.extension());
    info!("✓ artefacto {} listo: {} ({} bytes)", format, filename, bytes.len());
    Ok(Artifact { filename, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nombre_de_archivo() {
        assert_eq!(
            suggested_filename("Huerto escolar comunitario", "pdf"),
            "Planeacion_NEM_Huerto_escolar.pdf"
        );
        assert_eq!(
            suggested_filename("Corto", "docx"),
            "Planeacion_NEM_Corto.docx"
        );
    }

    #[test]
    fn test_nombre_respeta_limites_de_caracter() {
        // El truncado cuenta caracteres, no bytes; los acentos no parten
        let nombre = suggested_filename("Educación ambiental para todos", "pdf");
        assert_eq!(nombre, "Planeacion_NEM_Educación_ambie.pdf");
    }
}
