//! Solicitud de planeación
//!
//! Registro plano con los parámetros del formulario. El binario lo carga
//! desde un archivo TOML; la capa de interfaz gráfica queda fuera de este
//! repositorio.

use serde::{Deserialize, Serialize};

use crate::pedagogy::{fase_para_grado, MethodFramework, MARCO_PEDAGOGICO};

/// Metodología didáctica (una de cuatro opciones fijas)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Methodology {
    #[serde(rename = "Proyectos Comunitarios")]
    ProyectosComunitarios,
    #[serde(rename = "Aprendizaje Basado en Indagación (STEAM)")]
    IndagacionSteam,
    #[serde(rename = "Aprendizaje Basado en Problemas (ABP)")]
    BasadoEnProblemas,
    #[serde(rename = "Aprendizaje Servicio (AS)")]
    AprendizajeServicio,
}

impl Methodology {
    /// Las cuatro metodologías en el orden del formulario
    pub const ALL: [Methodology; 4] = [
        Methodology::ProyectosComunitarios,
        Methodology::IndagacionSteam,
        Methodology::BasadoEnProblemas,
        Methodology::AprendizajeServicio,
    ];

    /// Etiqueta oficial de la metodología
    pub fn as_str(self) -> &'static str {
        match self {
            Methodology::ProyectosComunitarios => "Proyectos Comunitarios",
            Methodology::IndagacionSteam => "Aprendizaje Basado en Indagación (STEAM)",
            Methodology::BasadoEnProblemas => "Aprendizaje Basado en Problemas (ABP)",
            Methodology::AprendizajeServicio => "Aprendizaje Servicio (AS)",
        }
    }

    /// Marco pedagógico de la metodología (enfoque y momentos canónicos)
    pub fn marco(self) -> &'static MethodFramework {
        // El catálogo cubre las cuatro variantes; la clave siempre existe.
        MARCO_PEDAGOGICO
            .get(self.as_str())
            .expect("metodología sin marco en el catálogo")
    }
}

impl std::fmt::Display for Methodology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Methodology {
    fn default() -> Self {
        Methodology::ProyectosComunitarios
    }
}

/// Parámetros de una solicitud de planeación
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningRequest {
    pub nombre_docente: String,
    pub nombre_escuela: String,
    #[serde(default)]
    pub cct: Option<String>,
    #[serde(default)]
    pub zona_escolar: Option<String>,
    /// Fase NEM; si viene vacía se deriva del grado
    #[serde(default)]
    pub fase: String,
    pub grado: String,
    #[serde(default)]
    pub metodologia: Methodology,
    #[serde(default)]
    pub contexto_adicional: Option<String>,
    #[serde(default = "default_num_sesiones")]
    pub num_sesiones: u32,
    /// Adjunto PDF opcional (programa analítico u otro insumo)
    #[serde(default)]
    pub pdf_base64: Option<String>,
    #[serde(default)]
    pub pdf_name: Option<String>,
}

fn default_num_sesiones() -> u32 {
    10
}

impl PlanningRequest {
    /// Comprueba los datos obligatorios del formulario
    pub fn validate(&self) -> Result<(), String> {
        if self.nombre_docente.trim().is_empty() || self.nombre_escuela.trim().is_empty() {
            return Err(
                "DATO FALTANTE: El nombre del docente y de la escuela son obligatorios."
                    .to_string(),
            );
        }
        Ok(())
    }

    /// Fase efectiva: la indicada, o la derivada del grado
    pub fn fase_efectiva(&self) -> String {
        if !self.fase.trim().is_empty() {
            return self.fase.clone();
        }
        fase_para_grado(&self.grado)
            .map(|f| f.id.to_string())
            .unwrap_or_else(|| self.fase.clone())
    }
}
