//! Catálogo pedagógico estático
//!
//! Tablas fijas del Plan de Estudio 2022 (NEM): fases escolares con sus
//! grados y el marco de trabajo de cada metodología. Son datos de consulta,
//! nunca se modifican en tiempo de ejecución.

use phf::phf_map;

/// Configuración de una fase escolar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseConfig {
    pub id: &'static str,
    pub nombre: &'static str,
    pub grados: &'static [&'static str],
}

/// Fases de la Nueva Escuela Mexicana con sus grados
pub const FASES_NEM: [PhaseConfig; 6] = [
    PhaseConfig {
        id: "Fase 1",
        nombre: "Fase 1: Educación Inicial",
        grados: &["Educación Inicial"],
    },
    PhaseConfig {
        id: "Fase 2",
        nombre: "Fase 2: Educación Preescolar",
        grados: &["1° Preescolar", "2° Preescolar", "3° Preescolar"],
    },
    PhaseConfig {
        id: "Fase 3",
        nombre: "Fase 3: Educación Primaria",
        grados: &["1° Primaria", "2° Primaria"],
    },
    PhaseConfig {
        id: "Fase 4",
        nombre: "Fase 4: Educación Primaria",
        grados: &["3° Primaria", "4° Primaria"],
    },
    PhaseConfig {
        id: "Fase 5",
        nombre: "Fase 5: Educación Primaria",
        grados: &["5° Primaria", "6° Primaria"],
    },
    PhaseConfig {
        id: "Fase 6",
        nombre: "Fase 6: Educación Secundaria",
        grados: &["1° Secundaria", "2° Secundaria", "3° Secundaria"],
    },
];

/// Busca la fase a la que pertenece un grado
///
/// # Parámetros
/// - `grado`: etiqueta del grado tal como aparece en el formulario
///
/// # Retorna
/// La configuración de la fase, o `None` si el grado no está catalogado
pub fn fase_para_grado(grado: &str) -> Option<&'static PhaseConfig> {
    FASES_NEM
        .iter()
        .find(|fase| fase.grados.iter().any(|g| *g == grado))
}

/// Marco de trabajo de una metodología didáctica
#[derive(Debug, Clone, Copy)]
pub struct MethodFramework {
    /// Enfoque general de la metodología
    pub enfoque: &'static str,
    /// Nombres canónicos de sus momentos o fases
    pub fases: &'static [&'static str],
}

/// Marco pedagógico por metodología
///
/// Se inyecta en el prompt para que el modelo nombre las fases de
/// desarrollo con los momentos canónicos de la metodología elegida.
pub static MARCO_PEDAGOGICO: phf::Map<&'static str, MethodFramework> = phf_map! {
    "Proyectos Comunitarios" => MethodFramework {
        enfoque: "Exploración del entorno social y resolución de problemas de la comunidad.",
        fases: &[
            "1. Planeación (Identificación y recuperación)",
            "2. Acción (Acercamiento y producciones)",
            "3. Intervención (Difusión y seguimiento)",
        ],
    },
    "Aprendizaje Basado en Indagación (STEAM)" => MethodFramework {
        enfoque: "Ciencia, Tecnología, Ingeniería, Artes y Matemáticas bajo indagación científica.",
        fases: &[
            "1. Introducción al tema",
            "2. Diseño de investigación",
            "3. Respuesta a preguntas",
            "4. Comunicación y aplicación",
            "5. Reflexión sobre el proceso",
        ],
    },
    "Aprendizaje Basado en Problemas (ABP)" => MethodFramework {
        enfoque: "Situaciones problema reales para movilizar conocimientos y pensamiento crítico.",
        fases: &[
            "Presentamos",
            "Recolectamos",
            "Formulamos el problema",
            "Organicemos la experiencia",
            "Vivamos la experiencia",
            "Resultados y análisis",
        ],
    },
    "Aprendizaje Servicio (AS)" => MethodFramework {
        enfoque: "Aprendizaje combinado con compromiso social y servicio solidario.",
        fases: &[
            "1. Punto de partida",
            "2. Lo que sé y lo que quiero saber",
            "3. Organicemos las actividades",
            "4. Creatividad en marcha",
            "5. Compartimos y evaluamos",
        ],
    },
};
