//! Modelo del plano didáctico normalizado
//!
//! Estas estructuras representan el documento ya reparado: después de la
//! normalización ningún campo escalar queda vacío y toda secuencia es una
//! secuencia (posiblemente sin elementos). Los renderizadores pueden
//! asumir ese contrato sin volver a comprobar nada.
//!
//! Los nombres de campo siguen el esquema JSON que se le exige al modelo,
//! por eso van en español y en snake_case.

use serde::{Deserialize, Serialize};

/// Par contenido-PDA de la malla curricular
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPdaPair {
    pub asignatura: String,
    pub contenido: String,
    #[serde(default)]
    pub pda_vinculados: Vec<String>,
}

/// Sesión de trabajo dentro de una fase
///
/// `numero` es una etiqueta de presentación: no se garantiza única ni
/// consecutiva, y el maquetado usa la posición dentro de la fase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub numero: i64,
    pub titulo: String,
    pub duracion: String,
    #[serde(default)]
    pub actividades_inicio: Vec<String>,
    #[serde(default)]
    pub actividades_desarrollo: Vec<String>,
    #[serde(default)]
    pub actividades_cierre: Vec<String>,
    #[serde(default)]
    pub recursos: Vec<String>,
    pub evaluacion_sesion: String,
    /// Pensamiento de Aprendizaje Justificado (opcional en el esquema)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paj_vinculado: Option<String>,
}

/// Fase de desarrollo del proyecto
///
/// El orden del vector es la secuencia pedagógica y se respeta tal cual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub nombre: String,
    pub descripcion: String,
    #[serde(default)]
    pub sesiones: Vec<Session>,
}

/// Entrada bibliográfica
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bibliography {
    pub autor: String,
    pub titulo: String,
    #[serde(rename = "año")]
    pub anio: String,
    pub uso: String,
}

/// Sistema de evaluación formativa
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub tecnicas: Vec<String>,
    #[serde(default)]
    pub instrumentos: Vec<String>,
    #[serde(default)]
    pub criterios_evaluacion: Vec<String>,
}

/// Plano didáctico normalizado
///
/// Se construye una vez por solicitud, se lee muchas veces durante una
/// exportación y se descarta. No hay mutación compartida: cada
/// exportación recibe su propia referencia inmutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    pub titulo_proyecto: String,
    pub nombre_docente: String,
    pub nombre_escuela: String,
    pub cct: String,
    pub zona_escolar: String,
    pub grado: String,
    pub fase_nem: String,
    pub metodologia: String,
    #[serde(default)]
    pub campo_formativo: Vec<String>,
    #[serde(default)]
    pub ejes_articuladores: Vec<String>,
    #[serde(default)]
    pub vinculacion_contenido_pda: Vec<ContentPdaPair>,
    pub proposito: String,
    pub diagnostico_socioeducativo: String,
    pub temporalidad_realista: String,
    #[serde(default)]
    pub fases_desarrollo: Vec<Phase>,
    #[serde(default)]
    pub evaluacion_formativa: Evaluation,
    #[serde(default)]
    pub bibliografia_especializada: Vec<Bibliography>,
}

impl LessonPlan {
    /// Número total de sesiones en todas las fases
    pub fn total_sesiones(&self) -> usize {
        self.fases_desarrollo.iter().map(|f| f.sesiones.len()).sum()
    }
}
