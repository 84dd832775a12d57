//! Validación y normalización del JSON externo
//!
//! La respuesta del modelo es fiable solo de forma probabilística, así que
//! toda la tolerancia de forma vive aquí, en una sola pasada. A partir de
//! este punto el resto del sistema asume el esquema estricto de
//! [`LessonPlan`]: ninguna secuencia es `null`, ningún escalar queda
//! vacío.
//!
//! Reglas:
//! - Si el valor no es un objeto, o falta el título del proyecto, la
//!   normalización falla y no se renderiza nada.
//! - Cualquier otro defecto se repara: secuencia ausente o con otro tipo
//!   pasa a secuencia vacía, escalar ausente o vacío pasa a su valor de
//!   reserva. Mejor un documento visiblemente incompleto que un fallo.

use serde_json::Value;

use crate::error::ValidationError;
use crate::models::plan::{
    Bibliography, ContentPdaPair, Evaluation, LessonPlan, Phase, Session,
};

/// Marcadores que se tratan como "sin valor"
fn is_blank(texto: &str) -> bool {
    let t = texto.trim();
    t.is_empty() || t == "undefined" || t == "null"
}

/// Texto de un campo, o su valor de reserva
///
/// Un número se acepta y se convierte a texto; cualquier otro tipo cuenta
/// como ausente.
fn text_or(obj: &Value, campo: &str, reserva: &str) -> String {
    match obj.get(campo) {
        Some(Value::String(s)) if !is_blank(s) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => reserva.to_string(),
    }
}

/// Secuencia de textos de un campo
///
/// Si el valor no es una secuencia se devuelve una vacía. Los elementos
/// escalares se convierten a texto; objetos y nulos se descartan.
fn string_list(obj: &Value, campo: &str) -> Vec<String> {
    let Some(Value::Array(items)) = obj.get(campo) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !is_blank(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

/// Elementos de tipo objeto de un campo secuencia
fn object_list<'a>(obj: &'a Value, campo: &str) -> Vec<&'a Value> {
    let Some(Value::Array(items)) = obj.get(campo) else {
        return Vec::new();
    };
    items.iter().filter(|item| item.is_object()).collect()
}

fn content_pda_pair(item: &Value) -> ContentPdaPair {
    ContentPdaPair {
        asignatura: text_or(item, "asignatura", "Campo Formativo"),
        contenido: text_or(item, "contenido", "Contenido sin especificar"),
        pda_vinculados: string_list(item, "pda_vinculados"),
    }
}

/// Sesión normalizada
///
/// `numero` acepta entero o texto numérico; si no hay forma de leerlo se
/// usa la posición (base 1) dentro de la fase. Es solo etiqueta de
/// presentación, no se valida unicidad.
fn session(item: &Value, posicion: usize) -> Session {
    let numero = match item.get("numero") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(posicion as i64 + 1),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(posicion as i64 + 1),
        _ => posicion as i64 + 1,
    };
    let paj = match item.get("paj_vinculado") {
        Some(Value::String(s)) if !is_blank(s) => Some(s.trim().to_string()),
        _ => None,
    };
    Session {
        numero,
        titulo: text_or(item, "titulo", "Actividad de Aprendizaje"),
        duracion: text_or(item, "duracion", "N/A"),
        actividades_inicio: string_list(item, "actividades_inicio"),
        actividades_desarrollo: string_list(item, "actividades_desarrollo"),
        actividades_cierre: string_list(item, "actividades_cierre"),
        recursos: string_list(item, "recursos"),
        evaluacion_sesion: text_or(item, "evaluacion_sesion", "Sin criterio"),
        paj_vinculado: paj,
    }
}

fn phase(item: &Value) -> Phase {
    Phase {
        nombre: text_or(item, "nombre", "Fase de desarrollo"),
        descripcion: text_or(item, "descripcion", "Sin descripción."),
        sesiones: object_list(item, "sesiones")
            .iter()
            .enumerate()
            .map(|(i, s)| session(s, i))
            .collect(),
    }
}

fn evaluation(obj: &Value) -> Evaluation {
    match obj.get("evaluacion_formativa") {
        Some(ev) if ev.is_object() => Evaluation {
            tecnicas: string_list(ev, "tecnicas"),
            instrumentos: string_list(ev, "instrumentos"),
            criterios_evaluacion: string_list(ev, "criterios_evaluacion"),
        },
        _ => Evaluation::default(),
    }
}

fn bibliography(item: &Value) -> Bibliography {
    Bibliography {
        autor: text_or(item, "autor", "Anónimo"),
        titulo: text_or(item, "titulo", "Sin título"),
        anio: text_or(item, "año", "S/F"),
        uso: text_or(item, "uso", "Referencia general"),
    }
}

/// Normaliza un valor JSON arbitrario a un [`LessonPlan`]
///
/// # Parámetros
/// - `value`: valor decodificado tal como llegó del colaborador externo
///
/// # Retorna
/// El plan normalizado, o un [`ValidationError`] si el valor no es un
/// objeto o no trae el título del proyecto.
pub fn normalize(value: &Value) -> Result<LessonPlan, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::NotAnObject);
    }

    let titulo = match value.get("titulo_proyecto") {
        Some(Value::String(s)) if !is_blank(s) => s.trim().to_string(),
        _ => return Err(ValidationError::MissingTitle),
    };

    Ok(LessonPlan {
        titulo_proyecto: titulo,
        nombre_docente: text_or(value, "nombre_docente", "Docente"),
        nombre_escuela: text_or(value, "nombre_escuela", "Escuela"),
        cct: text_or(value, "cct", "N/A"),
        zona_escolar: text_or(value, "zona_escolar", "N/A"),
        grado: text_or(value, "grado", "N/A"),
        fase_nem: text_or(value, "fase_nem", "N/A"),
        metodologia: text_or(value, "metodologia", "N/A"),
        campo_formativo: string_list(value, "campo_formativo"),
        ejes_articuladores: string_list(value, "ejes_articuladores"),
        vinculacion_contenido_pda: object_list(value, "vinculacion_contenido_pda")
            .iter()
            .map(|v| content_pda_pair(v))
            .collect(),
        proposito: text_or(value, "proposito", "Sin información."),
        diagnostico_socioeducativo: text_or(value, "diagnostico_socioeducativo", "Sin información."),
        temporalidad_realista: text_or(value, "temporalidad_realista", "Sin información."),
        fases_desarrollo: object_list(value, "fases_desarrollo")
            .iter()
            .map(|v| phase(v))
            .collect(),
        evaluacion_formativa: evaluation(value),
        bibliografia_especializada: object_list(value, "bibliografia_especializada")
            .iter()
            .map(|v| bibliography(v))
            .collect(),
    })
}
