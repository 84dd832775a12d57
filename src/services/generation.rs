//! Servicio de generación - capa de capacidades
//!
//! Única responsabilidad: convertir una solicitud de planeación en un
//! plan normalizado llamando al modelo. No conoce formatos de
//! exportación ni archivos de salida.
//!
//! ## Pila técnica
//! - `async-openai` contra un endpoint compatible con la API de OpenAI
//!   (Gemini expone uno); el endpoint y el modelo vienen de la
//!   configuración
//! - La respuesta se limpia tomando del primer `{` al último `}` antes
//!   de decodificar, porque el modelo a veces envuelve el JSON en texto
//! - Los errores de la API se clasifican en variantes con mensaje propio
//!   de cara al usuario; aquí no se reintenta nada

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, GenerationError};
use crate::models::plan::LessonPlan;
use crate::models::request::PlanningRequest;
use crate::normalizer::normalize;

/// Servicio de generación de planos didácticos
pub struct GenerationService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl GenerationService {
    /// Crea el servicio comprobando primero la credencial
    ///
    /// Una clave ausente, el literal `undefined` o una clave de menos de
    /// diez caracteres fallan aquí, antes de cualquier llamada de red.
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let key = config.llm_api_key.trim();
        if key.is_empty() || key == "undefined" || key.len() < 10 {
            return Err(GenerationError::InvalidCredential);
        }

        let openai_config = OpenAIConfig::new()
            .with_api_key(key)
            .with_api_base(&config.llm_api_base_url);

        Ok(Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        })
    }

    /// Genera un plan normalizado a partir de la solicitud
    ///
    /// # Parámetros
    /// - `request`: parámetros del formulario, ya validados
    ///
    /// # Retorna
    /// El plan listo para renderizar. La identidad (docente, escuela,
    /// CCT, zona) se toma siempre de la solicitud, diga lo que diga el
    /// modelo.
    pub async fn generate_plan(&self, request: &PlanningRequest) -> Result<LessonPlan, AppError> {
        let (system_message, user_message) = build_prompt_messages(request);
        let raw = self.send_to_llm(&user_message, &system_message).await?;

        let clean = extract_json_object(&raw)?;
        let value: serde_json::Value =
            serde_json::from_str(clean).map_err(|e| GenerationError::MalformedResponse {
                detail: e.to_string(),
            })?;

        let mut plan = normalize(&value)?;
        apply_request_identity(&mut plan, request);
        Ok(plan)
    }

    /// Llamada básica al modelo
    async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: &str,
    ) -> Result<String, GenerationError> {
        debug!("llamando al modelo {}", self.model_name);
        debug!("longitud del mensaje de usuario: {} caracteres", user_message.len());

        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_message)
            .build()
            .map_err(|e| self.api_error(e))?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| self.api_error(e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system),
                ChatCompletionRequestMessage::User(user),
            ])
            .temperature(0.1)
            .build()
            .map_err(|e| self.api_error(e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("fallo de la API del modelo: {}", e);
            classify_api_error(&e.to_string(), &self.model_name, e)
        })?;

        debug!("respuesta del modelo recibida");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(GenerationError::EmptyResponse {
                model: self.model_name.clone(),
            });
        }
        Ok(content)
    }

    fn api_error(&self, e: impl std::error::Error + Send + Sync + 'static) -> GenerationError {
        GenerationError::Api {
            model: self.model_name.clone(),
            source: Box::new(e),
        }
    }
}

/// Clasifica un fallo de la API en su variante de usuario
///
/// Se decide por el texto del error porque los endpoints compatibles no
/// comparten códigos estructurados.
fn classify_api_error(
    detail: &str,
    model: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> GenerationError {
    let lower = detail.to_lowercase();
    if lower.contains("api key")
        || lower.contains("unauthorized")
        || lower.contains("invalid authentication")
        || lower.contains("permission")
        || lower.contains("401")
        || lower.contains("403")
    {
        return GenerationError::InvalidCredential;
    }
    if lower.contains("quota")
        || lower.contains("rate limit")
        || lower.contains("resource_exhausted")
        || lower.contains("429")
    {
        return GenerationError::QuotaExceeded {
            model: model.to_string(),
        };
    }
    if lower.contains("location") || lower.contains("region") {
        return GenerationError::UnsupportedRegion;
    }
    GenerationError::Api {
        model: model.to_string(),
        source: Box::new(source),
    }
}

/// Recorta la respuesta al objeto JSON
///
/// El modelo a veces antepone texto o vallas de código; se toma del
/// primer `{` al último `}`. Sin llave de apertura no hay nada que
/// decodificar.
fn extract_json_object(raw: &str) -> Result<&str, GenerationError> {
    let first = raw.find('{').ok_or_else(|| GenerationError::MalformedResponse {
        detail: "la respuesta no contiene un objeto JSON".to_string(),
    })?;
    let tail = &raw[first..];
    Ok(match tail.rfind('}') {
        Some(i) => &tail[..=i],
        None => tail,
    })
}

/// La identidad del documento manda sobre lo que devuelva el modelo
fn apply_request_identity(plan: &mut LessonPlan, request: &PlanningRequest) {
    plan.nombre_docente = request.nombre_docente.clone();
    plan.nombre_escuela = request.nombre_escuela.clone();
    if let Some(cct) = &request.cct {
        if !cct.trim().is_empty() {
            plan.cct = cct.clone();
        }
    }
    if let Some(zona) = &request.zona_escolar {
        if !zona.trim().is_empty() {
            plan.zona_escolar = zona.clone();
        }
    }
}

/// Construye los mensajes del prompt
///
/// Devuelve `(system_message, user_message)`. El mensaje de sistema fija
/// el rol de especialista NEM; el de usuario lleva los datos del
/// formulario, el marco de la metodología elegida y el esquema JSON
/// obligatorio.
fn build_prompt_messages(request: &PlanningRequest) -> (String, String) {
    let fase = request.fase_efectiva();
    let marco = request.metodologia.marco();

    let system_message = format!(
        "Eres un Doctor en Pedagogía y Especialista de alto nivel en el Plan de Estudio 2022 \
         de la Nueva Escuela Mexicana (NEM). Tu tarea es diseñar un \"Plano Didáctico\" de \
         excelencia con un enfoque INTEGRAL e INTERDISCIPLINARIO.\n\
         REQUISITO CRÍTICO CURRICULAR: Debes realizar un mapeo exhaustivo de los Programas \
         Sintéticos de la SEP para la {} y el grado {}. Busca la máxima vinculación posible: \
         selecciona TODOS los contenidos y sus respectivos PDA que tengan una relación lógica, \
         directa o transversal con la problemática o contexto proporcionado.\n\
         No inventes los contenidos ni los PDA; deben ser los oficiales.\n\
         Responde EXCLUSIVAMENTE con el objeto JSON solicitado.",
        fase, request.grado
    );

    let contexto = request
        .contexto_adicional
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("General");
    let adjunto = match &request.pdf_name {
        Some(nombre) => format!(
            "\n- Documento de referencia aportado por el docente: {}",
            nombre
        ),
        None => String::new(),
    };

    let user_message = format!(
        r#"Genera una planeación didáctica profesional con los siguientes datos:
- Grado: {grado}
- Fase: {fase}
- Metodología: {metodologia}
- Número de Sesiones: {sesiones}
- Problemática/Contexto: {contexto}
- Escuela: {escuela}
- Docente: {docente}{adjunto}

MARCO DE LA METODOLOGÍA ELEGIDA:
- Enfoque: {enfoque}
- Momentos canónicos que deben nombrar las fases de desarrollo: {momentos}

INSTRUCCIONES PARA VINCULACIÓN CURRICULAR MAXIMIZADA:
En la propiedad "vinculacion_contenido_pda", identifica e incluye la MAYOR CANTIDAD de contenidos y PDA de los diferentes campos formativos que puedan abordarse simultáneamente con la problemática planteada. Fomenta la interdisciplinariedad. Cada par contenido-PDA debe ser pertinente y contribuir directamente a la resolución o análisis de la situación problema.

ESTRUCTURA JSON OBLIGATORIA:
{{
  "titulo_proyecto": "Título creativo y pedagógico",
  "nombre_docente": "{docente}",
  "nombre_escuela": "{escuela}",
  "cct": "{cct}",
  "zona_escolar": "{zona}",
  "grado": "{grado}",
  "fase_nem": "{fase}",
  "metodologia": "{metodologia}",
  "campo_formativo": ["Lista de todos los campos involucrados"],
  "ejes_articuladores": ["Lista de todos los ejes que se movilizan"],
  "proposito": "Propósito general del proyecto de acuerdo a la NEM",
  "diagnostico_socioeducativo": "Análisis profundo basado en el contexto",
  "temporalidad_realista": "Ej. 2 semanas / {sesiones} sesiones",
  "vinculacion_contenido_pda": [
    {{ "asignatura": "Nombre del Campo Formativo o Disciplina", "contenido": "Nombre completo del contenido del programa sintético", "pda_vinculados": ["PDA 1 oficial", "PDA 2 oficial"] }}
  ],
  "fases_desarrollo": [
    {{ "nombre": "Nombre de la fase", "descripcion": "Enfoque", "sesiones": [
      {{ "numero": 1, "titulo": "Título de sesión", "duracion": "50-60 min", "actividades_inicio": ["..."], "actividades_desarrollo": ["..."], "actividades_cierre": ["..."], "recursos": ["..."], "evaluacion_sesion": "Criterio" }}
    ] }}
  ],
  "evaluacion_formativa": {{ "tecnicas": ["..."], "instrumentos": ["..."], "criterios_evaluacion": ["..."] }},
  "bibliografia_especializada": [
    {{ "autor": "...", "titulo": "...", "año": "...", "uso": "..." }}
  ]
}}"#,
        grado = request.grado,
        fase = fase,
        metodologia = request.metodologia,
        sesiones = request.num_sesiones,
        contexto = contexto,
        escuela = request.nombre_escuela,
        docente = request.nombre_docente,
        adjunto = adjunto,
        enfoque = marco.enfoque,
        momentos = marco.fases.join("; "),
        cct = request.cct.as_deref().unwrap_or(""),
        zona = request.zona_escolar.as_deref().unwrap_or(""),
    );

    (system_message, user_message)
}
