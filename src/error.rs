//! Tipos de error de la aplicación
//!
//! Cada subsistema tiene su propia enumeración de errores y todas se
//! agregan en [`AppError`]. La política general: los defectos de forma en
//! la respuesta del modelo se reparan en la normalización y nunca llegan
//! aquí; solo la ausencia del marcador estructural (el título del
//! proyecto) se reporta como plan inválido.

use thiserror::Error;

/// Error de la aplicación
#[derive(Debug, Error)]
pub enum AppError {
    /// Error del servicio de generación
    #[error("error de generación: {0}")]
    Generation(#[from] GenerationError),
    /// El JSON recibido no puede tratarse como plan
    #[error("plan no válido: {0}")]
    Validation(#[from] ValidationError),
    /// Error al producir el artefacto binario
    #[error("error de exportación: {0}")]
    Export(#[from] ExportError),
    /// Error de configuración
    #[error("error de configuración: {0}")]
    Config(String),
    /// Error de archivo
    #[error("error de archivo ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errores del colaborador de generación (API del modelo)
///
/// Cada variante corresponde a un mensaje distinto de cara al usuario.
/// Ninguna se reintenta automáticamente; el llamador decide.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Credencial ausente o con formato imposible
    #[error("no se detectó una API_KEY válida; revisa la variable de entorno LLM_API_KEY")]
    InvalidCredential,
    /// Cuota o límite de frecuencia agotado
    #[error("cuota de la API agotada (modelo: {model}); intenta más tarde")]
    QuotaExceeded { model: String },
    /// El servicio no está disponible en la región
    #[error("el servicio de generación no está disponible en esta región")]
    UnsupportedRegion,
    /// El modelo no devolvió contenido
    #[error("el modelo no devolvió contenido (modelo: {model})")]
    EmptyResponse { model: String },
    /// El contenido devuelto no es un objeto JSON reconocible
    #[error("la IA no generó un formato compatible: {detail}")]
    MalformedResponse { detail: String },
    /// Fallo de transporte u otro error de la API
    #[error("fallo al llamar a la API (modelo: {model}): {source}")]
    Api {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Fallos de la etapa de normalización
///
/// Solo existen dos: todo lo demás se repara con valores de reserva.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// El valor decodificado no es un objeto JSON
    #[error("la respuesta no es un objeto JSON")]
    NotAnObject,
    /// Falta el título del proyecto (marcador estructural)
    #[error("falta el título del proyecto")]
    MissingTitle,
}

/// Errores de renderizado o serialización de artefactos
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("fallo al generar el PDF: {0}")]
    Pdf(String),
    #[error("fallo al generar el documento Word: {0}")]
    Docx(String),
}

impl From<lopdf::Error> for ExportError {
    fn from(err: lopdf::Error) -> Self {
        ExportError::Pdf(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Pdf(err.to_string())
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::Docx(err.to_string())
    }
}

impl From<quick_xml::Error> for ExportError {
    fn from(err: quick_xml::Error) -> Self {
        ExportError::Docx(err.to_string())
    }
}

impl AppError {
    /// Crea un error de archivo con su ruta
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

/// Tipo de resultado de la aplicación
pub type Result<T> = std::result::Result<T, AppError>;
