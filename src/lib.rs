//! # Planeador NEM
//!
//! Generador de planos didácticos de la Nueva Escuela Mexicana: toma los
//! parámetros de planeación de un docente, pide al modelo un plan en
//! JSON, lo normaliza y lo exporta a PDF y a documento Word.
//!
//! ## Arquitectura
//!
//! El sistema se organiza en capas estrictas, de abajo hacia arriba:
//!
//! ### ① Modelo y normalización
//! - `models/` - tipos del plan y de la solicitud
//! - `normalizer` - única pasada de tolerancia sobre el JSON externo;
//!   a partir de aquí el esquema es estricto
//! - `pedagogy` - catálogo estático de fases NEM y metodologías
//!
//! ### ② Presentación
//! - `render/` - renderizadores de sección: plan normalizado a
//!   primitivos de maquetado (texto, tabla, salto de página), una
//!   función pura por sección, parametrizadas por tema
//!
//! ### ③ Maquetado y exportación
//! - `layout/` - motor de paginación con cursor explícito por
//!   exportación, filas atómicas y numeración en pasada final
//! - `export/` - orquestador y los dos backends: PDF de páginas fijas y
//!   Word de flujo, ambos sobre los mismos primitivos
//!
//! ### ④ Servicio y aplicación
//! - `services/` - cliente de generación contra la API del modelo
//! - `app` - corrida completa: solicitud, generación, exportaciones en
//!   paralelo y escritura a disco

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod models;
pub mod normalizer;
pub mod pedagogy;
pub mod render;
pub mod services;
pub mod utils;

// Reexportación de los tipos de uso común
pub use app::App;
pub use config::Config;
pub use error::{AppError, ExportError, GenerationError, Result, ValidationError};
pub use export::{export_plan, Artifact, ExportFormat};
pub use models::plan::LessonPlan;
pub use models::request::{Methodology, PlanningRequest};
pub use normalizer::normalize;
