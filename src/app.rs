//! Aplicación - capa de orquestación
//!
//! Secuencia completa de una corrida: cargar la solicitud, generar el
//! plan y exportarlo a los dos formatos. Las dos exportaciones corren en
//! paralelo sin compartir estado: cada una construye sus propios
//! primitivos y su propio cursor de maquetado. Un fallo de exportación
//! se reporta y no tumba el programa; sin plan normalizado no se
//! exporta nada.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::export::{export_plan, Artifact, ExportFormat};
use crate::models::request::PlanningRequest;
use crate::services::GenerationService;
use crate::utils::logging;

/// Aplicación principal
pub struct App {
    config: Config,
    generation: GenerationService,
}

impl App {
    /// Inicializa la aplicación
    ///
    /// La credencial se comprueba aquí; una clave inválida falla antes
    /// de tocar el archivo de solicitud o la red.
    pub fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config.llm_model_name);
        let generation = GenerationService::new(&config).map_err(AppError::from)?;
        Ok(Self { config, generation })
    }

    /// Ejecuta la corrida completa
    pub async fn run(&self) -> Result<()> {
        let request = load_request(&self.config.request_file)?;
        if let Err(mensaje) = request.validate() {
            return Err(AppError::Config(mensaje).into());
        }
        info!(
            "📋 Solicitud: {} | {} | {} sesiones",
            request.grado, request.metodologia, request.num_sesiones
        );

        let plan = self.generation.generate_plan(&request).await?;
        info!(
            "✓ Plan generado: \"{}\" ({} fases, {} sesiones, {} vínculos curriculares)",
            logging::truncate_text(&plan.titulo_proyecto, 40),
            plan.fases_desarrollo.len(),
            plan.total_sesiones(),
            plan.vinculacion_contenido_pda.len()
        );

        // Cada exportación recibe su propia copia del plan
        let plan_pdf = plan.clone();
        let plan_docx = plan;
        let pdf_task =
            tokio::task::spawn_blocking(move || export_plan(&plan_pdf, ExportFormat::Pdf));
        let docx_task =
            tokio::task::spawn_blocking(move || export_plan(&plan_docx, ExportFormat::Docx));
        let (pdf, docx) =
            tokio::try_join!(pdf_task, docx_task).context("una exportación se interrumpió")?;

        let mut escritos = 0usize;
        for resultado in [pdf, docx] {
            match resultado {
                Ok(artifact) => {
                    self.write_artifact(&artifact)?;
                    escritos += 1;
                }
                Err(e) => warn!("⚠️ Exportación fallida: {}", e),
            }
        }
        if escritos == 0 {
            bail!("ninguna exportación terminó con éxito");
        }
        info!("{}", "=".repeat(60));
        info!("✅ Corrida completa: {} artefactos en {}", escritos, self.config.output_dir);
        info!("{}", "=".repeat(60));
        Ok(())
    }

    fn write_artifact(&self, artifact: &Artifact) -> Result<()> {
        let dir = Path::new(&self.config.output_dir);
        fs::create_dir_all(dir).map_err(|e| AppError::file(&self.config.output_dir, e))?;
        let path = dir.join(&artifact.filename);
        fs::write(&path, &artifact.bytes)
            .map_err(|e| AppError::file(path.display().to_string(), e))?;
        info!("💾 Escrito: {}", path.display());
        Ok(())
    }
}

/// Carga la solicitud de planeación desde su archivo TOML
fn load_request(path: &str) -> Result<PlanningRequest> {
    let raw = fs::read_to_string(path).map_err(|e| AppError::file(path, e))?;
    let request: PlanningRequest = toml::from_str(&raw)
        .with_context(|| format!("no se pudo interpretar la solicitud en {}", path))?;
    Ok(request)
}
