use anyhow::Result;
use planeador_nem::utils::logging;
use planeador_nem::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Carga de configuración antes del registro para respetar el modo detallado
    let config = Config::from_env();
    logging::init(config.verbose_logging);

    App::initialize(config)?.run().await?;

    Ok(())
}
