//! Utilidades de registro
//!
//! Inicialización del suscriptor de `tracing` y ayudantes de formato
//! para los mensajes de progreso.

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Inicializa el registro
///
/// Respeta `RUST_LOG` si está definido; si no, usa `info` (o `debug`
/// cuando se pide registro detallado).
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// Registra el arranque del programa
pub fn log_startup(model_name: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 Planeador NEM - generación y exportación de planos didácticos");
    info!("🧠 Modelo configurado: {}", model_name);
    info!(
        "🕐 Inicio: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// Trunca un texto largo para mostrarlo en el registro
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("corto", 10), "corto");
        assert_eq!(truncate_text("un título bastante largo", 9), "un título...");
    }
}
