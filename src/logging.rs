//! Inicialización del subscriber de logging.
//!
//! Los crates del workspace loguean vía la fachada `log`; el subscriber de
//! `tracing-subscriber` instala el puente `tracing-log` al inicializarse, de
//! modo que esos registros también se emiten. La salida va a stderr para no
//! mezclarse con el JSON que imprime el binario.

use tracing_subscriber::EnvFilter;

use crate::errors::AppError;

/// Valida el filtro (sintaxis de `RUST_LOG`).
pub fn parse_filter(filter: &str) -> Result<EnvFilter, AppError> {
    EnvFilter::try_new(filter).map_err(|e| AppError::Config(format!("filtro de logging inválido '{filter}': {e}")))
}

/// Instala el subscriber global. Llamadas repetidas no hacen nada; un filtro
/// inválido es un error de configuración.
pub fn init(filter: &str) -> Result<(), AppError> {
    let filter = parse_filter(filter)?;
    let _ = tracing_subscriber::fmt().with_env_filter(filter)
                                     .with_writer(std::io::stderr)
                                     .with_target(true)
                                     .try_init();
    Ok(())
}
