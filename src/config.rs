//! Configuración de la aplicación desde variables de entorno.
//! Carga `.env` una sola vez (si existe) antes de leer el entorno.
//!
//! | variable                      | efecto                                      |
//! |-------------------------------|---------------------------------------------|
//! | `STEPFLOW_MAX_STEPS`          | tope de steps por ejecución (sin tope si no)|
//! | `STEPFLOW_STRICT_TRANSITIONS` | outcome sin cableado = error                |
//! | `STEPFLOW_LOG` / `RUST_LOG`   | filtro de logging (por defecto `info`)      |

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::errors::AppError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const MAX_STEPS_VAR: &str = "STEPFLOW_MAX_STEPS";
pub const STRICT_VAR: &str = "STEPFLOW_STRICT_TRANSITIONS";
pub const LOG_VAR: &str = "STEPFLOW_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub max_steps: Option<u64>,
    pub strict_transitions: bool,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { max_steps: None,
               strict_transitions: false,
               log_filter: DEFAULT_LOG_FILTER.to_string() }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente arbitraria (tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let max_steps = match lookup(MAX_STEPS_VAR) {
            None => None,
            Some(raw) => Some(raw.trim()
                                 .parse::<u64>()
                                 .map_err(|_| AppError::Config(format!("{MAX_STEPS_VAR} debe ser un entero, se recibió '{raw}'")))?),
        };
        let strict_transitions = match lookup(STRICT_VAR) {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| AppError::Config(format!("{STRICT_VAR} debe ser booleano, se recibió '{raw}'")))?,
        };
        let log_filter = lookup(LOG_VAR).or_else(|| lookup("RUST_LOG"))
                                        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Ok(Self { max_steps,
                  strict_transitions,
                  log_filter })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
