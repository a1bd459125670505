//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).
//! Los tests no dependen de `CONFIG`: cada sección se convierte en los structs
//! de opciones del core, que pueden construirse a mano.
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use gem_core::constants::{DEFAULT_STAGE_A_CONCURRENCY, DEFAULT_STORE_CAPACITY};
use gem_core::gapfill::GapfillOptions;
use gem_core::store::StoreConfig;

/// Configuración global de la aplicación.
pub struct AppConfig {
    pub store: StoreSettings,
    pub gapfill: GapfillSettings,
}

/// Parámetros del store de sesión.
pub struct StoreSettings {
    /// Entradas máximas antes del desalojo FIFO.
    pub capacity: usize,
    pub eviction_enabled: bool,
}

/// Parámetros de orquestación y presupuestos de tiempo.
pub struct GapfillSettings {
    pub stage_a_concurrency: usize,
    /// Presupuesto por llamada de gapfilling (minutos de motor externo).
    pub gapfill_timeout_secs: u64,
    /// Presupuesto por llamada de análisis de flujos.
    pub analyze_timeout_secs: u64,
}

impl StoreSettings {
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig { capacity: self.capacity,
                      eviction_enabled: self.eviction_enabled }
    }
}

impl GapfillSettings {
    pub fn to_gapfill_options(&self) -> GapfillOptions {
        GapfillOptions { stage_a_concurrency: self.stage_a_concurrency,
                         ..GapfillOptions::default() }
    }

    pub fn gapfill_timeout(&self) -> Duration {
        Duration::from_secs(self.gapfill_timeout_secs)
    }

    pub fn analyze_timeout(&self) -> Duration {
        Duration::from_secs(self.analyze_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> T {
    env::var(var).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // .env es opcional; las variables de entorno reales tienen prioridad
    let _ = dotenvy::dotenv();
    AppConfig {
        store: StoreSettings { capacity: env_parse("GEMFLOW_STORE_CAPACITY", DEFAULT_STORE_CAPACITY),
                               eviction_enabled: env_parse("GEMFLOW_STORE_EVICTION", true) },
        gapfill: GapfillSettings { stage_a_concurrency: env_parse("GEMFLOW_STAGE_A_CONCURRENCY", DEFAULT_STAGE_A_CONCURRENCY),
                                   gapfill_timeout_secs: env_parse("GEMFLOW_GAPFILL_TIMEOUT_SECS", 600),
                                   analyze_timeout_secs: env_parse("GEMFLOW_ANALYZE_TIMEOUT_SECS", 30) },
    }
});
