//! Generador de identificadores con dos estrategias de colisión explícitas.
//!
//! - `RandomRetry`: regenerar el componente aleatorio hasta un tope fijo.
//!   Es la estrategia de los ids base frescos (`{model|media}_<ts>_<rand>`).
//! - `TimestampSuffix`: insertar un timestamp antes del sufijo de estado.
//!   Es la estrategia de los ids con nombre y de los sucesores derivados:
//!   determinista y depurable, a diferencia del reintento aleatorio.
//!
//! La estrategia la elige el caller por el método que invoca, nunca un
//! control de flujo implícito; `disambiguate` hace el despacho explícito.

use chrono::Utc;
use uuid::Uuid;

use crate::constants::{MAX_ID_GENERATION_RETRIES, RANDOM_ID_LEN};
use crate::errors::CoreError;

use super::{ArtifactId, ArtifactKind, VersionState};

/// Estrategia de resolución de colisiones, nombrada para que quede
/// registrada la intención en el punto de uso.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionStrategy {
    RandomRetry,
    TimestampSuffix,
}

pub struct IdGenerator;

impl IdGenerator {
    /// Produce un id base `{model|media}_<timestamp>_<aleatorio>` verificado
    /// contra `exists` (normalmente, membership en el store de sesión).
    ///
    /// # Errores
    /// `CoreError::StorageCollision` si tras `MAX_ID_GENERATION_RETRIES`
    /// reintentos todos los candidatos colisionaron.
    pub fn new_base_id<F>(kind: ArtifactKind, exists: F) -> Result<String, CoreError>
        where F: Fn(&str) -> bool
    {
        let stamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
        let first = format!("{}_{}_{}", kind, stamp, random_component());
        Self::disambiguate(ArtifactId::bare(&first), CollisionStrategy::RandomRetry, &exists)
    }

    /// Produce un id con nombre de usuario más sufijo de estado. Ante una
    /// colisión aplica `TimestampSuffix` en lugar de reintentar
    /// aleatoriamente.
    pub fn new_named_id<F>(name: &str, state: VersionState, exists: F) -> Result<String, CoreError>
        where F: Fn(&str) -> bool
    {
        if name.trim().is_empty() || name.contains('.') {
            return Err(CoreError::Validation(format!("nombre de artefacto inválido: '{}'", name)));
        }
        Self::disambiguate(ArtifactId::with_state(name, state), CollisionStrategy::TimestampSuffix, &exists)
    }

    /// Deriva el id sucesor de `raw` y garantiza unicidad con la estrategia
    /// `TimestampSuffix` (una red puede gapfillearse dos veces; ambas
    /// derivaciones parten del mismo sufijo).
    pub fn successor_id<F>(raw: &str, exists: F) -> Result<String, CoreError>
        where F: Fn(&str) -> bool
    {
        let parsed = ArtifactId::parse(raw)?;
        let state = parsed.state()
                          .ok_or_else(|| CoreError::InvalidIdentifierFormat(raw.to_string()))?;
        let candidate = ArtifactId::with_state(parsed.base(), state.successor());
        Self::disambiguate(candidate, CollisionStrategy::TimestampSuffix, &exists)
    }

    /// Despacho explícito de la estrategia de colisión sobre un candidato.
    fn disambiguate<F>(candidate: ArtifactId, strategy: CollisionStrategy, exists: &F) -> Result<String, CoreError>
        where F: Fn(&str) -> bool
    {
        let rendered = candidate.to_string();
        if !exists(&rendered) {
            return Ok(rendered);
        }
        match strategy {
            CollisionStrategy::RandomRetry => {
                // El primer intento ya colisionó; quedan los reintentos
                let (kind_stamp, _) = rendered.rsplit_once('_')
                                              .ok_or_else(|| CoreError::InvalidIdentifierFormat(rendered.clone()))?;
                for _ in 1..MAX_ID_GENERATION_RETRIES {
                    let retry = format!("{}_{}", kind_stamp, random_component());
                    if !exists(&retry) {
                        return Ok(retry);
                    }
                }
                Err(CoreError::StorageCollision { attempts: MAX_ID_GENERATION_RETRIES })
            }
            CollisionStrategy::TimestampSuffix => {
                let stamped = format!("{}_{}", candidate.base(), Utc::now().format("%Y%m%d%H%M%S"));
                let fallback = match candidate.state() {
                    Some(state) => ArtifactId::with_state(&stamped, state).to_string(),
                    None => stamped,
                };
                if exists(&fallback) {
                    // Mismo nombre, mismo segundo: el caller reintenta
                    return Err(CoreError::DuplicateId(fallback));
                }
                Ok(fallback)
            }
        }
    }
}

fn random_component() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..RANDOM_ID_LEN].to_string()
}
