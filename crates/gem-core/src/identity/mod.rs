//! Identidad de artefactos: ids base ordenables lexicográficamente y sufijos
//! de estado de versión append-only.
//!
//! Un id completo es `<base>.<estado>`, donde `<base>` es
//! `{model|media}_<timestamp>_<aleatorio>` o un nombre aportado por el
//! usuario, y `<estado>` es `draft`, `gf`, o cualquier secuencia obtenida
//! añadiendo `.gf`. El sufijo solo se extiende, nunca se reescribe, de modo
//! que la ascendencia de un artefacto se reconstruye por prefijo de string.

pub mod generator;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

pub use generator::{CollisionStrategy, IdGenerator};

/// Clase de artefacto a la que pertenece un id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    Model,
    Media,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => write!(f, "model"),
            ArtifactKind::Media => write!(f, "media"),
        }
    }
}

/// Origen del estado de versión: una red nace `draft` (nunca gapfilleada) o,
/// si fue importada ya reparada, directamente `gf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionOrigin {
    Draft,
    Gf,
}

/// Sufijo de estado de versión: el origen más el número de pasadas de
/// gapfilling posteriores. `draft` -> 0 pasadas; `draft.gf.gf` -> 2;
/// `gf` -> 1 (importada ya reparada); `gf.gf` -> 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionState {
    origin: VersionOrigin,
    extra_gf: usize,
}

impl VersionState {
    pub fn draft() -> Self {
        VersionState { origin: VersionOrigin::Draft, extra_gf: 0 }
    }

    pub fn origin(&self) -> VersionOrigin { self.origin }

    /// Una red con estado `draft` (a secas) nunca pasó por gapfilling; todo
    /// otro estado pasó al menos una vez.
    pub fn has_been_gapfilled(&self) -> bool {
        self.origin == VersionOrigin::Gf || self.extra_gf > 0
    }

    /// Transición pura del sufijo: `draft -> draft.gf`; cualquier otro
    /// `X -> X.gf`. Solo se añade, nunca se recorta.
    pub fn successor(&self) -> VersionState {
        VersionState { origin: self.origin, extra_gf: self.extra_gf + 1 }
    }

    /// Número de segmentos del sufijo (para comprobar monotonicidad).
    pub fn segment_count(&self) -> usize {
        1 + self.extra_gf
    }

    /// Parsea el estado desde sus segmentos (`["draft", "gf", ...]`).
    fn from_segments(segments: &[&str]) -> Option<VersionState> {
        let (first, rest) = segments.split_first()?;
        let origin = match *first {
            "draft" => VersionOrigin::Draft,
            "gf" => VersionOrigin::Gf,
            _ => return None,
        };
        if rest.iter().any(|s| *s != "gf") {
            return None;
        }
        Some(VersionState { origin, extra_gf: rest.len() })
    }
}

impl fmt::Display for VersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            VersionOrigin::Draft => write!(f, "draft")?,
            VersionOrigin::Gf => write!(f, "gf")?,
        }
        for _ in 0..self.extra_gf {
            write!(f, ".gf")?;
        }
        Ok(())
    }
}

/// Id de artefacto descompuesto en base y estado de versión. Los medios no
/// llevan estado (son inmutables); las redes siempre llevan uno.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactId {
    base: String,
    state: Option<VersionState>,
}

impl ArtifactId {
    pub fn with_state(base: &str, state: VersionState) -> Self {
        ArtifactId { base: base.to_string(), state: Some(state) }
    }

    pub fn bare(base: &str) -> Self {
        ArtifactId { base: base.to_string(), state: None }
    }

    pub fn base(&self) -> &str { &self.base }
    pub fn state(&self) -> Option<VersionState> { self.state }

    /// Parsea un id, separando del final la secuencia de segmentos de estado
    /// reconocidos (`draft`/`gf`). Un id sin segmentos reconocibles queda con
    /// `state = None` (caso de los medios).
    pub fn parse(raw: &str) -> Result<ArtifactId, CoreError> {
        if raw.trim().is_empty() {
            return Err(CoreError::InvalidIdentifierFormat(raw.to_string()));
        }
        let segments: Vec<&str> = raw.split('.').collect();
        // Buscar el corte más temprano cuyo resto sea un estado válido: así
        // `x.draft.gf` se parte en base `x` + estado `draft.gf` y no en
        // base `x.draft` + estado `gf`.
        for cut in 1..segments.len() {
            if let Some(state) = VersionState::from_segments(&segments[cut..]) {
                let base = segments[..cut].join(".");
                if base.is_empty() {
                    break;
                }
                return Ok(ArtifactId { base, state: Some(state) });
            }
        }
        Ok(ArtifactId { base: raw.to_string(), state: None })
    }

    /// Deriva el id sucesor aplicando la regla append-only del sufijo.
    ///
    /// # Errores
    /// `CoreError::InvalidIdentifierFormat` si el id no lleva un estado de
    /// versión reconocido (p. ej. el id de un medio).
    pub fn derive_successor(raw: &str) -> Result<String, CoreError> {
        let parsed = ArtifactId::parse(raw)?;
        match parsed.state {
            Some(state) => Ok(ArtifactId::with_state(&parsed.base, state.successor()).to_string()),
            None => Err(CoreError::InvalidIdentifierFormat(raw.to_string())),
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => write!(f, "{}.{}", self.base, state),
            None => write!(f, "{}", self.base),
        }
    }
}
