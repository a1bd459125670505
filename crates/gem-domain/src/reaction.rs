use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::metabolite::CompoundKey;
use crate::DomainError;

/// Cota de flujo por defecto usada cuando la dirección no impone otra.
pub const DEFAULT_FLUX_LIMIT: f64 = 1000.0;

/// Direccionalidad de una reacción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Solo hacia productos (`=>`), flujo en [0, upper].
    Forward,
    /// Solo hacia sustratos (`<=`), flujo en [lower, 0].
    Reverse,
    /// Reversible (`<=>`).
    Bidirectional,
}

impl Direction {
    /// Cotas por defecto coherentes con la dirección.
    pub fn default_bound(&self) -> FluxBound {
        match self {
            Direction::Forward => FluxBound { lower: 0.0, upper: DEFAULT_FLUX_LIMIT },
            Direction::Reverse => FluxBound { lower: -DEFAULT_FLUX_LIMIT, upper: 0.0 },
            Direction::Bidirectional => FluxBound { lower: -DEFAULT_FLUX_LIMIT,
                                                    upper: DEFAULT_FLUX_LIMIT },
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Forward => "=>",
            Direction::Reverse => "<=",
            Direction::Bidirectional => "<=>",
        };
        write!(f, "{}", s)
    }
}

/// Par de cotas de flujo (inferior, superior).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxBound {
    lower: f64,
    upper: f64,
}

impl FluxBound {
    /// Construye el par validando `lower <= upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, DomainError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(DomainError::ValidationError("Las cotas de flujo deben ser finitas".to_string()));
        }
        if lower > upper {
            return Err(DomainError::ValidationError(format!("Cota inferior {} mayor que superior {}", lower, upper)));
        }
        Ok(FluxBound { lower, upper })
    }

    pub fn lower(&self) -> f64 { self.lower }
    pub fn upper(&self) -> f64 { self.upper }
}

/// Participante estequiométrico: coeficiente negativo = sustrato,
/// positivo = producto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub metabolite: CompoundKey,
    pub coefficient: f64,
}

impl Participant {
    pub fn substrate(metabolite: CompoundKey, coefficient: f64) -> Self {
        Participant { metabolite, coefficient: -coefficient.abs() }
    }
    pub fn product(metabolite: CompoundKey, coefficient: f64) -> Self {
        Participant { metabolite, coefficient: coefficient.abs() }
    }
}

/// Entrada de reacción de la red: identificador, participantes
/// estequiométricos, dirección y cotas de flujo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    id: String,
    name: Option<String>,
    participants: Vec<Participant>,
    direction: Direction,
    bound: FluxBound,
}

impl Reaction {
    /// Construye una reacción validando id, participantes y coeficientes.
    ///
    /// # Errores
    /// `DomainError::ValidationError` si el id está vacío, no hay
    /// participantes, hay metabolitos duplicados o algún coeficiente es 0.
    pub fn new(id: &str, participants: Vec<Participant>, direction: Direction, bound: FluxBound) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::ValidationError("El id de reacción no puede estar vacío".to_string()));
        }
        if participants.is_empty() {
            return Err(DomainError::ValidationError(format!("La reacción '{}' no tiene participantes", id)));
        }
        let mut seen = HashSet::new();
        for p in &participants {
            if p.coefficient == 0.0 || !p.coefficient.is_finite() {
                return Err(DomainError::ValidationError(format!("Coeficiente inválido para {} en '{}'", p.metabolite, id)));
            }
            if !seen.insert(p.metabolite.to_string()) {
                return Err(DomainError::ValidationError(format!("Metabolito duplicado {} en '{}'", p.metabolite, id)));
            }
        }
        Ok(Reaction { id: id.to_string(),
                      name: None,
                      participants,
                      direction,
                      bound })
    }

    /// Variante con cotas por defecto según la dirección.
    pub fn with_default_bound(id: &str, participants: Vec<Participant>, direction: Direction) -> Result<Self, DomainError> {
        Reaction::new(id, participants, direction, direction.default_bound())
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
    pub fn participants(&self) -> &[Participant] { &self.participants }
    pub fn direction(&self) -> Direction { self.direction }
    pub fn bound(&self) -> FluxBound { self.bound }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    /// Metabolitos consumidos cuando la reacción opera hacia adelante.
    pub fn substrates(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.coefficient < 0.0)
    }

    /// Metabolitos producidos cuando la reacción opera hacia adelante.
    pub fn products(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.coefficient > 0.0)
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {} [{}, {}]>", self.id, self.direction, self.bound.lower(), self.bound.upper())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> CompoundKey {
        CompoundKey::parse(raw).unwrap()
    }

    #[test]
    fn test_reaction_validates_participants() {
        let ok = Reaction::with_default_bound("rxn00001",
                                              vec![Participant::substrate(key("cpd00027_c0"), 1.0),
                                                   Participant::product(key("cpd00061_c0"), 1.0)],
                                              Direction::Forward);
        assert!(ok.is_ok());

        let empty = Reaction::with_default_bound("rxn00002", vec![], Direction::Forward);
        assert!(empty.is_err());

        let dup = Reaction::with_default_bound("rxn00003",
                                               vec![Participant::substrate(key("cpd00027_c0"), 1.0),
                                                    Participant::product(key("cpd00027_c0"), 1.0)],
                                               Direction::Forward);
        assert!(dup.is_err());
    }

    #[test]
    fn test_direction_default_bounds() {
        assert_eq!(Direction::Forward.default_bound().lower(), 0.0);
        assert_eq!(Direction::Reverse.default_bound().upper(), 0.0);
        let b = Direction::Bidirectional.default_bound();
        assert!(b.lower() < 0.0 && b.upper() > 0.0);
    }

    #[test]
    fn test_flux_bound_rejects_inverted() {
        assert!(FluxBound::new(5.0, -5.0).is_err());
        assert!(FluxBound::new(-5.0, 5.0).is_ok());
    }
}
