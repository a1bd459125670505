//! Pool universal de reacciones de reparación.
//!
//! El pool es el catálogo del que la búsqueda greedy del ejecutor heurístico
//! extrae candidatos: transportadores y rutas centrales lumped suficientes
//! para cerrar los huecos típicos de una red draft. El orden del pool es
//! fijo; la propuesta de reparaciones lo recorre siempre igual, así que dos
//! ejecuciones sobre las mismas entradas proponen el mismo conjunto.

use serde::{Deserialize, Serialize};

use gem_domain::{CompoundKey, Direction, DomainError, Participant, Reaction};

/// Catálogo ordenado de reacciones candidatas a reparación. Serializable:
/// un pool puede venir embebido (como aquí) o cargado como datos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversalPool {
    reactions: Vec<Reaction>,
}

impl UniversalPool {
    pub fn new(reactions: Vec<Reaction>) -> Self {
        UniversalPool { reactions }
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }
}

fn key(compound: &str, compartment: &str) -> Result<CompoundKey, DomainError> {
    CompoundKey::new(compound, compartment)
}

fn transporter(id: &str, compound: &str) -> Result<Reaction, DomainError> {
    Reaction::with_default_bound(id,
                                 vec![Participant::substrate(key(compound, "e0")?, 1.0),
                                      Participant::product(key(compound, "c0")?, 1.0)],
                                 Direction::Bidirectional)
}

fn conversion(id: &str, substrates: &[(&str, f64)], products: &[(&str, f64)], direction: Direction) -> Result<Reaction, DomainError> {
    let mut participants = Vec::with_capacity(substrates.len() + products.len());
    for (compound, coef) in substrates {
        participants.push(Participant::substrate(key(compound, "c0")?, *coef));
    }
    for (compound, coef) in products {
        participants.push(Participant::product(key(compound, "c0")?, *coef));
    }
    Reaction::with_default_bound(id, participants, direction)
}

/// Pool universal mínimo para metabolismo central: transportadores de los
/// sustratos del barrido energético más rutas lumped de asimilación,
/// respiración y fermentación.
pub fn core_universal_pool() -> Result<UniversalPool, DomainError> {
    let reactions = vec![
        // Transportadores (extracelular <-> citosol)
        transporter("rxn05155", "cpd00027")?, // glucosa
        transporter("rxn05488", "cpd00029")?, // acetato
        transporter("rxn05581", "cpd00100")?, // glicerol
        transporter("rxn05654", "cpd00036")?, // succinato
        transporter("rxn05469", "cpd00020")?, // piruvato
        transporter("rxn05508", "cpd00023")?, // glutamato
        transporter("rxn05468", "cpd00007")?, // oxígeno
        transporter("rxn05466", "cpd00013")?, // amonio
        // Glucólisis lumped: glucosa -> piruvato + ATP
        conversion("rxn00148", &[("cpd00027", 1.0)], &[("cpd00020", 2.0), ("cpd00002", 2.0)], Direction::Forward)?,
        // Asimilación de sustratos alternativos hacia piruvato
        conversion("rxn00225", &[("cpd00029", 1.0)], &[("cpd00020", 1.0)], Direction::Forward)?, // acetato
        conversion("rxn00611", &[("cpd00100", 1.0)], &[("cpd00020", 1.0)], Direction::Forward)?, // glicerol
        conversion("rxn00284", &[("cpd00036", 1.0)], &[("cpd00020", 1.0)], Direction::Forward)?, // succinato
        conversion("rxn00187", &[("cpd00023", 1.0)], &[("cpd00020", 1.0)], Direction::Bidirectional)?, // glutamato <-> piruvato (esqueleto C)
        // Respiración lumped: piruvato + O2 -> ATP + CO2
        conversion("rxn08173", &[("cpd00020", 1.0), ("cpd00007", 1.0)], &[("cpd00002", 3.0), ("cpd00011", 1.0)], Direction::Forward)?,
        // Fermentación: piruvato -> acetato + ATP (vía anaerobia)
        conversion("rxn00499", &[("cpd00020", 1.0)], &[("cpd00029", 1.0), ("cpd00002", 1.0)], Direction::Forward)?,
        // Síntesis de glutamato desde piruvato + amonio
        conversion("rxn00184", &[("cpd00020", 1.0), ("cpd00013", 1.0)], &[("cpd00023", 1.0)], Direction::Forward)?,
    ];
    Ok(UniversalPool::new(reactions))
}
