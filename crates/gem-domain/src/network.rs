// network.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::metabolite::{CompoundKey, Metabolite};
use crate::reaction::Reaction;
use crate::DomainError;

/// Red metabólica a escala genómica: conjunto de reacciones con sus
/// participantes por compartimento y una reacción objetivo opcional (ausente
/// en redes draft construidas offline).
///
/// La red es mutable en el sentido de Rust (se editan copias de trabajo),
/// pero una vez registrada en el store de sesión solo se consulta; cualquier
/// derivación pasa por [`MetabolicNetwork::deep_clone_as`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetabolicNetwork {
    id: String,
    name: Option<String>,
    metabolites: IndexMap<String, Metabolite>,
    reactions: IndexMap<String, Reaction>,
    objective: Option<String>,
}

impl MetabolicNetwork {
    pub fn new(id: &str) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::ValidationError("El id de red no puede estar vacío".to_string()));
        }
        Ok(MetabolicNetwork { id: id.to_string(),
                              name: None,
                              metabolites: IndexMap::new(),
                              reactions: IndexMap::new(),
                              objective: None })
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
    pub fn objective(&self) -> Option<&str> { self.objective.as_deref() }
    pub fn reaction_count(&self) -> usize { self.reactions.len() }
    pub fn metabolite_count(&self) -> usize { self.metabolites.len() }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    /// Registra un metabolito si no existía aún.
    pub fn ensure_metabolite(&mut self, metabolite: Metabolite) {
        self.metabolites.entry(metabolite.key().to_string()).or_insert(metabolite);
    }

    /// Anota un metabolito existente con datos del servicio de referencia.
    /// La anotación no participa del fingerprint (es metadato, no contenido
    /// estequiométrico). Devuelve `false` si el nodo no existe.
    pub fn annotate_metabolite(&mut self, key: &CompoundKey, name: Option<String>, formula: Option<String>) -> bool {
        match self.metabolites.get_mut(&key.to_string()) {
            Some(slot) => {
                *slot = Metabolite::with_annotation(key.clone(), name, formula);
                true
            }
            None => false,
        }
    }

    /// Añade una reacción, registrando automáticamente como nodos los
    /// metabolitos participantes que falten.
    ///
    /// # Errores
    /// `DomainError::ValidationError` si ya existe una reacción con ese id.
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<(), DomainError> {
        if self.reactions.contains_key(reaction.id()) {
            return Err(DomainError::ValidationError(format!("Reacción duplicada '{}' en la red '{}'", reaction.id(), self.id)));
        }
        for p in reaction.participants() {
            self.ensure_metabolite(Metabolite::new(p.metabolite.clone()));
        }
        self.reactions.insert(reaction.id().to_string(), reaction);
        Ok(())
    }

    /// Fija la reacción objetivo; debe existir en la red.
    pub fn set_objective(&mut self, reaction_id: &str) -> Result<(), DomainError> {
        if !self.reactions.contains_key(reaction_id) {
            return Err(DomainError::ValidationError(format!("La reacción objetivo '{}' no existe en la red '{}'", reaction_id, self.id)));
        }
        self.objective = Some(reaction_id.to_string());
        Ok(())
    }

    pub fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.reactions.get(id)
    }

    pub fn contains_reaction(&self, id: &str) -> bool {
        self.reactions.contains_key(id)
    }

    pub fn reactions(&self) -> impl Iterator<Item = &Reaction> {
        self.reactions.values()
    }

    pub fn metabolites(&self) -> impl Iterator<Item = &Metabolite> {
        self.metabolites.values()
    }

    pub fn metabolite(&self, key: &CompoundKey) -> Option<&Metabolite> {
        self.metabolites.get(&key.to_string())
    }

    /// Copia profunda bajo un identificador nuevo. Es la única vía para
    /// derivar redes: el original nunca se modifica en sitio.
    pub fn deep_clone_as(&self, new_id: &str) -> Result<MetabolicNetwork, DomainError> {
        if new_id.trim().is_empty() {
            return Err(DomainError::ValidationError("El id de la red derivada no puede estar vacío".to_string()));
        }
        let mut copy = self.clone();
        copy.id = new_id.to_string();
        Ok(copy)
    }

    /// Hash de contenido de la red, excluyendo el id: dos redes con el mismo
    /// contenido bajo ids distintos comparten fingerprint, y cualquier
    /// mutación de reacciones, cotas u objetivo lo cambia. Respalda la
    /// verificación de que una red registrada no fue alterada en sitio.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        let mut reaction_ids: Vec<&String> = self.reactions.keys().collect();
        reaction_ids.sort();
        for rid in reaction_ids {
            let r = &self.reactions[rid.as_str()];
            hasher.update(r.id().as_bytes());
            hasher.update(format!("{}", r.direction()).as_bytes());
            hasher.update(format!("{:.9}|{:.9}", r.bound().lower(), r.bound().upper()).as_bytes());
            let mut parts: Vec<String> = r.participants()
                                          .iter()
                                          .map(|p| format!("{}:{:.9}", p.metabolite, p.coefficient))
                                          .collect();
            parts.sort();
            for part in parts {
                hasher.update(part.as_bytes());
            }
        }
        let mut met_keys: Vec<&String> = self.metabolites.keys().collect();
        met_keys.sort();
        for k in met_keys {
            hasher.update(k.as_bytes());
        }
        if let Some(obj) = &self.objective {
            hasher.update(obj.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for MetabolicNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<network {} ({} rxns, {} mets)>", self.id, self.reactions.len(), self.metabolites.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::{Direction, Participant};

    fn key(raw: &str) -> CompoundKey {
        CompoundKey::parse(raw).unwrap()
    }

    fn rxn(id: &str, sub: &str, prod: &str) -> Reaction {
        Reaction::with_default_bound(id,
                                     vec![Participant::substrate(key(sub), 1.0),
                                          Participant::product(key(prod), 1.0)],
                                     Direction::Forward).unwrap()
    }

    #[test]
    fn test_add_reaction_registers_metabolites() {
        let mut net = MetabolicNetwork::new("model_x.draft").unwrap();
        net.add_reaction(rxn("rxn00001", "cpd00027_c0", "cpd00061_c0")).unwrap();
        assert_eq!(net.metabolite_count(), 2);
        assert!(net.metabolite(&key("cpd00027_c0")).is_some());
    }

    #[test]
    fn test_duplicate_reaction_rejected() {
        let mut net = MetabolicNetwork::new("model_x.draft").unwrap();
        net.add_reaction(rxn("rxn00001", "cpd00027_c0", "cpd00061_c0")).unwrap();
        assert!(net.add_reaction(rxn("rxn00001", "cpd00027_c0", "cpd00009_c0")).is_err());
    }

    #[test]
    fn test_objective_must_exist() {
        let mut net = MetabolicNetwork::new("model_x.draft").unwrap();
        assert!(net.set_objective("bio1").is_err());
        net.add_reaction(rxn("bio1", "cpd00061_c0", "cpd11416_c0")).unwrap();
        net.set_objective("bio1").unwrap();
        assert_eq!(net.objective(), Some("bio1"));
    }

    #[test]
    fn test_fingerprint_ignores_id_but_not_content() {
        let mut a = MetabolicNetwork::new("model_a.draft").unwrap();
        a.add_reaction(rxn("rxn00001", "cpd00027_c0", "cpd00061_c0")).unwrap();
        let b = a.deep_clone_as("model_b.draft.gf").unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = b.clone();
        c.add_reaction(rxn("rxn00002", "cpd00061_c0", "cpd00009_c0")).unwrap();
        assert_ne!(b.fingerprint(), c.fingerprint());
    }
}
