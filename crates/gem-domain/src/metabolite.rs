use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Clave compuesto-en-compartimento, p. ej. `cpd00027_c0` (glucosa citosólica)
/// o `cpd00007_e0` (oxígeno extracelular). El sufijo tras el último `_` es el
/// compartimento; el resto es el identificador del compuesto.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompoundKey {
    compound: String,
    compartment: String,
}

impl CompoundKey {
    /// Construye la clave validando ambos componentes.
    pub fn new(compound: &str, compartment: &str) -> Result<Self, DomainError> {
        if compound.is_empty() || compartment.is_empty() {
            return Err(DomainError::ValidationError("CompoundKey requiere compuesto y compartimento no vacíos".to_string()));
        }
        if compound.contains(char::is_whitespace) || compartment.contains(char::is_whitespace) {
            return Err(DomainError::ValidationError(format!("CompoundKey no admite espacios: '{}_{}'", compound, compartment)));
        }
        Ok(CompoundKey { compound: compound.to_string(),
                         compartment: compartment.to_string() })
    }

    /// Parsea una clave `<compuesto>_<compartimento>` dividiendo por el último `_`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.rsplit_once('_') {
            Some((compound, compartment)) => CompoundKey::new(compound, compartment),
            None => Err(DomainError::FormatError(format!("CompoundKey sin compartimento: '{}'", raw))),
        }
    }

    pub fn compound(&self) -> &str { &self.compound }
    pub fn compartment(&self) -> &str { &self.compartment }
}

impl fmt::Display for CompoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.compound, self.compartment)
    }
}

impl TryFrom<String> for CompoundKey {
    type Error = DomainError;
    fn try_from(raw: String) -> Result<Self, Self::Error> {
        CompoundKey::parse(&raw)
    }
}

impl From<CompoundKey> for String {
    fn from(k: CompoundKey) -> String {
        k.to_string()
    }
}

/// Nodo de la red: un compuesto situado en un compartimento, con metadatos
/// opcionales provenientes del servicio de referencia.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metabolite {
    key: CompoundKey,
    name: Option<String>,
    formula: Option<String>,
}

impl Metabolite {
    pub fn new(key: CompoundKey) -> Self {
        Metabolite { key, name: None, formula: None }
    }

    pub fn with_annotation(key: CompoundKey, name: Option<String>, formula: Option<String>) -> Self {
        Metabolite { key, name, formula }
    }

    pub fn key(&self) -> &CompoundKey { &self.key }
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
    pub fn formula(&self) -> Option<&str> { self.formula.as_deref() }
}

impl fmt::Display for Metabolite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(n) => write!(f, "<{} ({})>", self.key, n),
            None => write!(f, "<{}>", self.key),
        }
    }
}
