//! Referencia embebida de compuestos con cache concurrente.
//!
//! La tabla cubre los compuestos del metabolismo central que usan las
//! plantillas y el pool universal. Las consultas resueltas (incluidos los
//! misses) se cachean en un `DashMap`: el servicio real de referencia es
//! remoto y caro, y el facade consulta el mismo puñado de ids una y otra vez
//! al anotar redes.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;

use crate::providers::reference::trait_reference::{CompoundRecord, CompoundReferenceProvider};
use crate::providers::ParameterDefinition;

const TABLE: &[(&str, &str, &str)] = &[("cpd00001", "H2O", "H2O"),
                                       ("cpd00002", "ATP", "C10H12N5O13P3"),
                                       ("cpd00007", "O2", "O2"),
                                       ("cpd00011", "CO2", "CO2"),
                                       ("cpd00013", "NH3", "H3N"),
                                       ("cpd00020", "Pyruvate", "C3H3O3"),
                                       ("cpd00023", "L-Glutamate", "C5H8NO4"),
                                       ("cpd00027", "D-Glucose", "C6H12O6"),
                                       ("cpd00029", "Acetate", "C2H3O2"),
                                       ("cpd00036", "Succinate", "C4H4O4"),
                                       ("cpd00100", "Glycerol", "C3H8O3"),
                                       ("cpd11416", "Biomass", "")];

pub struct EmbeddedReferenceProvider {
    cache: DashMap<String, Option<CompoundRecord>>,
}

impl EmbeddedReferenceProvider {
    pub fn new() -> Self {
        EmbeddedReferenceProvider { cache: DashMap::new() }
    }

    fn resolve(compound_id: &str) -> Option<CompoundRecord> {
        TABLE.iter()
             .find(|(id, _, _)| *id == compound_id)
             .map(|(id, name, formula)| CompoundRecord { compound_id: id.to_string(),
                                                         name: name.to_string(),
                                                         formula: if formula.is_empty() {
                                                             None
                                                         } else {
                                                             Some(formula.to_string())
                                                         } })
    }

    /// Entradas cacheadas hasta el momento (para tests).
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

impl Default for EmbeddedReferenceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompoundReferenceProvider for EmbeddedReferenceProvider {
    fn get_name(&self) -> &str {
        "embedded"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Tabla embebida de compuestos de metabolismo central"
    }

    fn get_available_parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::new()
    }

    async fn lookup(&self, compound_id: &str) -> Result<Option<CompoundRecord>, Box<dyn std::error::Error>> {
        if let Some(hit) = self.cache.get(compound_id) {
            return Ok(hit.clone());
        }
        let record = Self::resolve(compound_id);
        self.cache.insert(compound_id.to_string(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_hit_and_miss() {
        let provider = EmbeddedReferenceProvider::new();
        let glucose = provider.lookup("cpd00027").await.unwrap().unwrap();
        assert_eq!(glucose.name, "D-Glucose");
        assert_eq!(glucose.formula.as_deref(), Some("C6H12O6"));

        assert!(provider.lookup("cpd99999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_misses_are_cached_too() {
        let provider = EmbeddedReferenceProvider::new();
        provider.lookup("cpd99999").await.unwrap();
        provider.lookup("cpd99999").await.unwrap();
        provider.lookup("cpd00002").await.unwrap();
        assert_eq!(provider.cache_len(), 2);
    }

    #[tokio::test]
    async fn test_biomass_has_no_formula() {
        let provider = EmbeddedReferenceProvider::new();
        let biomass = provider.lookup("cpd11416").await.unwrap().unwrap();
        assert!(biomass.formula.is_none());
    }
}
