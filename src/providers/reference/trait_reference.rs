//! Trait para el servicio de referencia de compuestos.
//! Resuelve un id de compuesto a su ficha (nombre, fórmula). Se consume al
//! anotar redes recién construidas y para enriquecer mensajes del facade; el
//! sistema funciona igual si un compuesto no tiene ficha.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::providers::ParameterDefinition;

/// Ficha de referencia de un compuesto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub compound_id: String,
    pub name: String,
    pub formula: Option<String>,
}

#[async_trait]
pub trait CompoundReferenceProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;
    fn get_available_parameters(&self) -> HashMap<String, ParameterDefinition>;

    /// Busca la ficha de un compuesto; `None` si no está en la referencia.
    async fn lookup(&self, compound_id: &str) -> Result<Option<CompoundRecord>, Box<dyn std::error::Error>>;
}
