//! Trait y tipos para proveedores de plantillas de reconstrucción.
//! El contrato: construir una red draft (sin gapfillear) a partir de una
//! fuente genómica, mapeando funciones génicas anotadas a reacciones de la
//! plantilla. El sufijo de versión del id y el registro en el store son
//! responsabilidad del facade, no del proveedor.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use gem_domain::MetabolicNetwork;

use crate::providers::ParameterDefinition;

/// Fuente genómica de una reconstrucción: identificador del genoma y lista
/// de funciones génicas anotadas (las que la plantilla sabe mapear a
/// reacciones).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeSource {
    pub genome_id: String,
    pub features: Vec<String>,
}

impl GenomeSource {
    pub fn new(genome_id: &str, features: Vec<String>) -> Self {
        GenomeSource { genome_id: genome_id.to_string(), features }
    }
}

#[async_trait]
pub trait TemplateProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;
    fn get_available_parameters(&self) -> HashMap<String, ParameterDefinition>;

    /// Construye la red draft. El id de la red devuelta es provisional; el
    /// facade la re-identifica antes de registrarla.
    async fn build_draft(&self, genome: &GenomeSource, parameters: &HashMap<String, Value>)
                         -> Result<MetabolicNetwork, Box<dyn std::error::Error>>;
}
