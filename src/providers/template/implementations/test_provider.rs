//! Proveedor de plantilla para tests: red mínima y determinista.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use gem_domain::{CompoundKey, Direction, MetabolicNetwork, Participant, Reaction};

use crate::providers::template::trait_template::{GenomeSource, TemplateProvider};
use crate::providers::ParameterDefinition;

pub struct TestTemplateProvider {
    pub name: String,
    pub version: String,
}

impl TestTemplateProvider {
    pub fn new(name: String, version: String) -> Self {
        Self { name, version }
    }
}

#[async_trait]
impl TemplateProvider for TestTemplateProvider {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_version(&self) -> &str {
        &self.version
    }

    fn get_description(&self) -> &str {
        "Test template provider"
    }

    fn get_available_parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::new()
    }

    async fn build_draft(&self, genome: &GenomeSource, _parameters: &HashMap<String, Value>)
                         -> Result<MetabolicNetwork, Box<dyn std::error::Error>> {
        let mut network = MetabolicNetwork::new("draft_provisional")?;
        network.set_name(&format!("Test draft de {}", genome.genome_id));
        network.add_reaction(Reaction::with_default_bound("bio1",
                                                          vec![Participant::substrate(CompoundKey::new("cpd00027", "c0")?, 1.0),
                                                               Participant::product(CompoundKey::new("cpd11416", "c0")?, 1.0)],
                                                          Direction::Forward)?)?;
        network.set_objective("bio1")?;
        Ok(network)
    }
}
