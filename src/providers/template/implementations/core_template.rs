//! Plantilla embebida de metabolismo central.
//!
//! La base de la plantilla (transporte de glucosa, glucólisis lumped y
//! biomasa) entra en toda reconstrucción; el resto de reacciones solo entra
//! si la fuente genómica anota la función génica correspondiente. Una red
//! draft construida de un genoma pobre en anotaciones queda con huecos: ese
//! es exactamente el insumo del gapfilling.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use gem_domain::{CompoundKey, Direction, DomainError, MetabolicNetwork, Participant, Reaction};

use crate::providers::template::trait_template::{GenomeSource, TemplateProvider};
use crate::providers::ParameterDefinition;

pub struct CoreTemplateProvider;

impl CoreTemplateProvider {
    pub fn new() -> Self {
        CoreTemplateProvider
    }

    fn key(compound: &str, compartment: &str) -> Result<CompoundKey, DomainError> {
        CompoundKey::new(compound, compartment)
    }

    /// Reacciones incondicionales de la plantilla.
    fn base_reactions() -> Result<Vec<Reaction>, DomainError> {
        Ok(vec![
            // Transporte de glucosa
            Reaction::with_default_bound("rxn05155",
                                         vec![Participant::substrate(Self::key("cpd00027", "e0")?, 1.0),
                                              Participant::product(Self::key("cpd00027", "c0")?, 1.0)],
                                         Direction::Bidirectional)?,
            // Glucólisis lumped: glucosa -> 2 piruvato + 2 ATP
            Reaction::with_default_bound("rxn00148",
                                         vec![Participant::substrate(Self::key("cpd00027", "c0")?, 1.0),
                                              Participant::product(Self::key("cpd00020", "c0")?, 2.0),
                                              Participant::product(Self::key("cpd00002", "c0")?, 2.0)],
                                         Direction::Forward)?,
        ])
    }

    /// Mapa función génica -> reacciones de la plantilla.
    fn feature_reactions(feature: &str) -> Result<Vec<Reaction>, DomainError> {
        let reactions = match feature {
            // Glutamato deshidrogenasa: piruvato + amonio -> glutamato
            "gdhA" => vec![Reaction::with_default_bound("rxn00184",
                                                        vec![Participant::substrate(Self::key("cpd00020", "c0")?, 1.0),
                                                             Participant::substrate(Self::key("cpd00013", "c0")?, 1.0),
                                                             Participant::product(Self::key("cpd00023", "c0")?, 1.0)],
                                                        Direction::Forward)?],
            // Transportador de amonio
            "amtB" => vec![Reaction::with_default_bound("rxn05466",
                                                        vec![Participant::substrate(Self::key("cpd00013", "e0")?, 1.0),
                                                             Participant::product(Self::key("cpd00013", "c0")?, 1.0)],
                                                        Direction::Bidirectional)?],
            // Cadena respiratoria lumped + transportador de oxígeno
            "cydA" => vec![Reaction::with_default_bound("rxn05468",
                                                        vec![Participant::substrate(Self::key("cpd00007", "e0")?, 1.0),
                                                             Participant::product(Self::key("cpd00007", "c0")?, 1.0)],
                                                        Direction::Bidirectional)?,
                           Reaction::with_default_bound("rxn08173",
                                                        vec![Participant::substrate(Self::key("cpd00020", "c0")?, 1.0),
                                                             Participant::substrate(Self::key("cpd00007", "c0")?, 1.0),
                                                             Participant::product(Self::key("cpd00002", "c0")?, 3.0),
                                                             Participant::product(Self::key("cpd00011", "c0")?, 1.0)],
                                                        Direction::Forward)?],
            // Acetato quinasa (fermentación): piruvato -> acetato + ATP
            "ackA" => vec![Reaction::with_default_bound("rxn00499",
                                                        vec![Participant::substrate(Self::key("cpd00020", "c0")?, 1.0),
                                                             Participant::product(Self::key("cpd00029", "c0")?, 1.0),
                                                             Participant::product(Self::key("cpd00002", "c0")?, 1.0)],
                                                        Direction::Forward)?],
            _ => Vec::new(),
        };
        Ok(reactions)
    }

    /// Reacción de biomasa de la plantilla: ATP + piruvato + glutamato.
    fn biomass() -> Result<Reaction, DomainError> {
        Reaction::with_default_bound("bio1",
                                     vec![Participant::substrate(Self::key("cpd00002", "c0")?, 1.0),
                                          Participant::substrate(Self::key("cpd00020", "c0")?, 1.0),
                                          Participant::substrate(Self::key("cpd00023", "c0")?, 1.0),
                                          Participant::product(Self::key("cpd11416", "c0")?, 1.0)],
                                     Direction::Forward)
    }
}

impl Default for CoreTemplateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateProvider for CoreTemplateProvider {
    fn get_name(&self) -> &str {
        "core"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Plantilla embebida de metabolismo central (glucólisis, respiración, biomasa)"
    }

    fn get_available_parameters(&self) -> HashMap<String, ParameterDefinition> {
        HashMap::new()
    }

    async fn build_draft(&self, genome: &GenomeSource, _parameters: &HashMap<String, Value>)
                         -> Result<MetabolicNetwork, Box<dyn std::error::Error>> {
        if genome.genome_id.trim().is_empty() {
            return Err(Box::new(DomainError::ValidationError("genome_id vacío".to_string())));
        }
        let mut network = MetabolicNetwork::new("draft_provisional")?;
        network.set_name(&format!("Reconstrucción core de {}", genome.genome_id));
        for reaction in Self::base_reactions()? {
            network.add_reaction(reaction)?;
        }
        for feature in &genome.features {
            for reaction in Self::feature_reactions(feature)? {
                if !network.contains_reaction(reaction.id()) {
                    network.add_reaction(reaction)?;
                }
            }
        }
        let biomass = Self::biomass()?;
        network.add_reaction(biomass)?;
        network.set_objective("bio1")?;
        Ok(network)
    }
}
