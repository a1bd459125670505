//! Batería de condiciones de prueba para el barrido energético de StageA.
//!
//! Cada condición es un par (medio, objetivo mínimo). La batería se deriva
//! del medio objetivo variando fuente de carbono y disponibilidad de oxígeno:
//! la corrección energética debe sostenerse en sustratos alternativos, no
//! solo en el medio pedido por el caller. El orden de la batería queda fijado
//! en la construcción; los resultados se fusionan por índice, de modo que el
//! conjunto acumulado de reparaciones no depende del scheduling del pool.

use gem_domain::{CompoundKey, DomainError, Medium, UptakeBound};

/// Fuentes de carbono del barrido (id de compuesto, etiqueta corta).
const CARBON_SOURCES: &[(&str, &str)] = &[("cpd00027", "glucose"),
                                          ("cpd00029", "acetate"),
                                          ("cpd00100", "glycerol"),
                                          ("cpd00036", "succinate"),
                                          ("cpd00020", "pyruvate"),
                                          ("cpd00023", "glutamate")];

/// Compuesto de oxígeno.
const OXYGEN: &str = "cpd00007";

/// Compartimento extracelular de los medios.
const EXTRACELLULAR: &str = "e0";

const CARBON_UPTAKE: f64 = -5.0;
const OXYGEN_UPTAKE: f64 = -10.0;
const SECRETION_LIMIT: f64 = 100.0;

/// Una condición del barrido: medio derivado + objetivo mínimo exigido.
#[derive(Debug, Clone)]
pub struct TrialCondition {
    pub index: usize,
    pub label: String,
    pub medium: Medium,
    pub min_objective: f64,
}

/// Construye la batería estándar: cada fuente de carbono como única fuente,
/// en variante aerobia y anaerobia. El medio objetivo aporta el resto de
/// compuestos (sales, agua, etc.) sin cambios.
pub fn energy_battery(target_medium: &Medium, min_objective: f64) -> Result<Vec<TrialCondition>, DomainError> {
    let mut conditions = Vec::with_capacity(CARBON_SOURCES.len() * 2);
    let oxygen_key = CompoundKey::new(OXYGEN, EXTRACELLULAR)?;

    for (compound, label) in CARBON_SOURCES {
        for aerobic in [true, false] {
            let mut overrides: Vec<(CompoundKey, UptakeBound)> = Vec::with_capacity(CARBON_SOURCES.len() + 1);
            // Única fuente de carbono activa: las demás quedan sin captación
            for (other, _) in CARBON_SOURCES {
                let key = CompoundKey::new(other, EXTRACELLULAR)?;
                let bound = if other == compound {
                    UptakeBound::new(CARBON_UPTAKE, SECRETION_LIMIT)?
                } else {
                    UptakeBound::new(0.0, SECRETION_LIMIT)?
                };
                overrides.push((key, bound));
            }
            let oxygen_bound = if aerobic {
                UptakeBound::new(OXYGEN_UPTAKE, SECRETION_LIMIT)?
            } else {
                UptakeBound::new(0.0, SECRETION_LIMIT)?
            };
            overrides.push((oxygen_key.clone(), oxygen_bound));

            let index = conditions.len();
            let suffix = if aerobic { "aerobic" } else { "anaerobic" };
            let trial_label = format!("{}_{}", label, suffix);
            let medium = target_medium.replacing(&format!("{}__{}", target_medium.id(), trial_label), overrides)?;
            conditions.push(TrialCondition { index,
                                             label: trial_label,
                                             medium,
                                             min_objective });
        }
    }
    Ok(conditions)
}
