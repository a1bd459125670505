//! Ejecutor heurístico determinista.
//!
//! Sustituye al motor LP externo con una clausura de alcanzabilidad: un
//! metabolito es alcanzable si el medio lo aporta o si alguna reacción con
//! todos sus precursores alcanzables puede producirlo en la dirección que
//! sus cotas permiten. El crecimiento es distinto de cero solo si *todos*
//! los sustratos de la reacción objetivo son alcanzables (la biomasa exige
//! todos sus precursores). Las propuestas de reparación salen de un recorrido
//! greedy del pool universal, en orden de pool, hasta desbloquear el
//! objetivo o agotar candidatos.
//!
//! Todo es puro respecto a la petición: ni la red ni el medio se modifican.

use std::collections::HashSet;

use indexmap::IndexMap;

use gem_core::executor::{Evaluation, EvaluationRequest, ExecutorError, RunControl, SolverStatus, StageExecutor};
use gem_domain::{MetabolicNetwork, Reaction};

use crate::universal::UniversalPool;

/// Crecimiento nominal reportado cuando el objetivo es alcanzable.
const NOMINAL_GROWTH: f64 = 0.25;

pub struct HeuristicExecutor {
    pool: UniversalPool,
}

impl HeuristicExecutor {
    pub fn new(pool: UniversalPool) -> Self {
        HeuristicExecutor { pool }
    }

    /// Clausura de alcanzabilidad: parte de los compuestos captables del
    /// medio y propaga por las reacciones hasta punto fijo. Devuelve el
    /// conjunto alcanzable y los ids de reacción que dispararon (con signo
    /// de dirección para el mapa de flujos).
    fn closure(network_reactions: &[&Reaction], seeds: &HashSet<String>) -> (HashSet<String>, IndexMap<String, f64>) {
        let mut reachable = seeds.clone();
        let mut fired: IndexMap<String, f64> = IndexMap::new();
        loop {
            let mut changed = false;
            for reaction in network_reactions {
                let forward_open = reaction.bound().upper() > 0.0;
                let reverse_open = reaction.bound().lower() < 0.0;
                if forward_open && !fired.contains_key(reaction.id()) {
                    let ready = reaction.substrates().all(|p| reachable.contains(&p.metabolite.to_string()));
                    if ready {
                        for p in reaction.products() {
                            changed |= reachable.insert(p.metabolite.to_string());
                        }
                        fired.insert(reaction.id().to_string(), 1.0);
                        changed = true;
                    }
                }
                if reverse_open && !fired.contains_key(reaction.id()) {
                    let ready = reaction.products().all(|p| reachable.contains(&p.metabolite.to_string()));
                    if ready {
                        for p in reaction.substrates() {
                            changed |= reachable.insert(p.metabolite.to_string());
                        }
                        fired.insert(reaction.id().to_string(), -1.0);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        (reachable, fired)
    }

    fn seeds(request: &EvaluationRequest<'_>) -> HashSet<String> {
        request.medium.uptake_keys().map(|k| k.to_string()).collect()
    }

    fn objective_reachable(network: &MetabolicNetwork, objective: &str, reachable: &HashSet<String>) -> bool {
        match network.reaction(objective) {
            Some(r) => r.substrates().all(|p| reachable.contains(&p.metabolite.to_string())),
            None => false,
        }
    }

    /// Búsqueda greedy: añade candidatos del pool (en orden de pool) cuya
    /// premisa ya sea alcanzable, recalculando la clausura, hasta que el
    /// objetivo quede desbloqueado. Si no lo logra, no hay conjunto
    /// utilizable y se devuelve vacío.
    fn propose(&self, network: &MetabolicNetwork, objective: &str, seeds: &HashSet<String>, control: &RunControl)
               -> Result<Vec<Reaction>, ExecutorError> {
        let mut added: Vec<Reaction> = Vec::new();
        loop {
            control.checkpoint()?;
            let combined: Vec<&Reaction> = network.reactions().chain(added.iter()).collect();
            let (reachable, _) = Self::closure(&combined, seeds);
            if Self::objective_reachable(network, objective, &reachable) {
                return Ok(Self::prune(network, objective, seeds, added));
            }
            let mut progressed = false;
            for candidate in self.pool.reactions() {
                if network.contains_reaction(candidate.id()) || added.iter().any(|r| r.id() == candidate.id()) {
                    continue;
                }
                // Premisa: algún extremo de la reacción ya es alcanzable, de
                // modo que añadirla extiende la clausura de verdad.
                let forward_ready = candidate.bound().upper() > 0.0
                                    && candidate.substrates().all(|p| reachable.contains(&p.metabolite.to_string()));
                let reverse_ready = candidate.bound().lower() < 0.0
                                    && candidate.products().all(|p| reachable.contains(&p.metabolite.to_string()));
                if forward_ready || reverse_ready {
                    added.push(candidate.clone());
                    progressed = true;
                    break;
                }
            }
            if !progressed {
                // Sin candidatos aplicables: no existe conjunto utilizable
                return Ok(Vec::new());
            }
        }
    }

    /// Poda en orden inverso de adición: se descarta toda reacción cuya
    /// ausencia no rompa la alcanzabilidad del objetivo. El resultado es un
    /// conjunto mínimo respecto del recorrido greedy, y sigue siendo
    /// determinista.
    fn prune(network: &MetabolicNetwork, objective: &str, seeds: &HashSet<String>, added: Vec<Reaction>) -> Vec<Reaction> {
        let mut kept = added;
        let mut i = kept.len();
        while i > 0 {
            i -= 1;
            let without: Vec<&Reaction> = network.reactions()
                                                 .chain(kept.iter().enumerate().filter(|(j, _)| *j != i).map(|(_, r)| r))
                                                 .collect();
            let (reachable, _) = Self::closure(&without, seeds);
            if Self::objective_reachable(network, objective, &reachable) {
                kept.remove(i);
            }
        }
        kept
    }
}

impl StageExecutor for HeuristicExecutor {
    fn name(&self) -> &str {
        "heuristic-reachability"
    }

    fn evaluate(&self, request: &EvaluationRequest<'_>, control: &RunControl) -> Result<Evaluation, ExecutorError> {
        control.checkpoint()?;
        let objective = match request.network.objective() {
            Some(o) => o.to_string(),
            None => return Err(ExecutorError::Engine(format!("network '{}' has no objective reaction", request.network.id()))),
        };
        let seeds = Self::seeds(request);
        let network_reactions: Vec<&Reaction> = request.network.reactions().collect();
        let (reachable, fired) = Self::closure(&network_reactions, &seeds);

        if Self::objective_reachable(request.network, &objective, &reachable) {
            let mut fluxes = fired;
            fluxes.insert(objective, NOMINAL_GROWTH);
            return Ok(Evaluation { status: SolverStatus::Optimal,
                                   achieved_growth: NOMINAL_GROWTH,
                                   proposed: Vec::new(),
                                   fluxes });
        }

        // Objetivo inalcanzable: crecimiento cero; proponer reparaciones
        // solo si la petición lo pidió.
        let proposed = if request.propose_repairs {
            self.propose(request.network, &objective, &seeds, control)?
        } else {
            Vec::new()
        };
        Ok(Evaluation { status: SolverStatus::Infeasible,
                        achieved_growth: 0.0,
                        proposed,
                        fluxes: IndexMap::new() })
    }
}
