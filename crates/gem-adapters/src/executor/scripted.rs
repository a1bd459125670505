//! Ejecutor con guion para tests del orquestador.
//!
//! Las respuestas se eligen por reglas sobre la petición (substring del id
//! del medio + flag de propuesta de reparaciones), en orden de registro, con
//! una respuesta por defecto como fallback. Una regla puede marcarse `once`:
//! se consume con su primer match, lo que permite distinguir llamadas con la
//! misma firma que ocurren en puntos distintos de la secuencia (p. ej.
//! BaselineCheck y Verify sobre el mismo medio objetivo). Registra además la
//! secuencia de invocaciones para que los tests puedan asertar sobre el
//! flujo de etapas.

use std::sync::Mutex;

use gem_core::executor::{Evaluation, EvaluationRequest, ExecutorError, RunControl, StageExecutor};

/// Llamada registrada: (id del medio, propose_repairs).
pub type RecordedCall = (String, bool);

struct Rule {
    medium_contains: String,
    propose_repairs: Option<bool>,
    once: bool,
    used: bool,
    response: Result<Evaluation, ExecutorError>,
}

pub struct ScriptedExecutor {
    rules: Mutex<Vec<Rule>>,
    fallback: Result<Evaluation, ExecutorError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExecutor {
    /// Ejecutor cuyo fallback es la evaluación dada.
    pub fn new(fallback: Evaluation) -> Self {
        ScriptedExecutor { rules: Mutex::new(Vec::new()),
                           fallback: Ok(fallback),
                           calls: Mutex::new(Vec::new()) }
    }

    fn push_rule(self, medium_contains: &str, propose_repairs: Option<bool>, once: bool,
                 response: Result<Evaluation, ExecutorError>)
                 -> Self {
        self.rules
            .lock()
            .expect("scripted executor mutex poisoned")
            .push(Rule { medium_contains: medium_contains.to_string(),
                         propose_repairs,
                         once,
                         used: false,
                         response });
        self
    }

    /// Regla: si el id del medio contiene `fragment`, responder `response`.
    pub fn on_medium(self, fragment: &str, response: Evaluation) -> Self {
        self.push_rule(fragment, None, false, Ok(response))
    }

    /// Regla restringida además por el flag de propuestas.
    pub fn on_medium_with_repairs(self, fragment: &str, propose_repairs: bool, response: Evaluation) -> Self {
        self.push_rule(fragment, Some(propose_repairs), false, Ok(response))
    }

    /// Regla de un solo uso (se consume con el primer match).
    pub fn on_medium_once(self, fragment: &str, propose_repairs: bool, response: Evaluation) -> Self {
        self.push_rule(fragment, Some(propose_repairs), true, Ok(response))
    }

    /// Regla que responde con error del ejecutor.
    pub fn on_medium_fail(self, fragment: &str, error: ExecutorError) -> Self {
        self.push_rule(fragment, None, false, Err(error))
    }

    /// Invocaciones registradas hasta el momento.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("scripted executor mutex poisoned").clone()
    }
}

impl StageExecutor for ScriptedExecutor {
    fn name(&self) -> &str {
        "scripted"
    }

    fn evaluate(&self, request: &EvaluationRequest<'_>, control: &RunControl) -> Result<Evaluation, ExecutorError> {
        control.checkpoint()?;
        self.calls
            .lock()
            .expect("scripted executor mutex poisoned")
            .push((request.medium.id().to_string(), request.propose_repairs));
        let mut rules = self.rules.lock().expect("scripted executor mutex poisoned");
        for rule in rules.iter_mut() {
            if rule.once && rule.used {
                continue;
            }
            let medium_match = request.medium.id().contains(&rule.medium_contains);
            let repairs_match = rule.propose_repairs.map_or(true, |p| p == request.propose_repairs);
            if medium_match && repairs_match {
                rule.used = true;
                return rule.response.clone();
            }
        }
        self.fallback.clone()
    }
}
