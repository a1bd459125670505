use thiserror::Error;

use gem_core::CoreError;
use gem_domain::DomainError;

/// Error del facade: la taxonomía completa visible por el caller. Cada
/// variante nombra el identificador o parámetro ofensivo y, donde aplica,
/// lleva la lista de alternativas válidas del store.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Error de validación: {0}")]
    Validation(String),

    #[error("Artefacto no encontrado: '{id}'")]
    NotFound { id: String, hints: Vec<String> },

    #[error("Gapfilling infactible para '{input_id}': {reason}")]
    Infeasible { input_id: String, reason: String },

    #[error("Presupuesto de tiempo agotado en {0}")]
    Timeout(String),

    #[error("Operación cancelada: {0}")]
    Cancelled(String),

    #[error("Error del proveedor '{name}': {message}")]
    Provider { name: String, message: String },

    #[error("Error interno: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Etiqueta estable para el sobre de respuesta.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::Infeasible { .. } => "infeasible",
            ServiceError::Timeout(_) => "timeout",
            ServiceError::Cancelled(_) => "cancelled",
            ServiceError::Provider { .. } => "provider_error",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(msg) => ServiceError::Validation(msg),
            CoreError::NotFound { id, hints } => ServiceError::NotFound { id, hints },
            CoreError::Infeasible { input_id, reason } => ServiceError::Infeasible { input_id, reason },
            CoreError::Timeout(what) => ServiceError::Timeout(what),
            CoreError::Cancelled(what) => ServiceError::Cancelled(what),
            CoreError::DuplicateId(id) => ServiceError::Internal(format!("id duplicado '{}' (¿saltó el generador?)", id)),
            CoreError::StorageCollision { attempts } => ServiceError::Internal(format!("colisión de ids tras {} intentos", attempts)),
            CoreError::InvalidIdentifierFormat(id) => ServiceError::Validation(format!("identificador sin formato reconocible: '{}'", id)),
            CoreError::Executor(msg) => ServiceError::Provider { name: "stage-executor".to_string(), message: msg },
            CoreError::Internal(msg) => ServiceError::Internal(msg),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(e: DomainError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping_preserves_hints() {
        let core = CoreError::NotFound { id: "model_x.draft".to_string(),
                                         hints: vec!["model_y.draft".to_string()] };
        match ServiceError::from(core) {
            ServiceError::NotFound { id, hints } => {
                assert_eq!(id, "model_x.draft");
                assert_eq!(hints, vec!["model_y.draft"]);
            }
            other => panic!("esperaba NotFound, llegó {:?}", other),
        }
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ServiceError::Validation("x".into()).kind(), "validation_error");
        assert_eq!(ServiceError::Timeout("gapfill".into()).kind(), "timeout");
    }
}
