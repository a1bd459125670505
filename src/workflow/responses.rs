//! Formas de respuesta del facade: sobres etiquetados éxito/error y las
//! proyecciones de los reportes internos hacia el caller.

use serde::{Deserialize, Serialize};

use gem_core::gapfill::{AddedReaction, GapfillOutcome, GapfillRun, StageStats};
use gem_core::SolverStatus;

use crate::errors::ServiceError;

/// Sobre etiquetado de toda operación del facade.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApiResponse<T> {
    Success {
        data: T,
        #[serde(skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },
    Error {
        error: ErrorBody,
    },
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse::Success { data, warning: None }
    }

    pub fn success_with_warning(data: T, warning: Option<String>) -> Self {
        ApiResponse::Success { data, warning }
    }

    pub fn from_result(result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(data) => ApiResponse::Success { data, warning: None },
            Err(e) => ApiResponse::Error { error: ErrorBody::from(&e) },
        }
    }
}

/// Cuerpo de error: nombra al ofensor y lista alternativas válidas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offending: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub hints: Vec<String>,
}

impl From<&ServiceError> for ErrorBody {
    fn from(e: &ServiceError) -> Self {
        let (offending, hints) = match e {
            ServiceError::NotFound { id, hints } => (Some(id.clone()), hints.clone()),
            ServiceError::Infeasible { input_id, .. } => (Some(input_id.clone()), Vec::new()),
            _ => (None, Vec::new()),
        };
        ErrorBody { kind: e.kind().to_string(),
                    message: e.to_string(),
                    offending,
                    hints }
    }
}

/// Estadísticas agregadas devueltas por `gapfill`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapfillStatistics {
    pub target_growth: f64,
    pub growth_rate_before: f64,
    pub growth_rate_after: f64,
    pub stage_a: StageStats,
    pub stage_b: StageStats,
}

/// Respuesta de la operación `gapfill`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapfillResponse {
    pub new_network_id: String,
    pub outcome: GapfillOutcome,
    pub gapfilling_successful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub statistics: GapfillStatistics,
    pub added_reactions: Vec<AddedReaction>,
}

impl GapfillResponse {
    pub fn from_run(run: &GapfillRun) -> Self {
        let r = &run.report;
        GapfillResponse { new_network_id: r.new_network_id.clone(),
                          outcome: r.outcome,
                          gapfilling_successful: r.gapfilling_successful,
                          warning: r.warning.clone(),
                          statistics: GapfillStatistics { target_growth: r.target_growth,
                                                          growth_rate_before: r.growth_rate_before,
                                                          growth_rate_after: r.growth_rate_after,
                                                          stage_a: r.stage_a.clone(),
                                                          stage_b: r.stage_b.clone() },
                          added_reactions: r.added_reactions.clone() }
    }
}

/// Entrada del mapa de flujos de `analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluxEntry {
    pub reaction_id: String,
    pub flux: f64,
}

/// Respuesta de la operación `analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: SolverStatus,
    pub objective_value: f64,
    /// Solo flujos por encima del umbral de reporte.
    pub fluxes: Vec<FluxEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serializes_tagged() {
        let ok: ApiResponse<String> = ApiResponse::success("media_x".to_string());
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"], "media_x");
        assert!(json.get("warning").is_none());

        let err: ApiResponse<String> =
            ApiResponse::from_result(Err(ServiceError::NotFound { id: "model_z.draft".to_string(),
                                                                  hints: vec!["model_a.draft".to_string()] }));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["kind"], "not_found");
        assert_eq!(json["error"]["offending"], "model_z.draft");
        assert_eq!(json["error"]["hints"][0], "model_a.draft");
    }
}
