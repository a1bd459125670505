//! GemFlow Rust Library
//!
//! Este crate actúa como la librería del facade de GemFlow:
//! - Expone `workflow` con el servicio de operaciones (crear medio,
//!   construir red draft, gapfillear, analizar, listar).
//! - Expone `providers` (plantillas de reconstrucción y referencia de
//!   compuestos) y `errors` con la taxonomía visible por el caller.
//! - Expone `config` con la configuración por entorno.
//!
//! El motor (identidad, store de sesión, orquestador) vive en `gem-core`;
//! los ejecutores concretos, en `gem-adapters`.

pub mod config;
pub mod errors;
pub mod providers;
pub mod workflow;

pub use errors::ServiceError;
pub use workflow::{ApiResponse, CompoundBoundSpec, GapfillCallOptions, MediumSpec, WorkflowService};
