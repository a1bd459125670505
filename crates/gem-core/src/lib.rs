//! gem-core: motor del ciclo de vida modelo/medio (identidad, store de
//! sesión, frontera del ejecutor y orquestador de gapfilling).
pub mod constants;
pub mod errors;
pub mod event;
pub mod executor;
pub mod gapfill;
pub mod hashing;
pub mod identity;
pub mod store;

pub use errors::CoreError;
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use executor::{CancelToken, Deadline, Evaluation, EvaluationRequest, ExecutorError, RunControl, SolverStatus, StageExecutor};
pub use gapfill::{GapfillOptions, GapfillOrchestrator, GapfillOutcome, GapfillReport, GapfillRun, OutcomeContext, OutcomeDecision,
                  OutcomePolicy, StageBMode};
pub use identity::{ArtifactId, ArtifactKind, CollisionStrategy, IdGenerator, VersionState};
pub use store::{ArtifactEntry, ArtifactHandle, SessionStore, StoreConfig};
