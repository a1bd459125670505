pub mod conditions;
pub mod orchestrator;
pub mod outcome;
pub mod report;

pub use conditions::{energy_battery, TrialCondition};
pub use orchestrator::{GapfillOptions, GapfillOrchestrator, StageBMode};
pub use outcome::{GapfillOutcome, OutcomeContext, OutcomeDecision, OutcomePolicy};
pub use report::{AddedReaction, GapfillReport, GapfillRun, RepairStage, StageStats, TrialOutcome};
