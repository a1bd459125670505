//! gem-adapters: implementaciones concretas de la frontera `StageExecutor`.
//!
//! Este crate provee:
//! - `HeuristicExecutor`: ejecutor determinista basado en clausura de
//!   alcanzabilidad sobre la red, con propuestas de reparación greedy desde
//!   un pool universal de reacciones. Es el sustituto in-process del motor
//!   LP/búsqueda combinatoria externo (especificado solo en su frontera).
//! - `ScriptedExecutor`: ejecutor con respuestas enlatadas por medio, para
//!   tests del orquestador.
//! - `universal`: construcción del pool universal de reparación.
//!
//! Nota: el core solo conoce el trait `StageExecutor` y los tipos de
//! evaluación; toda la semántica bioquímica del sustituto vive aquí.

pub mod executor;
pub mod universal;

pub use executor::heuristic::HeuristicExecutor;
pub use executor::scripted::ScriptedExecutor;
pub use universal::{core_universal_pool, UniversalPool};
