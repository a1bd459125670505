// gem-domain library entry point
pub mod errors;
pub mod medium;
pub mod metabolite;
pub mod network;
pub mod reaction;
pub use errors::DomainError;
pub use medium::{Medium, UptakeBound};
pub use metabolite::{CompoundKey, Metabolite};
pub use network::MetabolicNetwork;
pub use reaction::{Direction, FluxBound, Participant, Reaction, DEFAULT_FLUX_LIMIT};
