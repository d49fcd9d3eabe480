pub mod cli;
pub mod error;
pub mod formulation;
pub mod interface;
pub mod logging;
pub mod models;
pub mod state;
pub mod suggest;

pub use error::{FeedError, Result};
pub use formulation::FormulationReport;
pub use state::FormulationSession;
