mod manager;
mod persistence;

pub use manager::FormulationSession;
pub use persistence::{load_catalog, load_mix, load_suggestion, save_mix};
