mod coordinator;
mod provider;
mod request;

pub use coordinator::{SuggestionCoordinator, SuggestionOutcome, SuggestionTicket};
pub use provider::{HttpSuggestionProvider, SuggestionProvider};
pub use request::{AvailableComponent, BulkFeedSpec, LockedComponent, SuggestionRequest, TargetSpec};
