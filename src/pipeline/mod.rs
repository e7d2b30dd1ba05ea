//! Pipeline module - the cleaning stages and their orchestrator

pub mod categorical;
pub mod clean;
pub mod error;
pub mod feature_info;
pub mod loader;
pub mod missing;
pub mod mixed;

pub use categorical::*;
pub use clean::*;
pub use error::CleaningError;
pub use feature_info::*;
pub use loader::*;
pub use missing::*;
pub use mixed::*;
