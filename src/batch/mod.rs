pub mod executor;
pub mod task;
pub mod types;

pub use executor::*;
pub use task::*;
pub use types::*;
