pub mod edit;
pub mod session;
pub mod store;

pub use edit::PayoutEdit;
pub use session::{EditOutcome, PayoutEditor};
pub use store::{MemoryStore, PayoutStore};
