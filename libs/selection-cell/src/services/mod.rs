pub mod portraits;
pub mod selector;

pub use portraits::PortraitService;
pub use selector::{SelectionError, SelectorService};
