pub mod answer;
pub mod insight;
pub mod questions;
pub mod report;
pub mod types;

// Keep the public surface small and intentional.
pub use answer::*;
pub use insight::*;
pub use questions::*;
pub use report::*;
pub use types::*;
