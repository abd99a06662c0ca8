pub mod local;
pub mod store;

pub use local::*;
pub use store::*;
