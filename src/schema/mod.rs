pub mod drift;
pub mod fact;
pub mod infer;
pub mod reference;
pub mod types;

pub use drift::*;
pub use fact::*;
pub use infer::*;
pub use reference::*;
pub use types::*;
