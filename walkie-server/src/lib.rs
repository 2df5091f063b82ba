pub mod registry;
pub mod relay;
pub mod signaling;

pub use registry::*;
pub use relay::*;
pub use signaling::*;
