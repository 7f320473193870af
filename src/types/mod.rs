pub mod message;
pub mod position;
pub mod route;
pub mod vessel;

pub use message::*;
pub use position::*;
pub use route::*;
pub use vessel::*;
