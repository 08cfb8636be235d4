mod enqueue;
mod types;

pub use enqueue::*;
pub use types::*;
