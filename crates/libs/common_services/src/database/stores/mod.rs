mod album_store;
mod asset_store;
mod collaborator_store;
mod user_store;

pub use album_store::*;
pub use asset_store::*;
pub use collaborator_store::*;
pub use user_store::*;
