mod album;
mod album_collaborator;
mod app_user;
mod asset;

pub use album::*;
pub use album_collaborator::*;
pub use app_user::*;
pub use asset::*;
