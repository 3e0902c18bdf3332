//! Application services.

mod hasher;
mod maintenance;
mod resolver;

pub use hasher::Hasher;
pub use maintenance::CacheMaintenance;
pub use resolver::AvatarResolver;
