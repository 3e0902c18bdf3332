//! Domain entity definitions.

mod avatar_request;
mod identity_hash;
mod image_format;
mod rating;
mod shape;
mod shard;

pub use avatar_request::{AvatarRequest, MAX_AVATAR_SIZE, ResolveArgs, UploadedImage};
pub use identity_hash::{HASH_HEX_LEN, IdentityHash, RemoteHash, normalize_identifier};
pub use image_format::ImageFormat;
pub use rating::Rating;
pub use shape::{Affine, Color, FlatPolygon, Point, Rotation, Shape, Transform, fmt_num};
pub use shard::{IdentityKind, ShardPath};
