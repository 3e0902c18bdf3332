//! Domain error types.

mod avatar_error;
mod fetch_error;
mod filesystem_error;
mod render_error;
mod settings_error;

pub use avatar_error::AvatarError;
pub use fetch_error::FetchError;
pub use filesystem_error::FilesystemError;
pub use render_error::RenderError;
pub use settings_error::SettingsError;
