mod icon_generator_port;
mod identity_lookup_port;
mod remote_fetch_port;
mod settings_port;

pub use icon_generator_port::IconGenerator;
pub use identity_lookup_port::{IdentityLookupPort, IdentityRecord};
pub use remote_fetch_port::{FetchedImage, RemoteFetchPort};
pub use settings_port::SettingsPort;
