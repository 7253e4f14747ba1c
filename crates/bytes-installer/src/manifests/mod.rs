//! Manifests shipped with the installer.

mod users;

pub use users::UsersManifest;
