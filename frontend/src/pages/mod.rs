pub mod home;
pub mod sessions;

pub use home::*;
pub use sessions::SessionsPage;
