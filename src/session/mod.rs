pub mod cookies;
pub(crate) mod extractors;

pub use extractors::CurrentUser;
