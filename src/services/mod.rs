pub mod api_client;
#[cfg(test)]
pub mod fake_api;
pub mod repository;

pub use api_client::{CodeApi, HttpCodeApi};
pub use repository::{CodeRepository, Snapshot};
