pub mod code;

pub use code::{Code, normalize_code};
