//! Redeem Binder - redemption code validator and game binder
//!
//! This crate provides the client side of code redemption:
//! - Fetching the code list and binding table from the code server
//! - Per-input validate/bind state machines sharing one snapshot cache
//! - A page aggregate with two input sections and a shared result area

pub mod config;
pub mod dto;
pub mod errors;
pub mod page;
pub mod prompt;
pub mod services;
pub mod utils;
pub mod widget;
