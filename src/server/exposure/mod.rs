//! API exposure modules
//!
//! Each exposure consumes the application state and produces a Router.

pub mod rest;

pub use rest::RestExposure;
