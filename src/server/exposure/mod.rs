//! API exposure modules

pub mod rest;

pub use rest::RestExposure;
