//! HTTP Routes

pub mod readings;
