//! Route Handlers

pub mod admin;
pub mod predict;
