#![deny(clippy::all)]

pub mod commands;
pub mod handlers;
pub mod presenter;
pub mod telemetry;
