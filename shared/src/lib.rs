//! Types, validation and configuration shared between the jokes server and
//! anything that talks to it.

pub mod config;
pub mod types;
pub mod validation;
