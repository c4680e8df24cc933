//! Shared utilities.

pub mod exec;
pub mod hash;
pub mod html;
pub mod mime;
