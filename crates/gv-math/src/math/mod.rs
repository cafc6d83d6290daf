//! Core math modules.

pub mod gamma;
pub mod stable;
