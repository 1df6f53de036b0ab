//! Shared configuration, pillar codes, the avatar roster, and filesystem
//! path construction for the passforge workspace.

pub mod config;
pub mod paths;
pub mod pillar;
pub mod roster;

pub use config::Config;
pub use pillar::Pillar;
