//! Event pass composition.
//!
//! Takes a chosen avatar (sample pool or remotely generated), a pillar
//! template, a display name, and an identifier, and produces one flattened
//! PNG: template, circular avatar, three text layers, and a QR code at
//! fixed offsets.

pub mod compose;
pub mod font;
pub mod qr;
pub mod select;
pub mod text;

pub use compose::{compose, ComposeError};
pub use select::select_avatar;
