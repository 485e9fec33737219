//! # layclip Offset
//!
//! Grows or shrinks polygon sets by a signed distance. Contours are built
//! per ring with the selected [`JoinStyle`] and cleaned by a union through
//! the boolean engine.

pub mod join;
pub mod offset;
pub mod options;

pub use join::JoinStyle;
pub use offset::offset;
pub use options::OffsetOptions;
