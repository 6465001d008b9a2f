//! # Room Catalog
//!
//! Static descriptive data consumed by floor generation.
//!
//! A [`RoomLayout`] classifies every cell of a template as wall or floor and
//! carries a visual variant byte per cell. A [`RoomData`] wraps a layout with
//! a name and derives how many lattice sectors the template spans. A
//! [`FloorCatalog`] buckets templates by difficulty and carries the visual
//! side tables a renderer needs. All of it is read-only during generation
//! and serializable, so catalogs can be authored as JSON files.

pub mod floor;
pub mod layout;
pub mod room_data;

pub use floor::*;
pub use layout::*;
pub use room_data::*;
