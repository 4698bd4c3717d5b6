//! Reference layout generator
//!
//! A small room-graph generator that implements
//! [`GenerationDriver`](crate::generation::GenerationDriver), so the analyzer
//! has something real to measure. Rooms are stamped from tile templates along
//! a main path, branches grow off it, and every placed room is instantiated
//! as a [`TileInstance`], reusing pooled instances when pooling is on.

mod flow;
mod generator;
mod rect;
mod tile;

pub use flow::{CountRange, DungeonFlow, LayoutError, MAX_LEVEL_SIZE, TemplateId, TileTemplate};
pub use generator::LayoutGenerator;
pub use rect::TileRect;
pub use tile::{PlacedRoom, RoomPath, TileInstance, TileInstanceId};
