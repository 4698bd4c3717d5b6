//! Placed rooms and the tile instances built for them

use std::cell::Cell;

use serde::Serialize;

use super::TemplateId;
use super::rect::TileRect;
use crate::pool::PoolObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileInstanceId(pub u64);

/// Hand out the next instance id from a shared counter
pub(crate) fn allocate_id(counter: &Cell<u64>) -> TileInstanceId {
    let id = counter.get() + 1;
    counter.set(id);
    TileInstanceId(id)
}

/// Which part of the dungeon graph a room belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoomPath {
    /// Position along the main path, from 0
    Main { index: u32 },
    /// Branch number and depth below its main path root, from 1
    Branch { branch: u32, depth: u32 },
}

/// A room the generator has committed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacedRoom {
    pub template: TemplateId,
    pub bounds: TileRect,
    pub path: RoomPath,
}

impl PlacedRoom {
    pub fn is_main_path(&self) -> bool {
        matches!(self.path, RoomPath::Main { .. })
    }
}

/// The instantiated form of a placed room; this is what gets pooled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileInstance {
    pub id: TileInstanceId,
    pub template: TemplateId,
    pub bounds: TileRect,
    /// False while parked in the pool
    pub active: bool,
}

impl TileInstance {
    pub fn new(id: TileInstanceId, template: TemplateId) -> Self {
        Self {
            id,
            template,
            bounds: TileRect::new(0, 0, 0, 0),
            active: true,
        }
    }
}

impl PoolObject for TileInstance {
    type Id = TileInstanceId;

    fn pool_id(&self) -> TileInstanceId {
        self.id
    }
}
