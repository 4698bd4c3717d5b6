//! Room-graph layout generation
//!
//! Places a chain of rooms for the main path, each touching the previous
//! one across `room_spacing` empty tiles, then grows branches off random
//! main path rooms. A main path that runs out of space is thrown away and
//! restarted; each restart is one retry.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use log::debug;

use super::flow::{DungeonFlow, LayoutError, TemplateId, TileTemplate};
use super::rect::TileRect;
use super::tile::{PlacedRoom, RoomPath, TileInstance, allocate_id};
use crate::generation::{GenerationDriver, GenerationPhase, GenerationStats, GenerationStatus};
use crate::pool::{BucketedPool, PoolStats};
use crate::rng::GenRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    North,
    East,
    South,
    West,
}

/// Generator for [`DungeonFlow`] layouts
#[derive(Debug)]
pub struct LayoutGenerator {
    flow: DungeonFlow,
    seed: u64,
    max_attempts: u32,
    pooling: bool,
    pool: BucketedPool<TemplateId, TileInstance>,
    next_instance: Rc<Cell<u64>>,
    rooms: Vec<PlacedRoom>,
    tiles: Vec<TileInstance>,
    stats: GenerationStats,
    status: GenerationStatus,
}

impl LayoutGenerator {
    pub fn new(flow: DungeonFlow) -> Result<Self, LayoutError> {
        flow.validate()?;

        let next_instance = Rc::new(Cell::new(0));
        let counter = Rc::clone(&next_instance);
        let pool = BucketedPool::new(move |template: &TemplateId| {
            TileInstance::new(allocate_id(&counter), *template)
        })
        .with_take_action(|tile: &mut TileInstance| tile.active = true)
        .with_return_action(|tile: &mut TileInstance| tile.active = false);

        Ok(Self {
            flow,
            seed: 0,
            max_attempts: 20,
            pooling: false,
            pool,
            next_instance,
            rooms: Vec::new(),
            tiles: Vec::new(),
            stats: GenerationStats::default(),
            status: GenerationStatus::NotStarted,
        })
    }

    pub fn flow(&self) -> &DungeonFlow {
        &self.flow
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    /// Rooms of the latest successful layout
    pub fn rooms(&self) -> &[PlacedRoom] {
        &self.rooms
    }

    /// Tile instances currently standing in the layout
    pub fn tiles(&self) -> &[TileInstance] {
        &self.tiles
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Per-template pool occupancy, for logs
    pub fn pool_info(&self) -> String {
        let name = |id: &TemplateId| self.flow.template_name(*id);
        self.pool.dump_pool_info(Some(&name))
    }

    fn set_status(&mut self, status: GenerationStatus, on_status: &mut dyn FnMut(GenerationStatus)) {
        self.status = status;
        on_status(status);
    }

    /// Hand every standing tile back to the pool, or drop it when pooling is off
    fn release_tiles(&mut self) {
        for tile in self.tiles.drain(..) {
            if self.pooling {
                self.pool.return_object(tile);
            }
        }
    }

    fn pick_template(&self, rng: &mut GenRng) -> TemplateId {
        TemplateId(rng.rn2(self.flow.templates.len() as u32) as usize)
    }

    fn in_level(&self, rect: &TileRect) -> bool {
        rect.lx >= 0
            && rect.ly >= 0
            && rect.hx < self.flow.width as i32
            && rect.hy < self.flow.height as i32
    }

    fn fits(&self, rect: &TileRect) -> bool {
        let spacing = self.flow.room_spacing as i32;
        self.in_level(rect)
            && !self
                .rooms
                .iter()
                .any(|room| room.bounds.expanded(spacing).intersects(rect))
    }

    /// Candidate rectangle for `template` on the `direction` side of `anchor`,
    /// sharing at least one row or column with it
    fn candidate(
        &self,
        rng: &mut GenRng,
        anchor: &TileRect,
        template: &TileTemplate,
        direction: Direction,
    ) -> TileRect {
        let gap = self.flow.room_spacing as i32;
        let (w, h) = (template.width as i32, template.height as i32);

        match direction {
            Direction::East | Direction::West => {
                let ly = anchor.ly - (h - 1) + rng.rn2(anchor.height() + template.height - 1) as i32;
                let lx = if direction == Direction::East {
                    anchor.hx + 1 + gap
                } else {
                    anchor.lx - gap - w
                };
                TileRect::with_size(lx, ly, template.width, template.height)
            }
            Direction::North | Direction::South => {
                let lx = anchor.lx - (w - 1) + rng.rn2(anchor.width() + template.width - 1) as i32;
                let ly = if direction == Direction::South {
                    anchor.hy + 1 + gap
                } else {
                    anchor.ly - gap - h
                };
                TileRect::with_size(lx, ly, template.width, template.height)
            }
        }
    }

    /// Find room for a random template next to `anchor`
    fn place_adjacent(&self, rng: &mut GenRng, anchor: &TileRect) -> Option<(TemplateId, TileRect)> {
        let template_id = self.pick_template(rng);
        let template = self.flow.template(template_id)?;

        let mut directions = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];
        rng.shuffle(&mut directions);

        directions.into_iter().find_map(|direction| {
            let rect = self.candidate(rng, anchor, template, direction);
            self.fits(&rect).then_some((template_id, rect))
        })
    }

    /// Lay out `length` main path rooms; false if the chain got stuck
    fn build_main_path(&mut self, rng: &mut GenRng, length: u32) -> bool {
        self.rooms.clear();

        let first = self.pick_template(rng);
        let Some(template) = self.flow.template(first) else {
            return false;
        };
        let x = rng.rn2(self.flow.width - template.width + 1) as i32;
        let y = rng.rn2(self.flow.height - template.height + 1) as i32;
        self.rooms.push(PlacedRoom {
            template: first,
            bounds: TileRect::with_size(x, y, template.width, template.height),
            path: RoomPath::Main { index: 0 },
        });

        for index in 1..length {
            let anchor = self.rooms[self.rooms.len() - 1].bounds;
            match self.place_adjacent(rng, &anchor) {
                Some((template, bounds)) => self.rooms.push(PlacedRoom {
                    template,
                    bounds,
                    path: RoomPath::Main { index },
                }),
                None => return false,
            }
        }
        true
    }

    /// Grow branches off the main path. A branch that runs out of space is
    /// cut short rather than failing the layout.
    fn build_branches(&mut self, rng: &mut GenRng) {
        let main_rooms = self.rooms.len() as u32;
        let branch_count = rng.range_inclusive(self.flow.branch_count.min, self.flow.branch_count.max);

        for branch in 0..branch_count {
            let root = rng.rn2(main_rooms) as usize;
            let mut anchor = self.rooms[root].bounds;
            let target_depth =
                rng.range_inclusive(self.flow.branch_depth.min, self.flow.branch_depth.max);

            let mut depth = 0;
            while depth < target_depth {
                let Some((template, bounds)) = self.place_adjacent(rng, &anchor) else {
                    break;
                };
                depth += 1;
                self.rooms.push(PlacedRoom {
                    template,
                    bounds,
                    path: RoomPath::Branch { branch, depth },
                });
                anchor = bounds;
            }

            self.stats.branch_path_room_count += depth;
            self.stats.max_branch_depth = self.stats.max_branch_depth.max(depth);
        }
    }

    fn instantiate_tiles(&mut self) {
        for room in &self.rooms {
            let mut tile = if self.pooling {
                self.pool.take_object(&room.template)
            } else {
                TileInstance::new(allocate_id(&self.next_instance), room.template)
            };
            tile.bounds = room.bounds;
            self.tiles.push(tile);
        }
    }
}

impl GenerationDriver for LayoutGenerator {
    fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    fn set_max_attempts(&mut self, max_attempts: u32) {
        self.max_attempts = max_attempts;
    }

    fn set_tile_pooling(&mut self, enabled: bool) {
        if self.pooling == enabled {
            return;
        }
        self.release_tiles();
        if !enabled {
            self.pool.clear();
        }
        self.pooling = enabled;
    }

    fn generate(&mut self, on_status: &mut dyn FnMut(GenerationStatus)) {
        let started = Instant::now();
        self.stats.reset();
        let mut rng = GenRng::new(self.seed);

        self.set_status(GenerationStatus::InProgress(GenerationPhase::PreProcessing), on_status);
        let phase_start = Instant::now();
        self.release_tiles();
        self.rooms.clear();
        self.stats
            .add_phase_time(GenerationPhase::PreProcessing, phase_start.elapsed());

        self.set_status(GenerationStatus::InProgress(GenerationPhase::MainPath), on_status);
        let length = rng
            .range_inclusive(self.flow.main_path_length.min, self.flow.main_path_length.max)
            .max(1);
        loop {
            let phase_start = Instant::now();
            let placed = self.build_main_path(&mut rng, length);
            self.stats
                .add_phase_time(GenerationPhase::MainPath, phase_start.elapsed());
            if placed {
                break;
            }

            self.stats.total_retries += 1;
            if self.stats.total_retries >= self.max_attempts {
                self.rooms.clear();
                self.stats.total_time = started.elapsed();
                debug!(
                    "Seed {}: main path of {} rooms did not fit after {} attempts",
                    self.seed, length, self.stats.total_retries
                );
                self.set_status(GenerationStatus::Failed, on_status);
                return;
            }
        }
        self.stats.main_path_room_count = self.rooms.len() as u32;

        self.set_status(GenerationStatus::InProgress(GenerationPhase::Branching), on_status);
        let phase_start = Instant::now();
        self.build_branches(&mut rng);
        self.stats
            .add_phase_time(GenerationPhase::Branching, phase_start.elapsed());

        self.set_status(GenerationStatus::InProgress(GenerationPhase::PostProcessing), on_status);
        let phase_start = Instant::now();
        self.instantiate_tiles();
        self.stats
            .add_phase_time(GenerationPhase::PostProcessing, phase_start.elapsed());

        self.stats.total_time = started.elapsed();
        self.set_status(GenerationStatus::Complete, on_status);
    }

    fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    fn clear(&mut self) {
        self.release_tiles();
        self.rooms.clear();
    }
}
