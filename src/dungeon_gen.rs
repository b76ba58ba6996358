//! Binary space partitioning dungeon generator.
//!
//! The world is recursively split into a tree of regions. Every leaf that is
//! large enough gets a room, every internal node connects a room from each
//! child with an L-shaped corridor, and the collected geometry is filtered,
//! repaired until all rooms share one component, and rasterized to a grid.

use glam::Vec2;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::connectivity::{directly_linked, entrance_count, validate_room_connectivity};
use crate::constants::{FLOW_BASE_CELL_COST, FLOW_WALL_PROXIMITY_PENALTY};
use crate::geometry::Rect;
use crate::grid::{wall_influence_map_with, Grid};
use crate::layout::DungeonLayout;

/// A node in the BSP tree. Either a leaf (may hold a room) or an internal node
/// (has two children and may hold the corridor joining them).
#[derive(Debug)]
pub struct BspNode {
    /// The region this node covers
    pub region: Rect,
    /// Distance from the root
    pub depth: u32,
    /// The room carved in this region (only for leaves)
    pub room: Option<Rect>,
    /// Corridor joining a room of each child (only for internal nodes)
    pub corridor: Option<(Rect, Rect)>,
    /// Left/top child after split
    pub left: Option<Box<BspNode>>,
    /// Right/bottom child after split
    pub right: Option<Box<BspNode>>,
}

impl BspNode {
    pub fn new(region: Rect, depth: u32) -> Self {
        Self {
            region,
            depth,
            room: None,
            corridor: None,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Recursively split this node until `max_depth` is reached or neither
    /// axis can hold two partitions of `min_partition`.
    pub fn split(
        &mut self,
        max_depth: u32,
        min_partition: f32,
        aspect_ratio: f32,
        rng: &mut impl Rng,
    ) {
        if self.depth >= max_depth {
            return;
        }

        let can_cut_width = self.region.w >= min_partition * 2.0;
        let can_cut_height = self.region.h >= min_partition * 2.0;
        if !can_cut_width && !can_cut_height {
            return;
        }

        // Prefer cutting across the longer axis so leaves stay roughly square
        let split_horizontal = if !can_cut_width {
            true
        } else if !can_cut_height {
            false
        } else if self.region.w > self.region.h * aspect_ratio {
            false // Too wide, split vertically
        } else if self.region.h > self.region.w * aspect_ratio {
            true // Too tall, split horizontally
        } else {
            rng.gen_bool(0.5)
        };

        let r = self.region;
        let (first, second) = if split_horizontal {
            let cut = rng.gen_range(min_partition..=r.h - min_partition);
            (
                Rect::new(r.x, r.y, r.w, cut),
                Rect::new(r.x, r.y + cut, r.w, r.h - cut),
            )
        } else {
            let cut = rng.gen_range(min_partition..=r.w - min_partition);
            (
                Rect::new(r.x, r.y, cut, r.h),
                Rect::new(r.x + cut, r.y, r.w - cut, r.h),
            )
        };

        let mut left = Box::new(BspNode::new(first, self.depth + 1));
        let mut right = Box::new(BspNode::new(second, self.depth + 1));
        left.split(max_depth, min_partition, aspect_ratio, rng);
        right.split(max_depth, min_partition, aspect_ratio, rng);
        self.left = Some(left);
        self.right = Some(right);
    }

    /// Create a room in each leaf that can fit one after padding.
    pub fn create_rooms(&mut self, min_size: f32, padding: f32, rng: &mut impl Rng) {
        if self.is_leaf() {
            let max_width = self.region.w - padding * 2.0;
            let max_height = self.region.h - padding * 2.0;

            if max_width < min_size || max_height < min_size {
                return; // Region too small for a room
            }

            let room_width = rng.gen_range(min_size..=max_width);
            let room_height = rng.gen_range(min_size..=max_height);

            // Random position within the region (with padding)
            let room_x = self.region.x + padding + rng.gen_range(0.0..=(max_width - room_width));
            let room_y = self.region.y + padding + rng.gen_range(0.0..=(max_height - room_height));

            self.room = Some(Rect::new(room_x, room_y, room_width, room_height));
        } else {
            if let Some(ref mut left) = self.left {
                left.create_rooms(min_size, padding, rng);
            }
            if let Some(ref mut right) = self.right {
                right.create_rooms(min_size, padding, rng);
            }
        }
    }

    /// Get a room from this subtree (used for corridor connection).
    /// Returns a room from the left-most leaf if possible, otherwise right.
    pub fn get_room(&self) -> Option<Rect> {
        if let Some(room) = self.room {
            return Some(room);
        }

        if let Some(ref left) = self.left {
            if let Some(room) = left.get_room() {
                return Some(room);
            }
        }
        if let Some(ref right) = self.right {
            if let Some(room) = right.get_room() {
                return Some(room);
            }
        }

        None
    }

    /// Connect sibling subtrees bottom-up. A node whose children cannot both
    /// produce a room gets no corridor.
    pub fn connect(&mut self, corridor_width: f32, bounds: &Rect, rng: &mut impl Rng) {
        if self.is_leaf() {
            return;
        }

        if let Some(ref mut left) = self.left {
            left.connect(corridor_width, bounds, rng);
        }
        if let Some(ref mut right) = self.right {
            right.connect(corridor_width, bounds, rng);
        }

        let rooms = match (&self.left, &self.right) {
            (Some(left), Some(right)) => left.get_room().zip(right.get_room()),
            _ => None,
        };
        self.corridor = rooms.map(|(a, b)| {
            l_corridor(a.center(), b.center(), corridor_width, rng.gen_bool(0.5), bounds)
        });
    }

    /// Post-order walk gathering every room and both legs of every corridor.
    pub fn collect_rooms_and_corridors(&self, rooms: &mut Vec<Rect>, corridors: &mut Vec<Rect>) {
        if let Some(ref left) = self.left {
            left.collect_rooms_and_corridors(rooms, corridors);
        }
        if let Some(ref right) = self.right {
            right.collect_rooms_and_corridors(rooms, corridors);
        }
        if let Some(room) = self.room {
            rooms.push(room);
        }
        if let Some((first, second)) = self.corridor {
            corridors.push(first);
            corridors.push(second);
        }
    }
}

/// Two corridor legs joining `from` and `to`: horizontal then vertical, or the
/// reverse. Each leg is at least `width` long on both axes, so aligned centers
/// still produce a valid (square) second leg.
pub fn l_corridor(
    from: Vec2,
    to: Vec2,
    width: f32,
    horizontal_first: bool,
    bounds: &Rect,
) -> (Rect, Rect) {
    let half = width * 0.5;
    let horizontal = |y: f32| {
        Rect::new(from.x.min(to.x) - half, y - half, (to.x - from.x).abs() + width, width)
    };
    let vertical = |x: f32| {
        Rect::new(x - half, from.y.min(to.y) - half, width, (to.y - from.y).abs() + width)
    };

    let (first, second) = if horizontal_first {
        (horizontal(from.y), vertical(to.x))
    } else {
        (vertical(from.x), horizontal(to.y))
    };
    (first.fit_within(bounds), second.fit_within(bounds))
}

/// BSP dungeon generator with tunable parameters.
#[derive(Debug, Clone, Default)]
pub struct DungeonGenerator {
    pub config: GeneratorConfig,
}

impl DungeonGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate a connected dungeon covering `width` x `height` world units.
    ///
    /// `min_room_size` is the smallest partition a node may be split into
    /// (before padding); `max_depth` caps the recursion. Bad input never panics:
    /// non-positive extents collapse to a single cell and the result always
    /// holds at least one room.
    pub fn generate(
        &self,
        width: f32,
        height: f32,
        min_room_size: f32,
        max_depth: u32,
        rng: &mut impl Rng,
    ) -> DungeonLayout {
        puffin::profile_function!();
        let cfg = &self.config;

        let width = sanitize_extent(width, cfg.cell_size);
        let height = sanitize_extent(height, cfg.cell_size);
        let min_room_size = if min_room_size.is_finite() { min_room_size.max(0.0) } else { 0.0 };
        let bounds = Rect::new(0.0, 0.0, width, height);

        // Build, carve and connect the tree
        let min_partition = (min_room_size + cfg.room_padding * 2.0).max(1.0);
        let carve_min = (min_room_size * 0.5).max(1.0);
        let mut root = BspNode::new(bounds, 0);
        root.split(max_depth, min_partition, cfg.split_aspect_ratio, rng);
        root.create_rooms(carve_min, cfg.room_padding, rng);
        root.connect(cfg.corridor_width, &bounds, rng);

        let mut rooms = Vec::new();
        let mut corridors = Vec::new();
        root.collect_rooms_and_corridors(&mut rooms, &mut corridors);

        let carved_rooms = rooms.len();
        let carved_corridors = corridors.len();
        rooms.retain(|r| r.min_side() >= cfg.min_usable_room_size);
        corridors.retain(|c| c.min_side() >= cfg.min_corridor_width);
        if rooms.len() < carved_rooms || corridors.len() < carved_corridors {
            debug!(
                dropped_rooms = carved_rooms - rooms.len(),
                dropped_corridors = carved_corridors - corridors.len(),
                "Filtered undersized geometry"
            );
        }

        if rooms.is_empty() {
            let room = self.fallback_room(&bounds, min_room_size);
            warn!(?room, "No usable rooms survived generation, using fallback room");
            rooms.push(room);
        }

        let repaired = self.repair_connectivity(&rooms, &mut corridors, &bounds, rng);
        let entrances = self.add_multiple_entrances(&rooms, &mut corridors, &bounds, rng);

        let grid = Grid::rasterize(rooms.iter().chain(corridors.iter()), width, height, cfg.cell_size);
        let wall_influence =
            wall_influence_map_with(&grid, FLOW_BASE_CELL_COST, FLOW_WALL_PROXIMITY_PENALTY)
                .unwrap_or_default();

        info!(
            rooms = rooms.len(),
            corridors = corridors.len(),
            repair_corridors = repaired,
            extra_entrances = entrances,
            grid_width = grid.width,
            grid_height = grid.height,
            walkable_cells = grid.walkable_count(),
            "Generated dungeon"
        );

        DungeonLayout {
            rooms,
            corridors,
            grid,
            wall_influence,
            cell_size: cfg.cell_size,
            world_width: width,
            world_height: height,
        }
    }

    /// Room used when nothing else survived: centered and as large as the
    /// padding allows, or the whole world if even that does not fit.
    fn fallback_room(&self, bounds: &Rect, min_room_size: f32) -> Rect {
        let target = min_room_size.max(self.config.min_usable_room_size);
        let axis = |len: f32| {
            let available = len - self.config.room_padding * 2.0;
            if available < self.config.min_usable_room_size {
                (0.0, len)
            } else {
                let size = available.min(target);
                ((len - size) * 0.5, size)
            }
        };
        let (x, w) = axis(bounds.w);
        let (y, h) = axis(bounds.h);
        Rect::new(x, y, w, h)
    }

    /// Corridor legs between two points, widened to the floor if needed.
    fn corridor_between(&self, from: Vec2, to: Vec2, bounds: &Rect, rng: &mut impl Rng) -> [Rect; 2] {
        let width = self.config.corridor_width.max(self.config.min_corridor_width);
        let (a, b) = l_corridor(from, to, width, rng.gen_bool(0.5), bounds);
        [a, b]
    }

    /// Join disconnected components through their nearest pair of rooms until
    /// every room shares one component or the attempt budget runs out.
    /// Returns the number of corridor legs added.
    pub fn repair_connectivity(
        &self,
        rooms: &[Rect],
        corridors: &mut Vec<Rect>,
        bounds: &Rect,
        rng: &mut impl Rng,
    ) -> usize {
        let mut added = 0;
        for attempt in 0..self.config.repair_attempts {
            let connectivity = validate_room_connectivity(rooms, corridors);
            if connectivity.is_connected() {
                return added;
            }

            let labels = &connectivity.room_components;
            let mut nearest: Option<(f32, usize, usize)> = None;
            for i in 0..rooms.len() {
                for j in (i + 1)..rooms.len() {
                    if labels[i] == labels[j] {
                        continue;
                    }
                    let d = rooms[i].center().distance_squared(rooms[j].center());
                    if nearest.map_or(true, |(best, _, _)| d < best) {
                        nearest = Some((d, i, j));
                    }
                }
            }
            let Some((_, a, b)) = nearest else {
                return added;
            };

            debug!(
                attempt,
                components = connectivity.component_count,
                from = a,
                to = b,
                "Adding repair corridor"
            );
            corridors.extend(self.corridor_between(rooms[a].center(), rooms[b].center(), bounds, rng));
            added += 2;
        }

        let connectivity = validate_room_connectivity(rooms, corridors);
        if !connectivity.is_connected() {
            warn!(
                components = connectivity.component_count,
                "Connectivity repair budget exhausted"
            );
        }
        added
    }

    /// With three or more rooms, give every room with too few corridors an
    /// extra link to its nearest room it is not already directly linked to.
    /// Returns the number of corridor legs added.
    pub fn add_multiple_entrances(
        &self,
        rooms: &[Rect],
        corridors: &mut Vec<Rect>,
        bounds: &Rect,
        rng: &mut impl Rng,
    ) -> usize {
        if rooms.len() < 3 {
            return 0;
        }

        let mut added = 0;
        for (i, room) in rooms.iter().enumerate() {
            if entrance_count(room, corridors) >= self.config.min_entrances {
                continue;
            }
            let target = rooms
                .iter()
                .enumerate()
                .filter(|&(j, other)| j != i && !directly_linked(room, other, corridors))
                .min_by(|(_, a), (_, b)| {
                    let da = room.center().distance_squared(a.center());
                    let db = room.center().distance_squared(b.center());
                    da.total_cmp(&db)
                })
                .map(|(_, other)| *other);

            if let Some(other) = target {
                corridors.extend(self.corridor_between(room.center(), other.center(), bounds, rng));
                added += 2;
            }
        }
        added
    }
}

fn sanitize_extent(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(value, "Invalid world extent, falling back to a single cell");
        fallback
    }
}

/// Generate a dungeon with the default [`GeneratorConfig`].
pub fn generate_bsp_dungeon(
    width: f32,
    height: f32,
    min_room_size: f32,
    max_depth: u32,
    rng: &mut impl Rng,
) -> DungeonLayout {
    DungeonGenerator::default().generate(width, height, min_room_size, max_depth, rng)
}
