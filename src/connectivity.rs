//! Room connectivity analysis.
//!
//! Rooms and corridors are nodes of an undirected graph; two nodes share an
//! edge when their rectangles overlap or touch. Components are found with a
//! disjoint-set forest over all rectangles.

use crate::constants::DUNGEON_ADJACENCY_TOLERANCE;
use crate::geometry::Rect;

/// Union-find with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] { (ra, rb) } else { (rb, ra) };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}

/// Result of [`validate_room_connectivity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connectivity {
    /// Component label of each room, labels are dense starting at 0 in room order
    pub room_components: Vec<usize>,
    /// Number of distinct components among the rooms
    pub component_count: usize,
}

impl Connectivity {
    /// True when every room can reach every other room. Zero or one room is trivially connected.
    pub fn is_connected(&self) -> bool {
        self.component_count <= 1
    }

    /// Indices of the rooms in each component.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.component_count];
        for (room, &label) in self.room_components.iter().enumerate() {
            groups[label].push(room);
        }
        groups
    }
}

/// Group rooms into components reachable through rooms and corridors.
pub fn validate_room_connectivity(rooms: &[Rect], corridors: &[Rect]) -> Connectivity {
    let nodes: Vec<&Rect> = rooms.iter().chain(corridors.iter()).collect();
    let mut set = DisjointSet::new(nodes.len());

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if nodes[i].touches(nodes[j], DUNGEON_ADJACENCY_TOLERANCE) {
                set.union(i, j);
            }
        }
    }

    let mut labels: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut next_label = 0;
    let room_components = (0..rooms.len())
        .map(|room| {
            let root = set.find(room);
            *labels[root].get_or_insert_with(|| {
                next_label += 1;
                next_label - 1
            })
        })
        .collect();

    Connectivity {
        room_components,
        component_count: next_label,
    }
}

/// Number of corridors touching `room`.
pub fn entrance_count(room: &Rect, corridors: &[Rect]) -> usize {
    corridors
        .iter()
        .filter(|c| c.touches(room, DUNGEON_ADJACENCY_TOLERANCE))
        .count()
}

/// True if a single corridor touches both rooms.
pub fn directly_linked(a: &Rect, b: &Rect, corridors: &[Rect]) -> bool {
    corridors.iter().any(|c| {
        c.touches(a, DUNGEON_ADJACENCY_TOLERANCE) && c.touches(b, DUNGEON_ADJACENCY_TOLERANCE)
    })
}
