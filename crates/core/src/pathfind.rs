//! Pathfinding seam. AI consumes paths through the `Pathfinder` trait and
//! treats the implementation as a black box: an empty path means
//! unreachable and movement degrades to a straight-line approach. A plain
//! grid A* ships as the default collaborator.

use std::collections::{BTreeMap, BTreeSet};

use crate::mapgen::Dungeon;
use crate::types::Pos;

pub trait Pathfinder {
    /// Tile path from `start` (exclusive) to `goal` (inclusive). Empty
    /// when no route exists or the endpoints coincide.
    fn find_path(&self, dungeon: &Dungeon, start: Pos, goal: Pos) -> Vec<Pos>;
}

/// Four-connected A* over the dungeon's walkability grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridAStar;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

impl Pathfinder for GridAStar {
    fn find_path(&self, dungeon: &Dungeon, start: Pos, goal: Pos) -> Vec<Pos> {
        if start == goal || !dungeon.is_walkable(start) || !dungeon.is_walkable(goal) {
            return Vec::new();
        }

        let mut open_set = BTreeSet::new();
        let mut g_score = BTreeMap::new();
        let mut came_from = BTreeMap::new();
        let h = start.manhattan(goal);
        open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x });
        g_score.insert(start, 0_u32);

        while let Some(current) = open_set.pop_first() {
            let current_pos = Pos { y: current.y, x: current.x };
            if current_pos == goal {
                return reconstruct_path(&came_from, start, goal);
            }
            let Some(&current_g) = g_score.get(&current_pos) else {
                continue;
            };
            for neighbor in neighbors(current_pos) {
                if !dungeon.is_walkable(neighbor) {
                    continue;
                }
                let tentative_g = current_g + 1;
                if tentative_g < *g_score.get(&neighbor).unwrap_or(&u32::MAX) {
                    came_from.insert(neighbor, current_pos);
                    g_score.insert(neighbor, tentative_g);
                    let h = neighbor.manhattan(goal);
                    open_set.insert(OpenNode {
                        f: tentative_g + h,
                        h,
                        y: neighbor.y,
                        x: neighbor.x,
                    });
                }
            }
        }

        Vec::new()
    }
}

fn reconstruct_path(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut cursor = goal;
    let mut path = vec![cursor];
    while cursor != start {
        match came_from.get(&cursor) {
            Some(&previous) => cursor = previous,
            None => return Vec::new(),
        }
        path.push(cursor);
    }
    path.reverse();
    path.remove(0);
    path
}

fn neighbors(pos: Pos) -> [Pos; 4] {
    [
        Pos { y: pos.y - 1, x: pos.x },
        Pos { y: pos.y, x: pos.x + 1 },
        Pos { y: pos.y + 1, x: pos.x },
        Pos { y: pos.y, x: pos.x - 1 },
    ]
}
