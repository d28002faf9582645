//! Grid primitives shared by layout, special-room, and population passes.

use crate::types::{Pos, Tile, TileKind};

pub(super) fn in_bounds(width: usize, height: usize, pos: Pos) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < width && (pos.y as usize) < height
}

pub(super) fn index(width: usize, pos: Pos) -> usize {
    (pos.y as usize) * width + (pos.x as usize)
}

pub(super) fn kind_at(tiles: &[Tile], width: usize, height: usize, pos: Pos) -> TileKind {
    if !in_bounds(width, height, pos) {
        return TileKind::Wall;
    }
    tiles[index(width, pos)].kind
}

pub(super) fn set_kind(tiles: &mut [Tile], width: usize, pos: Pos, kind: TileKind) {
    tiles[index(width, pos)] = Tile::of(kind);
}

pub(super) fn euclidean(a: Pos, b: Pos) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dy = (a.y - b.y) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// True when any of the four cardinal neighbors is a wall. Used to prefer
/// wall-hugging chest positions.
pub(super) fn touches_wall(tiles: &[Tile], width: usize, height: usize, pos: Pos) -> bool {
    [
        Pos { y: pos.y - 1, x: pos.x },
        Pos { y: pos.y, x: pos.x + 1 },
        Pos { y: pos.y + 1, x: pos.x },
        Pos { y: pos.y, x: pos.x - 1 },
    ]
    .into_iter()
    .any(|neighbor| kind_at(tiles, width, height, neighbor) == TileKind::Wall)
}
