//! Room placement and corridor carving. Placement is attempt-bounded and
//! tolerant of failure: a crowded map simply ends up with fewer rooms.

use rand_chacha::ChaCha8Rng;

use crate::rng::{chance, roll_usize};
use crate::types::{Pos, RoomKind, Tile, TileKind};

use super::grid::{in_bounds, set_kind};
use super::model::Room;

pub(super) const MIN_ROOM_SIZE: usize = 4;
pub(super) const MAX_ROOM_SIZE: usize = 10;
pub(super) const MAX_ROOMS: usize = 12;
const PLACEMENT_ATTEMPTS: usize = 100;
/// Tiles kept clear between a room and the map edge.
const EDGE_PADDING: usize = 2;
/// Margin used when testing overlap against accepted rooms.
const OVERLAP_PADDING: usize = 2;
const CORRIDOR_WIDTH: usize = 2;

pub(super) fn place_rooms(rng: &mut ChaCha8Rng, width: usize, height: usize) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..PLACEMENT_ATTEMPTS {
        if rooms.len() >= MAX_ROOMS {
            break;
        }
        let room_width = roll_usize(rng, MIN_ROOM_SIZE, MAX_ROOM_SIZE);
        let room_height = roll_usize(rng, MIN_ROOM_SIZE, MAX_ROOM_SIZE);
        if room_width + EDGE_PADDING * 2 >= width || room_height + EDGE_PADDING * 2 >= height {
            continue;
        }

        let x = roll_usize(rng, EDGE_PADDING, width - room_width - EDGE_PADDING);
        let y = roll_usize(rng, EDGE_PADDING, height - room_height - EDGE_PADDING);
        let candidate =
            Room { x, y, width: room_width, height: room_height, kind: RoomKind::Normal };
        let candidate_with_margin = candidate.expanded(OVERLAP_PADDING);
        if rooms.iter().any(|existing| existing.intersects(&candidate_with_margin)) {
            continue;
        }
        rooms.push(candidate);
    }

    // Corridor chaining follows this order, so keep it stable.
    rooms.sort_by_key(|room| {
        let center = room.center();
        (center.x + center.y, center.y, center.x)
    });
    rooms
}

pub(super) fn carve_room(tiles: &mut [Tile], width: usize, room: &Room) {
    for y in room.y..=room.bottom() {
        for x in room.x..=room.right() {
            set_kind(tiles, width, Pos { y: y as i32, x: x as i32 }, TileKind::Floor);
        }
    }
}

/// Joins consecutive rooms with wide L corridors, then adds a handful of
/// extra connections so the floor has loops instead of a single chain.
pub(super) fn carve_corridors(
    tiles: &mut [Tile],
    width: usize,
    height: usize,
    rng: &mut ChaCha8Rng,
    rooms: &[Room],
) {
    if rooms.len() < 2 {
        return;
    }

    for pair in rooms.windows(2) {
        carve_l_corridor(tiles, width, height, rng, pair[0].center(), pair[1].center());
    }

    let extra_connections = rooms.len() / 4;
    for _ in 0..extra_connections {
        let from = roll_usize(rng, 0, rooms.len() - 1);
        let to = roll_usize(rng, 0, rooms.len() - 1);
        if from == to {
            continue;
        }
        carve_l_corridor(tiles, width, height, rng, rooms[from].center(), rooms[to].center());
    }
}

fn carve_l_corridor(
    tiles: &mut [Tile],
    width: usize,
    height: usize,
    rng: &mut ChaCha8Rng,
    start: Pos,
    end: Pos,
) {
    if chance(rng, 0.5) {
        carve_horizontal(tiles, width, height, start.y, start.x, end.x);
        carve_vertical(tiles, width, height, end.x, start.y, end.y);
    } else {
        carve_vertical(tiles, width, height, start.x, start.y, end.y);
        carve_horizontal(tiles, width, height, end.y, start.x, end.x);
    }
}

fn carve_horizontal(
    tiles: &mut [Tile],
    width: usize,
    height: usize,
    y: i32,
    from_x: i32,
    to_x: i32,
) {
    let left = from_x.min(to_x);
    let right = from_x.max(to_x);
    for x in left..=right {
        for lane in 0..CORRIDOR_WIDTH {
            carve_corridor_tile(tiles, width, height, Pos { y: y + lane as i32, x });
        }
    }
}

fn carve_vertical(
    tiles: &mut [Tile],
    width: usize,
    height: usize,
    x: i32,
    from_y: i32,
    to_y: i32,
) {
    let top = from_y.min(to_y);
    let bottom = from_y.max(to_y);
    for y in top..=bottom {
        for lane in 0..CORRIDOR_WIDTH {
            carve_corridor_tile(tiles, width, height, Pos { y, x: x + lane as i32 });
        }
    }
}

fn carve_corridor_tile(tiles: &mut [Tile], width: usize, height: usize, pos: Pos) {
    if pos.x < 1 || pos.y < 1 {
        return;
    }
    if (pos.x as usize) >= width - 1 || (pos.y as usize) >= height - 1 {
        return;
    }
    if !in_bounds(width, height, pos) {
        return;
    }
    set_kind(tiles, width, pos, TileKind::Floor);
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn placed_rooms_never_overlap_with_padding() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let rooms = place_rooms(&mut rng, 40, 40);
        assert!(rooms.len() >= 2, "expected a populated floor, got {}", rooms.len());
        for left_index in 0..rooms.len() {
            for right_index in (left_index + 1)..rooms.len() {
                assert!(
                    !rooms[left_index].expanded(OVERLAP_PADDING).intersects(&rooms[right_index]),
                    "rooms must keep their padding: {:?} vs {:?}",
                    rooms[left_index],
                    rooms[right_index]
                );
            }
        }
    }

    #[test]
    fn placed_rooms_respect_edge_padding() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let rooms = place_rooms(&mut rng, 40, 40);
            for room in rooms {
                assert!(room.x >= EDGE_PADDING);
                assert!(room.y >= EDGE_PADDING);
                assert!(room.right() <= 40 - EDGE_PADDING);
                assert!(room.bottom() <= 40 - EDGE_PADDING);
            }
        }
    }

    #[test]
    fn rooms_are_sorted_by_diagonal_center_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let rooms = place_rooms(&mut rng, 40, 40);
        for pair in rooms.windows(2) {
            let left = pair[0].center();
            let right = pair[1].center();
            assert!(left.x + left.y <= right.x + right.y);
        }
    }

    #[test]
    fn corridor_carving_keeps_border_walls_intact() {
        let width = 40;
        let height = 40;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut tiles = vec![Tile::of(TileKind::Wall); width * height];
        let rooms = place_rooms(&mut rng, width, height);
        for room in &rooms {
            carve_room(&mut tiles, width, room);
        }
        carve_corridors(&mut tiles, width, height, &mut rng, &rooms);

        for x in 0..width {
            assert_eq!(tiles[x].kind, TileKind::Wall);
            assert_eq!(tiles[(height - 1) * width + x].kind, TileKind::Wall);
        }
        for y in 0..height {
            assert_eq!(tiles[y * width].kind, TileKind::Wall);
            assert_eq!(tiles[y * width + width - 1].kind, TileKind::Wall);
        }
    }
}
