use std::fmt;

use serde::{Deserialize, Serialize};

/// Width and height of the walled board, in cells.
pub const BOARD_SIZE: i32 = 18;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Heading of an agent. `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn in_bounds(cell: Cell) -> bool {
    (0..BOARD_SIZE).contains(&cell.x) && (0..BOARD_SIZE).contains(&cell.y)
}

/// Adjacent cell in `direction`. Never clamps or wraps; pair with [`in_bounds`].
pub fn step(cell: Cell, direction: Direction) -> Cell {
    let (dx, dy) = direction.delta();
    cell.offset(dx, dy)
}

/// Manhattan distance.
pub fn distance(a: Cell, b: Cell) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Every cell of the board in row-major order.
pub fn all_cells() -> impl Iterator<Item = Cell> {
    (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Cell { x, y }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_walled() {
        assert!(in_bounds(Cell::origin()));
        assert!(in_bounds(Cell::new(BOARD_SIZE - 1, BOARD_SIZE - 1)));
        assert!(!in_bounds(Cell::new(-1, 0)));
        assert!(!in_bounds(Cell::new(0, BOARD_SIZE)));
    }

    #[test]
    fn step_does_not_wrap() {
        let corner = Cell::origin();
        assert_eq!(step(corner, Direction::Left), Cell::new(-1, 0));
        assert_eq!(step(corner, Direction::Up), Cell::new(0, -1));
        assert_eq!(step(corner, Direction::Down), Cell::new(0, 1));
        assert_eq!(step(corner, Direction::Right), Cell::new(1, 0));
    }

    #[test]
    fn opposites_pair_up() {
        for dir in Direction::ALL {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir.opposite().opposite(), dir);
            let back = step(step(Cell::new(5, 5), dir), dir.opposite());
            assert_eq!(back, Cell::new(5, 5));
        }
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(distance(Cell::new(1, 2), Cell::new(4, 0)), 5);
        assert_eq!(distance(Cell::new(3, 3), Cell::new(3, 3)), 0);
    }

    #[test]
    fn all_cells_covers_board() {
        let cells: Vec<_> = all_cells().collect();
        assert_eq!(cells.len(), (BOARD_SIZE * BOARD_SIZE) as usize);
        assert!(cells.iter().all(|c| in_bounds(*c)));
    }
}
