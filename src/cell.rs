/// Sentinel byte stored for a live cell.
pub const ALIVE: u8 = 255;
/// Sentinel byte stored for a dead cell.
pub const DEAD: u8 = 0;

/// State of a single cell.
///
/// Cells are stored as their sentinel byte so that the raw sum of eight
/// neighbors divided by [`ALIVE`] is the live-neighbor count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Cell {
    Alive = ALIVE,
    #[default]
    Dead = DEAD,
}

impl Cell {
    /// The sentinel byte for this state.
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Any non-zero byte reads as alive.
    pub const fn from_value(value: u8) -> Self {
        if value == DEAD {
            Cell::Dead
        } else {
            Cell::Alive
        }
    }

    pub const fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }
}
