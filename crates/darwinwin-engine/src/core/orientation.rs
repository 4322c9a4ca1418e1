use std::fmt;

/// Direction an actor is facing.
///
/// The four directions form the cycle `Left -> Up -> Right -> Down -> Left`. Turning
/// right advances one step in the cycle, turning left retreats one step. The grid's
/// `y` axis points down, so `Up` is `(0, -1)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Left,
    #[default]
    Up,
    Right,
    Down,
}

impl Orientation {
    pub const ALL: [Self; 4] = [Self::Left, Self::Up, Self::Right, Self::Down];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn turned_left(self) -> Self {
        match self {
            Self::Left => Self::Down,
            Self::Up => Self::Left,
            Self::Right => Self::Up,
            Self::Down => Self::Right,
        }
    }

    #[must_use]
    pub const fn turned_right(self) -> Self {
        match self {
            Self::Left => Self::Up,
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
        }
    }

    /// Unit vector pointing forward.
    #[must_use]
    pub const fn forward(self) -> (isize, isize) {
        match self {
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }

    /// Unit vector pointing to the actor's left-hand side.
    #[must_use]
    pub const fn left_hand(self) -> (isize, isize) {
        let (fx, fy) = self.forward();
        (fy, -fx)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
