//! Static world data: tiles, the level grid, orientations and the view cone sensor.

pub use self::{level::*, orientation::*, tile::*, view_cone::*};

pub(crate) mod level;
pub(crate) mod orientation;
pub(crate) mod tile;
pub(crate) mod view_cone;
