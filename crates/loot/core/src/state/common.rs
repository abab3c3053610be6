//! Identifier and geometry primitives shared across the crate.

use core::fmt;

/// Declares an opaque, host-assigned string identifier newtype.
///
/// Hosts allocate these ids; the engine never inspects their contents beyond
/// equality and ordering.
macro_rules! host_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

host_id! {
    /// Identifier of a token placed on the play surface.
    TokenId
}

host_id! {
    /// Identifier of an actor (a character owning an inventory).
    ActorId
}

host_id! {
    /// Identifier of an item template in the external catalog.
    ItemId
}

host_id! {
    /// Identifier of a connected session participant (user).
    ParticipantId
}

/// Position on the play surface, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Square grid overlaid on the play surface, used for snapping dropped
/// tokens and for interaction reach checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    /// Edge length of one cell, in pixels.
    pub size: u32,
}

impl Grid {
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    /// Snaps a point to the nearest cell vertex.
    pub fn snap(&self, point: Point) -> Point {
        let size = f64::from(self.size);
        Point::new(
            (point.x / size).round() * size,
            (point.y / size).round() * size,
        )
    }

    /// Anchor position for a token dropped at `point`: the drop location is
    /// treated as the token's center, so it is offset by half a cell before
    /// snapping to a vertex.
    pub fn drop_anchor(&self, point: Point) -> Point {
        let half = f64::from(self.size) / 2.0;
        self.snap(Point::new(point.x - half, point.y - half))
    }

    /// Maximum interaction distance: the diagonal of one cell.
    pub fn reach(&self) -> f64 {
        let size = f64::from(self.size);
        size.hypot(size)
    }

    /// Whether two points are close enough to interact.
    pub fn within_reach(&self, a: Point, b: Point) -> bool {
        a.distance(b) <= self.reach()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_nearest_vertex() {
        let grid = Grid::new(100);
        assert_eq!(grid.snap(Point::new(149.0, 251.0)), Point::new(100.0, 300.0));
        assert_eq!(grid.snap(Point::new(150.0, 150.0)), Point::new(200.0, 200.0));
    }

    #[test]
    fn drop_anchor_offsets_by_half_cell() {
        let grid = Grid::new(100);
        // A drop at the center of cell (1, 1) anchors at that cell's origin.
        assert_eq!(
            grid.drop_anchor(Point::new(150.0, 150.0)),
            Point::new(100.0, 100.0)
        );
    }

    #[test]
    fn reach_is_one_cell_diagonal() {
        let grid = Grid::new(100);
        assert!(grid.within_reach(Point::new(0.0, 0.0), Point::new(100.0, 100.0)));
        assert!(!grid.within_reach(Point::new(0.0, 0.0), Point::new(100.0, 101.0)));
    }
}
