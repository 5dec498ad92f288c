//! Axial hex coordinates.
//!
//! Tiles are addressed by axial `(q, r)` pairs; the implicit cube coordinate
//! is `s = -q - r`. Everything here is a pure function of its inputs.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// Axial coordinates of a hex tile.
///
/// Ordering is lexicographic on `(q, r)` and is the fixed tile ordering used
/// to break ties wherever the engine or the bots compare tiles.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Hex {
    /// Column axis.
    pub q: i32,
    /// Row axis.
    pub r: i32,
}

impl Hex {
    /// The six neighbor offsets, counter-clockwise starting east.
    ///
    /// Consecutive entries (including last → first) are themselves adjacent,
    /// which the split check relies on.
    pub const DIRECTIONS: [Hex; 6] = [
        Hex { q: 1, r: 0 },
        Hex { q: 1, r: -1 },
        Hex { q: 0, r: -1 },
        Hex { q: -1, r: 0 },
        Hex { q: -1, r: 1 },
        Hex { q: 0, r: 1 },
    ];

    /// Create a new coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The derived third cube coordinate.
    #[must_use]
    #[inline]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// The six adjacent coordinates in [`Hex::DIRECTIONS`] order.
    #[must_use]
    #[inline]
    pub fn neighbors(self) -> [Hex; 6] {
        Self::DIRECTIONS.map(|d| self + d)
    }

    /// The twelve coordinates at distance exactly two.
    #[must_use]
    pub fn ring2(self) -> [Hex; 12] {
        let mut out = [self; 12];
        for (i, dir) in Self::DIRECTIONS.iter().enumerate() {
            let next = Self::DIRECTIONS[(i + 1) % 6];
            out[2 * i] = self + *dir * 2;
            out[2 * i + 1] = self + *dir + next;
        }
        out
    }

    /// Hex distance between two coordinates.
    #[must_use]
    pub fn distance(self, other: Hex) -> i32 {
        ((self.q - other.q).abs() + (self.r - other.r).abs() + (self.s() - other.s()).abs()) / 2
    }

    /// Whether `other` is one of the six neighbors.
    #[must_use]
    pub fn is_adjacent(self, other: Hex) -> bool {
        self.distance(other) == 1
    }
}

impl Add for Hex {
    type Output = Hex;

    fn add(self, other: Hex) -> Hex {
        Hex::new(self.q + other.q, self.r + other.r)
    }
}

impl Mul<i32> for Hex {
    type Output = Hex;

    fn mul(self, rhs: i32) -> Hex {
        Hex::new(self.q * rhs, self.r * rhs)
    }
}

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Neighbors of `hex` that are not present in `occupied`.
pub fn unused_neighbors(hex: Hex, occupied: impl Fn(Hex) -> bool) -> impl Iterator<Item = Hex> {
    hex.neighbors().into_iter().filter(move |n| !occupied(*n))
}

/// Pointy-top layout converting between world space and hex coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Distance from a hex center to any of its corners.
    pub radius: f64,
}

impl Layout {
    /// Create a layout with the given hex radius.
    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Center of `hex` in world space.
    #[must_use]
    pub fn to_world(&self, hex: Hex) -> (f64, f64) {
        let q = f64::from(hex.q);
        let r = f64::from(hex.r);
        let x = self.radius * 3f64.sqrt() * (q + r / 2.0);
        let y = self.radius * 1.5 * r;
        (x, y)
    }

    /// The hex containing the world point `(x, y)`.
    #[must_use]
    pub fn to_hex(&self, x: f64, y: f64) -> Hex {
        let q = (3f64.sqrt() / 3.0 * x - y / 3.0) / self.radius;
        let r = (2.0 / 3.0 * y) / self.radius;
        round_axial(q, r)
    }
}

/// Round fractional axial coordinates to the nearest hex.
///
/// The cube coordinate with the largest rounding error is recomputed from
/// the other two so the result stays on the `q + r + s = 0` plane.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_axial(q: f64, r: f64) -> Hex {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }

    Hex::new(rq as i32, rr as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_are_adjacent() {
        let center = Hex::new(2, -3);
        for n in center.neighbors() {
            assert_eq!(center.distance(n), 1);
        }
    }

    #[test]
    fn test_consecutive_directions_adjacent() {
        for i in 0..6 {
            let a = Hex::DIRECTIONS[i];
            let b = Hex::DIRECTIONS[(i + 1) % 6];
            assert!(a.is_adjacent(b));
        }
    }

    #[test]
    fn test_ring2_distance_and_uniqueness() {
        let center = Hex::new(0, 0);
        let ring = center.ring2();
        for h in ring {
            assert_eq!(center.distance(h), 2);
        }
        let mut sorted = ring.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 12);
    }

    #[test]
    fn test_unused_neighbors() {
        let used = [Hex::new(1, 0), Hex::new(0, 1)];
        let free: Vec<_> = unused_neighbors(Hex::new(0, 0), |h| used.contains(&h)).collect();
        assert_eq!(free.len(), 4);
        assert!(!free.contains(&Hex::new(1, 0)));
    }

    #[test]
    fn test_world_round_trip() {
        let layout = Layout::new(24.0);
        for q in -5..5 {
            for r in -5..5 {
                let hex = Hex::new(q, r);
                let (x, y) = layout.to_world(hex);
                assert_eq!(layout.to_hex(x, y), hex);
                // Points slightly off-center still land in the same hex.
                assert_eq!(layout.to_hex(x + 3.0, y - 2.0), hex);
            }
        }
    }

    #[test]
    fn test_round_axial_stays_on_plane() {
        let h = round_axial(0.4, 0.4);
        assert_eq!(h.q + h.r + h.s(), 0);
        assert_eq!(h, Hex::new(0, 1));
    }
}
