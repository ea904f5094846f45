//! Voxel lattice, slide directions and piece rotations.
//!
//! Voxels live on a lattice with spacing [`SIZE`]; every voxel of an assembled
//! burr has odd coordinates in `-5..=5`. A piece is placed by rotating its
//! local voxels by one of eight [`Orientation`]s and then mapping the result
//! onto one of the three arms of the cross, selected by the [`Axis`] of its
//! [`Position`].

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// Lattice spacing between neighbouring voxels.
pub const SIZE: i32 = 2;

/// Largest coordinate still inside the cross bounding volume.
pub const EXTENT: i32 = 5;

/// Largest coordinate magnitude accepted when parsing a position.
pub const MAX_COORD: i32 = 1000;

/// A 3D coordinate triple.
pub type Coord = (i32, i32, i32);

/// The eight admissible rotations of a piece in its local frame.
///
/// - Orientations 0-3: rotate about local Z by 0, 90, 180, 270 degrees
/// - Orientations 4-7: flip 180 degrees about local Y, then the same four
///
/// Burr pieces are symmetric along their long axis, so these eight cover
/// every distinct placement in a slot.
const ROTATIONS: [fn(Coord) -> Coord; 8] = [
    |(x, y, z)| (x, y, z),
    |(x, y, z)| (-y, x, z),
    |(x, y, z)| (-x, -y, z),
    |(x, y, z)| (y, -x, z),
    // flipped about Y
    |(x, y, z)| (-x, y, -z),
    |(x, y, z)| (-y, -x, -z),
    |(x, y, z)| (x, -y, -z),
    |(x, y, z)| (y, x, -z),
];

/// One of six axis-aligned slide directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Forward,
    Backward,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in move-generation order.
    pub const ALL: [Direction; 6] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Upper-case name used in move strings.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Forward => "FORWARD",
            Direction::Backward => "BACKWARD",
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }

    /// Offset of a single step in this direction.
    pub const fn unit(self) -> Coord {
        match self {
            Direction::Forward => (0, 0, SIZE),
            Direction::Backward => (0, 0, -SIZE),
            Direction::Up => (0, SIZE, 0),
            Direction::Down => (0, -SIZE, 0),
            Direction::Left => (-SIZE, 0, 0),
            Direction::Right => (SIZE, 0, 0),
        }
    }

    /// Offset of `steps` steps in this direction.
    #[inline]
    pub const fn offset(self, steps: i32) -> Coord {
        let (dx, dy, dz) = self.unit();
        (dx * steps, dy * steps, dz * steps)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Direction::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| Error::InvalidDirection(s.to_string()))
    }
}

/// The cross arm a slot lies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }

    /// Maps rotated local coordinates onto this arm of the cross.
    ///
    /// Z is the identity, Y turns 90 degrees about X, X turns 90 degrees
    /// about Y.
    #[inline]
    const fn place(self, (x, y, z): Coord) -> Coord {
        match self {
            Axis::Z => (x, y, z),
            Axis::Y => (x, -z, y),
            Axis::X => (z, y, -x),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            _ => Err(Error::InvalidAxis(s.to_string())),
        }
    }
}

/// One of the eight admissible piece rotations.
///
/// Construction validates the range, so a value of this type always indexes
/// the rotation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Orientation(u8);

impl Orientation {
    pub const COUNT: u8 = 8;

    /// Every orientation, lowest index first.
    pub fn all() -> impl Iterator<Item = Orientation> {
        (0..Self::COUNT).map(Orientation)
    }

    /// Validates a raw orientation index.
    pub fn new(index: u8) -> Result<Self> {
        if index < Self::COUNT {
            Ok(Orientation(index))
        } else {
            Err(Error::InvalidOrientation(index.to_string()))
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Lower-case letter used in state strings (`a` is orientation 0).
    pub const fn letter(self) -> char {
        (b'a' + self.0) as char
    }

    pub fn from_letter(letter: char) -> Result<Self> {
        match letter {
            'a'..='h' => Ok(Orientation(letter as u8 - b'a')),
            _ => Err(Error::InvalidOrientation(letter.to_string())),
        }
    }

    #[inline]
    fn rotate(self, coord: Coord) -> Coord {
        ROTATIONS[self.0 as usize](coord)
    }
}

/// Origin and arm of a slot or piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub axis: Axis,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32, axis: Axis) -> Self {
        Self { x, y, z, axis }
    }

    /// Translates the position; the axis is unchanged.
    pub const fn moved(self, direction: Direction, steps: i32) -> Self {
        let (dx, dy, dz) = direction.offset(steps);
        Self::new(self.x + dx, self.y + dy, self.z + dz, self.axis)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.x, self.y, self.z, self.axis)
    }
}

impl FromStr for Position {
    type Err = Error;

    /// Parses `(x,y,z,axis)`; the parentheses are optional.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidPosition(s.to_string());
        let inner = s.trim();
        let inner = inner.strip_prefix('(').unwrap_or(inner);
        let inner = inner.strip_suffix(')').unwrap_or(inner);

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [x, y, z, axis] = parts.as_slice() else {
            return Err(invalid());
        };
        let coord = |part: &str| {
            part.parse::<i32>()
                .ok()
                .filter(|c| (-MAX_COORD..=MAX_COORD).contains(c))
                .ok_or_else(invalid)
        };
        Ok(Position::new(coord(*x)?, coord(*y)?, coord(*z)?, axis.parse()?))
    }
}

/// A lattice point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Voxel {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Translates the voxel without consulting a cache.
    #[inline]
    pub const fn moved(self, direction: Direction, steps: i32) -> Self {
        let (dx, dy, dz) = direction.offset(steps);
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Places a local voxel of a piece into the global frame.
    ///
    /// Rotates by `orientation`, maps onto the arm selected by
    /// `position.axis`, then translates to the position's origin.
    pub fn move_to(self, position: Position, orientation: Orientation) -> Self {
        let rotated = orientation.rotate((self.x, self.y, self.z));
        let (x, y, z) = position.axis.place(rotated);
        Self::new(x + position.x, y + position.y, z + position.z)
    }

    /// Whether the voxel lies within the cross bounding volume.
    #[inline]
    pub fn is_inside(self) -> bool {
        let range = -EXTENT..=EXTENT;
        range.contains(&self.x) && range.contains(&self.y) && range.contains(&self.z)
    }

    #[inline]
    pub fn is_outside(self) -> bool {
        !self.is_inside()
    }
}

impl Add for Voxel {
    type Output = Voxel;

    fn add(self, other: Voxel) -> Voxel {
        Voxel::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl fmt::Display for Voxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// Memo table for voxel translation, keyed by `(voxel, direction, steps)`.
///
/// The reachable lattice is a few thousand points, so move generation hits
/// the same keys over and over. A limit, when set, clears the table once it
/// fills up.
#[derive(Debug, Default)]
pub struct MoveCache {
    table: FxHashMap<(Voxel, Direction, i32), Voxel>,
    limit: Option<usize>,
}

impl MoveCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache that never holds more than `limit` entries.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            table: FxHashMap::default(),
            limit: Some(limit),
        }
    }

    /// Returns `voxel` moved by `steps` in `direction`.
    #[inline]
    pub fn move_voxel(&mut self, voxel: Voxel, direction: Direction, steps: i32) -> Voxel {
        let key = (voxel, direction, steps);
        if let Some(&moved) = self.table.get(&key) {
            return moved;
        }

        let moved = voxel.moved(direction, steps);
        if self.limit.is_some_and(|limit| self.table.len() >= limit) {
            self.table.clear();
        }
        self.table.insert(key, moved);
        moved
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expected placements of local voxel (1, 2, 3) at the origin.
    const PLACEMENTS: [(u8, Axis, Coord); 24] = [
        (0, Axis::Z, (1, 2, 3)),
        (1, Axis::Z, (-2, 1, 3)),
        (2, Axis::Z, (-1, -2, 3)),
        (3, Axis::Z, (2, -1, 3)),
        (4, Axis::Z, (-1, 2, -3)),
        (5, Axis::Z, (-2, -1, -3)),
        (6, Axis::Z, (1, -2, -3)),
        (7, Axis::Z, (2, 1, -3)),
        (0, Axis::Y, (1, -3, 2)),
        (1, Axis::Y, (-2, -3, 1)),
        (2, Axis::Y, (-1, -3, -2)),
        (3, Axis::Y, (2, -3, -1)),
        (4, Axis::Y, (-1, 3, 2)),
        (5, Axis::Y, (-2, 3, -1)),
        (6, Axis::Y, (1, 3, -2)),
        (7, Axis::Y, (2, 3, 1)),
        (0, Axis::X, (3, 2, -1)),
        (1, Axis::X, (3, 1, 2)),
        (2, Axis::X, (3, -2, 1)),
        (3, Axis::X, (3, -1, -2)),
        (4, Axis::X, (-3, 2, 1)),
        (5, Axis::X, (-3, -1, 2)),
        (6, Axis::X, (-3, -2, -1)),
        (7, Axis::X, (-3, 1, -2)),
    ];

    #[test]
    fn test_move_to_matches_rotation_table() {
        let voxel = Voxel::new(1, 2, 3);
        for (index, axis, (x, y, z)) in PLACEMENTS {
            let orientation = Orientation::new(index).unwrap();
            let actual = voxel.move_to(Position::new(0, 0, 0, axis), orientation);
            assert_eq!(
                actual,
                Voxel::new(x, y, z),
                "orientation {index} on axis {axis}"
            );
        }
    }

    #[test]
    fn test_move_to_commutes_with_translation() {
        let voxel = Voxel::new(1, 2, 3);
        let offsets = [(-10, 4, 7), (3, -3, 0), (9, 10, -8), (-1, -6, 5)];
        for (index, axis, _) in PLACEMENTS {
            let orientation = Orientation::new(index).unwrap();
            let at_origin = voxel.move_to(Position::new(0, 0, 0, axis), orientation);
            for (x, y, z) in offsets {
                let actual = voxel.move_to(Position::new(x, y, z, axis), orientation);
                assert_eq!(actual, at_origin + Voxel::new(x, y, z));
            }
        }
    }

    #[test]
    fn test_position_move_offsets_one_coordinate() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            for direction in Direction::ALL {
                for steps in 1..=3 {
                    let s = steps * SIZE;
                    let expected = match direction {
                        Direction::Up => Position::new(0, s, 0, axis),
                        Direction::Down => Position::new(0, -s, 0, axis),
                        Direction::Left => Position::new(-s, 0, 0, axis),
                        Direction::Right => Position::new(s, 0, 0, axis),
                        Direction::Forward => Position::new(0, 0, s, axis),
                        Direction::Backward => Position::new(0, 0, -s, axis),
                    };
                    let actual = Position::new(0, 0, 0, axis).moved(direction, steps);
                    assert_eq!(actual, expected, "{direction} x{steps}");
                }
            }
        }
    }

    #[test]
    fn test_is_inside_bounds() {
        assert!(Voxel::new(5, -5, 1).is_inside());
        assert!(Voxel::new(-5, 5, -5).is_inside());
        assert!(Voxel::new(7, 1, 1).is_outside());
        assert!(Voxel::new(1, -7, 1).is_outside());
        assert!(Voxel::new(1, 1, 7).is_outside());
    }

    #[test]
    fn test_orientation_validation() {
        assert!(Orientation::new(7).is_ok());
        assert!(matches!(
            Orientation::new(8),
            Err(Error::InvalidOrientation(_))
        ));
        assert_eq!(Orientation::from_letter('c').unwrap().index(), 2);
        assert!(Orientation::from_letter('i').is_err());
        for orientation in Orientation::all() {
            assert_eq!(Orientation::from_letter(orientation.letter()).unwrap(), orientation);
        }
    }

    #[test]
    fn test_direction_and_axis_parsing() {
        for direction in Direction::ALL {
            assert_eq!(direction.name().parse::<Direction>().unwrap(), direction);
        }
        assert!(matches!(
            "SIDEWAYS".parse::<Direction>(),
            Err(Error::InvalidDirection(_))
        ));
        assert!(matches!("W".parse::<Axis>(), Err(Error::InvalidAxis(_))));
    }

    #[test]
    fn test_position_parsing() {
        let position: Position = "(-3,5,11,Y)".parse().unwrap();
        assert_eq!(position, Position::new(-3, 5, 11, Axis::Y));
        assert_eq!(position.to_string(), "(-3,5,11,Y)");
        assert!("(1,2,Z)".parse::<Position>().is_err());
        assert!("(1,2,3,Q)".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_parsing_rejects_far_coordinates() {
        let edge: Position = "(1000,-1000,0,X)".parse().unwrap();
        assert_eq!(edge, Position::new(MAX_COORD, -MAX_COORD, 0, Axis::X));
        for text in [
            "(1001,0,0,Z)",
            "(0,-1001,0,Z)",
            "(2147483647,0,0,Z)",
            "(0,0,-2147483648,Z)",
        ] {
            assert!(
                matches!(text.parse::<Position>(), Err(Error::InvalidPosition(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn test_move_cache_memoizes_and_bounds() {
        let mut cache = MoveCache::new();
        let voxel = Voxel::new(1, 1, 1);
        assert_eq!(
            cache.move_voxel(voxel, Direction::Up, 2),
            Voxel::new(1, 5, 1)
        );
        assert_eq!(
            cache.move_voxel(voxel, Direction::Up, 2),
            Voxel::new(1, 5, 1)
        );
        assert_eq!(cache.len(), 1);

        let mut bounded = MoveCache::with_limit(2);
        for steps in 1..=5 {
            let moved = bounded.move_voxel(voxel, Direction::Left, steps);
            assert_eq!(moved, Voxel::new(1 - 2 * steps, 1, 1));
            assert!(bounded.len() <= 2);
        }
        bounded.clear();
        assert!(bounded.is_empty());
    }
}
