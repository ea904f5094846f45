//! Burr slots, shapes and placed pieces.
//!
//! A shape is a set of voxels centered at the origin, read from a compact
//! text pattern. Each shape precomputes which orientations are valid in each
//! of the six slots of the cross.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::geometry::{Axis, Direction, Orientation, Position, Voxel};

/// Number of slots (and of shapes) in a six-piece burr.
pub const NUM_SLOTS: usize = 6;

/// One of the six named locations around the central cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Slot {
    pub const ALL: [Slot; NUM_SLOTS] = [Slot::A, Slot::B, Slot::C, Slot::D, Slot::E, Slot::F];

    pub const fn letter(self) -> char {
        match self {
            Slot::A => 'A',
            Slot::B => 'B',
            Slot::C => 'C',
            Slot::D => 'D',
            Slot::E => 'E',
            Slot::F => 'F',
        }
    }

    pub fn from_letter(letter: char) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.letter() == letter)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Origin and arm of this slot.
    pub const fn position(self) -> Position {
        match self {
            Slot::A => Position::new(0, -2, 0, Axis::Z),
            Slot::B => Position::new(0, 0, -2, Axis::X),
            Slot::C => Position::new(-2, 0, 0, Axis::Y),
            Slot::D => Position::new(0, 0, 2, Axis::X),
            Slot::E => Position::new(2, 0, 0, Axis::Y),
            Slot::F => Position::new(0, 2, 0, Axis::Z),
        }
    }

    /// The slot sitting exactly at `position`, if any.
    pub fn at(position: Position) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.position() == position)
    }

    /// The eight outer voxels a piece must fill to sit in this slot.
    ///
    /// These are the ends of the outward face, on both sides of the notch
    /// every burr piece presents to the center.
    pub const fn required_voxels(self) -> [Voxel; 8] {
        match self {
            Slot::A => [
                Voxel::new(-1, -3, -5),
                Voxel::new(1, -3, -5),
                Voxel::new(-1, -3, -3),
                Voxel::new(1, -3, -3),
                Voxel::new(-1, -3, 3),
                Voxel::new(1, -3, 3),
                Voxel::new(-1, -3, 5),
                Voxel::new(1, -3, 5),
            ],
            Slot::B => [
                Voxel::new(-5, -1, -3),
                Voxel::new(-5, 1, -3),
                Voxel::new(-3, -1, -3),
                Voxel::new(-3, 1, -3),
                Voxel::new(3, -1, -3),
                Voxel::new(3, 1, -3),
                Voxel::new(5, -1, -3),
                Voxel::new(5, 1, -3),
            ],
            Slot::C => [
                Voxel::new(-3, -5, -1),
                Voxel::new(-3, -5, 1),
                Voxel::new(-3, -3, -1),
                Voxel::new(-3, -3, 1),
                Voxel::new(-3, 3, -1),
                Voxel::new(-3, 3, 1),
                Voxel::new(-3, 5, -1),
                Voxel::new(-3, 5, 1),
            ],
            Slot::D => [
                Voxel::new(-5, -1, 3),
                Voxel::new(-5, 1, 3),
                Voxel::new(-3, -1, 3),
                Voxel::new(-3, 1, 3),
                Voxel::new(3, -1, 3),
                Voxel::new(3, 1, 3),
                Voxel::new(5, -1, 3),
                Voxel::new(5, 1, 3),
            ],
            Slot::E => [
                Voxel::new(3, -5, -1),
                Voxel::new(3, -5, 1),
                Voxel::new(3, -3, -1),
                Voxel::new(3, -3, 1),
                Voxel::new(3, 3, -1),
                Voxel::new(3, 3, 1),
                Voxel::new(3, 5, -1),
                Voxel::new(3, 5, 1),
            ],
            Slot::F => [
                Voxel::new(-1, 3, -5),
                Voxel::new(1, 3, -5),
                Voxel::new(-1, 3, -3),
                Voxel::new(1, 3, -3),
                Voxel::new(-1, 3, 3),
                Voxel::new(1, 3, 3),
                Voxel::new(-1, 3, 5),
                Voxel::new(1, 3, 5),
            ],
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A shape placed somewhere in (or sliding out of) the puzzle.
///
/// Ordering is lexicographic on shape, then position, then orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    /// Index into the puzzle's shapes (0-based).
    pub shape: usize,
    pub position: Position,
    pub orientation: Orientation,
}

impl Piece {
    pub const fn new(shape: usize, position: Position, orientation: Orientation) -> Self {
        Self {
            shape,
            position,
            orientation,
        }
    }

    /// A piece sitting in a named slot.
    pub const fn at_slot(shape: usize, slot: Slot, orientation: Orientation) -> Self {
        Self::new(shape, slot.position(), orientation)
    }

    pub const fn moved(self, direction: Direction, steps: i32) -> Self {
        Self::new(self.shape, self.position.moved(direction, steps), self.orientation)
    }
}

impl fmt::Display for Piece {
    /// `<slot letter or (x,y,z,axis)><1-based shape digit><orientation letter>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Slot::at(self.position) {
            Some(slot) => write!(f, "{slot}")?,
            None => write!(f, "{}", self.position)?,
        }
        write!(f, "{}{}", self.shape + 1, self.orientation.letter())
    }
}

impl FromStr for Piece {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidPiece(s.to_string());

        let first = s.chars().next().ok_or_else(invalid)?;
        let (position, rest) = match Slot::from_letter(first) {
            Some(slot) => (slot.position(), &s[1..]),
            None if first == '(' => {
                let end = s.find(')').ok_or_else(invalid)?;
                (s[..=end].parse::<Position>()?, &s[end + 1..])
            }
            None => return Err(invalid()),
        };

        let mut chars = rest.chars();
        let (Some(digit), Some(letter), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let shape = match digit.to_digit(10) {
            Some(number) if number >= 1 => number as usize - 1,
            _ => return Err(invalid()),
        };
        Ok(Piece::new(shape, position, Orientation::from_letter(letter)?))
    }
}

/// A piece geometry with its per-slot orientation tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    voxels: Vec<Voxel>,
    orientations: [Vec<Orientation>; NUM_SLOTS],
}

impl Shape {
    /// Parses a shape from its text pattern.
    ///
    /// Rows are separated by `/`; row `i` covers local `x = i % 2`,
    /// `y = i / 2` and each character steps backwards along z from 5.
    /// `x` marks a voxel, anything else is empty, for example:
    ///
    /// `xxxxxx/xx..xx/x..xxx/x...xx`
    pub fn from_text(text: &str) -> Self {
        let mut voxels = Vec::new();
        for (row, line) in text.split('/').enumerate() {
            let x = (row % 2) as i32;
            let y = (row / 2) as i32;
            for (depth, cell) in line.chars().enumerate() {
                if cell == 'x' {
                    voxels.push(Voxel::new(2 * x - 1, 2 * y - 1, 5 - 2 * depth as i32));
                }
            }
        }

        let orientations = Slot::ALL.map(|slot| valid_orientations(&voxels, slot));
        Self {
            voxels,
            orientations,
        }
    }

    /// Local voxels, centered at the origin.
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Valid orientations at `slot`, lowest index first.
    pub fn orientations_at(&self, slot: Slot) -> &[Orientation] {
        &self.orientations[slot.index()]
    }

    /// Global voxels of this shape placed as `piece`.
    pub fn placed(&self, piece: &Piece) -> impl Iterator<Item = Voxel> + '_ {
        let (position, orientation) = (piece.position, piece.orientation);
        self.voxels.iter().map(move |v| v.move_to(position, orientation))
    }

    /// Number of voxels of `piece` still inside the cross bounding volume.
    pub fn inside_count(&self, piece: &Piece) -> usize {
        self.placed(piece).filter(|v| v.is_inside()).count()
    }
}

/// Finds the orientations that cover all required voxels of `slot`.
///
/// Orientations producing a voxel layout already seen at a lower index are
/// skipped so symmetric shapes do not yield equivalent moves.
fn valid_orientations(voxels: &[Voxel], slot: Slot) -> Vec<Orientation> {
    let position = slot.position();
    let required = slot.required_voxels();
    let mut seen_layouts: FxHashSet<Vec<Voxel>> = FxHashSet::default();
    let mut valid = Vec::new();

    for orientation in Orientation::all() {
        let mut layout: Vec<Voxel> = voxels
            .iter()
            .map(|v| v.move_to(position, orientation))
            .collect();
        layout.sort_unstable();

        if !seen_layouts.insert(layout.clone()) {
            continue;
        }

        if required.iter().all(|v| layout.binary_search(v).is_ok()) {
            valid.push(orientation);
        }
    }

    valid
}
