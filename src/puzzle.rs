//! Puzzle snapshots, search states and legal moves.
//!
//! A [`Puzzle`] pairs the six shapes with the pieces currently placed. Every
//! operation returns a new value; nothing is mutated in place, which lets
//! [`PuzzleState`] serve directly as a search-graph node.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::geometry::{Direction, MoveCache, Voxel};
use crate::pieces::{Piece, Shape, Slot, NUM_SLOTS};

/// Voxel count of a burr with no internal voids, plus one.
const SOLID_LEVEL_VOXELS: i32 = 105;

/// The ordered pieces of a puzzle, used as a search-graph node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PuzzleState {
    pieces: Vec<Piece>,
}

impl PuzzleState {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// A new state with `piece` appended.
    pub fn add(&self, piece: Piece) -> Self {
        let mut pieces = Vec::with_capacity(self.pieces.len() + 1);
        pieces.extend_from_slice(&self.pieces);
        pieces.push(piece);
        Self { pieces }
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{piece}")?;
        }
        Ok(())
    }
}

impl FromStr for PuzzleState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let pieces = s
            .split_whitespace()
            .map(|part| -> Result<Piece> {
                let piece: Piece = part.parse()?;
                if piece.shape >= NUM_SLOTS {
                    return Err(Error::InvalidPiece(part.to_string()));
                }
                Ok(piece)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { pieces })
    }
}

/// A simultaneous slide of one or more pieces.
///
/// The piece set is unordered; equality and rendering do not depend on the
/// order pieces were collected in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub pieces: BTreeSet<Piece>,
    pub direction: Direction,
    pub steps: i32,
}

impl Move {
    pub fn new(pieces: impl IntoIterator<Item = Piece>, direction: Direction, steps: i32) -> Self {
        Self {
            pieces: pieces.into_iter().collect(),
            direction,
            steps,
        }
    }
}

impl fmt::Display for Move {
    /// `<DIRECTION> <steps> [<pieces sorted by their text>]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.pieces.iter().map(Piece::to_string).collect();
        names.sort();
        write!(f, "{} {} [{}]", self.direction, self.steps, names.join(" "))
    }
}

/// A six-piece burr: its shapes and the pieces currently in play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    shapes: Arc<[Shape; NUM_SLOTS]>,
    pieces: Vec<Piece>,
}

impl Puzzle {
    /// Creates an empty puzzle from six shapes.
    pub fn new(shapes: [Shape; NUM_SLOTS]) -> Self {
        Self {
            shapes: Arc::new(shapes),
            pieces: Vec::new(),
        }
    }

    /// Creates an empty puzzle from six shape patterns.
    pub fn from_text<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let shapes: Vec<Shape> = lines
            .iter()
            .map(|line| Shape::from_text(line.as_ref()))
            .collect();
        let shapes: [Shape; NUM_SLOTS] = shapes
            .try_into()
            .map_err(|shapes: Vec<Shape>| Error::ShapeCount(shapes.len()))?;
        Ok(Self::new(shapes))
    }

    pub fn shapes(&self) -> &[Shape; NUM_SLOTS] {
        &self.shapes
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn state(&self) -> PuzzleState {
        PuzzleState::new(self.pieces.clone())
    }

    /// The same shapes with the pieces of `state`.
    pub fn to_state(&self, state: &PuzzleState) -> Self {
        Self {
            shapes: Arc::clone(&self.shapes),
            pieces: state.pieces().to_vec(),
        }
    }

    /// Every valid piece for `shape` sitting in `slot`.
    pub fn pieces_at(&self, shape: usize, slot: Slot) -> impl Iterator<Item = Piece> + '_ {
        self.shapes[shape]
            .orientations_at(slot)
            .iter()
            .map(move |&orientation| Piece::at_slot(shape, slot, orientation))
    }

    /// Global voxels covered by `piece`.
    pub fn voxels_for<'a>(&'a self, piece: &Piece) -> impl Iterator<Item = Voxel> + 'a {
        self.shapes[piece.shape].placed(piece)
    }

    /// All voxels covered by the placed pieces.
    pub fn occupied_voxels(&self) -> FxHashSet<Voxel> {
        self.pieces
            .iter()
            .flat_map(|piece| self.voxels_for(piece))
            .collect()
    }

    /// Burr level: one plus the number of empty voxels in the hidden center.
    pub fn level(&self) -> i32 {
        let total: usize = self.shapes.iter().map(Shape::len).sum();
        SOLID_LEVEL_VOXELS - total as i32
    }

    /// Enumerates every legal move from the current placement.
    ///
    /// Single pieces always move; pairs once more than three pieces remain;
    /// triples only in the full assembly. A subset that stays partly inside
    /// the cross moves a single step, a subset that clears the cross moves
    /// as far as it took to get out.
    pub fn valid_moves(&self, cache: &mut MoveCache) -> Vec<Move> {
        let count = self.pieces.len();
        let mut sizes = vec![1];
        if count > 3 {
            sizes.push(2);
        }
        if count == NUM_SLOTS {
            sizes.push(3);
        }

        let piece_voxels: Vec<Vec<Voxel>> = self
            .pieces
            .iter()
            .map(|piece| self.voxels_for(piece).collect())
            .collect();

        let mut moves = Vec::new();
        for size in sizes {
            for subset in combinations(count, size) {
                let subset_voxels: Vec<Voxel> = subset
                    .iter()
                    .flat_map(|&i| piece_voxels[i].iter().copied())
                    .collect();
                let old_voxels: FxHashSet<Voxel> = (0..count)
                    .filter(|i| !subset.contains(i))
                    .flat_map(|i| piece_voxels[i].iter().copied())
                    .collect();

                for direction in Direction::ALL {
                    let (steps, exits) = probe(cache, &subset_voxels, &old_voxels, direction);
                    if steps == 0 {
                        continue;
                    }

                    // partial slides go one step at a time so no
                    // intermediate collision state is skipped
                    let steps = if exits { steps } else { 1 };
                    let pieces = subset.iter().map(|&i| self.pieces[i]);
                    moves.push(Move::new(pieces, direction, steps));
                }
            }
        }

        moves
    }

    /// Applies `mv`, dropping pieces that end up entirely outside the cross.
    pub fn do_move(&self, mv: &Move) -> Self {
        let pieces = self
            .pieces
            .iter()
            .filter_map(|piece| {
                if !mv.pieces.contains(piece) {
                    return Some(*piece);
                }
                let moved = piece.moved(mv.direction, mv.steps);
                (self.shapes[moved.shape].inside_count(&moved) > 0).then_some(moved)
            })
            .collect();

        Self {
            shapes: Arc::clone(&self.shapes),
            pieces,
        }
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state())
    }
}

/// Slides `voxels` step by step until they hit `obstacles` or leave the cross.
///
/// Returns the number of collision-free steps and whether the last of them
/// took every voxel outside.
fn probe(
    cache: &mut MoveCache,
    voxels: &[Voxel],
    obstacles: &FxHashSet<Voxel>,
    direction: Direction,
) -> (i32, bool) {
    let mut steps = 0;
    loop {
        let mut any_inside = false;
        for &voxel in voxels {
            let moved = cache.move_voxel(voxel, direction, steps + 1);
            if obstacles.contains(&moved) {
                return (steps, false);
            }
            any_inside |= moved.is_inside();
        }

        steps += 1;
        if !any_inside {
            return (steps, true);
        }
    }
}

/// All `k`-element index subsets of `0..n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    if k > n {
        return result;
    }

    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.clone());

        // advance the rightmost index that still has room
        let Some(i) = (0..k).rev().find(|&i| indices[i] != i + n - k) else {
            return result;
        };
        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}
