//! Assembly and disassembly search.
//!
//! Solving runs two searches. The outer one fills the six slots best-first,
//! always extending the partial assembly with the fewest empty slots. Each
//! complete assembly it produces is handed to the inner A* search, which
//! looks for a sequence of collision-free slides that takes every piece out.
//! The first assembly that comes apart is the solution.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use tracing::{debug, info, trace};

use crate::geometry::MoveCache;
use crate::pieces::{Piece, Slot, NUM_SLOTS};
use crate::puzzle::{Move, Puzzle, PuzzleState};
use crate::search::{astar, Step};

/// A disassembly path: each state with the move that led into it.
pub type Disassembly = Vec<Step<PuzzleState, Move>>;

/// Pieces at or below this count are taken out one move each.
const HEURISTIC_FLOOR: usize = 4;

/// Seeds slot A only with shapes having at most this many orientations there.
const MAX_SEED_ORIENTATIONS: usize = 2;

/// Finds disassemblies, reusing one voxel move cache across searches.
#[derive(Debug, Default)]
pub struct Disassembler {
    cache: MoveCache,
}

impl Disassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `cache` for voxel moves instead of a fresh table.
    pub fn with_cache(cache: MoveCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &MoveCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut MoveCache {
        &mut self.cache
    }

    /// Searches for a move sequence that empties `puzzle`.
    ///
    /// Every move costs 1. The heuristic is `max(pieces, 4)`: exact once
    /// fewer than four pieces remain, but not admissible in crowded states
    /// where pieces may have to move in groups, so early paths are not
    /// guaranteed to be the shortest.
    pub fn disassemble(&mut self, puzzle: &Puzzle) -> Option<Disassembly> {
        let cache = &mut self.cache;
        let path = astar(
            puzzle.state(),
            |_, _| 1,
            |state: &PuzzleState| state.len().max(HEURISTIC_FLOOR) as u32,
            |state: &PuzzleState| {
                let current = puzzle.to_state(state);
                current
                    .valid_moves(cache)
                    .into_iter()
                    .map(|mv| {
                        let next = current.do_move(&mv).state();
                        (mv, next)
                    })
                    .collect::<Vec<_>>()
            },
            |state: &PuzzleState| state.is_empty(),
        );

        match &path {
            Some(path) => debug!(assembly = %puzzle, moves = path.len() - 1, "disassembled"),
            None => trace!(assembly = %puzzle, "no disassembly"),
        }
        path
    }
}

/// Searches for a disassembly of `puzzle` with a fresh cache.
pub fn disassemble(puzzle: &Puzzle) -> Option<Disassembly> {
    Disassembler::new().disassemble(puzzle)
}

/// A solved puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// The complete assembly that could be taken apart.
    pub assembly: PuzzleState,
    /// Steps from the assembly to the empty puzzle.
    pub moves: Disassembly,
    /// Partial assemblies popped by the assembly search.
    pub num_iterations: usize,
    /// Complete assemblies handed to the disassembly search.
    pub num_checked: usize,
}

impl Solution {
    /// The moves in order, without the states.
    pub fn move_list(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter().filter_map(|step| step.edge.as_ref())
    }

    /// Number of moves in the disassembly.
    pub fn num_moves(&self) -> usize {
        self.moves.len().saturating_sub(1)
    }
}

/// Result of running the solver to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(Solution),
    /// No complete assembly could be taken apart.
    Unsolvable {
        num_iterations: usize,
        num_checked: usize,
    },
}

impl SolveOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::Unsolvable { .. } => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::Unsolvable { .. } => None,
        }
    }
}

/// A partial assembly in the outer search.
///
/// Ordering (used for frontier ties) follows the placed pieces first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct AssemblyState {
    placed: PuzzleState,
    shapes: BTreeSet<usize>,
    slots: BTreeSet<Slot>,
}

impl AssemblyState {
    fn empty() -> Self {
        Self {
            placed: PuzzleState::default(),
            shapes: (0..NUM_SLOTS).collect(),
            slots: Slot::ALL.into_iter().collect(),
        }
    }

    fn add(&self, slot: Slot, piece: Piece) -> Self {
        let mut shapes = self.shapes.clone();
        shapes.remove(&piece.shape);
        let mut slots = self.slots.clone();
        slots.remove(&slot);
        Self {
            placed: self.placed.add(piece),
            shapes,
            slots,
        }
    }

    fn num_remaining(&self) -> usize {
        self.slots.len()
    }
}

/// Frontier of partial assemblies, fewest empty slots first.
type AssemblyFrontier = BinaryHeap<Reverse<(usize, AssemblyState)>>;

fn push(frontier: &mut AssemblyFrontier, state: AssemblyState) {
    frontier.push(Reverse((state.num_remaining(), state)));
}

/// Pushes every collision-free one-piece extension of `state`.
fn extend(puzzle: &Puzzle, state: &AssemblyState, frontier: &mut AssemblyFrontier) {
    let occupied = puzzle.to_state(&state.placed).occupied_voxels();
    for &shape in &state.shapes {
        for &slot in &state.slots {
            for piece in puzzle.pieces_at(shape, slot) {
                let fits = puzzle.voxels_for(&piece).all(|v| !occupied.contains(&v));
                if fits {
                    push(frontier, state.add(slot, piece));
                }
            }
        }
    }
}

/// Solves `puzzle`, checking candidate assemblies with a [`Disassembler`].
pub fn solve(puzzle: &Puzzle) -> SolveOutcome {
    let mut disassembler = Disassembler::new();
    solve_with(puzzle, |candidate| disassembler.disassemble(candidate))
}

/// Solves `puzzle`, checking each complete assembly with `disassemble`.
///
/// Only shapes with at most two valid orientations in slot A seed the
/// search, each in its first valid orientation. Assemblies that cannot be
/// taken apart are dropped and the search carries on.
pub fn solve_with<F>(puzzle: &Puzzle, mut disassemble: F) -> SolveOutcome
where
    F: FnMut(&Puzzle) -> Option<Disassembly>,
{
    let start = AssemblyState::empty();
    let mut frontier = AssemblyFrontier::new();

    for (shape, data) in puzzle.shapes().iter().enumerate() {
        let orientations = data.orientations_at(Slot::A);
        if orientations.len() > MAX_SEED_ORIENTATIONS {
            continue;
        }
        if let Some(&orientation) = orientations.first() {
            push(
                &mut frontier,
                start.add(Slot::A, Piece::at_slot(shape, Slot::A, orientation)),
            );
        }
    }

    let mut num_iterations = 0;
    let mut num_checked = 0;
    while let Some(Reverse((_, state))) = frontier.pop() {
        num_iterations += 1;
        if state.num_remaining() > 0 {
            extend(puzzle, &state, &mut frontier);
            continue;
        }

        num_checked += 1;
        let candidate = puzzle.to_state(&state.placed);
        info!(assembly = %candidate, num_checked, "checking assembly");
        if let Some(moves) = disassemble(&candidate) {
            info!(num_iterations, num_checked, moves = moves.len().saturating_sub(1), "solved");
            return SolveOutcome::Solved(Solution {
                assembly: state.placed,
                moves,
                num_iterations,
                num_checked,
            });
        }
    }

    info!(num_iterations, num_checked, "no assembly comes apart");
    SolveOutcome::Unsolvable {
        num_iterations,
        num_checked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use crate::pieces::Shape;

    const FACE_ONLY: &str = "xx..xx/xx..xx/....../......";
    const SOLID: &str = "xxxxxx/xxxxxx/xxxxxx/xxxxxx";

    fn face_puzzle() -> Puzzle {
        Puzzle::from_text(&[FACE_ONLY; 6]).unwrap()
    }

    /// Replays `moves` from its first state and checks every step.
    fn assert_replays(puzzle: &Puzzle, moves: &Disassembly) {
        assert_eq!(moves[0].edge, None);
        assert!(moves.last().unwrap().state.is_empty());
        let mut cache = MoveCache::new();
        for pair in moves.windows(2) {
            let current = puzzle.to_state(&pair[0].state);
            let mv = pair[1].edge.as_ref().unwrap();
            assert!(current.valid_moves(&mut cache).contains(mv), "{mv} not legal");
            assert_eq!(current.do_move(mv).state(), pair[1].state);
        }
    }

    #[test]
    fn test_disassemble_two_pieces() {
        let puzzle = face_puzzle();
        let start = puzzle.to_state(&"A1a F2c".parse().unwrap());
        let moves = disassemble(&start).unwrap();
        // each piece slides straight out
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0].state, start.state());
        assert_replays(&puzzle, &moves);
    }

    #[test]
    fn test_disassemble_single_piece_and_empty() {
        let shapes = [FACE_ONLY, SOLID, FACE_ONLY, FACE_ONLY, FACE_ONLY, FACE_ONLY];
        let puzzle = Puzzle::new(shapes.map(Shape::from_text));
        let start = puzzle.to_state(&"B2a".parse().unwrap());
        let moves = disassemble(&start).unwrap();
        assert_eq!(moves.len(), 2);
        assert_replays(&puzzle, &moves);

        let empty = puzzle.to_state(&PuzzleState::default());
        let moves = disassemble(&empty).unwrap();
        assert_eq!(moves.len(), 1);
    }

    #[test]
    fn test_disassembler_reuses_cache() {
        let puzzle = face_puzzle();
        let mut disassembler = Disassembler::with_cache(MoveCache::new());
        let start = puzzle.to_state(&"C3d E5b".parse().unwrap());
        assert!(disassembler.disassemble(&start).is_some());
        let cached = disassembler.cache().len();
        assert!(cached > 0);
        assert!(disassembler.disassemble(&start).is_some());
        assert_eq!(disassembler.cache().len(), cached);
        disassembler.cache_mut().clear();
        assert!(disassembler.cache().is_empty());
    }

    /// A one-move disassembly that lifts every piece out at once.
    fn fake_disassembly(candidate: &Puzzle) -> Disassembly {
        let mv = Move::new(candidate.pieces().iter().copied(), Direction::Up, 9);
        vec![
            Step {
                state: candidate.state(),
                edge: None,
            },
            Step {
                state: PuzzleState::default(),
                edge: Some(mv),
            },
        ]
    }

    #[test]
    fn test_assembly_search_fills_every_slot() {
        let puzzle = face_puzzle();
        let outcome = solve_with(&puzzle, |candidate| Some(fake_disassembly(candidate)));
        let solution = outcome.solution().unwrap();

        assert_eq!(solution.num_checked, 1);
        assert_eq!(solution.assembly.len(), NUM_SLOTS);
        let shapes: BTreeSet<usize> = solution.assembly.pieces().iter().map(|p| p.shape).collect();
        assert_eq!(shapes.len(), NUM_SLOTS);
        let slots: BTreeSet<Slot> = solution
            .assembly
            .pieces()
            .iter()
            .filter_map(|p| Slot::at(p.position))
            .collect();
        assert_eq!(slots.len(), NUM_SLOTS);
        assert_eq!(solution.assembly.pieces()[0].position, Slot::A.position());
        // seed, then one pop per remaining slot
        assert_eq!(solution.num_iterations, NUM_SLOTS);
    }

    #[test]
    fn test_assembly_search_skips_failed_candidates() {
        let puzzle = face_puzzle();
        let mut rejected = Vec::new();
        let outcome = solve_with(&puzzle, |candidate| {
            if rejected.len() < 3 {
                rejected.push(candidate.state());
                return None;
            }
            Some(fake_disassembly(candidate))
        });

        let solution = outcome.into_solution().unwrap();
        assert_eq!(solution.num_checked, 4);
        assert!(!rejected.contains(&solution.assembly));
        assert_eq!(solution.num_moves(), 1);
        assert_eq!(solution.move_list().count(), 1);
    }

    #[test]
    fn test_unsolvable_when_nothing_comes_apart() {
        let puzzle = face_puzzle();
        let outcome = solve_with(&puzzle, |_| None);
        match outcome {
            SolveOutcome::Unsolvable {
                num_iterations,
                num_checked,
            } => {
                assert!(num_checked > 0);
                assert!(num_iterations > num_checked);
            }
            SolveOutcome::Solved(_) => panic!("expected no solution"),
        }
    }

    #[test]
    fn test_unseeded_when_no_shape_fits_slot_a() {
        // a single row can never cover both halves of a slot's face
        let puzzle = Puzzle::from_text(&["xxxxxx/....../....../......"; 6]).unwrap();
        assert!(puzzle.shapes()[0].orientations_at(Slot::A).is_empty());
        let outcome = solve_with(&puzzle, |candidate| Some(fake_disassembly(candidate)));
        assert_eq!(
            outcome,
            SolveOutcome::Unsolvable {
                num_iterations: 0,
                num_checked: 0
            }
        );
    }
}
