//! Six-Piece Burr Solver Library
//!
//! Finds an assembly of six polycube sticks around a central cross and a
//! sequence of slides that takes it apart again.
//!
//! ```no_run
//! use burr_solver::{solve, Puzzle, SolveOutcome};
//!
//! let shapes = ["xxxxxx/xx..xx/x..xxx/x...xx"; 6];
//! let puzzle = Puzzle::from_text(&shapes).unwrap();
//! match solve(&puzzle) {
//!     SolveOutcome::Solved(solution) => println!("{}", solution.assembly),
//!     SolveOutcome::Unsolvable { .. } => println!("no solution"),
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod pieces;
pub mod puzzle;
pub mod search;
pub mod solver;

pub use error::{Error, Result};
pub use geometry::{Axis, Direction, MoveCache, Orientation, Position, Voxel};
pub use pieces::{Piece, Shape, Slot};
pub use puzzle::{Move, Puzzle, PuzzleState};
pub use solver::{disassemble, solve, Disassembler, Disassembly, Solution, SolveOutcome};
