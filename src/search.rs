//! Generic best-first (A*) search over an abstract state graph.
//!
//! Unlike most A* helpers this one records the edge taken into each state,
//! so callers get back the moves as well as the states along the path.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::debug;

/// One state on a path, with the edge that led into it.
///
/// The first step of a path has no edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<S, E> {
    pub state: S,
    pub edge: Option<E>,
}

/// Finds a cheapest path from `start` to a state satisfying `is_goal`.
///
/// The frontier is ordered by `(cost + heuristic, heuristic, state)`, so
/// among equally promising states the one nearer the goal pops first and any
/// remaining tie falls back to the state ordering. Returns the path from
/// `start` to the goal inclusive, or `None` once the frontier runs dry.
pub fn astar<S, E, D, H, N, I, G>(
    start: S,
    mut distance: D,
    mut heuristic: H,
    mut neighbors: N,
    mut is_goal: G,
) -> Option<Vec<Step<S, E>>>
where
    S: Clone + Eq + Hash + Ord,
    D: FnMut(&S, &S) -> u32,
    H: FnMut(&S) -> u32,
    N: FnMut(&S) -> I,
    I: IntoIterator<Item = (E, S)>,
    G: FnMut(&S) -> bool,
{
    let mut frontier = BinaryHeap::new();
    let mut cost_so_far: FxHashMap<S, u32> = FxHashMap::default();
    let mut came_from: FxHashMap<S, (S, E)> = FxHashMap::default();
    let mut expanded = 0usize;

    cost_so_far.insert(start.clone(), 0);
    frontier.push(Reverse((0, 0, start)));

    while let Some(Reverse((_, _, current))) = frontier.pop() {
        if is_goal(&current) {
            debug!(expanded, visited = cost_so_far.len(), "search reached goal");
            return Some(reconstruct_path(&mut came_from, current));
        }

        expanded += 1;
        let current_cost = cost_so_far[&current];
        for (edge, next) in neighbors(&current) {
            let new_cost = current_cost + distance(&current, &next);
            if cost_so_far.get(&next).is_some_and(|&known| known <= new_cost) {
                continue;
            }

            let estimate = heuristic(&next);
            cost_so_far.insert(next.clone(), new_cost);
            came_from.insert(next.clone(), (current.clone(), edge));
            frontier.push(Reverse((new_cost + estimate, estimate, next)));
        }
    }

    debug!(expanded, visited = cost_so_far.len(), "search exhausted frontier");
    None
}

/// Walks predecessor links back from `goal` and returns the path start-first.
fn reconstruct_path<S, E>(came_from: &mut FxHashMap<S, (S, E)>, goal: S) -> Vec<Step<S, E>>
where
    S: Eq + Hash,
{
    let mut path = Vec::new();
    let mut current = goal;
    while let Some((previous, edge)) = came_from.remove(&current) {
        path.push(Step {
            state: current,
            edge: Some(edge),
        });
        current = previous;
    }
    path.push(Step {
        state: current,
        edge: None,
    });

    path.reverse();
    path
}
