//! Dijkstra's and A* pathfinding built on [`MinHeap`] decrease-key
//!
//! Every node in the open set is inserted into the heap together with a
//! [`PositionCell`]. When a shorter route to an open node is found, the
//! search lowers its priority in place with
//! [`MinHeap::decrease_key_tracked`] instead of pushing a duplicate.
//!
//! Only lightweight indices are stored in the heap. A fast hash map (FxHash)
//! maps node states to their index; per-node metadata lives in a vector.
//!
//! Dijkstra is A* with a heuristic of zero. The node type carries its own
//! goal context and implements `is_goal()` to decide when to stop.
//!
//! # Example
//!
//! ```rust
//! use position_heap::pathfinding::{SearchNode, dijkstra};
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, Self::Cost)> {
//!         vec![
//!             (GridPos { x: self.x + 1, ..self.clone() }, 1),
//!             (GridPos { x: self.x - 1, ..self.clone() }, 1),
//!             (GridPos { y: self.y + 1, ..self.clone() }, 1),
//!             (GridPos { y: self.y - 1, ..self.clone() }, 1),
//!         ]
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let (path, cost) = dijkstra(&start).unwrap();
//! assert_eq!(cost, 4);
//! assert_eq!(path.len(), 5);
//! ```

use crate::min_heap::MinHeap;
use crate::position::PositionCell;
use log::debug;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;

/// Trait for types that can be used as costs in pathfinding algorithms.
///
/// `Default` must be the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// Trait for nodes in a search graph.
pub trait SearchNode: Clone + Eq + Hash {
    /// The cost type for edge weights
    type Cost: Cost;

    /// Returns all successor nodes along with the cost to reach them.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Trait for nodes that can provide a heuristic estimate for A* search.
pub trait AStarNode: SearchNode {
    /// Returns an estimate of the remaining cost to a goal.
    ///
    /// For A* to return optimal paths the estimate must never exceed the true
    /// cost, and it must be consistent (`h(n) <= cost(n, m) + h(m)`).
    fn heuristic(&self) -> Self::Cost;
}

/// Heap priority for a search node, ordered by f-score only.
#[derive(Debug, Clone, Copy)]
pub struct PriorityCost<C> {
    /// The f-score: g + h (where h=0 for Dijkstra)
    pub f_score: C,
    /// The actual cost from start (g-score)
    pub g_score: C,
}

impl<C: Ord> PartialEq for PriorityCost<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<C: Ord> Eq for PriorityCost<C> {}

impl<C: Ord> PartialOrd for PriorityCost<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for PriorityCost<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score.cmp(&other.f_score)
    }
}

type NodeIndex = usize;

struct NodeEntry<N: SearchNode> {
    node: N,
    g_score: N::Cost,
    /// Tracks the node's heap slot while it is open
    cell: PositionCell,
    came_from: Option<NodeIndex>,
    closed: bool,
}

/// Open and closed sets of one search.
struct PathFinder<N: SearchNode> {
    heap: MinHeap<PriorityCost<N::Cost>, NodeIndex>,
    nodes: Vec<NodeEntry<N>>,
    state_to_index: FxHashMap<N, NodeIndex>,
}

impl<N: SearchNode> PathFinder<N> {
    fn new(start: &N, start_h: N::Cost) -> Self {
        let mut finder = PathFinder {
            heap: MinHeap::new(),
            nodes: Vec::new(),
            state_to_index: FxHashMap::default(),
        };
        finder.open(start.clone(), N::Cost::default(), start_h, None);
        finder
    }

    fn open(&mut self, node: N, g_score: N::Cost, h: N::Cost, came_from: Option<NodeIndex>) {
        let index = self.nodes.len();
        self.state_to_index.insert(node.clone(), index);
        self.nodes.push(NodeEntry {
            node,
            g_score,
            cell: PositionCell::new(),
            came_from,
            closed: false,
        });
        let priority = PriorityCost {
            f_score: g_score + h,
            g_score,
        };
        self.heap
            .insert_tracked(index, priority, &self.nodes[index].cell);
    }

    /// Offers a route to `neighbor` through `from` costing `g_score`.
    fn relax(&mut self, from: NodeIndex, neighbor: N, g_score: N::Cost, h: N::Cost) {
        let Some(&index) = self.state_to_index.get(&neighbor) else {
            self.open(neighbor, g_score, h, Some(from));
            return;
        };

        let entry = &mut self.nodes[index];
        if entry.closed || g_score >= entry.g_score {
            return;
        }
        entry.g_score = g_score;
        entry.came_from = Some(from);
        self.heap.decrease_key_tracked(
            &entry.cell,
            PriorityCost {
                f_score: g_score + h,
                g_score,
            },
        );
    }

    /// Closes and returns the open node with the smallest f-score.
    fn pop(&mut self) -> Option<(NodeIndex, N::Cost)> {
        let (priority, index) = self.heap.try_extract_min_entry().ok()?;
        self.nodes[index].closed = true;
        Some((index, priority.g_score))
    }

    fn node(&self, index: NodeIndex) -> &N {
        &self.nodes[index].node
    }

    fn reconstruct_path(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.nodes[current].node.clone()];
        while let Some(prev) = self.nodes[current].came_from {
            path.push(self.nodes[prev].node.clone());
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Runs Dijkstra's algorithm from the start node until `is_goal()` returns true.
///
/// Returns the path (start and goal inclusive) and its cost, or `None` if no
/// goal is reachable.
///
/// # Example
/// ```rust
/// use position_heap::pathfinding::{SearchNode, dijkstra};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// struct Node {
///     value: i32,
///     goal: i32,
/// }
///
/// impl SearchNode for Node {
///     type Cost = u32;
///
///     fn successors(&self) -> Vec<(Self, u32)> {
///         if self.value < 100 {
///             vec![(Node { value: self.value + 1, goal: self.goal }, 1)]
///         } else {
///             vec![]
///         }
///     }
///
///     fn is_goal(&self) -> bool {
///         self.value == self.goal
///     }
/// }
///
/// let (path, cost) = dijkstra(&Node { value: 0, goal: 5 }).unwrap();
/// assert_eq!(cost, 5);
/// assert_eq!(path.len(), 6);
/// ```
pub fn dijkstra<N: SearchNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    PathFinderBuilder::new(start.clone()).dijkstra()
}

/// Runs A* search from the start node until `is_goal()` returns true.
///
/// Uses the node's `heuristic()` method to guide the search.
pub fn astar<N: AStarNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    PathFinderBuilder::new(start.clone()).astar()
}

/// Returns all nodes reachable from the start within a given cost budget,
/// in non-decreasing order of cost.
pub fn reachable_within<N: SearchNode>(start: &N, max_cost: N::Cost) -> Vec<(N, N::Cost)> {
    let zero = N::Cost::default();
    let mut finder = PathFinder::new(start, zero);
    let mut result = Vec::new();

    while let Some((current, g)) = finder.pop() {
        if g > max_cost {
            continue;
        }
        let node = finder.node(current).clone();

        for (neighbor, edge_cost) in node.successors() {
            let tentative_g = g + edge_cost;
            if tentative_g <= max_cost {
                finder.relax(current, neighbor, tentative_g, zero);
            }
        }
        result.push((node, g));
    }

    debug!("reachable_within: {} nodes within budget", result.len());
    result
}

/// Builder for pathfinding queries with search limits.
///
/// The node type's `is_goal()` method determines when to stop.
pub struct PathFinderBuilder<N: SearchNode> {
    start: N,
    max_cost: Option<N::Cost>,
    max_nodes: Option<usize>,
}

impl<N: SearchNode> PathFinderBuilder<N> {
    /// Creates a new builder starting from the given node.
    pub fn new(start: N) -> Self {
        PathFinderBuilder {
            start,
            max_cost: None,
            max_nodes: None,
        }
    }

    /// Ignores every route costing more than `cost`.
    pub fn max_cost(mut self, cost: N::Cost) -> Self {
        self.max_cost = Some(cost);
        self
    }

    /// Gives up after expanding `count` nodes.
    pub fn max_nodes(mut self, count: usize) -> Self {
        self.max_nodes = Some(count);
        self
    }

    /// Runs Dijkstra's algorithm with the configured limits.
    pub fn dijkstra(self) -> Option<(Vec<N>, N::Cost)> {
        self.search(|_| N::Cost::default())
    }

    /// Runs A* search with the configured limits.
    pub fn astar(self) -> Option<(Vec<N>, N::Cost)>
    where
        N: AStarNode,
    {
        self.search(|n| n.heuristic())
    }

    fn search(self, heuristic: impl Fn(&N) -> N::Cost) -> Option<(Vec<N>, N::Cost)> {
        let mut finder = PathFinder::new(&self.start, heuristic(&self.start));
        let mut nodes_explored = 0usize;

        while let Some((current, g)) = finder.pop() {
            if self.max_nodes.is_some_and(|max| nodes_explored >= max) {
                debug!("search stopped: node limit of {nodes_explored} reached");
                return None;
            }
            nodes_explored += 1;

            if self.max_cost.is_some_and(|max| g > max) {
                continue;
            }

            let node = finder.node(current).clone();
            if node.is_goal() {
                debug!("search reached goal after exploring {nodes_explored} nodes");
                return Some((finder.reconstruct_path(current), g));
            }

            for (neighbor, edge_cost) in node.successors() {
                let tentative_g = g + edge_cost;
                if self.max_cost.is_some_and(|max| tentative_g > max) {
                    continue;
                }
                let h = heuristic(&neighbor);
                finder.relax(current, neighbor, tentative_g, h);
            }
        }

        debug!("search exhausted after exploring {nodes_explored} nodes");
        None
    }
}
