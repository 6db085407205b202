//! Arena-backed directed graph over goal ids.
//!
//! Ids are interned into dense indices in first-seen order; edges are
//! adjacency lists of indices. Traversal order therefore follows input
//! order, which keeps cycle paths and topological orders deterministic.

use std::collections::{HashMap, VecDeque};

use super::types::GoalDependency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Directed graph of goal ids.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from dependency records.
    #[must_use]
    pub fn from_dependencies(dependencies: &[GoalDependency]) -> Self {
        let mut graph = Self::new();
        for dependency in dependencies {
            graph.add_dependency(dependency);
        }
        graph
    }

    /// Add the edges one record induces.
    pub fn add_dependency(&mut self, dependency: &GoalDependency) {
        let goal = self.intern(&dependency.goal_id);
        for upstream in &dependency.depends_on {
            let from = self.intern(upstream);
            self.link(from, goal);
        }
        for downstream in &dependency.enables {
            let to = self.intern(downstream);
            self.link(goal, to);
        }
    }

    /// Add the edge `from → to`.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from = self.intern(from);
        let to = self.intern(to);
        self.link(from, to);
    }

    /// Number of distinct ids.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Index of an id, if present.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Id at an index.
    #[must_use]
    pub fn id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    /// Direct successors of an index.
    #[must_use]
    pub fn successors(&self, index: usize) -> &[usize] {
        self.edges.get(index).map_or(&[], Vec::as_slice)
    }

    /// First cycle found by depth-first search from `starts`, then from
    /// every remaining node in index order.
    ///
    /// The path follows edge direction and repeats its first node at the end.
    #[must_use]
    pub fn find_cycle_from(&self, starts: &[usize]) -> Option<Vec<usize>> {
        let n = self.node_count();
        let mut marks = vec![Mark::Unvisited; n];

        let order = starts.iter().copied().chain(0..n).filter(|i| *i < n);
        for start in order {
            if marks[start] != Mark::Unvisited {
                continue;
            }

            // Explicit stack of (node, next successor position)
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            marks[start] = Mark::OnStack;

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let Some(&next) = self.edges[node].get(frame.1) else {
                    marks[node] = Mark::Done;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match marks[next] {
                    Mark::Unvisited => {
                        marks[next] = Mark::OnStack;
                        stack.push((next, 0));
                    }
                    Mark::OnStack => {
                        let begin = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                        let mut cycle: Vec<usize> = stack[begin..].iter().map(|(n, _)| *n).collect();
                        cycle.push(next);
                        return Some(cycle);
                    }
                    Mark::Done => {}
                }
            }
        }

        None
    }

    /// Topological order by Kahn's algorithm; `None` if a cycle remains.
    #[must_use]
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let n = self.node_count();
        let mut in_degree = vec![0usize; n];
        for successors in &self.edges {
            for &to in successors {
                in_degree[to] += 1;
            }
        }

        let mut ready: VecDeque<usize> = (0..n).filter(|i| in_degree[*i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(node) = ready.pop_front() {
            order.push(node);
            for &to in &self.edges[node] {
                in_degree[to] -= 1;
                if in_degree[to] == 0 {
                    ready.push_back(to);
                }
            }
        }

        (order.len() == n).then_some(order)
    }

    /// Nodes reachable from `start` in breadth-first order, excluding `start`.
    #[must_use]
    pub fn reachable_from(&self, start: usize) -> Vec<usize> {
        let n = self.node_count();
        if start >= n {
            return Vec::new();
        }

        let mut visited = vec![false; n];
        visited[start] = true;
        let mut queue = VecDeque::from([start]);
        let mut reached = Vec::new();

        while let Some(node) = queue.pop_front() {
            for &next in &self.edges[node] {
                if !visited[next] {
                    visited[next] = true;
                    reached.push(next);
                    queue.push_back(next);
                }
            }
        }

        reached
    }

    /// Map indices back to ids.
    #[must_use]
    pub fn ids_of(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .filter_map(|i| self.ids.get(*i).cloned())
            .collect()
    }

    fn intern(&mut self, id: &str) -> usize {
        if let Some(&existing) = self.index.get(id) {
            return existing;
        }
        let next = self.ids.len();
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), next);
        self.edges.push(Vec::new());
        next
    }

    fn link(&mut self, from: usize, to: usize) {
        if !self.edges[from].contains(&to) {
            self.edges[from].push(to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");
        graph
    }

    #[test]
    fn test_interning_is_first_seen_order() {
        let graph = chain();
        assert_eq!(graph.index_of("a"), Some(0));
        assert_eq!(graph.index_of("c"), Some(2));
        assert_eq!(graph.id(1), Some("b"));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut graph = chain();
        graph.add_edge("a", "b");
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_dependency_edge_directions() {
        let dep = GoalDependency::new("g", &["up"], &["down"]);
        let graph = DependencyGraph::from_dependencies(&[dep]);
        let g = graph.index_of("g").unwrap();
        let up = graph.index_of("up").unwrap();
        let down = graph.index_of("down").unwrap();

        assert_eq!(graph.successors(up), &[g]);
        assert_eq!(graph.successors(g), &[down]);
    }

    #[test]
    fn test_acyclic_has_no_cycle() {
        assert_eq!(chain().find_cycle_from(&[]), None);
    }

    #[test]
    fn test_finds_cycle_path() {
        let mut graph = chain();
        graph.add_edge("c", "a");
        let cycle = graph.find_cycle_from(&[0]).unwrap();
        assert_eq!(graph.ids_of(&cycle), vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("x", "x");
        let cycle = graph.find_cycle_from(&[]).unwrap();
        assert_eq!(graph.ids_of(&cycle), vec!["x", "x"]);
    }

    #[test]
    fn test_cycle_reached_from_later_start() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("root", "leaf");
        graph.add_edge("p", "q");
        graph.add_edge("q", "p");
        assert!(graph.find_cycle_from(&[]).is_some());
    }

    #[test]
    fn test_out_of_range_start_ignored() {
        assert_eq!(chain().find_cycle_from(&[99]), None);
        assert!(chain().reachable_from(99).is_empty());
    }

    #[test]
    fn test_topological_order_of_chain() {
        let graph = chain();
        let order = graph.topological_order().unwrap();
        assert_eq!(graph.ids_of(&order), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_topological_order_none_on_cycle() {
        let mut graph = chain();
        graph.add_edge("c", "b");
        assert_eq!(graph.topological_order(), None);
    }

    #[test]
    fn test_reachable_terminates_on_cycle() {
        let mut graph = chain();
        graph.add_edge("c", "a");
        let reached = graph.reachable_from(0);
        assert_eq!(graph.ids_of(&reached), vec!["b", "c"]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut graph = DependencyGraph::new();
        for i in 0..100_000 {
            graph.add_edge(&format!("n{i}"), &format!("n{}", i + 1));
        }
        assert_eq!(graph.find_cycle_from(&[0]), None);
        assert_eq!(graph.topological_order().map(|o| o.len()), Some(100_001));
    }
}
