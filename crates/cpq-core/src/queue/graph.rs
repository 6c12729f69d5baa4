//! Causal graph between tasks.
//!
//! Design:
//! - Reverse edges: parent -> children (with the weight each edge releases).
//!   This is the side propagation walks.
//! - Forward edges: child -> its causes.
//! - Invariant: both maps describe the same edge set, and it stays acyclic.
//!
//! Children are kept in a `BTreeMap` so they come out in `TaskId` (creation)
//! order; propagation re-keys them in that order, which keeps FIFO ties
//! deterministic.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::domain::TaskId;
use crate::error::QueueError;

#[derive(Debug, Clone)]
pub struct CausalGraph<P> {
    /// parent -> (child -> edge weight)
    children: HashMap<TaskId, BTreeMap<TaskId, P>>,

    /// child -> parents
    causes: HashMap<TaskId, BTreeSet<TaskId>>,

    edge_count: usize,
}

impl<P: Copy> CausalGraph<P> {
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
            causes: HashMap::new(),
            edge_count: 0,
        }
    }

    /// Validate `parent -> child` without touching the graph.
    ///
    /// `max_search` caps how many nodes the reachability search may visit.
    /// Hitting the cap rejects the edge as a cycle.
    pub fn check_link(
        &self,
        parent: TaskId,
        child: TaskId,
        max_search: Option<usize>,
    ) -> Result<(), QueueError> {
        if parent == child {
            return Err(QueueError::SelfLoop(child));
        }
        match self.reaches(child, parent, max_search) {
            Reach::No => Ok(()),
            Reach::Yes => Err(QueueError::Cycle { parent, child }),
            Reach::GaveUp(visited) => {
                tracing::warn!(
                    %parent,
                    %child,
                    visited,
                    "cycle search hit its limit, rejecting edge"
                );
                Err(QueueError::Cycle { parent, child })
            }
        }
    }

    /// Record that `child` depends on `parent`; resolving `parent` releases
    /// `child` by `weight`.
    ///
    /// Linking an existing edge again replaces its weight.
    pub fn link(
        &mut self,
        parent: TaskId,
        child: TaskId,
        weight: P,
        max_search: Option<usize>,
    ) -> Result<(), QueueError> {
        self.check_link(parent, child, max_search)?;
        self.insert_edge(parent, child, weight);
        Ok(())
    }

    /// Insert an edge already validated by `check_link`.
    pub(crate) fn insert_edge(&mut self, parent: TaskId, child: TaskId, weight: P) {
        match self.children.entry(parent).or_default().entry(child) {
            Entry::Occupied(mut e) => {
                e.insert(weight);
            }
            Entry::Vacant(e) => {
                e.insert(weight);
                self.edge_count += 1;
            }
        }
        self.causes.entry(child).or_default().insert(parent);
    }

    /// Direct dependents of `parent`, in creation order.
    pub fn children_of(&self, parent: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.edges_from(parent).map(|(child, _)| child)
    }

    /// Outgoing edges of `parent` with their weights, in child creation order.
    pub fn edges_from(&self, parent: TaskId) -> impl Iterator<Item = (TaskId, P)> + '_ {
        self.children
            .get(&parent)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(child, weight)| (*child, *weight)))
    }

    pub fn causes_of(&self, child: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.causes.get(&child).into_iter().flatten().copied()
    }

    /// Drop every outgoing edge of a resolved parent. Returns how many were removed.
    pub fn remove_edges_from(&mut self, parent: TaskId) -> usize {
        let Some(edges) = self.children.remove(&parent) else {
            return 0;
        };
        for child in edges.keys() {
            if let Some(parents) = self.causes.get_mut(child) {
                parents.remove(&parent);
                if parents.is_empty() {
                    self.causes.remove(child);
                }
            }
        }
        self.edge_count -= edges.len();
        edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }

    /// Is `target` reachable from `from` along parent -> child edges?
    ///
    /// Iterative DFS; each node is expanded at most once.
    fn reaches(&self, from: TaskId, target: TaskId, max_search: Option<usize>) -> Reach {
        if !self.children.contains_key(&from) {
            return Reach::No;
        }
        let mut visited: HashSet<TaskId> = HashSet::new();
        let mut stack = vec![from];
        visited.insert(from);

        while let Some(node) = stack.pop() {
            for next in self.children_of(node) {
                if next == target {
                    tracing::trace!(%from, %target, visited = visited.len(), "path found");
                    return Reach::Yes;
                }
                if visited.insert(next) {
                    if let Some(limit) = max_search
                        && visited.len() > limit
                    {
                        return Reach::GaveUp(visited.len());
                    }
                    stack.push(next);
                }
            }
        }
        Reach::No
    }
}

impl<P: Copy> Default for CausalGraph<P> {
    fn default() -> Self {
        Self::new()
    }
}

enum Reach {
    Yes,
    No,
    GaveUp(usize),
}
