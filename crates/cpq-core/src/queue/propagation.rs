//! Propagation: what resolving a task does to its dependents.
//!
//! When a parent is popped, every still-pending direct child is released by
//! the weight of its edge: `new = max(0, current - weight)`, then re-keyed in
//! the store. Children already resolved are skipped. Afterwards the parent's
//! outgoing edges are dropped, so each edge fires at most once.
//!
//! Propagation is one level deep. Grandchildren move only when their own
//! parent is later popped, which bounds the work per pop by the out-degree of
//! the popped task.

use serde::Serialize;

use super::graph::CausalGraph;
use super::store::PriorityStore;
use crate::domain::{Priority, TaskId};

/// One child re-keyed by a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Adjustment<P> {
    pub task_id: TaskId,
    pub from: P,
    pub to: P,
    pub weight: P,
}

/// Report of a single resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Propagation<P> {
    pub parent: TaskId,
    pub adjustments: Vec<Adjustment<P>>,

    /// Children that were already resolved.
    pub skipped: usize,

    /// Outgoing edges of `parent` consumed by this resolution.
    pub edges_consumed: usize,
}

impl<P> Propagation<P> {
    pub fn none(parent: TaskId) -> Self {
        Self {
            parent,
            adjustments: Vec::new(),
            skipped: 0,
            edges_consumed: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }
}

/// Applies the release rule and keeps running totals for observability.
#[derive(Debug, Clone, Default)]
pub struct PropagationEngine {
    resolutions: u64,
    adjustments: u64,
}

impl PropagationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the dependents of `parent`, which has just been extracted.
    ///
    /// # Panics
    /// If a child is neither in the store nor `is_resolved`: the queue's
    /// bookkeeping is corrupt and continuing would break ordering.
    pub fn on_resolve<P, F>(
        &mut self,
        parent: TaskId,
        store: &mut PriorityStore<P>,
        graph: &mut CausalGraph<P>,
        is_resolved: F,
    ) -> Propagation<P>
    where
        P: Priority,
        F: Fn(TaskId) -> bool,
    {
        let mut report = Propagation::none(parent);

        for (child, weight) in graph.edges_from(parent) {
            let Some(from) = store.priority_of(child) else {
                assert!(
                    is_resolved(child),
                    "causal child {child} of {parent} is neither pending nor resolved"
                );
                report.skipped += 1;
                continue;
            };

            // a child already at the floor still moves to the back of its bucket
            let to = from.released_by(weight);
            store.rekey(child, to);
            tracing::debug!(%parent, %child, %from, %to, %weight, "released dependent");
            report.adjustments.push(Adjustment {
                task_id: child,
                from,
                to,
                weight,
            });
        }

        report.edges_consumed = graph.remove_edges_from(parent);
        self.resolutions += 1;
        self.adjustments += report.adjustments.len() as u64;
        report
    }

    /// Pops that went through the engine.
    pub fn resolutions(&self) -> u64 {
        self.resolutions
    }

    /// Children re-keyed across all resolutions.
    pub fn adjustments(&self) -> u64 {
        self.adjustments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        store: PriorityStore<i64>,
        graph: CausalGraph<i64>,
        resolved: Vec<TaskId>,
        engine: PropagationEngine,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: PriorityStore::new(),
                graph: CausalGraph::new(),
                resolved: Vec::new(),
                engine: PropagationEngine::new(),
            }
        }

        fn pop(&mut self) -> (TaskId, i64, Propagation<i64>) {
            let (id, priority) = self.store.extract_min().unwrap();
            self.resolved.push(id);
            let resolved = &self.resolved;
            let report = self.engine.on_resolve(
                id,
                &mut self.store,
                &mut self.graph,
                |child| resolved.contains(&child),
            );
            (id, priority, report)
        }
    }

    fn id(n: u64) -> TaskId {
        TaskId::new(n)
    }

    #[test]
    fn releases_direct_children_by_edge_weight() {
        let mut fx = Fixture::new();
        fx.store.insert(id(1), 5);
        fx.store.insert(id(2), 10);
        fx.store.insert(id(3), 20);
        fx.graph.link(id(1), id(2), 3, None).unwrap();
        fx.graph.link(id(1), id(3), 4, None).unwrap();

        let (popped, _, report) = fx.pop();

        assert_eq!(popped, id(1));
        assert_eq!(fx.store.priority_of(id(2)), Some(7));
        assert_eq!(fx.store.priority_of(id(3)), Some(16));
        assert_eq!(report.adjustments.len(), 2);
        assert_eq!(report.edges_consumed, 2);
        assert!(fx.graph.is_empty());
    }

    #[test]
    fn release_is_floored_at_zero() {
        let mut fx = Fixture::new();
        fx.store.insert(id(1), 1);
        fx.store.insert(id(2), 2);
        fx.graph.link(id(1), id(2), 10, None).unwrap();

        fx.pop();
        assert_eq!(fx.store.priority_of(id(2)), Some(0));
    }

    #[test]
    fn resolved_children_are_skipped() {
        let mut fx = Fixture::new();
        // child is more urgent than its cause and leaves first
        fx.store.insert(id(1), 9);
        fx.store.insert(id(2), 1);
        fx.graph.link(id(1), id(2), 3, None).unwrap();

        let (first, _, _) = fx.pop();
        assert_eq!(first, id(2));

        let (second, _, report) = fx.pop();
        assert_eq!(second, id(1));
        assert!(report.is_empty());
        assert_eq!(report.skipped, 1);
        assert_eq!(report.edges_consumed, 1);
    }

    #[test]
    fn propagation_is_not_transitive() {
        let mut fx = Fixture::new();
        fx.store.insert(id(1), 1);
        fx.store.insert(id(2), 10);
        fx.store.insert(id(3), 10);
        fx.graph.link(id(1), id(2), 2, None).unwrap();
        fx.graph.link(id(2), id(3), 2, None).unwrap();

        fx.pop();
        assert_eq!(fx.store.priority_of(id(2)), Some(8));
        assert_eq!(fx.store.priority_of(id(3)), Some(10));

        fx.pop();
        assert_eq!(fx.store.priority_of(id(3)), Some(8));
    }

    #[test]
    fn each_edge_fires_once() {
        let mut fx = Fixture::new();
        fx.store.insert(id(1), 1);
        fx.store.insert(id(2), 10);
        fx.graph.link(id(1), id(2), 2, None).unwrap();

        let (parent, _, _) = fx.pop();
        let resolved = &fx.resolved;
        let again = fx.engine.on_resolve(
            parent,
            &mut fx.store,
            &mut fx.graph,
            |child| resolved.contains(&child),
        );

        assert!(again.is_empty());
        assert_eq!(fx.store.priority_of(id(2)), Some(8));
        assert_eq!(fx.engine.resolutions(), 2);
        assert_eq!(fx.engine.adjustments(), 1);
    }

    #[test]
    fn children_at_floor_are_requeued_last() {
        let mut fx = Fixture::new();
        fx.store.insert(id(1), 0);
        fx.store.insert(id(2), 0);
        fx.store.insert(id(3), 0);
        fx.graph.link(id(1), id(2), 1, None).unwrap();

        let (_, _, report) = fx.pop();
        assert_eq!(report.skipped, 0);
        assert_eq!(report.adjustments[0].from, 0);
        assert_eq!(report.adjustments[0].to, 0);
        assert_eq!(fx.store.extract_min().unwrap().0, id(3));
        assert_eq!(fx.store.extract_min().unwrap().0, id(2));
    }

    #[test]
    fn negative_children_are_lifted_to_the_floor() {
        let mut fx = Fixture::new();
        fx.store.insert(id(1), -10);
        fx.store.insert(id(2), -3);
        fx.graph.link(id(1), id(2), 1, None).unwrap();

        fx.pop();
        assert_eq!(fx.store.priority_of(id(2)), Some(0));
    }

    #[test]
    #[should_panic(expected = "neither pending nor resolved")]
    fn dangling_child_is_fatal() {
        let mut fx = Fixture::new();
        fx.store.insert(id(1), 1);
        fx.graph.link(id(1), id(2), 1, None).unwrap();

        fx.pop();
    }
}
