use cpq_core::{CausalPriorityQueue, QueueError, TaskId};
use proptest::prelude::*;
use proptest::sample::Index;

/// Straightforward model of the queue: linear scans, no indexes.
#[derive(Default)]
struct Model {
    /// (id, priority, ticket)
    pending: Vec<(u64, i64, u64)>,
    /// (parent, child, weight)
    edges: Vec<(u64, u64, i64)>,
    next_id: u64,
    next_ticket: u64,
}

impl Model {
    fn add(&mut self, priority: i64, cause: Option<u64>, weight: i64) -> Result<u64, ()> {
        let id = self.next_id + 1;
        if let Some(cause) = cause
            && !self.pending.iter().any(|(p, _, _)| *p == cause)
        {
            return Err(());
        }
        self.next_id = id;
        if let Some(cause) = cause {
            self.edges.push((cause, id, weight));
        }
        self.pending.push((id, priority, self.next_ticket));
        self.next_ticket += 1;
        Ok(id)
    }

    fn pop(&mut self) -> Option<(u64, i64)> {
        let pos = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, priority, ticket))| (*priority, *ticket))
            .map(|(pos, _)| pos)?;
        let (id, priority, _) = self.pending.remove(pos);

        let mut children: Vec<(u64, i64)> = self
            .edges
            .iter()
            .filter(|(parent, _, _)| *parent == id)
            .map(|(_, child, weight)| (*child, *weight))
            .collect();
        children.sort();
        for (child, weight) in children {
            if let Some(entry) = self.pending.iter_mut().find(|(p, _, _)| *p == child) {
                entry.1 = (entry.1 - weight).max(0);
                entry.2 = self.next_ticket;
                self.next_ticket += 1;
            }
        }
        self.edges.retain(|(parent, _, _)| *parent != id);
        Some((id, priority))
    }
}

#[derive(Debug, Clone)]
enum Op {
    Add {
        priority: i64,
        cause: Option<Index>,
        weight: i64,
    },
    Pop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-10i64..40, proptest::option::of(any::<Index>()), 1i64..8)
            .prop_map(|(priority, cause, weight)| Op::Add { priority, cause, weight }),
        1 => Just(Op::Pop),
    ]
}

proptest! {
    #[test]
    fn without_edges_pops_are_sorted_and_stable(priorities in prop::collection::vec(-20i64..20, 0..80)) {
        let mut queue: CausalPriorityQueue<usize> = CausalPriorityQueue::new();
        for (i, priority) in priorities.iter().enumerate() {
            queue.add_task(i, *priority).unwrap();
        }

        let popped: Vec<(usize, i64)> = queue.drain().collect();
        prop_assert_eq!(popped.len(), priorities.len());
        for pair in popped.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].1);
            if pair[0].1 == pair[1].1 {
                prop_assert!(pair[0].0 < pair[1].0);
            }
        }
        prop_assert_eq!(queue.pop_task(), Err(QueueError::EmptyQueue));
    }

    #[test]
    fn matches_model_under_interleaved_ops(ops in prop::collection::vec(op(), 0..120)) {
        let mut queue: CausalPriorityQueue<u64> = CausalPriorityQueue::new();
        let mut model = Model::default();
        let mut added: Vec<u64> = Vec::new();

        for op in ops {
            match op {
                Op::Add { priority, cause, weight } => {
                    let cause = cause
                        .filter(|_| !added.is_empty())
                        .map(|index| added[index.index(added.len())]);
                    let expected = model.add(priority, cause, weight);
                    let actual = queue.add_task_with(
                        model.next_id,
                        priority,
                        cause.map(TaskId::new),
                        weight,
                    );
                    match expected {
                        Ok(id) => {
                            prop_assert_eq!(actual, Ok(TaskId::new(id)));
                            added.push(id);
                        }
                        Err(()) => {
                            prop_assert!(matches!(actual, Err(QueueError::UnknownCause(_))));
                        }
                    }
                }
                Op::Pop => {
                    let expected = model.pop();
                    match queue.pop_task_entry() {
                        Ok(entry) => {
                            prop_assert_eq!(Some((entry.id.seq(), entry.priority)), expected);
                        }
                        Err(err) => {
                            prop_assert_eq!(err, QueueError::EmptyQueue);
                            prop_assert_eq!(expected, None);
                        }
                    }
                }
            }
            prop_assert_eq!(queue.len(), model.pending.len());
            prop_assert_eq!(queue.counts().live_edges, model.edges.len());
        }

        while let Some((id, priority)) = model.pop() {
            let entry = queue.pop_task_entry().unwrap();
            prop_assert_eq!((entry.id.seq(), entry.priority), (id, priority));
        }
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn resolution_releases_children_by_exact_weight(
        parent_priority in 0i64..5,
        children in prop::collection::vec((5i64..50, 1i64..60), 1..10),
    ) {
        let mut queue: CausalPriorityQueue<()> = CausalPriorityQueue::new();
        let parent = queue.add_task((), parent_priority).unwrap();
        let ids: Vec<_> = children
            .iter()
            .map(|(priority, weight)| {
                queue.add_task_with((), *priority, Some(parent), *weight).unwrap()
            })
            .collect();

        let entry = queue.pop_task_entry().unwrap();
        prop_assert_eq!(entry.id, parent);
        for (id, (priority, weight)) in ids.iter().zip(&children) {
            prop_assert_eq!(queue.priority_of(*id), Some((priority - weight).max(0)));
        }
    }
}
