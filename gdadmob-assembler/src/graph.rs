//! Task ordering with `depends_on`, `finalized_by` and `must_run_after`.
//!
//! # Planning
//!
//! 1. Start from the requested targets.
//! 2. Add every `depends_on` task transitively, and every finalizer of a
//!    scheduled task together with its own dependencies, until nothing new
//!    is added.
//! 3. Order the scheduled set so that each dependency precedes its
//!    dependent, each task precedes its finalizers, and `must_run_after`
//!    holds between tasks that are both scheduled.
//!
//! Ties are broken by registration order, so a plan is deterministic.

use std::collections::{BTreeSet, HashMap};

use crate::error::{AssemblerError, AssemblerResult};

#[derive(Debug, Clone, Default)]
struct TaskNode {
    depends_on: Vec<String>,
    finalized_by: Vec<String>,
    must_run_after: Vec<String>,
}

/// Builder for a task's relationships.
#[derive(Debug, Clone, Default)]
pub struct TaskSpec {
    node: TaskNode,
}

impl TaskSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depends_on(mut self, task: &str) -> Self {
        self.node.depends_on.push(task.to_string());
        self
    }

    pub fn finalized_by(mut self, task: &str) -> Self {
        self.node.finalized_by.push(task.to_string());
        self
    }

    pub fn must_run_after(mut self, task: &str) -> Self {
        self.node.must_run_after.push(task.to_string());
        self
    }
}

/// Directed graph of named tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    order: Vec<String>,
    nodes: HashMap<String, TaskNode>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a task.
    pub fn register(&mut self, name: &str, spec: TaskSpec) -> &mut Self {
        if !self.nodes.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.nodes.insert(name.to_string(), spec.node);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Registered task names in registration order.
    pub fn tasks(&self) -> &[String] {
        &self.order
    }

    /// Checks that every relationship names a registered task.
    pub fn validate(&self) -> AssemblerResult<()> {
        for name in &self.order {
            let node = &self.nodes[name];
            let references = node
                .depends_on
                .iter()
                .chain(&node.finalized_by)
                .chain(&node.must_run_after);
            for reference in references {
                if !self.nodes.contains_key(reference) {
                    return Err(AssemblerError::UnknownReference {
                        task: name.clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Computes the execution order for `targets`.
    pub fn plan<S: AsRef<str>>(&self, targets: &[S]) -> AssemblerResult<Vec<String>> {
        self.validate()?;

        let index: HashMap<&str, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut scheduled = vec![false; self.order.len()];
        let mut stack = Vec::new();
        for target in targets {
            let target = target.as_ref();
            let &i = index
                .get(target)
                .ok_or_else(|| AssemblerError::UnknownTask(target.to_string()))?;
            stack.push(i);
        }
        while let Some(i) = stack.pop() {
            if scheduled[i] {
                continue;
            }
            scheduled[i] = true;
            let node = &self.nodes[&self.order[i]];
            for next in node.depends_on.iter().chain(&node.finalized_by) {
                stack.push(index[next.as_str()]);
            }
        }

        // edges[a] holds every task that must come after a
        let mut edges: Vec<Vec<usize>> = vec![Vec::new(); self.order.len()];
        let mut in_degree = vec![0usize; self.order.len()];
        let mut add_edge = |before: usize, after: usize| {
            if scheduled[before] && scheduled[after] && !edges[before].contains(&after) {
                edges[before].push(after);
                in_degree[after] += 1;
            }
        };
        for (i, name) in self.order.iter().enumerate() {
            let node = &self.nodes[name];
            for dep in &node.depends_on {
                add_edge(index[dep.as_str()], i);
            }
            for fin in &node.finalized_by {
                add_edge(i, index[fin.as_str()]);
            }
            for prior in &node.must_run_after {
                add_edge(index[prior.as_str()], i);
            }
        }

        let mut ready: BTreeSet<usize> = (0..self.order.len())
            .filter(|&i| scheduled[i] && in_degree[i] == 0)
            .collect();
        let mut plan = Vec::new();
        while let Some(i) = ready.pop_first() {
            plan.push(self.order[i].clone());
            for &after in &edges[i] {
                in_degree[after] -= 1;
                if in_degree[after] == 0 {
                    ready.insert(after);
                }
            }
        }

        let total = scheduled.iter().filter(|s| **s).count();
        if plan.len() != total {
            let stuck = (0..self.order.len())
                .filter(|&i| scheduled[i] && in_degree[i] > 0)
                .map(|i| self.order[i].clone())
                .collect();
            return Err(AssemblerError::Cycle(stuck));
        }
        Ok(plan)
    }
}
