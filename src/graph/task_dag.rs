use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};

pub struct TaskDag {
    pub graph: DiGraph<i32, ()>,
    pub id_to_index: HashMap<i32, NodeIndex>,
}

impl TaskDag {
    pub fn build(df: &DataFrame) -> Result<Self, PolarsError> {
        let ids_ca = df.column("id")?.i32()?;
        let deps_lc = df.column("dependencies")?.list()?;

        let mut graph: DiGraph<i32, ()> = DiGraph::new();
        let mut id_to_index: HashMap<i32, NodeIndex> = HashMap::new();

        // Add nodes first
        for id_opt in ids_ca.into_iter() {
            if let Some(task_id) = id_opt {
                let node_ix = graph.add_node(task_id);
                id_to_index.insert(task_id, node_ix);
            }
        }

        // Add edges: task -> dependency, the direction traversal follows.
        // Edges naming ids absent from the frame are skipped.
        let ids_ca = df.column("id")?.i32()?;
        for (idx, id_opt) in ids_ca.into_iter().enumerate() {
            if let Some(task_id) = id_opt {
                if let Some(series) = deps_lc.get_as_series(idx) {
                    for dep_opt in series.i32()?.into_iter() {
                        if let Some(dep_id) = dep_opt {
                            if let (Some(&u), Some(&v)) =
                                (id_to_index.get(&task_id), id_to_index.get(&dep_id))
                            {
                                graph.add_edge(u, v, ());
                            }
                        }
                    }
                }
            }
        }

        Ok(Self { graph, id_to_index })
    }

    /// True when some depends-on path from `start_id` returns to a task
    /// already on the active path. Unknown ids never cycle.
    pub fn has_cycle(&self, start_id: i32) -> bool {
        let Some(&start) = self.id_to_index.get(&start_id) else {
            return false;
        };
        let mut on_stack = HashSet::new();
        let mut visited = HashSet::new();
        self.walk(start, &mut on_stack, &mut visited)
    }

    fn walk(
        &self,
        node: NodeIndex,
        on_stack: &mut HashSet<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        if on_stack.contains(&node) {
            return true;
        }
        if visited.contains(&node) {
            // Already proven acyclic from here.
            return false;
        }
        on_stack.insert(node);
        visited.insert(node);
        for next in self.graph.neighbors_directed(node, Direction::Outgoing) {
            if self.walk(next, on_stack, visited) {
                return true;
            }
        }
        on_stack.remove(&node);
        false
    }

    pub fn is_acyclic(&self) -> bool {
        toposort(&self.graph, None).is_ok()
    }
}
