//! The typed vertex/edge container backing a function's flowchart.
//!
//! Implemented as an index-based arena — two `Vec`s plus a side map —
//! rather than an owning/pointer-rich graph: the `remove_edge`/`add_edge`
//! churn the flowchart builder performs on `switch` handling is simplest
//! against stable integer handles.

pub mod builder;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A vertex handle. Unique within a graph, monotonically assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u64);

/// The four vertex kinds a flowchart can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexKind {
    Condition,
    Process,
    LoopOpen,
    LoopClose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub kind: VertexKind,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub text: Option<String>,
}

/// A `(label, contents)` pair recorded for every non-trivial vertex the
/// builder creates, keyed by vertex id — the graph's "operator table".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorDescriptor {
    pub label: String,
    pub contents: String,
}

/// A directed multigraph of [`Vertex`]/[`Edge`] plus its operator table.
/// One `Graph` is built per function body; the id counter is per-graph,
/// so graphs built in parallel for different functions never collide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    #[serde(skip)]
    next_id: u64,
    operator_table: HashMap<u64, OperatorDescriptor>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, kind: VertexKind, label: impl Into<String>) -> VertexId {
        let id = VertexId(self.next_id);
        self.next_id += 1;
        self.vertices.push(Vertex {
            id,
            kind,
            label: label.into(),
        });
        id
    }

    pub fn add_condition(&mut self, label: impl Into<String>) -> VertexId {
        self.alloc(VertexKind::Condition, label)
    }

    pub fn add_process(&mut self, label: impl Into<String>) -> VertexId {
        self.alloc(VertexKind::Process, label)
    }

    pub fn add_loop_open(&mut self, label: impl Into<String>) -> VertexId {
        self.alloc(VertexKind::LoopOpen, label)
    }

    pub fn add_loop_close(&mut self, label: impl Into<String>) -> VertexId {
        self.alloc(VertexKind::LoopClose, label)
    }

    /// Adds a new, unlabeled edge and returns its index among `self.edges`
    /// for callers that want to set `text` immediately.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> usize {
        self.edges.push(Edge {
            from,
            to,
            text: None,
        });
        self.edges.len() - 1
    }

    pub fn add_labeled_edge(&mut self, from: VertexId, to: VertexId, text: impl Into<String>) {
        let idx = self.add_edge(from, to);
        self.edges[idx].text = Some(text.into());
    }

    pub fn set_edge_text(&mut self, idx: usize, text: impl Into<String>) {
        self.edges[idx].text = Some(text.into());
    }

    /// Removes the most-recently-added parallel edge matching `(from, to)`.
    /// A no-op if no such edge exists.
    pub fn remove_edge(&mut self, from: VertexId, to: VertexId) {
        if let Some(pos) = self
            .edges
            .iter()
            .rposition(|e| e.from == from && e.to == to)
        {
            self.edges.remove(pos);
        }
    }

    pub fn record_operator(&mut self, id: VertexId, label: impl Into<String>, contents: impl Into<String>) {
        self.operator_table.insert(
            id.0,
            OperatorDescriptor {
                label: label.into(),
                contents: contents.into(),
            },
        );
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn operator_table(&self) -> &HashMap<u64, OperatorDescriptor> {
        &self.operator_table
    }

    pub fn out_degree(&self, id: VertexId) -> usize {
        self.edges.iter().filter(|e| e.from == id).count()
    }

    pub fn edges_from(&self, id: VertexId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.from == id).collect()
    }

    /// True if every vertex has at least one outgoing edge, except `end`
    /// and `on_return`, which are sinks by construction.
    pub fn all_non_sinks_have_outgoing_edges(&self, sinks: &[VertexId]) -> bool {
        self.vertices
            .iter()
            .filter(|v| !sinks.contains(&v.id))
            .all(|v| self.out_degree(v.id) > 0)
    }
}
