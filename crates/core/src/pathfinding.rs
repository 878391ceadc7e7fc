//! Breadth-first shortest-path tables and the player-anchored table cache.
//! This module exists so every pursuer chasing the same node shares one search result.
//! It does not decide fallback policy when a destination is unreachable.

use std::collections::{BTreeMap, VecDeque};

use tracing::trace;

use crate::graph::Graph;
use crate::types::{GraphError, NodeId, PathError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Entry {
    Source,
    Reached { predecessor: NodeId, hops: u32 },
    Unreachable,
}

/// Single-source result: for each destination, the node one hop closer to the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTable {
    source: NodeId,
    entries: Vec<Entry>,
}

impl PathTable {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// The source maps to itself.
    pub fn predecessor(&self, destination: NodeId) -> Result<NodeId, PathError> {
        match self.entry(destination)? {
            Entry::Source => Ok(self.source),
            Entry::Reached { predecessor, .. } => Ok(predecessor),
            Entry::Unreachable => Err(self.unreachable(destination)),
        }
    }

    pub fn hops(&self, destination: NodeId) -> Result<u32, PathError> {
        match self.entry(destination)? {
            Entry::Source => Ok(0),
            Entry::Reached { hops, .. } => Ok(hops),
            Entry::Unreachable => Err(self.unreachable(destination)),
        }
    }

    pub fn is_reachable(&self, destination: NodeId) -> bool {
        matches!(self.entry(destination), Ok(Entry::Source | Entry::Reached { .. }))
    }

    /// Full route from the source to `destination`, both ends included.
    pub fn route_to(&self, destination: NodeId) -> Result<Vec<NodeId>, PathError> {
        let mut route = vec![destination];
        let mut current = destination;
        while current != self.source {
            current = self.predecessor(current)?;
            route.push(current);
        }
        route.reverse();
        Ok(route)
    }

    /// Neighbor of `from` that lies one hop closer to the source, or `None` at the source.
    pub fn next_hop_toward_source(&self, from: NodeId) -> Result<Option<NodeId>, PathError> {
        if from == self.source {
            return Ok(None);
        }
        self.predecessor(from).map(Some)
    }

    fn entry(&self, destination: NodeId) -> Result<Entry, GraphError> {
        self.entries.get(destination.index()).copied().ok_or(GraphError::UnknownNode(destination))
    }

    fn unreachable(&self, destination: NodeId) -> PathError {
        PathError::Unreachable { origin: self.source, destination }
    }
}

/// Unit-cost search from `source`. Neighbors expand in ascending id order, so ties are stable.
pub fn shortest_paths(graph: &Graph, source: NodeId) -> Result<PathTable, GraphError> {
    if !graph.contains(source) {
        return Err(GraphError::UnknownNode(source));
    }

    let mut entries = vec![Entry::Unreachable; graph.node_count()];
    entries[source.index()] = Entry::Source;
    let mut queue = VecDeque::new();
    queue.push_back((source, 0u32));

    while let Some((current, hops)) = queue.pop_front() {
        for &neighbor in graph.adjacent(current)? {
            if entries[neighbor.index()] == Entry::Unreachable {
                entries[neighbor.index()] = Entry::Reached { predecessor: current, hops: hops + 1 };
                queue.push_back((neighbor, hops + 1));
            }
        }
    }

    Ok(PathTable { source, entries })
}

/// Tables keyed by source, valid only while the anchor (the player's node) stays put.
#[derive(Clone, Debug, Default)]
pub struct PathCache {
    anchor: Option<NodeId>,
    tables: BTreeMap<NodeId, PathTable>,
    computations: u64,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    /// Returns whether the anchor moved. Cached tables are dropped only when it did.
    pub fn set_anchor(&mut self, node: NodeId) -> bool {
        if self.anchor == Some(node) {
            return false;
        }
        self.anchor = Some(node);
        self.tables.clear();
        true
    }

    pub fn clear(&mut self) {
        self.anchor = None;
        self.tables.clear();
    }

    pub fn table(&mut self, graph: &Graph, source: NodeId) -> Result<&PathTable, GraphError> {
        if !self.tables.contains_key(&source) {
            let table = shortest_paths(graph, source)?;
            self.computations += 1;
            trace!(source = source.index(), computations = self.computations, "path table computed");
            self.tables.insert(source, table);
        }
        Ok(&self.tables[&source])
    }

    pub fn is_cached(&self, source: NodeId) -> bool {
        self.tables.contains_key(&source)
    }

    /// Total number of searches run since creation.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}
