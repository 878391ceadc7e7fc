//! Way-point graph built from externally generated topology.
//! This module exists so adjacency queries stay cheap enough to run every simulation tick.
//! It does not generate layouts or know anything about agents.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{GraphError, NodeId, Vec3};

/// Raw generator output: node positions indexed by id, plus undirected edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub positions: Vec<Vec3>,
    pub edges: Vec<(usize, usize)>,
}

#[derive(Clone, Debug)]
pub struct Graph {
    positions: Vec<Vec3>,
    adjacency: Vec<BTreeSet<NodeId>>,
    edge_count: usize,
}

impl Graph {
    pub fn build(topology: &Topology) -> Result<Self, GraphError> {
        let node_count = topology.positions.len();
        if let Some(index) = topology.positions.iter().position(|pos| !pos.is_finite()) {
            return Err(GraphError::InvalidTopology {
                reason: format!("node {index} has a non-finite position"),
            });
        }

        let mut adjacency = vec![BTreeSet::new(); node_count];
        let mut edge_count = 0;
        for &(a, b) in &topology.edges {
            if a >= node_count || b >= node_count {
                return Err(GraphError::InvalidTopology {
                    reason: format!("edge ({a}, {b}) references a node outside 0..{node_count}"),
                });
            }
            if a == b {
                return Err(GraphError::InvalidTopology {
                    reason: format!("edge ({a}, {b}) is a self loop"),
                });
            }
            if adjacency[a].insert(NodeId(b)) {
                adjacency[b].insert(NodeId(a));
                edge_count += 1;
            }
        }

        Ok(Self { positions: topology.positions.clone(), adjacency, edge_count })
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.positions.len()).map(NodeId)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.positions.len()
    }

    pub fn position(&self, node: NodeId) -> Result<Vec3, GraphError> {
        self.positions.get(node.index()).copied().ok_or(GraphError::UnknownNode(node))
    }

    /// Direct adjacency only; reachability is the path finder's job.
    pub fn is_connected(&self, a: NodeId, b: NodeId) -> Result<bool, GraphError> {
        let neighbors = self.adjacent(a)?;
        if !self.contains(b) {
            return Err(GraphError::UnknownNode(b));
        }
        Ok(neighbors.contains(&b))
    }

    /// Snapshot of the direct neighbors of `node`. Callers must not rely on the order.
    pub fn neighbors(&self, node: NodeId) -> Result<Vec<NodeId>, GraphError> {
        Ok(self.adjacent(node)?.iter().copied().collect())
    }

    pub fn degree(&self, node: NodeId) -> Result<usize, GraphError> {
        Ok(self.adjacent(node)?.len())
    }

    pub(crate) fn adjacent(&self, node: NodeId) -> Result<&BTreeSet<NodeId>, GraphError> {
        self.adjacency.get(node.index()).ok_or(GraphError::UnknownNode(node))
    }
}
