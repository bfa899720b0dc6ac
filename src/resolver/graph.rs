// src/resolver/graph.rs

//! Dependency graph data structures and algorithms
//!
//! Nodes are concrete package versions picked during one resolution. Edges
//! point from a node to a package *name* with a constraint; the edge's
//! target is whichever selected version of that name satisfies it. Edges
//! therefore survive when a dependency is re-selected.

use crate::package::PackageVersion;
use crate::version::{Version, VersionSpec};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Identity of a package version within a graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub name: String,
    pub version: Version,
}

impl NodeId {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn of(package: &PackageVersion) -> Self {
        Self::new(package.name(), package.version())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A node in the dependency graph representing a package version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
    pub id: NodeId,
    pub package: PackageVersion,
    /// Already present in the project
    pub installed: bool,
}

impl PackageNode {
    pub fn new(package: PackageVersion, installed: bool) -> Self {
        Self {
            id: NodeId::of(&package),
            package,
            installed,
        }
    }
}

/// A dependency edge with version constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub from: NodeId,
    pub to: String,
    pub constraint: VersionSpec,
}

/// Dependency graph for resolution and ordering
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Selected versions in selection order
    nodes: IndexMap<NodeId, PackageNode>,
    /// Outgoing dependencies of each node
    edges: HashMap<NodeId, Vec<DependencyEdge>>,
    /// Package name to the nodes that depend on it (reverse edges)
    reverse_edges: HashMap<String, Vec<NodeId>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package node to the graph
    pub fn add_node(&mut self, node: PackageNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Remove a node together with its outgoing edges
    pub fn remove_node(&mut self, id: &NodeId) -> Option<PackageNode> {
        let node = self.nodes.shift_remove(id)?;
        for edge in self.edges.remove(id).unwrap_or_default() {
            if let Some(requirers) = self.reverse_edges.get_mut(&edge.to) {
                requirers.retain(|r| r != id);
                if requirers.is_empty() {
                    self.reverse_edges.remove(&edge.to);
                }
            }
        }
        Some(node)
    }

    /// Add a dependency edge to the graph
    pub fn add_edge(&mut self, edge: DependencyEdge) {
        let requirers = self.reverse_edges.entry(edge.to.clone()).or_default();
        if !requirers.contains(&edge.from) {
            requirers.push(edge.from.clone());
        }
        let outgoing = self.edges.entry(edge.from.clone()).or_default();
        if !outgoing.contains(&edge) {
            outgoing.push(edge);
        }
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&PackageNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in selection order
    pub fn nodes(&self) -> impl Iterator<Item = &PackageNode> {
        self.nodes.values()
    }

    /// All selected versions of one package
    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PackageNode> + 'a {
        self.nodes.values().filter(move |node| node.id.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Outgoing dependencies of a node
    pub fn get_dependencies(&self, id: &NodeId) -> &[DependencyEdge] {
        self.edges.get(id).map(|v| v.as_slice()).unwrap_or_default()
    }

    /// Edges that point at a package name
    pub fn requirements_on(&self, name: &str) -> Vec<&DependencyEdge> {
        self.reverse_edges
            .get(name)
            .into_iter()
            .flatten()
            .flat_map(|from| self.get_dependencies(from))
            .filter(|edge| edge.to == name)
            .collect()
    }

    /// Newest selected version of `name` satisfying the constraint
    pub fn resolve_target(&self, name: &str, constraint: &VersionSpec) -> Option<&PackageNode> {
        self.nodes
            .values()
            .filter(|node| node.id.name == name && constraint.is_satisfied_by(&node.id.version))
            .max_by_key(|node| node.id.version)
    }

    /// Every node reachable from the roots
    pub fn reachable_from(&self, roots: &[NodeId]) -> HashSet<NodeId> {
        let mut seen = HashSet::new();
        let mut stack: Vec<NodeId> = roots.to_vec();

        while let Some(id) = stack.pop() {
            if !self.contains(&id) || !seen.insert(id.clone()) {
                continue;
            }
            for edge in self.get_dependencies(&id) {
                if let Some(target) = self.resolve_target(&edge.to, &edge.constraint) {
                    stack.push(target.id.clone());
                }
            }
        }

        seen
    }

    /// Drop every node not reachable from the roots
    pub fn retain_reachable(&mut self, roots: &[NodeId]) -> Vec<PackageNode> {
        let reachable = self.reachable_from(roots);
        let unreachable: Vec<NodeId> = self
            .nodes
            .keys()
            .filter(|id| !reachable.contains(*id))
            .cloned()
            .collect();

        unreachable
            .iter()
            .filter_map(|id| self.remove_node(id))
            .collect()
    }

    /// Order nodes so dependencies come before their dependents
    ///
    /// Depth-first post-order starting from each root in turn. A node that
    /// is already on the current path is skipped, so cycles are broken at
    /// the edge that closes them and every node appears exactly once.
    pub fn install_order(&self, roots: &[NodeId]) -> Vec<NodeId> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();

        for root in roots {
            self.dfs_post_order(root, &mut visited, &mut order);
        }

        order
    }

    fn dfs_post_order(&self, id: &NodeId, visited: &mut HashSet<NodeId>, order: &mut Vec<NodeId>) {
        if !self.contains(id) || !visited.insert(id.clone()) {
            return;
        }

        for edge in self.get_dependencies(id) {
            if let Some(target) = self.resolve_target(&edge.to, &edge.constraint) {
                self.dfs_post_order(&target.id, visited, order);
            }
        }

        order.push(id.clone());
    }

    /// Get statistics about the dependency graph
    pub fn stats(&self) -> GraphStats {
        let total_edges: usize = self.edges.values().map(|v| v.len()).sum();
        let max_dependencies = self.edges.values().map(|v| v.len()).max().unwrap_or(0);
        let max_dependents = self.reverse_edges.values().map(|v| v.len()).max().unwrap_or(0);

        GraphStats {
            total_packages: self.nodes.len(),
            total_dependencies: total_edges,
            max_dependencies,
            max_dependents,
        }
    }
}

/// Statistics about the dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_packages: usize,
    pub total_dependencies: usize,
    pub max_dependencies: usize,
    pub max_dependents: usize,
}
