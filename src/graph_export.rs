//! Graph export of the binding registry for diagnostics.
//!
//! The graph is derived from declared constructor plans and injection points
//! only; nothing is constructed. DOT output is always available, JSON output
//! requires the `graph-export` feature.

use std::collections::{HashMap, HashSet};

#[cfg(feature = "graph-export")]
use serde::{Deserialize, Serialize};

use crate::descriptors::CreationStrategy;
use crate::key::Key;
use crate::lifetime::{Eagerness, Lifetime};
use crate::registration::BindingRegistry;

/// A contract in the graph.
///
/// Parameters that name an unbound contract still get a node, with
/// `bound == false`, so missing bindings show up in the export.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphNode {
    /// Full type name of the contract
    pub id: String,
    /// Short display label
    pub label: String,
    pub bound: bool,
    pub implementation: Option<String>,
    pub strategy: Option<CreationStrategy>,
    pub lifetime: Option<Lifetime>,
    pub eagerness: Option<Eagerness>,
    pub initializable: bool,
    pub disposable: bool,
}

/// How a dependency is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub enum DependencyType {
    /// Constructor parameter at the given position
    Constructor { position: usize },
    /// Parameter of an injection method on a host-managed implementation
    Injection { method: String, position: usize },
}

/// A dependency edge: `from` needs `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub dependency_type: DependencyType,
}

/// Dependency graph of one registry.
///
/// # Examples
///
/// ```rust
/// use ferrous_bind::{key_of, BindingGraph, Container, Constructor, Injectable, Recipe};
/// use std::sync::Arc;
///
/// struct Config;
/// impl Injectable for Config {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(): ()| Ok(Config)).into()
///     }
/// }
///
/// struct Server { config: Arc<Config> }
/// impl Injectable for Server {
///     fn recipe() -> Recipe<Self> {
///         Constructor::new(|(config,): (Arc<Config>,)| Ok(Server { config })).into()
///     }
/// }
///
/// let mut container = Container::new();
/// container.bind_self::<Config>().unwrap().as_single().unwrap();
/// container.bind_self::<Server>().unwrap();
///
/// let graph = BindingGraph::from_registry(container.registry());
/// assert_eq!(graph.nodes.len(), 2);
/// assert_eq!(graph.edges.len(), 1);
/// let dot = graph.to_dot();
/// assert!(dot.contains(&format!("\"{}\" -> \"{}\"", key_of::<Server>(), key_of::<Config>())));
/// assert!(dot.contains("label=\"Server\\n(Transient)\""));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct BindingGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl BindingGraph {
    /// Builds the graph of every binding in registration order.
    pub fn from_registry(registry: &BindingRegistry) -> Self {
        let mut graph = BindingGraph::default();
        let mut seen: HashSet<Key> = HashSet::new();
        let mut unbound: Vec<Key> = Vec::new();

        for descriptor in registry.descriptors() {
            let contract = descriptor.contract();
            seen.insert(contract);
            graph.nodes.push(GraphNode {
                id: contract.display_name().to_string(),
                label: contract.short_name().to_string(),
                bound: true,
                implementation: descriptor.implementation().map(|k| k.display_name().to_string()),
                strategy: descriptor.strategy(),
                lifetime: Some(descriptor.lifetime()),
                eagerness: Some(descriptor.eagerness()),
                initializable: descriptor.is_initializable(),
                disposable: descriptor.is_disposable(),
            });

            let mut note_target = |target: Key| {
                if !registry.contains(&target) && !unbound.contains(&target) {
                    unbound.push(target);
                }
                target.display_name().to_string()
            };

            for (position, parameter) in descriptor.constructor_plan().iter().enumerate() {
                graph.edges.push(GraphEdge {
                    from: contract.display_name().to_string(),
                    to: note_target(*parameter),
                    dependency_type: DependencyType::Constructor { position },
                });
            }
            for (method, plan) in descriptor.injection_plan() {
                for (position, parameter) in plan.iter().enumerate() {
                    graph.edges.push(GraphEdge {
                        from: contract.display_name().to_string(),
                        to: note_target(*parameter),
                        dependency_type: DependencyType::Injection {
                            method: method.to_string(),
                            position,
                        },
                    });
                }
            }
        }

        for key in unbound.into_iter().filter(|k| !seen.contains(k)) {
            graph.nodes.push(GraphNode {
                id: key.display_name().to_string(),
                label: key.short_name().to_string(),
                bound: false,
                implementation: None,
                strategy: None,
                lifetime: None,
                eagerness: None,
                initializable: false,
                disposable: false,
            });
        }

        graph
    }

    /// Contracts referenced as dependencies but never bound.
    pub fn unbound(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|node| !node.bound)
    }

    /// First dependency cycle found among the declared plans, as a path of
    /// contract ids ending with the repeated one.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            adjacency.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
        }

        let mut done: HashSet<&str> = HashSet::new();
        for node in &self.nodes {
            let mut path = Vec::new();
            if let Some(cycle) = visit(node.id.as_str(), &adjacency, &mut path, &mut done) {
                return Some(cycle);
            }
        }
        None
    }

    /// Graphviz rendering: singletons are filled, unbound contracts dashed.
    ///
    /// Nodes are identified by the full contract id; the short name is only
    /// the displayed label.
    pub fn to_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("digraph Bindings {\n");
        output.push_str("  rankdir=TB;\n");
        output.push_str("  node [shape=box];\n\n");

        for node in &self.nodes {
            let style = match (node.bound, node.lifetime) {
                (false, _) => "dashed",
                (true, Some(Lifetime::Singleton)) => "filled",
                _ => "solid",
            };
            let mut details = Vec::new();
            if let Some(lifetime) = node.lifetime {
                details.push(format!("{:?}", lifetime));
            }
            if node.eagerness == Some(Eagerness::Eager) {
                details.push("eager".to_string());
            }
            if node.strategy == Some(CreationStrategy::ExternalProvider) {
                details.push("hosted".to_string());
            }
            output.push_str(&format!(
                "  \"{}\" [label=\"{}\\n({})\", style={}];\n",
                escape(&node.id),
                escape(&node.label),
                if details.is_empty() { "unbound".to_string() } else { details.join(", ") },
                style
            ));
        }

        output.push('\n');

        for edge in &self.edges {
            let attributes = match &edge.dependency_type {
                DependencyType::Constructor { .. } => "style=solid".to_string(),
                DependencyType::Injection { method, .. } => {
                    format!("style=dotted, label=\"{}\"", escape(method))
                }
            };
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [{}];\n",
                escape(&edge.from),
                escape(&edge.to),
                attributes
            ));
        }

        output.push_str("}\n");
        output
    }

    /// Pretty-printed JSON.
    #[cfg(feature = "graph-export")]
    pub fn to_json(&self) -> crate::DiResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|_| crate::DiError::TypeMismatch("JSON serialization failed"))
    }
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

fn visit<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    path: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Option<Vec<String>> {
    if let Some(start) = path.iter().position(|&n| n == node) {
        let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
        cycle.push(node.to_string());
        return Some(cycle);
    }
    if done.contains(node) {
        return None;
    }

    path.push(node);
    for &next in adjacency.get(node).map(Vec::as_slice).unwrap_or(&[]) {
        if let Some(cycle) = visit(next, adjacency, path, done) {
            return Some(cycle);
        }
    }
    path.pop();
    done.insert(node);
    None
}

impl crate::Container {
    /// Dependency graph of this container's bindings.
    pub fn binding_graph(&self) -> BindingGraph {
        BindingGraph::from_registry(self.registry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key_of;
    use crate::recipe::{Constructor, Injectable, Recipe};
    use std::sync::Arc;

    trait Clock: Send + Sync {}

    struct Ping;
    struct Pong;

    impl Injectable for Ping {
        fn recipe() -> Recipe<Self> {
            Constructor::new(|(_pong,): (Arc<Pong>,)| Ok(Ping)).into()
        }
    }

    impl Injectable for Pong {
        fn recipe() -> Recipe<Self> {
            Constructor::new(|(_ping, _clock): (Arc<Ping>, Arc<dyn Clock>)| Ok(Pong)).into()
        }
    }

    fn registry() -> BindingRegistry {
        let mut registry = BindingRegistry::new();
        registry.bind_self::<Ping>().unwrap();
        registry.bind_self::<Pong>().unwrap();
        registry
    }

    #[test]
    fn test_unbound_parameters_become_nodes() {
        let graph = BindingGraph::from_registry(&registry());

        let unbound: Vec<&GraphNode> = graph.unbound().collect();
        assert_eq!(unbound.len(), 1);
        assert_eq!(unbound[0].id, key_of::<dyn Clock>().display_name());
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(
            graph.edges[2].dependency_type,
            DependencyType::Constructor { position: 1 }
        );
    }

    #[test]
    fn test_static_cycle_is_found() {
        let graph = BindingGraph::from_registry(&registry());
        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 3);
    }

    #[test]
    fn test_dot_output_marks_unbound() {
        let dot = BindingGraph::from_registry(&registry()).to_dot();
        assert!(dot.starts_with("digraph Bindings {"));
        assert!(dot.contains(&format!(
            "\"{}\" -> \"{}\" [style=solid];",
            key_of::<Ping>(),
            key_of::<Pong>()
        )));
        assert!(dot.contains(&format!(
            "\"{}\" [label=\"Clock\\n(unbound)\", style=dashed];",
            key_of::<dyn Clock>()
        )));
    }

    mod storage {
        use crate::recipe::{Constructor, Injectable, Recipe};

        pub struct Config;

        impl Injectable for Config {
            fn recipe() -> Recipe<Self> {
                Constructor::new(|(): ()| Ok(Config)).into()
            }
        }
    }

    mod network {
        use crate::recipe::{Constructor, Injectable, Recipe};

        pub struct Config;

        impl Injectable for Config {
            fn recipe() -> Recipe<Self> {
                Constructor::new(|(): ()| Ok(Config)).into()
            }
        }
    }

    struct App;

    impl Injectable for App {
        fn recipe() -> Recipe<Self> {
            Constructor::new(|(_storage, _network): (Arc<storage::Config>, Arc<network::Config>)| {
                Ok(App)
            })
            .into()
        }
    }

    #[test]
    fn test_same_short_name_stays_two_nodes() {
        let mut registry = BindingRegistry::new();
        registry.bind_self::<storage::Config>().unwrap();
        registry.bind_self::<network::Config>().unwrap();
        registry.bind_self::<App>().unwrap();

        let dot = BindingGraph::from_registry(&registry).to_dot();
        assert_eq!(dot.matches("[label=\"Config\\n(Transient)\", style=solid];").count(), 2);
        for target in [key_of::<storage::Config>(), key_of::<network::Config>()] {
            assert!(dot.contains(&format!("\"{}\" -> \"{}\"", key_of::<App>(), target)));
        }
    }

    #[test]
    fn test_dot_ids_are_escaped() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[cfg(feature = "graph-export")]
    #[test]
    fn test_json_round_trip() {
        let graph = BindingGraph::from_registry(&registry());
        let json = graph.to_json().unwrap();
        let parsed: BindingGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, graph);
    }
}
