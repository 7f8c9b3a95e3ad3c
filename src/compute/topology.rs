use std::collections::BTreeSet;
use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use tracing::warn;

// A node in a compute graph.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
struct ActorNode {
    pub name: String,
    pub inbound: BTreeSet<String>,
    pub outbound: BTreeSet<String>,
}

// Connection between two actors.
struct Connection {
    pub outbound_channel: String,
    pub inbound_channel: String,
}

type NodeIndex = petgraph::stable_graph::NodeIndex<u32>;

pub(crate) struct Topology {
    graph: StableDiGraph<ActorNode, Connection, u32>,
    node_idx_from_name: HashMap<String, NodeIndex>,
}

impl Topology {
    pub(crate) fn new() -> Self {
        Topology {
            graph: StableDiGraph::new(),
            node_idx_from_name: HashMap::new(),
        }
    }

    pub(crate) fn add_new_unique_name(&mut self, name_hint: String) -> String {
        let node_idx = self.graph.add_node(ActorNode {
            name: name_hint.clone(),
            inbound: BTreeSet::new(),
            outbound: BTreeSet::new(),
        });

        let mut count = 0;
        let mut unique_name;
        loop {
            unique_name = format!("{}_{}", name_hint, count);
            if !self.node_idx_from_name.contains_key(&unique_name) {
                self.node_idx_from_name.insert(unique_name.clone(), node_idx);
                break;
            }
            count += 1;
        }

        self.graph[node_idx].name = unique_name.clone();
        unique_name
    }

    fn node_mut(&mut self, actor_name: &str) -> &mut ActorNode {
        match self.node_idx_from_name.get(actor_name) {
            Some(idx) => &mut self.graph[*idx],
            None => panic!("oh no, unknown actor {}", actor_name),
        }
    }

    pub(crate) fn assert_unique_inbound_name(&mut self, unique_inbound_name: String, actor_name: &str) {
        if !self.node_mut(actor_name).inbound.insert(unique_inbound_name.clone()) {
            panic!(
                "oh no, inbound name {} for {} already exists",
                unique_inbound_name, actor_name
            );
        }
    }

    pub(crate) fn assert_unique_outbound_name(
        &mut self,
        unique_outbound_name: String,
        actor_name: &str,
    ) {
        if !self.node_mut(actor_name).outbound.insert(unique_outbound_name.clone()) {
            panic!(
                "oh no, outbound name {} for {} already exists",
                unique_outbound_name, actor_name
            );
        }
    }

    pub(crate) fn connect(
        &mut self,
        actor_of_outbound_channel: &str,
        outbound_channel: &str,
        actor_of_inbound_channel: &str,
        inbound_channel: &str,
    ) {
        let (Some(from), Some(to)) = (
            self.node_idx_from_name.get(actor_of_outbound_channel).copied(),
            self.node_idx_from_name.get(actor_of_inbound_channel).copied(),
        ) else {
            panic!(
                "oh no, cannot connect unknown actors {} and {}",
                actor_of_outbound_channel, actor_of_inbound_channel
            );
        };
        assert_ne!(
            from, to,
            "oh no, outbound and inbound have same parent {}",
            actor_of_outbound_channel
        );
        self.graph.add_edge(
            from,
            to,
            Connection {
                outbound_channel: outbound_channel.to_owned(),
                inbound_channel: inbound_channel.to_owned(),
            },
        );
    }

    pub(crate) fn analyze_graph_topology(&self) {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            warn!("compute graph is cyclic, messages may circulate forever");
        }
    }

    /// Actor names, upstream before downstream (insertion order for cyclic graphs).
    pub(crate) fn shutdown_order(&self) -> Vec<String> {
        self.ordered_nodes()
            .into_iter()
            .map(|node_idx| self.graph[node_idx].name.clone())
            .collect()
    }

    fn ordered_nodes(&self) -> Vec<NodeIndex> {
        match toposort(&self.graph, None) {
            Ok(order) => order,
            Err(_) => self.graph.node_indices().collect(),
        }
    }

    /// Actors in topological order (insertion order for cyclic graphs), each followed by its
    /// outgoing connections.
    pub(crate) fn flow_graph(&self) -> String {
        let mut out = String::new();
        for node_idx in self.ordered_nodes() {
            let node = &self.graph[node_idx];
            out.push_str(&format!(
                "* {} * in: [{}] out: [{}]\n",
                node.name,
                node.inbound.iter().cloned().collect::<Vec<_>>().join(", "),
                node.outbound.iter().cloned().collect::<Vec<_>>().join(", "),
            ));
            let mut edges: Vec<String> = self
                .graph
                .edges_directed(node_idx, petgraph::Direction::Outgoing)
                .map(|edge| {
                    format!(
                        "    {} -> {}.{}\n",
                        edge.weight().outbound_channel,
                        self.graph[edge.target()].name,
                        edge.weight().inbound_channel
                    )
                })
                .collect();
            edges.sort();
            for edge in edges {
                out.push_str(&edge);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_made_unique() {
        let mut topology = Topology::new();
        assert_eq!(topology.add_new_unique_name("Sim".to_owned()), "Sim_0");
        assert_eq!(topology.add_new_unique_name("Sim".to_owned()), "Sim_1");
        assert_eq!(topology.add_new_unique_name("Filter".to_owned()), "Filter_0");
    }

    #[test]
    fn flow_graph_lists_connections_in_order() {
        let mut topology = Topology::new();
        let filter = topology.add_new_unique_name("Filter".to_owned());
        let sim = topology.add_new_unique_name("Sim".to_owned());
        topology.assert_unique_outbound_name("observation".to_owned(), &sim);
        topology.assert_unique_inbound_name("Observation".to_owned(), &filter);
        topology.connect(&sim, "observation", &filter, "Observation");
        topology.analyze_graph_topology();

        let graph = topology.flow_graph();
        let sim_pos = graph.find("* Sim_0 *").unwrap();
        let filter_pos = graph.find("* Filter_0 *").unwrap();
        assert!(sim_pos < filter_pos);
        assert!(graph.contains("observation -> Filter_0.Observation"));
    }

    #[test]
    fn shutdown_order_is_upstream_first() {
        let mut topology = Topology::new();
        let draw = topology.add_new_unique_name("Draw".to_owned());
        let filter = topology.add_new_unique_name("Filter".to_owned());
        let sim = topology.add_new_unique_name("Sim".to_owned());
        topology.assert_unique_outbound_name("observation".to_owned(), &sim);
        topology.assert_unique_outbound_name("true_robot".to_owned(), &sim);
        topology.assert_unique_outbound_name("estimate".to_owned(), &filter);
        topology.assert_unique_inbound_name("Observation".to_owned(), &filter);
        topology.assert_unique_inbound_name("TrueRobot".to_owned(), &draw);
        topology.assert_unique_inbound_name("Estimate".to_owned(), &draw);
        topology.connect(&sim, "observation", &filter, "Observation");
        topology.connect(&sim, "true_robot", &draw, "TrueRobot");
        topology.connect(&filter, "estimate", &draw, "Estimate");

        assert_eq!(topology.shutdown_order(), vec!["Sim_0", "Filter_0", "Draw_0"]);
    }

    #[test]
    #[should_panic]
    fn duplicate_inbound_name_panics() {
        let mut topology = Topology::new();
        let sim = topology.add_new_unique_name("Sim".to_owned());
        topology.assert_unique_inbound_name("TimeStamp".to_owned(), &sim);
        topology.assert_unique_inbound_name("TimeStamp".to_owned(), &sim);
    }
}
