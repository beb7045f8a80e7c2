use std::collections::HashMap;
use std::io::Write;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::models::AggregatedEdge;

pub const RANKING_HEADERS: [&str; 4] = [
    "Department",
    "Influence Score",
    "Outreach Score",
    "Shared Courses In",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRanking {
    pub department: String,
    /// In-degree centrality.
    pub influence: f64,
    /// Out-degree centrality.
    pub outreach: f64,
    pub shared_courses_in: usize,
}

/// Directed department network built from aggregated edges.
pub struct DepartmentGraph {
    graph: DiGraph<String, usize>,
    node_map: HashMap<String, NodeIndex>,
}

impl DepartmentGraph {
    /// Nodes are added in edge order, source before target.
    pub fn from_edges(edges: &[AggregatedEdge]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        let get_or_insert = |map: &mut HashMap<String, NodeIndex>,
                             g: &mut DiGraph<String, usize>,
                             name: &str|
         -> NodeIndex {
            *map.entry(name.to_string())
                .or_insert_with(|| g.add_node(name.to_string()))
        };

        for edge in edges {
            let src = get_or_insert(&mut node_map, &mut graph, &edge.department);
            let dst = get_or_insert(&mut node_map, &mut graph, &edge.related_department);
            graph.add_edge(src, dst, edge.count);
        }

        Self { graph, node_map }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains(&self, department: &str) -> bool {
        self.node_map.contains_key(department)
    }

    /// Degree counts normalized by `n - 1`; every node scores 1.0 in a graph of one.
    fn centrality(&self, node: NodeIndex, direction: Direction) -> f64 {
        let n = self.graph.node_count();
        if n <= 1 {
            return 1.0;
        }
        let degree = self.graph.edges_directed(node, direction).count();
        degree as f64 / (n - 1) as f64
    }

    /// Rankings sorted by influence, highest first; ties keep node order.
    pub fn rankings(&self) -> Vec<DepartmentRanking> {
        let mut rankings: Vec<DepartmentRanking> = self
            .graph
            .node_indices()
            .map(|node| DepartmentRanking {
                department: self.graph[node].clone(),
                influence: self.centrality(node, Direction::Incoming),
                outreach: self.centrality(node, Direction::Outgoing),
                shared_courses_in: self
                    .graph
                    .edges_directed(node, Direction::Incoming)
                    .map(|edge| *edge.weight())
                    .sum(),
            })
            .collect();

        rankings.sort_by(|a, b| b.influence.total_cmp(&a.influence));
        rankings
    }
}

pub fn rank_departments(edges: &[AggregatedEdge]) -> Vec<DepartmentRanking> {
    DepartmentGraph::from_edges(edges).rankings()
}

/// Writes the ranking table as CSV with fixed six-decimal scores.
pub fn write_rankings_csv<W: Write>(rankings: &[DepartmentRanking], writer: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(RANKING_HEADERS)?;
    for ranking in rankings {
        let influence = format!("{:.6}", ranking.influence);
        let outreach = format!("{:.6}", ranking.outreach);
        let shared = ranking.shared_courses_in.to_string();
        writer.write_record([&ranking.department, &influence, &outreach, &shared])?;
    }
    writer.flush()?;
    Ok(())
}
