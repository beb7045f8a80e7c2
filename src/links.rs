use crate::models::{AggregatedEdge, CourseLink};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Collapses raw course links into weighted edges, keeping those with `count >= min_weight`.
///
/// Edges come out in the order their department pair was first seen.
pub fn aggregate(course_links: &[CourseLink], min_weight: u32) -> Vec<AggregatedEdge> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut edges: Vec<AggregatedEdge> = Vec::new();

    for link in course_links {
        let key = (link.department.as_str(), link.related_department.as_str());
        match index.get(&key) {
            Some(&position) => edges[position].count += 1,
            None => {
                index.insert(key, edges.len());
                edges.push(AggregatedEdge {
                    department: link.department.clone(),
                    related_department: link.related_department.clone(),
                    count: 1,
                });
            }
        }
    }

    edges.retain(|edge| edge.count >= min_weight as usize);
    edges
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: usize,
}

/// Node labels plus index-based links, ready for a Sankey renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlowDiagram {
    pub nodes: Vec<String>,
    pub links: Vec<FlowLink>,
}

/// Builds the flow diagram for already filtered edges.
///
/// Nodes list every source department first, then every related department not
/// seen yet, each in first-seen order.
pub fn flow_diagram(edges: &[AggregatedEdge]) -> FlowDiagram {
    let mut nodes: Vec<String> = Vec::new();
    let mut mapping: HashMap<&str, usize> = HashMap::new();

    let names = edges
        .iter()
        .map(|edge| edge.department.as_str())
        .chain(edges.iter().map(|edge| edge.related_department.as_str()));
    for name in names {
        if !mapping.contains_key(name) {
            mapping.insert(name, nodes.len());
            nodes.push(name.to_string());
        }
    }

    let links = edges
        .iter()
        .map(|edge| FlowLink {
            source: mapping[edge.department.as_str()],
            target: mapping[edge.related_department.as_str()],
            value: edge.count,
        })
        .collect();

    FlowDiagram { nodes, links }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkStats {
    pub departments: usize,
    pub edges: usize,
    pub shared_courses: usize,
}

pub fn network_stats(edges: &[AggregatedEdge]) -> NetworkStats {
    let diagram = flow_diagram(edges);
    NetworkStats {
        departments: diagram.nodes.len(),
        edges: edges.len(),
        shared_courses: edges.iter().map(|edge| edge.count).sum(),
    }
}
