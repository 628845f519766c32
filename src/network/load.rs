use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::graph::{EdgeRecord, NetworkGraph, NodeKind, NodeRecord};
use super::parse::parse_network_document;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read network data from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid network JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("duplicate node id {0:?}")]
    DuplicateNode(String),
    #[error("edge {from:?} -> {to:?} references an unknown node")]
    DanglingEdge { from: String, to: String },
}

pub fn load_network(path: &Path) -> Result<NetworkGraph, LoadError> {
    info!(path = %path.display(), "loading network data");
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let graph = parse_network(&raw)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "network data loaded"
    );
    Ok(graph)
}

pub fn parse_network(raw: &str) -> Result<NetworkGraph, LoadError> {
    let document = parse_network_document(raw)?;

    let mut nodes = Vec::with_capacity(document.nodes.len());
    let mut index_by_id = HashMap::with_capacity(document.nodes.len());

    for raw_node in document.nodes {
        if index_by_id.contains_key(&raw_node.id) {
            return Err(LoadError::DuplicateNode(raw_node.id));
        }

        let instruments = match (raw_node.kind, raw_node.instrument) {
            (NodeKind::Musician, Some(instrument)) => {
                let mut values = instrument.into_list();
                values.retain(|value| !value.is_empty());
                values
            }
            _ => Vec::new(),
        };
        let label = raw_node.label.unwrap_or_else(|| raw_node.id.clone());

        index_by_id.insert(raw_node.id.clone(), nodes.len());
        nodes.push(NodeRecord {
            id: raw_node.id,
            label,
            kind: raw_node.kind,
            instruments,
        });
    }

    let mut edges = Vec::with_capacity(document.edges.len());
    for raw_edge in document.edges {
        let (Some(&source), Some(&target)) = (
            index_by_id.get(&raw_edge.source),
            index_by_id.get(&raw_edge.target),
        ) else {
            return Err(LoadError::DanglingEdge {
                from: raw_edge.source,
                to: raw_edge.target,
            });
        };

        edges.push(EdgeRecord {
            source,
            target,
            relation: raw_edge.relation,
        });
    }

    debug!(nodes = nodes.len(), edges = edges.len(), "network document parsed");
    Ok(NetworkGraph::assemble(nodes, index_by_id, edges))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn single_and_list_instruments_are_normalized() {
        let graph = parse_network(
            r#"{
                "nodes": [
                    {"id": "a", "label": "A", "type": "musician", "instrument": "cello"},
                    {"id": "b", "label": "B", "type": "musician", "instrument": ["violin", "viola"]},
                    {"id": "c", "label": "C", "type": "orchestra", "instrument": "ignored"}
                ],
                "edges": []
            }"#,
        )
        .unwrap();

        assert_eq!(graph.nodes()[0].instruments, vec!["cello"]);
        assert_eq!(graph.nodes()[1].instruments, vec!["violin", "viola"]);
        assert!(graph.nodes()[2].instruments.is_empty());
    }

    #[test]
    fn missing_label_falls_back_to_id() {
        let graph =
            parse_network(r#"{"nodes": [{"id": "x", "type": "school"}], "edges": []}"#).unwrap();
        assert_eq!(graph.nodes()[0].label, "x");
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let error = parse_network(
            r#"{
                "nodes": [{"id": "a", "label": "A", "type": "musician"}],
                "edges": [{"source": "a", "target": "ghost", "type": "member"}]
            }"#,
        )
        .unwrap_err();

        assert!(matches!(error, LoadError::DanglingEdge { ref to, .. } if to == "ghost"));
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let error = parse_network(
            r#"{
                "nodes": [
                    {"id": "a", "label": "A", "type": "musician"},
                    {"id": "a", "label": "A again", "type": "school"}
                ],
                "edges": []
            }"#,
        )
        .unwrap_err();

        assert!(matches!(error, LoadError::DuplicateNode(ref id) if id == "a"));
    }

    #[test]
    fn unknown_node_type_is_a_parse_error() {
        let error =
            parse_network(r#"{"nodes": [{"id": "a", "type": "venue"}], "edges": []}"#).unwrap_err();
        assert!(matches!(error, LoadError::Parse(_)));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"nodes": [{{"id": "a", "label": "A", "type": "musician"}}, {{"id": "o", "label": "O", "type": "orchestra"}}],
                "edges": [{{"source": "a", "target": "o", "type": "member"}}]}}"#
        )
        .unwrap();

        let graph = load_network(file.path()).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].relation, "member");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let directory = tempfile::tempdir().unwrap();
        let error = load_network(&directory.path().join("absent.json")).unwrap_err();
        assert!(matches!(error, LoadError::Read { .. }));
    }
}
