use serde::Deserialize;

use super::graph::NodeKind;
use super::load::LoadError;

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawInstrument {
    One(String),
    Many(Vec<String>),
}

impl RawInstrument {
    pub(super) fn into_list(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawNode {
    pub(super) id: String,
    #[serde(default)]
    pub(super) label: Option<String>,
    #[serde(rename = "type")]
    pub(super) kind: NodeKind,
    #[serde(default)]
    pub(super) instrument: Option<RawInstrument>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawEdge {
    pub(super) source: String,
    pub(super) target: String,
    #[serde(default, rename = "type")]
    pub(super) relation: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawNetwork {
    #[serde(default)]
    pub(super) nodes: Vec<RawNode>,
    #[serde(default)]
    pub(super) edges: Vec<RawEdge>,
}

pub(super) fn parse_network_document(raw: &str) -> Result<RawNetwork, LoadError> {
    serde_json::from_str(raw).map_err(LoadError::Parse)
}
