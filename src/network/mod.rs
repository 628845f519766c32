mod graph;
mod load;
mod parse;

pub use graph::{Affiliations, EdgeRecord, NetworkGraph, NodeKind, NodeRecord};
pub use load::{LoadError, load_network, parse_network};

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{NetworkGraph, parse_network};

    /// Musician `m` (violin) linked to orchestra `o` and school `s`; musician
    /// `n` (cello) linked only to school `j` ("Juilliard").
    pub(crate) fn sample() -> NetworkGraph {
        parse_network(
            r#"{
                "nodes": [
                    {"id": "m", "label": "Maria Lopez", "type": "musician", "instrument": ["violin"]},
                    {"id": "o", "label": "Chicago Symphony Orchestra", "type": "orchestra"},
                    {"id": "s", "label": "Northwestern University", "type": "school"},
                    {"id": "n", "label": "Nikolai Petrov", "type": "musician", "instrument": "cello"},
                    {"id": "j", "label": "Juilliard", "type": "school"}
                ],
                "edges": [
                    {"source": "m", "target": "o", "type": "member"},
                    {"source": "s", "target": "m", "type": "alumni"},
                    {"source": "n", "target": "j", "type": "alumni"}
                ]
            }"#,
        )
        .expect("sample network parses")
    }

    /// A denser network with multi-instrument musicians, shared
    /// organizations and a colleague link between musicians.
    pub(crate) fn ensemble() -> NetworkGraph {
        parse_network(
            r#"{
                "nodes": [
                    {"id": "ana", "label": "Ana Ruiz", "type": "musician", "instrument": ["violin", "viola"]},
                    {"id": "ben", "label": "Ben Okafor", "type": "musician", "instrument": "violin"},
                    {"id": "cai", "label": "Cai Wen", "type": "musician", "instrument": ["cello"]},
                    {"id": "dee", "label": "Dee Marsh", "type": "musician", "instrument": ["viola", "cello"]},
                    {"id": "eli", "label": "Eli Stone", "type": "musician", "instrument": "flute"},
                    {"id": "cso", "label": "Chicago Symphony Orchestra", "type": "orchestra"},
                    {"id": "bso", "label": "Boston Symphony Orchestra", "type": "orchestra"},
                    {"id": "nu", "label": "Northwestern University", "type": "school"},
                    {"id": "jui", "label": "Juilliard", "type": "school"},
                    {"id": "nec", "label": "New England Conservatory", "type": "school"}
                ],
                "edges": [
                    {"source": "ana", "target": "cso", "type": "member"},
                    {"source": "ana", "target": "nu", "type": "alumni"},
                    {"source": "ben", "target": "cso", "type": "member"},
                    {"source": "ben", "target": "jui", "type": "alumni"},
                    {"source": "cai", "target": "bso", "type": "member"},
                    {"source": "cai", "target": "nu", "type": "alumni"},
                    {"source": "dee", "target": "bso", "type": "member"},
                    {"source": "dee", "target": "jui", "type": "alumni"},
                    {"source": "eli", "target": "nec", "type": "alumni"},
                    {"source": "ana", "target": "ben", "type": "colleague"}
                ]
            }"#,
        )
        .expect("ensemble network parses")
    }
}
