use std::collections::HashSet;

use crate::network::NetworkGraph;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) enum Focus {
    #[default]
    None,
    Hovered(usize),
    Selected(usize),
}

/// Hover/sticky-selection state of the canvas.
///
/// Selection takes priority: pointer enter/leave are ignored while a node is
/// selected. `neighbors` always holds the one-hop neighbours of the focused
/// node and is empty when nothing is focused.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct FocusState {
    focus: Focus,
    neighbors: HashSet<usize>,
}

impl FocusState {
    pub(in crate::app) fn focus(&self) -> Focus {
        self.focus
    }

    pub(in crate::app) fn focused_node(&self) -> Option<usize> {
        match self.focus {
            Focus::None => None,
            Focus::Hovered(index) | Focus::Selected(index) => Some(index),
        }
    }

    pub(in crate::app) fn selected(&self) -> Option<usize> {
        match self.focus {
            Focus::Selected(index) => Some(index),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(in crate::app) fn neighbors(&self) -> &HashSet<usize> {
        &self.neighbors
    }

    /// The focused node or one of its neighbours.
    pub(in crate::app) fn is_highlighted(&self, index: usize) -> bool {
        self.focused_node() == Some(index) || self.neighbors.contains(&index)
    }

    fn enter(&mut self, graph: &NetworkGraph, focus: Focus, index: usize) {
        self.focus = focus;
        self.neighbors = graph.neighbors(index).iter().copied().collect();
    }

    pub(in crate::app) fn clear(&mut self) {
        self.focus = Focus::None;
        self.neighbors.clear();
    }

    pub(in crate::app) fn pointer_enter(&mut self, graph: &NetworkGraph, index: usize) {
        if matches!(self.focus, Focus::Selected(_)) {
            return;
        }
        self.enter(graph, Focus::Hovered(index), index);
    }

    pub(in crate::app) fn pointer_leave(&mut self) {
        if matches!(self.focus, Focus::Hovered(_)) {
            self.clear();
        }
    }

    pub(in crate::app) fn click_node(&mut self, graph: &NetworkGraph, index: usize) {
        if self.focus == Focus::Selected(index) {
            self.clear();
        } else {
            self.select(graph, index);
        }
    }

    pub(in crate::app) fn click_background(&mut self) {
        self.clear();
    }

    /// Sticky selection from outside the canvas (search results, pivots).
    pub(in crate::app) fn select(&mut self, graph: &NetworkGraph, index: usize) {
        self.enter(graph, Focus::Selected(index), index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::fixtures::sample;

    #[test]
    fn hover_then_leave_returns_to_none() {
        let graph = sample();
        let m = graph.index_of("m").unwrap();
        let mut state = FocusState::default();

        state.pointer_enter(&graph, m);
        assert_eq!(state.focus(), Focus::Hovered(m));
        assert_eq!(state.neighbors().len(), 2);

        state.pointer_leave();
        assert_eq!(state.focus(), Focus::None);
        assert!(state.neighbors().is_empty());
    }

    #[test]
    fn clicking_hovered_or_other_node_selects_it() {
        let graph = sample();
        let m = graph.index_of("m").unwrap();
        let n = graph.index_of("n").unwrap();
        let mut state = FocusState::default();

        state.pointer_enter(&graph, m);
        state.click_node(&graph, m);
        assert_eq!(state.focus(), Focus::Selected(m));

        let mut other = FocusState::default();
        other.pointer_enter(&graph, m);
        other.click_node(&graph, n);
        assert_eq!(other.focus(), Focus::Selected(n));
        assert_eq!(other.neighbors(), &HashSet::from([graph.index_of("j").unwrap()]));
    }

    #[test]
    fn hover_is_ignored_while_selected() {
        let graph = sample();
        let m = graph.index_of("m").unwrap();
        let n = graph.index_of("n").unwrap();
        let mut state = FocusState::default();

        state.click_node(&graph, m);
        state.pointer_enter(&graph, n);
        assert_eq!(state.focus(), Focus::Selected(m));

        state.pointer_leave();
        assert_eq!(state.focus(), Focus::Selected(m));
        assert!(state.is_highlighted(graph.index_of("o").unwrap()));
    }

    #[test]
    fn clicking_selected_node_toggles_off() {
        let graph = sample();
        let m = graph.index_of("m").unwrap();
        let mut state = FocusState::default();

        state.click_node(&graph, m);
        state.click_node(&graph, m);
        assert_eq!(state.focus(), Focus::None);
        assert!(state.neighbors().is_empty());
    }

    #[test]
    fn background_click_always_clears() {
        let graph = sample();
        let m = graph.index_of("m").unwrap();

        let mut states = vec![FocusState::default(), FocusState::default(), FocusState::default()];
        states[1].pointer_enter(&graph, m);
        states[2].click_node(&graph, m);

        for mut state in states {
            state.click_background();
            assert_eq!(state.focus(), Focus::None);
            assert!(state.neighbors().is_empty());
        }
    }

    #[test]
    fn clicking_different_node_moves_selection() {
        let graph = sample();
        let m = graph.index_of("m").unwrap();
        let o = graph.index_of("o").unwrap();
        let mut state = FocusState::default();

        state.click_node(&graph, m);
        state.click_node(&graph, o);
        assert_eq!(state.focus(), Focus::Selected(o));
        assert!(state.neighbors().contains(&m));
        assert_eq!(state.selected(), Some(o));
    }
}
