use eframe::egui::{self, RichText, Sense, Ui, vec2};

use crate::network::NodeKind;
use crate::query::{Combinator, PredicateId, PredicateKind, filter_options};

use super::super::render_utils::kind_color;
use super::super::{SidebarTab, ViewModel};

const MAX_LISTED_OPTIONS: usize = 12;

enum QueryEdit {
    Add(PredicateKind, String),
    Remove(PredicateId),
    Combinator(Combinator),
    Clear,
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui, now: f64) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, SidebarTab::Query, "Query");
            ui.selectable_value(&mut self.tab, SidebarTab::Search, "Search");
        });
        ui.separator();

        match self.tab {
            SidebarTab::Query => self.draw_query_tab(ui, now),
            SidebarTab::Search => self.draw_search_tab(ui, now),
        }

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            ui.add_space(6.0);
            draw_legend(ui);
        });
    }

    fn draw_query_tab(&mut self, ui: &mut Ui, now: f64) {
        let mut edit = None;

        ui.label("Filter by");
        ui.horizontal(|ui| {
            for kind in PredicateKind::ALL {
                ui.selectable_value(&mut self.query_kind, kind, kind.label());
            }
        });
        ui.text_edit_singleline(&mut self.query_text)
            .on_hover_text("Type part of an instrument, orchestra or school name.");

        if !self.query_text.trim().is_empty() {
            let options = filter_options(&self.graph, &self.predicates, &self.query_text)
                .into_iter()
                .filter(|option| option.kind == self.query_kind)
                .take(MAX_LISTED_OPTIONS)
                .collect::<Vec<_>>();

            egui::ScrollArea::vertical()
                .id_salt("filter_options_scroll")
                .max_height(200.0)
                .show(ui, |ui| {
                    if options.is_empty() {
                        ui.weak("No matching values.");
                    }
                    for option in options {
                        if ui.selectable_label(false, option.value.as_str()).clicked() {
                            edit = Some(QueryEdit::Add(option.kind, option.value));
                        }
                    }
                });
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Match");
            let mut combinator = self.predicates.combinator();
            for choice in [Combinator::And, Combinator::Or] {
                ui.selectable_value(&mut combinator, choice, choice.label());
            }
            if combinator != self.predicates.combinator() {
                edit = Some(QueryEdit::Combinator(combinator));
            }
        });

        ui.add_space(4.0);
        if self.predicates.is_empty() {
            ui.weak("No active criteria; the whole network is shown.");
        } else {
            ui.horizontal_wrapped(|ui| {
                for predicate in self.predicates.predicates() {
                    let chip = format!("{}: {}  x", predicate.kind.label(), predicate.value);
                    if ui
                        .button(chip)
                        .on_hover_text("Remove this criterion")
                        .clicked()
                    {
                        edit = Some(QueryEdit::Remove(predicate.id));
                    }
                }
            });
            if ui.small_button("Clear all").clicked() {
                edit = Some(QueryEdit::Clear);
            }
        }

        let Some(edit) = edit else {
            return;
        };
        let removed = matches!(edit, QueryEdit::Remove(_) | QueryEdit::Clear);
        match edit {
            QueryEdit::Add(kind, value) => {
                self.predicates.add(kind, value);
                self.query_text.clear();
            }
            QueryEdit::Remove(id) => self.predicates.remove(id),
            QueryEdit::Combinator(combinator) => self.predicates.set_combinator(combinator),
            QueryEdit::Clear => self.predicates.replace_all(Vec::new()),
        }
        self.predicates_changed(now, removed);
    }

    fn draw_search_tab(&mut self, ui: &mut Ui, now: f64) {
        ui.label("Search people and organizations");
        let response = ui.text_edit_singleline(&mut self.search_text);
        if response.changed() {
            if self.search_text.trim().is_empty() {
                self.search_timer.cancel();
                self.search_results.clear();
            } else {
                self.search_timer.schedule(now, Self::DEBOUNCE_SECS);
            }
        }

        ui.add_space(4.0);
        let mut chosen = None;
        for &index in &self.search_results {
            let Some(node) = self.graph.node(index) else {
                continue;
            };
            let in_view = self.subgraph.contains(index);
            let mut text = RichText::new(format!("{}  ({})", node.label, node.kind.label()));
            if !in_view {
                text = text.weak();
            }
            let response = ui.selectable_label(self.focus.selected() == Some(index), text);
            let response = if in_view {
                response
            } else {
                response.on_hover_text("Filtered out of the current network")
            };
            if response.clicked() {
                chosen = Some(index);
            }
        }
        if !self.search_text.trim().is_empty()
            && self.search_results.is_empty()
            && !self.search_timer.is_pending()
        {
            ui.weak("No matches.");
        }

        if let Some(index) = chosen {
            self.focus_node(index, now);
        }
    }
}

fn draw_legend(ui: &mut Ui) {
    for kind in [NodeKind::Musician, NodeKind::Orchestra, NodeKind::School] {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
            ui.painter().circle_filled(rect.center(), 6.0, kind_color(kind));
            ui.label(kind.label());
        });
    }
    ui.label(RichText::new("Legend").strong());
}
