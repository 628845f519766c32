use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

impl ViewModel {
    fn draw_affiliation_list(&mut self, ui: &mut Ui, title: &str, members: &[usize], now: f64) {
        ui.label(RichText::new(title).strong());
        if members.is_empty() {
            ui.weak("none");
            return;
        }

        let mut clicked = None;
        for &member in members {
            let Some(node) = self.graph.node(member) else {
                continue;
            };
            if ui.link(node.label.as_str()).on_hover_text(node.id.as_str()).clicked() {
                clicked = Some(member);
            }
        }
        if let Some(member) = clicked {
            self.focus_node(member, now);
        }
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui, now: f64) {
        ui.heading("Details");
        ui.add_space(6.0);

        let Some(index) = self.sidebar_node else {
            ui.label("Click a node to see its connections.");
            return;
        };
        let Some(node) = self.graph.node(index) else {
            ui.label("Selected node no longer exists in the network.");
            return;
        };

        let label = node.label.clone();
        let kind = node.kind;
        let instruments = node.instruments.join(", ");
        let connections = self.graph.neighbors_of(&node.id).len();
        let affiliations = self.graph.affiliations(index);

        ui.label(RichText::new(label).strong());
        ui.small(kind.label());
        if !instruments.is_empty() {
            ui.label(format!("Instruments: {instruments}"));
        }
        ui.label(format!("Connections: {connections}"));
        ui.add_space(6.0);

        egui::ScrollArea::vertical()
            .id_salt("affiliations_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.draw_affiliation_list(ui, "Orchestras", &affiliations.orchestras, now);
                ui.add_space(4.0);
                self.draw_affiliation_list(ui, "Schools", &affiliations.schools, now);
                ui.add_space(4.0);
                self.draw_affiliation_list(ui, "Musicians", &affiliations.musicians, now);
            });

        ui.separator();
        if ui
            .button("Generate network")
            .on_hover_text("Replace the criteria with ones centred on this node.")
            .clicked()
        {
            self.pivot_to(index, now);
        }
    }
}
