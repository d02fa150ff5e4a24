use eframe::egui::{self, Key, Sense, Ui, vec2};

use crate::graph::DisplayMode;

use super::ViewModel;
use super::view::group_color;

impl ViewModel {
    pub(super) fn draw_controls(
        &mut self,
        ui: &mut Ui,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.heading("Causal network");
            ui.separator();

            let search_response = ui
                .add(
                    egui::TextEdit::singleline(&mut self.search)
                        .hint_text("Search variables...")
                        .desired_width(220.0),
                )
                .on_hover_text("Press Enter to jump to the first matching variable.");
            if search_response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
                self.run_search();
            }

            ui.separator();

            let mut mode = self.mode;
            ui.selectable_value(&mut mode, DisplayMode::All, DisplayMode::All.label())
                .on_hover_text("Show every extracted variable.");
            ui.selectable_value(&mut mode, DisplayMode::CoreOnly, DisplayMode::CoreOnly.label())
                .on_hover_text("Restrict the view to variables flagged as core.");
            self.set_mode(mode);

            ui.separator();

            ui.add_enabled_ui(!is_reloading, |ui| {
                if ui
                    .button("Reload")
                    .on_hover_text("Re-read the input payload from disk.")
                    .clicked()
                {
                    *reload_requested = true;
                }
            });
            if is_reloading {
                ui.spinner();
            }
        });

        ui.add_space(2.0);
        ui.horizontal_wrapped(|ui| {
            for (slot, group) in self.working.groups.iter().enumerate() {
                let (swatch, _) = ui.allocate_exact_size(vec2(10.0, 10.0), Sense::hover());
                ui.painter().circle_filled(swatch.center(), 4.0, group_color(slot));
                ui.label(group);
                ui.add_space(8.0);
            }
            ui.label(format!(
                "{} variables, {} links",
                self.working.node_count(),
                self.working.edges.len()
            ));
        });
        ui.add_space(4.0);
    }
}
