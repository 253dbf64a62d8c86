//! Left panel: place search and what to do with a result.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::measure::{Tool, ToolController};
use crate::search::{PlaceAction, PlaceSelected, SearchRequest, SearchState};
use crate::storage::Favorites;
use crate::theme;

pub fn search_panel_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<SearchState>,
    controller: Res<ToolController>,
    favorites: Option<Res<Favorites>>,
    mut search_events: MessageWriter<SearchRequest>,
    mut select_events: MessageWriter<PlaceSelected>,
) -> Result {
    egui::SidePanel::left("search_panel")
        .default_width(260.0)
        .show(contexts.ctx_mut()?, |ui| {
            ui.add_space(4.0);
            ui.label(egui::RichText::new("Search").heading().size(18.0));
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            let mut submit = false;
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut state.query)
                        .hint_text("Place or address")
                        .desired_width(180.0),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                if ui.button("Search").clicked() {
                    submit = true;
                }
            });
            if submit {
                search_events.write(SearchRequest {
                    query: state.query.clone(),
                });
            }

            // Tells the user where a picked result goes
            let hint = match controller.active_tool() {
                Tool::SmartDistance => "Results start or restart the smart distance",
                Tool::MultiRoute => "Results are added to the route",
                _ => "Pick an action for a result",
            };
            ui.label(egui::RichText::new(hint).color(theme::ui::HINT_TEXT).size(11.0));
            ui.add_space(6.0);

            if state.is_searching {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Searching...");
                });
            }
            if let Some(ref error) = state.error {
                ui.colored_label(theme::ui::ERROR_TEXT, error.as_str());
            }
            if !state.is_searching
                && state.error.is_none()
                && state.results.is_empty()
                && !state.query.trim().is_empty()
            {
                ui.label(egui::RichText::new("No results").weak());
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for place in &state.results {
                    egui::Frame::new()
                        .inner_margin(egui::Margin::symmetric(4, 4))
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(place.short_name()).strong())
                                .on_hover_text(place.display_name.as_str());
                            ui.label(
                                egui::RichText::new(crate::measure::format::format_lat_lon(
                                    place.location.lat,
                                    place.location.lon,
                                ))
                                .color(theme::ui::HINT_TEXT)
                                .size(11.0),
                            );

                            ui.horizontal_wrapped(|ui| {
                                let mut pick = |action| {
                                    select_events.write(PlaceSelected {
                                        place: place.clone(),
                                        action,
                                    });
                                };
                                if ui.small_button("Go to").clicked() {
                                    pick(PlaceAction::GoTo);
                                }
                                if ui.small_button("Smart distance").clicked() {
                                    pick(PlaceAction::SmartDistance);
                                }
                                if ui.small_button("Route").clicked() {
                                    pick(PlaceAction::Route);
                                }

                                let starred = favorites
                                    .as_ref()
                                    .is_some_and(|f| f.is_favorite(place.location));
                                let star = if starred {
                                    egui::RichText::new("★").color(theme::ui::FAVORITE)
                                } else {
                                    egui::RichText::new("☆")
                                };
                                if ui
                                    .small_button(star)
                                    .on_hover_text("Toggle favorite")
                                    .clicked()
                                {
                                    pick(PlaceAction::ToggleFavorite);
                                }
                            });
                        });
                    ui.separator();
                }
            });
        });
    Ok(())
}
