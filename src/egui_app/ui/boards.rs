//! Drag-and-drop rendering for bucket boards.

use std::any::Any;
use std::hash::Hash;

use eframe::egui::{self, Frame, Margin, RichText, Ui};

use super::style;

/// One draggable item.
pub(super) struct Card<Id> {
    pub id: Id,
    pub title: String,
    pub subtitle: String,
}

/// What happened to a zone this frame.
pub(super) enum BoardEvent<Id> {
    /// A card was dropped on the zone.
    Dropped(Id),
    /// The card's action button was clicked.
    Clicked(Id),
}

/// Drop target holding `cards`; each card can be dragged elsewhere.
///
/// `action` labels the per-card button (e.g. `Add` in the pool, `✕` in a bucket).
pub(super) fn zone<Id>(
    ui: &mut Ui,
    salt: &str,
    title: &str,
    note: &str,
    cards: &[Card<Id>],
    action: &str,
) -> Option<BoardEvent<Id>>
where
    Id: Any + Send + Sync + Clone + Hash,
{
    let mut event = None;
    let frame = Frame::new()
        .fill(style::compartment_fill())
        .stroke(style::inner_border())
        .inner_margin(Margin::same(8));
    let (_, dropped) = ui.dnd_drop_zone::<Id, ()>(frame, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new(title).strong());
            ui.label(RichText::new(note).color(style::palette().text_muted).small());
        });
        ui.add_space(4.0);
        if cards.is_empty() {
            ui.label(RichText::new("Drop items here").color(style::palette().text_muted));
        }
        for card in cards {
            ui.horizontal(|ui| {
                let id = egui::Id::new((salt, &card.id));
                ui.dnd_drag_source(id, card.id.clone(), |ui| {
                    ui.vertical(|ui| {
                        ui.label(&card.title);
                        if !card.subtitle.is_empty() {
                            ui.label(
                                RichText::new(&card.subtitle)
                                    .color(style::palette().text_muted)
                                    .small(),
                            );
                        }
                    });
                });
                if ui.small_button(action).clicked() {
                    event = Some(BoardEvent::Clicked(card.id.clone()));
                }
            });
        }
    });
    if let Some(payload) = dropped {
        event = Some(BoardEvent::Dropped((*payload).clone()));
    }
    event
}
