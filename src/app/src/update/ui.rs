use crux_core::{render::render, Command};

use crate::events::{Event, UiEvent};
use crate::model::Model;
use crate::update_field;
use crate::Effect;

/// Handle UI-related events (dismiss and clear messages)
pub fn handle(event: UiEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        UiEvent::DismissNotification { key } => {
            let shown = model
                .update_notification
                .as_ref()
                .is_some_and(|notification| notification.key() == key);
            if !model.dismissed_notifications.dismiss(key) {
                return Command::done();
            }
            if shown {
                model.update_notification = None;
            }
            render()
        }
        UiEvent::RestoreDismissed { keys } => {
            model.dismissed_notifications.restore(keys);
            if let Some(notification) = model.update_notification.take() {
                model.show_update_notification(notification);
            }
            render()
        }
        UiEvent::ClearError => update_field!(model.error_message, None),
        UiEvent::ClearSuccess => update_field!(model.success_message, None),
    }
}
