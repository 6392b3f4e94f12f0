use crate::services::api::DashboardAction;
use eframe::egui;
use serde_json::{json, Value};
use std::time::Instant;

/// Display state of one dashboard panel. Overwritten on every action;
/// nothing persists across requests.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Idle,
    Loading,
    Ready(Value),
    Failed(String),
}

impl PanelState {
    /// The JSON text shown in the panel, pretty-printed.
    pub fn render_text(&self) -> String {
        match self {
            PanelState::Idle => String::new(),
            PanelState::Loading => pretty(&json!({ "loading": true })),
            PanelState::Ready(value) => pretty(value),
            PanelState::Failed(message) => pretty(&json!({ "error": message })),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PanelState::Loading)
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[derive(Debug)]
struct Panel {
    state: PanelState,
    generation: u64,
    last_updated: Option<Instant>,
}

impl Panel {
    fn new() -> Self {
        Self {
            state: PanelState::Idle,
            generation: 0,
            last_updated: None,
        }
    }
}

/// View-model for the four panels. Each panel carries a request-generation
/// counter; a completion tagged with an older generation is discarded, so
/// a stale response never overwrites the result of a newer click.
#[derive(Debug)]
pub struct PanelSet {
    panels: [Panel; 4],
}

impl PanelSet {
    pub fn new() -> Self {
        Self {
            panels: [Panel::new(), Panel::new(), Panel::new(), Panel::new()],
        }
    }

    pub fn state(&self, action: DashboardAction) -> &PanelState {
        &self.panels[action.index()].state
    }

    pub fn last_updated(&self, action: DashboardAction) -> Option<Instant> {
        self.panels[action.index()].last_updated
    }

    /// Marks the panel loading and returns the generation the in-flight
    /// request must carry to be accepted on completion.
    pub fn begin_request(&mut self, action: DashboardAction) -> u64 {
        let panel = &mut self.panels[action.index()];
        panel.generation += 1;
        panel.state = PanelState::Loading;
        panel.generation
    }

    /// Synchronous failure (validation): written immediately, and the
    /// generation is bumped so any in-flight response cannot clobber it.
    pub fn set_error(&mut self, action: DashboardAction, message: impl Into<String>) {
        let panel = &mut self.panels[action.index()];
        panel.generation += 1;
        panel.state = PanelState::Failed(message.into());
    }

    /// Applies a completion event. Returns false if the event was stale.
    pub fn complete(
        &mut self,
        action: DashboardAction,
        generation: u64,
        result: Result<Value, String>,
    ) -> bool {
        let panel = &mut self.panels[action.index()];
        if generation != panel.generation {
            return false;
        }
        panel.state = match result {
            Ok(value) => {
                panel.last_updated = Some(Instant::now());
                PanelState::Ready(value)
            }
            Err(message) => PanelState::Failed(message),
        };
        true
    }
}

pub fn render_panel(ui: &mut egui::Ui, title: &str, state: &PanelState) {
    ui.heading(title);
    if state.is_loading() {
        ui.spinner();
    }

    let text = state.render_text();
    if text.is_empty() {
        ui.colored_label(egui::Color32::GRAY, "No query run yet.");
        return;
    }

    let color = match state {
        PanelState::Failed(_) => egui::Color32::LIGHT_RED,
        _ => egui::Color32::LIGHT_GRAY,
    };
    egui::ScrollArea::vertical()
        .id_salt(title.to_owned())
        .max_height(260.0)
        .show(ui, |ui| {
            ui.colored_label(color, egui::RichText::new(text).monospace());
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loading_renders_loading_object() {
        assert_eq!(
            PanelState::Loading.render_text(),
            serde_json::to_string_pretty(&json!({ "loading": true })).unwrap()
        );
    }

    #[test]
    fn response_renders_pretty_printed() {
        let state = PanelState::Ready(json!({ "total": 5 }));
        assert_eq!(
            state.render_text(),
            serde_json::to_string_pretty(&json!({ "total": 5 })).unwrap()
        );
    }

    #[test]
    fn failure_renders_error_object() {
        let state = PanelState::Failed("connection refused".into());
        assert_eq!(
            state.render_text(),
            serde_json::to_string_pretty(&json!({ "error": "connection refused" })).unwrap()
        );
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut panels = PanelSet::new();
        let first = panels.begin_request(DashboardAction::Lender);
        let second = panels.begin_request(DashboardAction::Lender);

        assert!(!panels.complete(
            DashboardAction::Lender,
            first,
            Ok(json!({ "stale": true }))
        ));
        assert!(panels.state(DashboardAction::Lender).is_loading());

        assert!(panels.complete(
            DashboardAction::Lender,
            second,
            Ok(json!({ "fresh": true }))
        ));
        assert_eq!(
            panels.state(DashboardAction::Lender),
            &PanelState::Ready(json!({ "fresh": true }))
        );
    }

    #[test]
    fn validation_error_blocks_inflight_response() {
        let mut panels = PanelSet::new();
        let generation = panels.begin_request(DashboardAction::Agent);
        panels.set_error(DashboardAction::Agent, "agent_id is required");

        assert!(!panels.complete(DashboardAction::Agent, generation, Ok(json!({}))));
        assert_eq!(
            panels.state(DashboardAction::Agent),
            &PanelState::Failed("agent_id is required".into())
        );
    }

    #[test]
    fn failure_leaves_other_panels_untouched() {
        let mut panels = PanelSet::new();
        let generation = panels.begin_request(DashboardAction::Manager);
        panels.complete(
            DashboardAction::Manager,
            generation,
            Err("request error: timed out".into()),
        );

        assert_eq!(
            panels.state(DashboardAction::Manager),
            &PanelState::Failed("request error: timed out".into())
        );
        for action in [
            DashboardAction::Lender,
            DashboardAction::Agent,
            DashboardAction::Hr,
        ] {
            assert_eq!(panels.state(action), &PanelState::Idle);
        }
    }
}
