use crate::config::AppConfig;
use crate::services::api::{
    ActionForm,
    ApiClientConfig,
    DashboardAction,
    DashboardClient,
    DashboardRequest,
};
use crate::ui::{apply_theme, render_panel, PanelSet};
use anyhow::{anyhow, Result};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use eframe::{egui, App, CreationContext, NativeOptions};
use serde_json::Value;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};
use tokio::runtime::Runtime;

pub fn run(config: AppConfig) -> Result<()> {
    let shared_config = Arc::new(config);
    let app_name = shared_config.application_name.clone();
    let native_options = NativeOptions::default();

    eframe::run_native(
        &app_name,
        native_options,
        Box::new(move |cc| Ok(LoanLensApp::new(cc, shared_config.clone()))),
    )
    .map_err(|err| anyhow!(err.to_string()))
}

struct LoanLensApp {
    config: Arc<AppConfig>,
    base_url_input: String,
    forms: [ActionForm; 4],
    panels: PanelSet,
    command_tx: Sender<AppCommand>,
    event_rx: Receiver<AppEvent>,
    status_message: Option<String>,
    worker_failed: bool,
    event_log: Vec<LogEntry>,
}

impl LoanLensApp {
    fn new(cc: &CreationContext<'_>, config: Arc<AppConfig>) -> Box<dyn App> {
        apply_theme(&cc.egui_ctx, true);

        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        spawn_background_worker(config.clone(), command_rx, event_tx);

        let base_url_input = config.api_base_url.clone();
        Box::new(Self {
            config,
            base_url_input,
            forms: Default::default(),
            panels: PanelSet::new(),
            command_tx,
            event_rx,
            status_message: None,
            worker_failed: false,
            event_log: Vec::new(),
        })
    }

    /// Reads the form fields for one action fresh, validates, and either
    /// reports the validation error into the panel or hands the request to
    /// the background worker.
    fn dispatch(&mut self, action: DashboardAction) {
        let form = self.forms[action.index()].clone();
        let request = match DashboardRequest::from_form(action, &form) {
            Ok(request) => request,
            Err(err) => {
                self.panels.set_error(action, err.to_string());
                self.push_log(LogLevel::Warn, format!("{action}: {err}"));
                return;
            }
        };

        // Base URL is read fresh on every click, never cached.
        let base_url = self.base_url_input.trim().to_string();
        let generation = self.panels.begin_request(action);
        self.push_log(LogLevel::Info, format!("Fetching {action} dashboard"));

        let command = AppCommand::Fetch {
            request,
            base_url,
            generation,
        };
        if let Err(err) = self.command_tx.send(command) {
            self.worker_failed = true;
            self.panels
                .set_error(action, format!("worker unavailable: {err}"));
            self.push_log(LogLevel::Error, format!("Unable to schedule fetch: {err}"));
        }
    }

    fn consume_events(&mut self) {
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => self.handle_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.worker_failed = true;
                    self.status_message = Some(
                        "Background worker disconnected. Restart application after checking logs."
                            .into(),
                    );
                    self.push_log(
                        LogLevel::Error,
                        "Background worker disconnected. Restart application after checking logs.",
                    );
                    break;
                }
            }
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        let AppEvent::FetchCompleted {
            action,
            generation,
            result,
        } = event;

        let failed = result.is_err();
        if !self.panels.complete(action, generation, result) {
            self.push_log(
                LogLevel::Info,
                format!("Discarded stale {action} response (superseded)"),
            );
            return;
        }

        if failed {
            self.push_log(LogLevel::Error, format!("{action} query failed"));
        } else {
            self.push_log(LogLevel::Info, format!("{action} panel updated"));
        }
    }

    fn push_log(&mut self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry::new(level, message.into());
        self.event_log.push(entry);
        const MAX_LOG_ENTRIES: usize = 200;
        if self.event_log.len() > MAX_LOG_ENTRIES {
            let surplus = self.event_log.len() - MAX_LOG_ENTRIES;
            self.event_log.drain(0..surplus);
        }
    }

    fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(&self.config.application_name);
            ui.separator();
            ui.label("API base");
            ui.add(
                egui::TextEdit::singleline(&mut self.base_url_input)
                    .desired_width(260.0)
                    .hint_text("http://localhost:8000"),
            );
            if ui.button("Save base").clicked() {
                self.status_message = Some("Base set.".into());
            }
        });

        if let Some(message) = &self.status_message {
            ui.label(message);
        }

        if self.worker_failed {
            ui.colored_label(
                egui::Color32::LIGHT_RED,
                "Background worker stopped. Please restart after resolving issues.",
            );
        }
    }

    fn render_action(&mut self, ui: &mut egui::Ui, action: DashboardAction) {
        ui.group(|ui| {
            let (primary_label, optional_label) = field_labels(action);
            if let Some(label) = primary_label {
                ui.horizontal(|ui| {
                    ui.label(label);
                    ui.text_edit_singleline(&mut self.forms[action.index()].primary);
                });
            }
            if let Some(label) = optional_label {
                ui.horizontal(|ui| {
                    ui.label(label);
                    ui.text_edit_singleline(&mut self.forms[action.index()].optional);
                });
            }

            if ui.button("Fetch").clicked() {
                self.dispatch(action);
            }

            render_panel(ui, action.title(), self.panels.state(action));

            if let Some(updated) = self.panels.last_updated(action) {
                ui.small(format!(
                    "Last updated {:.0}s ago",
                    updated.elapsed().as_secs_f32()
                ));
            }
        });
    }

    fn render_logs(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Event log")
            .default_open(false)
            .show(ui, |ui| {
                if self.event_log.is_empty() {
                    ui.colored_label(egui::Color32::GRAY, "No events captured yet.");
                    return;
                }

                for entry in self.event_log.iter().rev() {
                    let color = match entry.level {
                        LogLevel::Info => egui::Color32::LIGHT_GRAY,
                        LogLevel::Warn => egui::Color32::YELLOW,
                        LogLevel::Error => egui::Color32::LIGHT_RED,
                    };

                    ui.colored_label(
                        color,
                        format!("[{} ago] {}", entry.age_display(), entry.message),
                    );
                }
            });
    }
}

impl App for LoanLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.consume_events();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.render_top_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.columns(2, |columns| {
                    columns[0].push_id("lender", |ui| {
                        self.render_action(ui, DashboardAction::Lender)
                    });
                    columns[1].push_id("agent", |ui| {
                        self.render_action(ui, DashboardAction::Agent)
                    });
                });
                ui.columns(2, |columns| {
                    columns[0].push_id("manager", |ui| {
                        self.render_action(ui, DashboardAction::Manager)
                    });
                    columns[1]
                        .push_id("hr", |ui| self.render_action(ui, DashboardAction::Hr));
                });

                ui.separator();
                self.render_logs(ui);
            });
        });

        // Keep repainting while any response is outstanding so completions
        // land without waiting for user input.
        if DashboardAction::ALL
            .iter()
            .any(|action| self.panels.state(*action).is_loading())
        {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

fn field_labels(action: DashboardAction) -> (Option<&'static str>, Option<&'static str>) {
    match action {
        DashboardAction::Lender => (Some("Lender ID"), Some("Bucket filter")),
        DashboardAction::Agent => (Some("Agent ID"), Some("Status filter")),
        DashboardAction::Manager => (Some("Branch ID"), Some("Date (YYYY-MM-DD)")),
        DashboardAction::Hr => (None, None),
    }
}

#[derive(Clone, Copy)]
enum LogLevel {
    Info,
    Warn,
    Error,
}

struct LogEntry {
    timestamp: SystemTime,
    level: LogLevel,
    message: String,
}

impl LogEntry {
    fn new(level: LogLevel, message: String) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level,
            message,
        }
    }

    fn age_display(&self) -> String {
        match SystemTime::now().duration_since(self.timestamp) {
            Ok(duration) => {
                if duration < Duration::from_secs(60) {
                    format!("{:.0}s", duration.as_secs_f32())
                } else if duration < Duration::from_secs(3600) {
                    format!("{:.1}m", duration.as_secs_f64() / 60.0)
                } else {
                    format!("{:.1}h", duration.as_secs_f64() / 3600.0)
                }
            }
            Err(_) => "now".into(),
        }
    }
}

enum AppCommand {
    Fetch {
        request: DashboardRequest,
        base_url: String,
        generation: u64,
    },
}

enum AppEvent {
    FetchCompleted {
        action: DashboardAction,
        generation: u64,
        result: Result<Value, String>,
    },
}

fn spawn_background_worker(
    config: Arc<AppConfig>,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        let runtime = match Runtime::new() {
            Ok(runtime) => runtime,
            Err(err) => {
                eprintln!("LoanLens worker: failed to start runtime: {err}");
                return;
            }
        };
        let timeout = Duration::from_secs(config.request_timeout_secs);

        while let Ok(command) = command_rx.recv() {
            let AppCommand::Fetch {
                request,
                base_url,
                generation,
            } = command;

            // Each fetch runs as its own task: overlapping clicks across
            // panels proceed independently, stale ones are filtered by
            // generation on the UI side.
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let action = request.action();
                let result = perform_fetch(&base_url, timeout, &request)
                    .await
                    .map_err(|err| err.to_string());
                let _ = event_tx.send(AppEvent::FetchCompleted {
                    action,
                    generation,
                    result,
                });
            });
        }
    });
}

async fn perform_fetch(
    base_url: &str,
    timeout: Duration,
    request: &DashboardRequest,
) -> Result<Value> {
    let config = ApiClientConfig::try_from_url(base_url)?.with_timeout(timeout);
    let client = DashboardClient::new(config)?;
    Ok(client.execute(request).await?)
}
