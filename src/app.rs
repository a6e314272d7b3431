use std::path::{Path, PathBuf};

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dispatcher::{Dispatch, Dispatcher, GenerationEvent, GenerationOutcome};
use crate::pane::Pane;
use crate::save::{write_pane, SaveSpec};
use crate::target::Target;

pub const READY_STATUS: &str = "Ready";
pub const EMPTY_PROMPT_WARNING: &str = "⚠️ Please enter a prompt";
pub const CODE_COMPLETE_STATUS: &str = "✨ Code generation complete!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Prompt,
    Code,
    Documentation,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Prompt => Focus::Code,
            Focus::Code => Focus::Documentation,
            Focus::Documentation => Focus::Prompt,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Prompt => Focus::Documentation,
            Focus::Code => Focus::Prompt,
            Focus::Documentation => Focus::Code,
        }
    }

    pub fn target(self) -> Option<Target> {
        match self {
            Focus::Prompt => None,
            Focus::Code => Some(Target::Code),
            Focus::Documentation => Some(Target::Documentation),
        }
    }
}

impl From<Target> for Focus {
    fn from(target: Target) -> Self {
        match target {
            Target::Code => Focus::Code,
            Target::Documentation => Focus::Documentation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Working,
    Success,
    Warning,
    Error,
}

/// The save-as prompt shown over the main screen.
#[derive(Debug, Clone)]
pub struct SaveDialog {
    pub target: Target,
    pub spec: SaveSpec,
    pub path: Pane,
}

pub struct App {
    pub should_quit: bool,
    pub focus: Focus,

    pub prompt: Pane,
    pub code: Pane,
    pub docs: Pane,

    pub status: String,
    pub status_kind: StatusKind,

    pub save_dialog: Option<SaveDialog>,
    /// API key popup; `Some` while it is open.
    pub key_input: Option<Pane>,

    // Animation state
    pub animation_frame: u8,

    // Pane areas for mouse hit-testing (updated during render)
    pub code_area: Option<Rect>,
    pub docs_area: Option<Rect>,

    pending_code: bool,
    pending_docs: bool,
    config: Config,
    config_path: Option<PathBuf>,
    dispatcher: Dispatcher,
}

impl App {
    pub fn new(config: &Config, events: mpsc::Sender<GenerationEvent>) -> anyhow::Result<Self> {
        Ok(Self {
            should_quit: false,
            focus: Focus::Prompt,

            prompt: Pane::default(),
            code: Pane::default(),
            docs: Pane::default(),

            status: READY_STATUS.to_string(),
            status_kind: StatusKind::Info,

            save_dialog: None,
            key_input: None,

            animation_frame: 0,

            code_area: None,
            docs_area: None,

            pending_code: false,
            pending_docs: false,
            config: config.clone(),
            config_path: Config::get_config_path().ok(),
            dispatcher: Dispatcher::new(config, events)?,
        })
    }

    pub fn model(&self) -> &str {
        self.dispatcher.model()
    }

    pub fn pane(&self, target: Target) -> &Pane {
        match target {
            Target::Code => &self.code,
            Target::Documentation => &self.docs,
        }
    }

    pub fn pane_mut(&mut self, target: Target) -> &mut Pane {
        match target {
            Target::Code => &mut self.code,
            Target::Documentation => &mut self.docs,
        }
    }

    pub fn is_pending(&self, target: Target) -> bool {
        match target {
            Target::Code => self.pending_code,
            Target::Documentation => self.pending_docs,
        }
    }

    fn set_pending(&mut self, target: Target, pending: bool) {
        match target {
            Target::Code => self.pending_code = pending,
            Target::Documentation => self.pending_docs = pending,
        }
    }

    pub fn any_pending(&self) -> bool {
        self.pending_code || self.pending_docs
    }

    // State setters driven by generation events

    pub fn set_pane(&mut self, target: Target, text: impl Into<String>) {
        self.pane_mut(target).set_text(text);
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.set_status_with(text, StatusKind::Info);
    }

    pub fn set_status_with(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = text.into();
        self.status_kind = kind;
    }

    pub fn set_error(&mut self, message: impl AsRef<str>) {
        self.set_status_with(format!("❌ {}", message.as_ref()), StatusKind::Error);
    }

    // Intents

    /// Validate the prompt and hand it to the dispatcher.
    pub fn submit(&mut self) {
        let prompt = self.prompt.text().trim().to_string();
        if prompt.is_empty() {
            self.set_status_with(EMPTY_PROMPT_WARNING, StatusKind::Warning);
            return;
        }

        if !self.config.has_api_key() {
            let location = self.config_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the config file".to_string());
            self.set_error(format!("API key not configured (set PROMPTSMITH_API_KEY or edit {})", location));
            self.open_key_input();
            return;
        }

        match self.dispatcher.dispatch(&prompt) {
            Dispatch::Rejected => {
                self.set_status_with(EMPTY_PROMPT_WARNING, StatusKind::Warning);
            }
            Dispatch::Started { generation } => {
                debug!(generation, "submit accepted");
                self.code.clear();
                self.docs.clear();
                self.pending_code = true;
                self.pending_docs = true;
                let working = format!("⌛ Generating with {}...", self.model());
                self.set_status_with(working, StatusKind::Working);
            }
        }
    }

    /// Apply one worker event. Events from an older submit are dropped.
    pub fn apply_event(&mut self, event: GenerationEvent) {
        let current = self.dispatcher.generation();
        if event.generation != current {
            debug!(
                generation = event.generation,
                current,
                target = event.target.as_str(),
                "discarding stale generation event"
            );
            return;
        }

        self.set_pending(event.target, false);

        match event.outcome {
            GenerationOutcome::Completed(text) => {
                self.set_pane(event.target, text);
                if event.target == Target::Code {
                    self.set_status_with(CODE_COMPLETE_STATUS, StatusKind::Success);
                }
            }
            GenerationOutcome::Failed(message) => {
                self.set_error(message);
            }
        }
    }

    /// Open the save dialog, or warn if there is nothing to save.
    pub fn request_save(&mut self, target: Target) {
        let spec = SaveSpec::for_target(target);
        if self.pane(target).is_empty() {
            self.set_status_with(spec.empty_warning, StatusKind::Warning);
            return;
        }

        let mut path = Pane::default();
        path.set_text(spec.default_name);
        path.move_end();
        self.save_dialog = Some(SaveDialog { target, spec, path });
    }

    pub fn cancel_save(&mut self) {
        self.save_dialog = None;
    }

    /// Write the pane to the path typed into the dialog. A blank path cancels.
    pub fn confirm_save(&mut self) {
        let Some(dialog) = self.save_dialog.take() else {
            return;
        };

        let path_text = dialog.path.text().trim();
        if path_text.is_empty() {
            return;
        }

        self.save_to(dialog.target, Path::new(path_text));
    }

    pub fn save_to(&mut self, target: Target, path: &Path) {
        let spec = SaveSpec::for_target(target);
        if self.pane(target).is_empty() {
            self.set_status_with(spec.empty_warning, StatusKind::Warning);
            return;
        }

        match write_pane(path, self.pane(target).text()) {
            Ok(()) => {
                info!(target = target.as_str(), path = %path.display(), "saved pane");
                self.set_status_with(spec.success_message(target, path), StatusKind::Success);
            }
            Err(e) => {
                warn!(target = target.as_str(), path = %path.display(), error = %e, "save failed");
                self.set_error(format!("Error saving file: {}", e));
            }
        }
    }

    pub fn open_key_input(&mut self) {
        self.key_input = Some(Pane::default());
    }

    pub fn cancel_key_input(&mut self) {
        self.key_input = None;
    }

    /// Use the typed key from now on and store it in the config file.
    /// A blank key cancels.
    pub fn confirm_key_input(&mut self) {
        let Some(input) = self.key_input.take() else {
            return;
        };

        let key = input.text().trim().to_string();
        if key.is_empty() {
            return;
        }

        let mut config = self.config.clone();
        config.api_key = Some(key.clone());
        if let Err(e) = self.dispatcher.reconfigure(&config) {
            warn!(error = %e, "failed to rebuild API client");
            self.set_error(format!("Error applying API key: {}", e));
            return;
        }
        self.config = config;

        let Some(path) = self.config_path.clone() else {
            self.set_status_with("🔑 API key set for this session", StatusKind::Success);
            return;
        };

        match Config::store_api_key(&path, &key) {
            Ok(()) => {
                info!(path = %path.display(), "api key saved");
                self.set_status_with(format!("🔑 API key saved to {}", path.display()), StatusKind::Success);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save api key");
                self.set_error(format!("Error saving config: {}", e));
            }
        }
    }

    pub fn tick_animation(&mut self) {
        if self.any_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::event_channel;
    use tempfile::TempDir;

    fn test_app() -> App {
        let (tx, _rx) = event_channel();
        let mut config = Config::new();
        config.api_key = Some("sk-test".to_string());
        App::new(&config, tx).unwrap()
    }

    #[test]
    fn starts_ready_and_focused_on_prompt() {
        let app = test_app();
        assert_eq!(app.status, READY_STATUS);
        assert_eq!(app.focus, Focus::Prompt);
        assert!(!app.any_pending());
    }

    #[test]
    fn whitespace_prompt_is_rejected_locally() {
        let mut app = test_app();
        app.prompt.set_text("   ");
        app.code.set_text("kept");
        app.submit();
        assert_eq!(app.status, EMPTY_PROMPT_WARNING);
        assert_eq!(app.status_kind, StatusKind::Warning);
        assert_eq!(app.code.text(), "kept");
        assert!(!app.any_pending());
    }

    fn keyless_app(config_path: PathBuf) -> App {
        let (tx, _rx) = event_channel();
        let mut app = App::new(&Config::new(), tx).unwrap();
        app.config_path = Some(config_path);
        app
    }

    #[test]
    fn missing_api_key_blocks_submit() {
        let dir = TempDir::new().unwrap();
        let mut app = keyless_app(dir.path().join("config.json"));
        app.prompt.set_text("calculator");
        app.submit();
        assert_eq!(app.status_kind, StatusKind::Error);
        assert!(app.status.contains("API key not configured"));
        assert!(!app.any_pending());
        assert!(app.key_input.is_some());
    }

    #[test]
    fn confirmed_key_is_stored_and_used() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("promptsmith").join("config.json");
        let mut app = keyless_app(path.clone());

        app.open_key_input();
        app.key_input.as_mut().unwrap().set_text("  sk-new  ");
        app.confirm_key_input();

        assert!(app.key_input.is_none());
        assert_eq!(app.status, format!("🔑 API key saved to {}", path.display()));
        let stored = Config::load_from(&path).unwrap();
        assert_eq!(stored.api_key.as_deref(), Some("sk-new"));
        assert!(app.config.has_api_key());
    }

    #[test]
    fn blank_key_cancels_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut app = keyless_app(path.clone());
        app.set_status("before");

        app.open_key_input();
        app.key_input.as_mut().unwrap().set_text("   ");
        app.confirm_key_input();

        assert!(app.key_input.is_none());
        assert_eq!(app.status, "before");
        assert!(!path.exists());
        assert!(!app.config.has_api_key());
    }

    #[test]
    fn unwritable_config_still_applies_key() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let mut app = keyless_app(blocker.join("config.json"));

        app.open_key_input();
        app.key_input.as_mut().unwrap().set_text("sk-session");
        app.confirm_key_input();

        assert!(app.status.starts_with("❌ Error saving config:"));
        assert!(app.config.has_api_key());
    }

    #[test]
    fn focus_cycles_both_ways() {
        assert_eq!(Focus::Prompt.next().next().next(), Focus::Prompt);
        assert_eq!(Focus::Prompt.prev(), Focus::Documentation);
        assert_eq!(Focus::Code.target(), Some(Target::Code));
        assert_eq!(Focus::from(Target::Documentation), Focus::Documentation);
    }

    #[test]
    fn save_on_empty_pane_warns_without_dialog() {
        let mut app = test_app();
        app.request_save(Target::Code);
        assert_eq!(app.status, "⚠️ No code to save");
        assert!(app.save_dialog.is_none());

        app.request_save(Target::Documentation);
        assert_eq!(app.status, "⚠️ No markdown to save");
    }

    #[test]
    fn save_dialog_suggests_default_name() {
        let mut app = test_app();
        app.docs.set_text("# Title");
        app.request_save(Target::Documentation);
        let dialog = app.save_dialog.as_ref().unwrap();
        assert_eq!(dialog.path.text(), "README.md");
        assert_eq!(dialog.path.cursor(), "README.md".len());
    }

    #[test]
    fn cancel_save_is_silent() {
        let mut app = test_app();
        app.code.set_text("print(1)");
        app.set_status("before");
        app.request_save(Target::Code);
        app.cancel_save();
        assert!(app.save_dialog.is_none());
        assert_eq!(app.status, "before");
    }

    #[test]
    fn blank_dialog_path_acts_as_cancel() {
        let mut app = test_app();
        app.code.set_text("print(1)");
        app.set_status("before");
        app.request_save(Target::Code);
        app.save_dialog.as_mut().unwrap().path.clear();
        app.confirm_save();
        assert!(app.save_dialog.is_none());
        assert_eq!(app.status, "before");
    }

    #[test]
    fn confirm_save_writes_pane() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calc.py");
        let mut app = test_app();
        app.code.set_text("print('hi')\n");
        app.request_save(Target::Code);
        app.save_dialog.as_mut().unwrap().path.set_text(path.display().to_string());
        app.confirm_save();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "print('hi')\n");
        assert_eq!(app.status, format!("💾 Code saved to {}", path.display()));
        assert_eq!(app.status_kind, StatusKind::Success);
    }

    #[test]
    fn failed_save_keeps_pane_content() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app();
        app.docs.set_text("# Keep me");
        app.save_to(Target::Documentation, &dir.path().join("nope").join("README.md"));

        assert!(app.status.starts_with("❌ Error saving file:"));
        assert_eq!(app.docs.text(), "# Keep me");
    }

    #[test]
    fn error_setter_prefixes_marker() {
        let mut app = test_app();
        app.set_error("README generation failed: boom");
        assert_eq!(app.status, "❌ README generation failed: boom");
        assert_eq!(app.status_kind, StatusKind::Error);
    }

    #[test]
    fn animation_only_ticks_while_pending() {
        let mut app = test_app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
    }
}
