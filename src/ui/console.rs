use crate::render::diagnostic::{DiagnosticEntry, Severity};
use egui::{Color32, RichText, ScrollArea, Ui};

pub const CONSOLE_BANNER: &str = "===== GLSL Shader Editor =====";

/// Receiver of user-facing build output.
pub trait ConsoleSink {
    fn log_info(&mut self, text: &str);
    fn log_warning(&mut self, text: &str);
    fn log_error(&mut self, text: &str);
    fn clear(&mut self);

    fn emit(&mut self, entry: &DiagnosticEntry) {
        match entry.severity {
            Severity::Error => self.log_error(&entry.text),
            Severity::Warning => self.log_warning(&entry.text),
            Severity::Info => self.log_info(&entry.text),
        }
    }
}

/// In-memory console backing the console pane.
#[derive(Debug, Default, Clone)]
pub struct ConsoleLog {
    entries: Vec<DiagnosticEntry>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|e| e.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, text: &str) {
        self.entries.push(DiagnosticEntry::new(severity, text));
    }

    pub fn show(&self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(CONSOLE_BANNER).monospace().strong());
        });
        ui.separator();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in &self.entries {
                    ui.label(
                        RichText::new(&entry.text)
                            .monospace()
                            .color(severity_color(entry.severity)),
                    );
                }
            });
    }
}

impl ConsoleSink for ConsoleLog {
    fn log_info(&mut self, text: &str) {
        self.push(Severity::Info, text);
    }

    fn log_warning(&mut self, text: &str) {
        self.push(Severity::Warning, text);
    }

    fn log_error(&mut self, text: &str) {
        self.push(Severity::Error, text);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Error => Color32::from_rgb(239, 68, 68),
        Severity::Warning => Color32::from_rgb(234, 179, 8),
        Severity::Info => Color32::from_rgb(200, 200, 210),
    }
}
