use super::console::ConsoleLog;
use crate::config::LayoutConfig;
use egui::{
    Align, CentralPanel, Context, FontId, Frame, Key, Layout, Modifiers, Rect, RichText,
    ScrollArea, SidePanel, TextEdit, TextStyle, TopBottomPanel,
};

/// What the user asked for during one UI frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelActions {
    pub run: bool,
    pub save: bool,
    pub load_sample: bool,
    /// Output pane in points, `None` when the pane has no area.
    pub output_rect: Option<Rect>,
}

/// Split layout: editor on the left, output top-right, console bottom-right.
pub struct EditorPanels {
    pub source: String,
    pub status: Option<String>,
    layout: LayoutConfig,
    style_applied: bool,
}

impl EditorPanels {
    pub fn new(source: impl Into<String>, layout: LayoutConfig) -> Self {
        Self {
            source: source.into(),
            status: None,
            layout,
            style_applied: false,
        }
    }

    pub fn show(&mut self, ctx: &Context, console: &ConsoleLog) -> PanelActions {
        if !self.style_applied {
            let mut style = (*ctx.style()).clone();
            style.text_styles.insert(
                TextStyle::Monospace,
                FontId::monospace(self.layout.font_size),
            );
            ctx.set_style(style);
            self.style_applied = true;
        }

        let mut actions = PanelActions::default();
        let screen = ctx.screen_rect();

        // Ctrl+Enter runs; consumed before the text edit sees the newline.
        if ctx.input_mut(|i| i.consume_key(Modifiers::COMMAND, Key::Enter)) {
            actions.run = true;
        }

        SidePanel::left("editor_pane")
            .resizable(true)
            .default_width(screen.width() * self.layout.editor_fraction)
            .width_range(120.0..=(screen.width() - 120.0).max(120.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("▶ Run").on_hover_text("Ctrl+Enter").clicked() {
                        actions.run = true;
                    }
                    if ui.button("Save").on_hover_text("Write shader.frag").clicked() {
                        actions.save = true;
                    }
                    if ui.button("Load sample").clicked() {
                        actions.load_sample = true;
                    }
                    if let Some(status) = &self.status {
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            ui.label(RichText::new(status).small().weak());
                        });
                    }
                });
                ui.separator();

                ScrollArea::both()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.add(
                            TextEdit::multiline(&mut self.source)
                                .code_editor()
                                .desired_width(f32::INFINITY)
                                .desired_rows(40)
                                .lock_focus(true),
                        );
                    });
            });

        TopBottomPanel::bottom("console_pane")
            .resizable(true)
            .default_height(screen.height() * self.layout.console_fraction)
            .height_range(40.0..=(screen.height() - 40.0).max(40.0))
            .show(ctx, |ui| console.show(ui));

        let output = CentralPanel::default()
            .frame(Frame::none())
            .show(ctx, |ui| ui.max_rect())
            .inner;

        if output.width() >= 1.0 && output.height() >= 1.0 {
            actions.output_rect = Some(output);
        }

        actions
    }
}
