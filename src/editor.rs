use crate::{
    config::EditorConfig,
    render::{
        shaders::{DEFAULT_FRAGMENT_SRC, SAMPLE_GRADIENT_FRAGMENT},
        PipelineState, ShaderDevice, ShaderPipeline, Viewport, ViewportSize,
    },
    ui::{ConsoleLog, EditorPanels, PanelActions},
    utils::{
        error::Result,
        save::{choose_save_path, save_shader},
    },
};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Picks the file a save goes to, given the directory to start in.
pub type SavePicker = Box<dyn FnMut(&Path) -> Option<PathBuf>>;

/// One editing session: the panels, the pipeline behind them and the
/// bookkeeping that turns UI actions into pipeline commands.
pub struct ShaderEditor<D: ShaderDevice> {
    pipeline: ShaderPipeline<D, ConsoleLog>,
    panels: EditorPanels,
    save_dir: PathBuf,
    pick_save_path: SavePicker,
    last_viewport: Viewport,
}

impl<D: ShaderDevice> ShaderEditor<D> {
    /// Creates the pipeline and builds the default scene into it.
    pub fn new(device: Arc<D>, config: &EditorConfig, initial: Viewport) -> Result<Self> {
        let mut pipeline = ShaderPipeline::new(device, ConsoleLog::new(), initial)?;

        match pipeline.bootstrap() {
            Ok(_) => info!("Default scene compiled"),
            Err(e) => warn!("Default scene did not build: {}", e),
        }

        Ok(Self {
            pipeline,
            panels: EditorPanels::new(DEFAULT_FRAGMENT_SRC, config.layout.clone()),
            save_dir: config.save_dir(),
            pick_save_path: Box::new(choose_save_path),
            last_viewport: initial,
        })
    }

    /// Replaces the save dialog, e.g. with a fixed location.
    pub fn with_save_picker(
        mut self,
        picker: impl FnMut(&Path) -> Option<PathBuf> + 'static,
    ) -> Self {
        self.pick_save_path = Box::new(picker);
        self
    }

    pub fn pipeline(&self) -> &ShaderPipeline<D, ConsoleLog> {
        &self.pipeline
    }

    pub fn source(&self) -> &str {
        &self.panels.source
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.panels.source = source.into();
    }

    pub fn status(&self) -> Option<&str> {
        self.panels.status.as_deref()
    }

    /// Lays out the panels for this frame.
    pub fn ui(&mut self, ctx: &egui::Context) -> PanelActions {
        self.panels.show(ctx, self.pipeline.console())
    }

    /// Carries out the frame's actions and leaves the output pane drawn.
    ///
    /// Must run after the framebuffer was cleared and before the UI is
    /// painted on top. Returns true when the UI should repaint again.
    pub fn apply(
        &mut self,
        actions: PanelActions,
        pixels_per_point: f32,
        surface_height: u32,
    ) -> bool {
        let mut drawn = false;
        let mut repaint = false;

        if actions.load_sample {
            self.panels.source = SAMPLE_GRADIENT_FRAGMENT.to_string();
            repaint = true;
        }

        if actions.save {
            self.save();
            repaint = true;
        }

        let viewport = actions
            .output_rect
            .and_then(|rect| output_viewport(rect, pixels_per_point, surface_height));
        if let Some(viewport) = viewport {
            if viewport != self.last_viewport {
                self.last_viewport = viewport;
                self.pipeline.on_resize(viewport).ok();
                drawn = true;
            }
        }

        if actions.run {
            self.pipeline.on_run(&self.panels.source).ok();
            drawn = true;
            repaint = true;
        }

        if !drawn && self.pipeline.state() == PipelineState::Ready {
            self.pipeline.render().ok();
        }

        repaint
    }

    fn save(&mut self) {
        let Some(path) = (self.pick_save_path)(&self.save_dir) else {
            info!("Save cancelled");
            self.panels.status = Some("Save cancelled".to_string());
            return;
        };

        match save_shader(&path, &self.panels.source) {
            Ok(()) => self.panels.status = Some(format!("Saved {}", path.display())),
            Err(e) => {
                error!("Failed to save shader: {}", e);
                self.panels.status = Some(format!("Save failed: {}", e));
            }
        }
    }
}

/// Converts the output pane rectangle (points, origin top-left) into a GL
/// viewport (pixels, origin bottom-left) on a surface `surface_height`
/// pixels tall.
pub fn output_viewport(
    rect: egui::Rect,
    pixels_per_point: f32,
    surface_height: u32,
) -> Option<Viewport> {
    let left = (rect.min.x * pixels_per_point).round() as i32;
    let right = (rect.max.x * pixels_per_point).round() as i32;
    let top = (rect.min.y * pixels_per_point).round() as i32;
    let bottom = (rect.max.y * pixels_per_point).round() as i32;

    let width = u32::try_from(right - left).ok()?;
    let height = u32::try_from(bottom - top).ok()?;
    let size = ViewportSize::new(width, height)?;

    Some(Viewport::new(left, surface_height as i32 - bottom, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fake::{Call, FakeDevice};
    use crate::render::Severity;
    use egui::{pos2, Rect};

    fn editor(device: &Arc<FakeDevice>, save_dir: PathBuf) -> ShaderEditor<FakeDevice> {
        let config = EditorConfig {
            save_dir: Some(save_dir),
            ..Default::default()
        };
        let initial = Viewport::full(ViewportSize::new(100, 100).unwrap());
        ShaderEditor::new(device.clone(), &config, initial)
            .unwrap()
            .with_save_picker(|dir| Some(dir.join("shader.frag")))
    }

    fn with_rect(rect: Rect) -> PanelActions {
        PanelActions {
            output_rect: Some(rect),
            ..Default::default()
        }
    }

    #[test]
    fn test_output_viewport_flips_y() {
        let rect = Rect::from_min_max(pos2(400.0, 20.0), pos2(800.0, 470.0));
        let viewport = output_viewport(rect, 2.0, 1200).unwrap();

        assert_eq!(viewport.x, 800);
        assert_eq!(viewport.y, 1200 - 940);
        assert_eq!(viewport.size, ViewportSize::new(800, 900).unwrap());
    }

    #[test]
    fn test_output_viewport_rejects_empty_rect() {
        let rect = Rect::from_min_max(pos2(10.0, 10.0), pos2(10.0, 50.0));
        assert!(output_viewport(rect, 1.0, 100).is_none());
    }

    #[test]
    fn test_starts_with_default_scene_built() {
        let device = Arc::new(FakeDevice::new());
        let dir = tempfile::tempdir().unwrap();
        let editor = editor(&device, dir.path().to_path_buf());

        assert_eq!(editor.pipeline().state(), PipelineState::Ready);
        assert_eq!(editor.source(), DEFAULT_FRAGMENT_SRC);
        assert_eq!(editor.pipeline().console().count(Severity::Info), 1);
    }

    #[test]
    fn test_pane_resize_rerenders_without_compiling() {
        let device = Arc::new(FakeDevice::new());
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&device, dir.path().to_path_buf());
        device.clear_calls();

        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(300.0, 200.0));
        editor.apply(with_rect(rect), 1.0, 200);
        editor.apply(with_rect(rect), 1.0, 200);

        assert_eq!(device.compile_count(), 0);
        let calls = device.calls();
        assert!(calls.contains(&Call::Viewport(0, 0, 300, 200)));
        let draws = calls
            .iter()
            .filter(|c| matches!(c, Call::Draw { .. }))
            .count();
        assert_eq!(draws, 2);
        assert_eq!(editor.pipeline().viewport().size, ViewportSize::new(300, 200).unwrap());
    }

    #[test]
    fn test_run_builds_editor_text() {
        let device = Arc::new(
            FakeDevice::new().with_compile_log("oops", "ERROR: 0:1: 'oops' : syntax error"),
        );
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&device, dir.path().to_path_buf());
        let program = editor.pipeline().active_program().map(|p| p.program);

        editor.set_source("oops");
        let repaint = editor.apply(
            PanelActions {
                run: true,
                ..Default::default()
            },
            1.0,
            100,
        );

        assert!(repaint);
        assert_eq!(editor.pipeline().console().count(Severity::Error), 1);
        assert_eq!(editor.pipeline().console().entries().len(), 1);
        assert_eq!(
            editor.pipeline().active_program().map(|p| p.program),
            program
        );
    }

    #[test]
    fn test_load_sample_replaces_text_only() {
        let device = Arc::new(FakeDevice::new());
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&device, dir.path().to_path_buf());
        let compiles = device.compile_count();

        editor.apply(
            PanelActions {
                load_sample: true,
                ..Default::default()
            },
            1.0,
            100,
        );

        assert_eq!(editor.source(), SAMPLE_GRADIENT_FRAGMENT);
        assert_eq!(device.compile_count(), compiles);
    }

    #[test]
    fn test_save_writes_file_and_status() {
        let device = Arc::new(FakeDevice::new());
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&device, dir.path().to_path_buf());
        editor.set_source("void main(void) {}");

        editor.apply(
            PanelActions {
                save: true,
                ..Default::default()
            },
            1.0,
            100,
        );

        let written = std::fs::read_to_string(dir.path().join("shader.frag")).unwrap();
        assert_eq!(written, "void main(void) {}");
        assert!(editor.status().unwrap().starts_with("Saved"));
        // Saving is not a build: the console is untouched.
        assert_eq!(editor.pipeline().console().entries().len(), 1);
    }

    #[test]
    fn test_idle_frame_redraws_current_program() {
        let device = Arc::new(FakeDevice::new());
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&device, dir.path().to_path_buf());
        device.clear_calls();

        let repaint = editor.apply(PanelActions::default(), 1.0, 100);

        assert!(!repaint);
        assert!(device.calls().contains(&Call::Draw { first: 0, count: 6 }));
    }

    #[test]
    fn test_save_goes_where_picker_points() {
        let device = Arc::new(FakeDevice::new());
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("picked").join("waves.frag");
        let chosen = target.clone();
        let mut editor = editor(&device, dir.path().to_path_buf())
            .with_save_picker(move |_| Some(chosen.clone()));
        editor.set_source("precision mediump float;");

        editor.apply(
            PanelActions {
                save: true,
                ..Default::default()
            },
            1.0,
            100,
        );

        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "precision mediump float;"
        );
        assert!(!dir.path().join("shader.frag").exists());
    }

    #[test]
    fn test_cancelled_save_writes_nothing() {
        let device = Arc::new(FakeDevice::new());
        let dir = tempfile::tempdir().unwrap();
        let start = Arc::new(std::sync::Mutex::new(None));
        let seen = start.clone();
        let mut editor = editor(&device, dir.path().to_path_buf()).with_save_picker(move |dir| {
            *seen.lock().unwrap() = Some(dir.to_path_buf());
            None
        });

        editor.apply(
            PanelActions {
                save: true,
                ..Default::default()
            },
            1.0,
            100,
        );

        assert_eq!(editor.status(), Some("Save cancelled"));
        assert_eq!(start.lock().unwrap().as_deref(), Some(dir.path()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
