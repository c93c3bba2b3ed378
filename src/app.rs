use crate::canvas::{Canvas, SLIDER_MAX, SLIDER_MIN};
use crate::components::dialogs::{
    self, ColourDialog, ColourDialogResult, ConfirmAction, ConfirmDialog, MessageDialog,
};
use crate::components::palette::{SwatchEvent, to_hex};
use crate::components::tools::Tool;
use crate::config::PadConfig;
use crate::io::FileHandler;
use crate::ops::quantize;
use crate::session::Session;
use crate::{log_err, log_info, log_warn};
use eframe::egui;
use egui::{Key, KeyboardShortcut, Modifiers, Vec2};
use std::path::PathBuf;

/// Work that may take a while. It is queued for one frame so the
/// "Please wait" window gets painted before the UI thread blocks.
enum PendingOp {
    Load(PathBuf),
    Adjust,
    Release(Vec2),
    Render,
}

impl PendingOp {
    fn describe(&self) -> &'static str {
        match self {
            PendingOp::Load(_) => "Loading picture...",
            PendingOp::Adjust => "Adjusting picture...",
            PendingOp::Release(_) => "Colouring...",
            PendingOp::Render => "Drawing...",
        }
    }
}

/// One slow operation waiting for its turn. It runs on the second frame
/// after it was queued.
#[derive(Default)]
struct Deferred {
    op: Option<PendingOp>,
    frames: u32,
}

impl Deferred {
    /// Queue `op`. While another one is waiting the request is dropped and
    /// false returned.
    fn push(&mut self, op: PendingOp) -> bool {
        if let Some(waiting) = &self.op {
            log_warn!(
                "Busy with \"{}\", dropped \"{}\"",
                waiting.describe(),
                op.describe()
            );
            return false;
        }
        self.op = Some(op);
        self.frames = 0;
        true
    }

    fn is_idle(&self) -> bool {
        self.op.is_none()
    }

    /// The op to run this frame, or `None` while it is still waiting (the
    /// first time, `waiting` gets its description for the wait window).
    fn poll(&mut self, waiting: impl FnOnce(&'static str)) -> Option<PendingOp> {
        let op = self.op.as_ref()?;
        if self.frames == 0 {
            waiting(op.describe());
            self.frames += 1;
            return None;
        }
        self.op.take()
    }
}

/// Menu and keyboard commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Load,
    Save,
    Adjust,
    Exit,
    Undo,
    ChangeColour,
    ModeFill,
    ModeFix,
    Info,
}

impl Command {
    const FILE: [Command; 4] = [Command::Load, Command::Save, Command::Adjust, Command::Exit];
    const EDIT: [Command; 5] = [
        Command::Undo,
        Command::ChangeColour,
        Command::ModeFill,
        Command::ModeFix,
        Command::Info,
    ];

    fn label(self) -> &'static str {
        match self {
            Command::Load => "Load...",
            Command::Save => "Save...",
            Command::Adjust => "Adjust",
            Command::Exit => "Exit",
            Command::Undo => "Undo",
            Command::ChangeColour => "Change colour",
            Command::ModeFill => "Mode - Fill",
            Command::ModeFix => "Mode - Fix",
            Command::Info => "Info",
        }
    }

    fn shortcut(self) -> KeyboardShortcut {
        let key = match self {
            Command::Load => Key::L,
            Command::Save => Key::S,
            Command::Adjust => Key::A,
            Command::Exit => Key::X,
            Command::Undo => Key::Z,
            Command::ChangeColour => Key::C,
            Command::ModeFill => Key::F,
            Command::ModeFix => Key::I,
            Command::Info => Key::O,
        };
        KeyboardShortcut::new(Modifiers::COMMAND, key)
    }
}

pub struct ColouringPadApp {
    session: Session,
    canvas: Canvas,
    file_handler: FileHandler,
    colour_dialog: ColourDialog,
    confirm: ConfirmDialog,
    message: MessageDialog,
    /// Text of the Info window while it is open.
    info: Option<String>,
    pending: Deferred,
    /// Size of the canvas area last frame, used to fit new pictures.
    viewport: Vec2,
    /// True after the user confirmed exiting with unsaved changes.
    force_exit: bool,
    title: String,
}

impl ColouringPadApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: PadConfig,
        startup_file: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            session: Session::new(config),
            canvas: Canvas::default(),
            file_handler: FileHandler::new(),
            colour_dialog: ColourDialog::default(),
            confirm: ConfirmDialog::default(),
            message: MessageDialog::default(),
            info: None,
            pending: Deferred::default(),
            viewport: Vec2::ZERO,
            force_exit: false,
            title: String::new(),
        };
        app.queue(match startup_file {
            Some(path) => PendingOp::Load(path),
            None => PendingOp::Render,
        });
        app
    }

    fn modal_open(&self) -> bool {
        self.colour_dialog.is_open() || self.confirm.is_open() || self.message.is_open()
    }

    /// Queue a slow operation. While one is waiting, further requests are
    /// dropped with a warning; every operation re-renders when it finishes.
    fn queue(&mut self, op: PendingOp) {
        self.pending.push(op);
    }

    fn run_pending(&mut self, ctx: &egui::Context) {
        let Some(op) = self.pending.poll(|what| {
            dialogs::show_wait(ctx, what);
            ctx.request_repaint();
        }) else {
            return;
        };
        match op {
            PendingOp::Load(path) => match self.session.load(&path, self.viewport) {
                Ok(()) => self.file_handler.remember(&path),
                Err(e) => {
                    log_err!("{}", e);
                    self.message.error(e.to_string());
                }
            },
            PendingOp::Adjust => {
                if let Err(e) = self.session.adjust() {
                    self.message.error(e.to_string());
                }
            }
            PendingOp::Release(pos) => {
                self.session.release(pos);
            }
            PendingOp::Render => {}
        }
        self.refresh(ctx);
    }

    fn refresh(&mut self, ctx: &egui::Context) {
        let result = self.canvas.refresh(
            ctx,
            &self.session.project.image,
            &mut self.session.zoom,
            self.session.config.display_colours,
        );
        if let Err(e) = result {
            log_warn!("Render failed: {}", e);
            self.message.error(e.to_string());
        }
    }

    fn execute(&mut self, ctx: &egui::Context, command: Command) {
        match command {
            Command::Load => {
                if self.session.project.is_dirty {
                    self.confirm.ask(ConfirmAction::Load);
                } else {
                    self.pick_and_load();
                }
            }
            Command::Save => self.save(),
            Command::Adjust => self.queue(PendingOp::Adjust),
            Command::Exit => {
                if self.session.project.is_dirty {
                    self.confirm.ask(ConfirmAction::Exit);
                } else {
                    self.force_exit = true;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
            Command::Undo => {
                if self.session.undo() {
                    self.queue(PendingOp::Render);
                }
            }
            Command::ChangeColour => {
                let index = self.session.palette.selected();
                self.colour_dialog
                    .open(index, self.session.palette.selected_color());
            }
            Command::ModeFill => self.session.set_tool(Tool::Fill),
            Command::ModeFix => self.session.set_tool(Tool::Fix),
            Command::Info => {
                self.info = if self.info.is_some() {
                    None
                } else {
                    Some(self.info_text())
                };
            }
        }
    }

    fn pick_and_load(&mut self) {
        if let Some(path) = self.file_handler.pick_open() {
            self.queue(PendingOp::Load(path));
        }
    }

    fn save(&mut self) {
        let suggested = self
            .session
            .project
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "picture.png".to_string());
        let Some(path) = self.file_handler.pick_save(&suggested) else {
            return;
        };
        match self.session.save(&path) {
            Ok(()) => self.file_handler.remember(&path),
            Err(e) => {
                log_err!("{}", e);
                self.message.error(e.to_string());
            }
        }
    }

    fn info_text(&self) -> String {
        let project = &self.session.project;
        let (w, h) = project.image.dimensions();
        let colours = quantize::color_histogram(&project.image).len();
        format!(
            "Picture: {}\nSize: {} x {}\nZoom: {}%\nColours in picture: {}\nSelected colour: {}\nMode: {}\nUndo available: {}",
            project
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| project.name.clone()),
            w,
            h,
            self.session.zoom.zoom_percent(),
            colours,
            to_hex(self.session.chosen_color()),
            self.session.tools.active().label(),
            if project.history.can_undo() {
                format!("yes ({} KB)", project.history.memory_size() / 1024)
            } else {
                "no".to_string()
            },
        )
    }

    /// Keyboard shortcuts for every menu command.
    fn read_shortcuts(&self, ctx: &egui::Context) -> Option<Command> {
        if self.modal_open() {
            return None;
        }
        for command in Command::FILE.into_iter().chain(Command::EDIT) {
            let shortcut = command.shortcut();
            if ctx.input_mut(|i| i.consume_shortcut(&shortcut)) {
                return Some(command);
            }
        }
        // Some backends turn Ctrl+C / Ctrl+X into clipboard events instead
        // of key presses.
        ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Copy => Some(Command::ChangeColour),
                egui::Event::Cut => Some(Command::Exit),
                _ => None,
            })
        })
    }

    fn menu_bar(&self, ctx: &egui::Context) -> Option<Command> {
        let mut chosen = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                for (title, commands) in [("File", &Command::FILE[..]), ("Edit", &Command::EDIT[..])] {
                    ui.menu_button(title, |ui| {
                        for &command in commands {
                            let button = egui::Button::new(command.label())
                                .shortcut_text(ctx.format_shortcut(&command.shortcut()));
                            if ui.add(button).clicked() {
                                chosen = Some(command);
                                ui.close_menu();
                            }
                        }
                    });
                }
            });
        });
        chosen
    }

    /// Load / Save / Exit buttons, zoom slider and mode radios.
    fn button_strip(&mut self, ctx: &egui::Context) -> Option<Command> {
        let mut chosen = None;
        let mut picked_tool = None;
        let mut slider = self.session.zoom.slider();
        let mut slider_changed = false;
        egui::TopBottomPanel::top("button_strip").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for command in [Command::Load, Command::Save, Command::Exit] {
                    let text = command.label().trim_end_matches("...");
                    if ui.button(text).clicked() {
                        chosen = Some(command);
                    }
                }
                ui.separator();
                ui.label("Zoom");
                slider_changed = ui
                    .add(
                        egui::Slider::new(&mut slider, SLIDER_MIN..=SLIDER_MAX)
                            .show_value(false)
                            .text(format!("{}%", self.session.zoom.zoom_percent())),
                    )
                    .changed();
                ui.separator();
                picked_tool = self.session.tools.show(ui);
            });
        });
        if slider_changed && self.session.zoom.on_slider_moved(slider) {
            log_info!("Zoom {}%", self.session.zoom.zoom_percent());
            self.queue(PendingOp::Render);
        }
        if let Some(tool) = picked_tool {
            self.session.set_tool(tool);
        }
        chosen
    }

    fn palette_strip(&mut self, ctx: &egui::Context) {
        let mut event = None;
        egui::TopBottomPanel::top("palette_strip").show(ctx, |ui| {
            event = self.session.palette.show(ui);
        });
        if let Some(SwatchEvent::EditRequested(index)) = event
            && let Some(current) = self.session.palette.color(index)
        {
            self.colour_dialog.open(index, current);
        }
        self.session.apply_palette_changes();
    }

    fn picture(&mut self, ctx: &egui::Context) {
        let accept_input = !self.modal_open() && self.pending.is_idle();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewport = ui.available_size();
            let Some((image_rect, visible)) = self.canvas.show(ui) else {
                return;
            };
            if !accept_input {
                return;
            }
            let (pressed, released, pos) = ui.input(|i| {
                (
                    i.pointer.primary_pressed(),
                    i.pointer.primary_released(),
                    i.pointer.interact_pos(),
                )
            });
            let Some(pos) = pos else {
                return;
            };
            if pressed && ui.rect_contains_pointer(visible) {
                self.session.press(pos - image_rect.min);
            }
            if released && self.session.is_pressed() {
                self.queue(PendingOp::Release(pos - image_rect.min));
            }
        });
    }

    fn dialogs(&mut self, ctx: &egui::Context) {
        if let Some(ColourDialogResult::Accepted { index, color }) = self.colour_dialog.show(ctx) {
            self.session.palette.set_color(index, color);
            self.session.apply_palette_changes();
        }

        match self.confirm.show(ctx) {
            Some(ConfirmAction::Load) => self.pick_and_load(),
            Some(ConfirmAction::Exit) => {
                self.force_exit = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            None => {}
        }

        self.message.show(ctx);

        if let Some(text) = &self.info {
            let mut open = true;
            egui::Window::new("Info")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(text.as_str());
                });
            if !open {
                self.info = None;
            }
        }
    }
}

impl eframe::App for ColouringPadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let title = format!("Colouring Pad - {}", self.session.project.display_title());
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }

        // --- OS close button goes through the unsaved-changes question ---
        if ctx.input(|i| i.viewport().close_requested())
            && !self.force_exit
            && self.session.project.is_dirty
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.confirm.ask(ConfirmAction::Exit);
        }

        let mut commands = Vec::new();
        commands.extend(self.read_shortcuts(ctx));
        commands.extend(self.menu_bar(ctx));
        commands.extend(self.button_strip(ctx));
        self.palette_strip(ctx);
        self.picture(ctx);

        for command in commands {
            self.execute(ctx, command);
        }

        self.dialogs(ctx);
        self.run_pending(ctx);
    }
}
