use std::collections::VecDeque;

use egui::{Color32, Vec2};
use log::{debug, error, info};
use maze::{Grid, Mailbox, Size};

use crate::event::{self, Event, KeyAction, MouseButton};
use crate::settings::Settings;

const INSTRUCTIONS: &[&str] = &[
    "• The red tile in the top-left corner is the start point.",
    "• The red tile in the bottom-right corner is the goal.",
    "• The black tiles are the walls.",
    "• The grey tiles have been visited but are not part of the path.",
    "• Hold left-click and drag to create paths for the maze. They are drawn white.",
    "• To delete a path, hold right-click and drag.",
    "• Press space to solve the maze.",
    "• The solution is drawn green. Moving diagonally is not allowed.",
    "• Press escape to clear the solution and the drawn paths.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialog {
    Instructions,
    AskShowStep,
    Notice {
        title: &'static str,
        message: &'static str,
    },
}

impl Dialog {
    fn title(&self) -> &'static str {
        match self {
            Dialog::Instructions => "Instructions",
            Dialog::AskShowStep => "Solve",
            Dialog::Notice { title, .. } => *title,
        }
    }
}

/// The part of the app that solve callbacks may touch
#[derive(Debug, Default)]
pub struct UiState {
    dialog: Option<Dialog>,
    /// result of the last finished solve
    outcome: Option<bool>,
}

impl UiState {
    fn on_solved(&mut self, found: bool) {
        info!("solve finished: path found = {}", found);
        self.outcome = Some(found);
        if !found {
            self.dialog = Some(Dialog::Notice {
                title: "Result",
                message: "Path Not Found!",
            });
        }
    }
}

pub struct App {
    grid: Grid,
    surface: Vec2,
    mailbox: Mailbox<UiState>,
    state: UiState,
    events: VecDeque<Event>,
}

impl App {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let egui_ctx = cc.egui_ctx.clone();
        let mailbox = Mailbox::with_waker(move || egui_ctx.request_repaint());

        debug!(
            "creating {} grid on a {}px surface",
            settings.size, settings.surface
        );

        App {
            grid: Grid::new(
                settings.size.columns,
                settings.size.rows,
                Size::new(settings.surface, settings.surface),
            ),
            surface: Vec2::splat(settings.surface),
            mailbox,
            state: UiState {
                dialog: Some(Dialog::Instructions),
                outcome: None,
            },
            events: VecDeque::new(),
        }
    }

    fn handle_event(&mut self, event: Event) {
        // the grid must not be touched while the worker is searching
        if self.grid.is_solving() {
            return;
        }

        match event {
            Event::Pointer {
                x,
                y,
                button: MouseButton::Main,
            } => self.grid.set_as_path(x, y),
            Event::Pointer {
                x,
                y,
                button: MouseButton::Secondary,
            } => self.grid.set_as_wall(x, y),
            Event::KeyPressed(KeyAction::Reset) => {
                debug!("resetting the maze");
                self.grid.reset();
                self.state.outcome = None;
            }
            Event::KeyPressed(KeyAction::Solve) => self.state.dialog = Some(Dialog::AskShowStep),
        }
    }

    fn start_solve(&mut self, show_step: bool) {
        self.grid.un_solve();
        self.state.outcome = None;

        match self.grid.solve(show_step) {
            Ok(handle) => handle.on_complete(&self.mailbox, UiState::on_solved),
            Err(e) => {
                error!("could not start solving: {:#}", e);
                self.state.dialog = Some(Dialog::Notice {
                    title: "Error",
                    message: "The solver is not available.",
                });
            }
        }
    }

    fn status(&self) -> &'static str {
        if self.grid.is_solving() {
            return "Solving…";
        }
        match self.state.outcome {
            Some(true) => "Path found",
            Some(false) => "No path",
            None => "Draw a maze, then press space to solve",
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.state.dialog else {
            return;
        };

        let mut close = false;
        let mut solve = None;

        egui::Window::new(dialog.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| match dialog {
                Dialog::Instructions => {
                    for line in INSTRUCTIONS {
                        ui.label(*line);
                    }
                    close = ui.button("OK").clicked();
                }
                Dialog::AskShowStep => {
                    ui.label("Show step?");
                    ui.horizontal(|ui| {
                        if ui.button("Yes").clicked() {
                            solve = Some(true);
                        }
                        if ui.button("No").clicked() {
                            solve = Some(false);
                        }
                    });
                }
                Dialog::Notice { message, .. } => {
                    ui.label(message);
                    close = ui.button("OK").clicked();
                }
            });

        if close || solve.is_some() {
            self.state.dialog = None;
        }
        if let Some(show_step) = solve {
            self.start_solve(show_step);
        }
    }

    fn paint_grid(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(self.surface, egui::Sense::click_and_drag());
        let origin = response.rect.min;

        painter.rect_filled(response.rect, 0.0, Color32::BLACK);
        self.grid.draw(|rect, color| {
            let [r, g, b] = color.rgb();
            painter.rect_filled(
                egui::Rect::from_min_size(
                    origin + Vec2::new(rect.x, rect.y),
                    Vec2::new(rect.width, rect.height),
                ),
                0.0,
                Color32::from_rgb(r, g, b),
            );
        });

        if self.state.dialog.is_none() && !self.grid.is_solving() {
            event::push_pointer(ui.ctx(), response.rect, &mut self.events);
        }
    }
}

impl eframe::App for App {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // run the callbacks of solves that finished since the last frame
        self.mailbox.dispatch(&mut self.state);

        let status = self.status();
        let mut show_help = false;
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                show_help = ui.button("Help").clicked();
                ui.add_space(16.0);
                ui.label(status);
            });
        });
        if show_help && self.state.dialog.is_none() {
            self.state.dialog = Some(Dialog::Instructions);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.paint_grid(ui);
        });

        if self.state.dialog.is_none() && !self.grid.is_solving() {
            event::push_keys(ctx, &mut self.events);
        }
        while let Some(event) = self.events.pop_front() {
            self.handle_event(event);
        }

        self.show_dialog(ctx);

        // keep repainting so every step of the search shows up
        if self.grid.is_solving() {
            ctx.request_repaint();
        }
    }
}
