use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Result;
use eframe::egui::{self, Context};

use crate::graph::{CausalGraph, DisplayMode, RegroupEvent, WorkingGraph, load_payload};

mod controls;
pub mod interaction;
pub mod search;
pub mod selection;
pub mod simulation;
mod view;
pub mod viewport;

use interaction::DragHandler;
use selection::{GraphEvent, SelectionEngine};
use simulation::Simulation;
use viewport::{FOCUS_ZOOM, Viewport};

pub struct ScopeApp {
    input_path: PathBuf,
    state: AppState,
    reload_rx: Option<Receiver<Result<CausalGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<CausalGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// One graph panel: the canonical graph for the current analysis result,
/// its filtered working projection, and the simulation, viewport,
/// selection and drag machinery operating on that projection.
pub struct ViewModel {
    graph: CausalGraph,
    mode: DisplayMode,
    search: String,
    working: WorkingGraph,
    simulation: Simulation,
    viewport: Viewport,
    selection: SelectionEngine,
    drag: DragHandler,
    working_dirty: bool,
}

impl ViewModel {
    pub fn new(graph: CausalGraph) -> Self {
        let mode = DisplayMode::All;
        let working = WorkingGraph::project(&graph, mode);
        let simulation = Simulation::new(&working);
        Self {
            graph,
            mode,
            search: String::new(),
            working,
            simulation,
            viewport: Viewport::new(),
            selection: SelectionEngine::default(),
            drag: DragHandler::default(),
            working_dirty: false,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        if self.mode != mode {
            self.mode = mode;
            self.working_dirty = true;
        }
    }

    /// Concept regrouping from the cluster editor. Recolors only; the
    /// rebuild keeps the simulation alive because node/edge identity is
    /// unchanged.
    pub fn apply_regroup(&mut self, event: &RegroupEvent) {
        if self.graph.apply_regroup(event) {
            self.working_dirty = true;
        }
    }

    /// Selection and hover change notifications since the last call.
    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        self.selection.drain_events()
    }

    fn rebuild_working(&mut self) {
        let next = WorkingGraph::project(&self.graph, self.mode);
        if next.signature != self.working.signature {
            log::debug!(
                "working graph replaced: {} nodes, {} edges ({})",
                next.node_count(),
                next.edges.len(),
                self.mode.label()
            );
            self.selection.invalidate(&self.working);
            self.drag.cancel();
        }
        self.simulation.rebuild(&next);
        self.working = next;
        self.working_dirty = false;
    }

    /// Search box submit: the first substring match in working order
    /// gets selected and the viewport glides onto it. A miss changes
    /// nothing.
    fn run_search(&mut self) {
        let Some(index) = search::find_in_working(&self.working, &self.search) else {
            return;
        };
        self.selection.select(&self.working, Some(index));
        if let Some(position) = self.simulation.position(index) {
            self.viewport.focus_on(position, FOCUS_ZOOM);
        }
    }

    pub fn show(&mut self, ctx: &Context, reload_requested: &mut bool, is_reloading: bool) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.draw_controls(ui, reload_requested, is_reloading);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_graph(ui);
        });
    }
}

fn load_graph(path: &Path) -> Result<CausalGraph> {
    let payload = load_payload(path)?;
    let graph = CausalGraph::from_payload(&payload);
    log::info!(
        "loaded {}: {} variables, {} causal links ({} raw edges)",
        path.display(),
        graph.node_count(),
        graph.edges.len(),
        payload.edges.len()
    );
    Ok(graph)
}

impl ScopeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, input_path: PathBuf) -> Self {
        let state = Self::start_load(input_path.clone());
        Self {
            input_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(input_path: PathBuf) -> Receiver<Result<CausalGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_graph(&input_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(input_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(input_path),
        }
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading causal network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the graph payload");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.input_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                for event in model.take_events() {
                    match event {
                        GraphEvent::SelectionChanged(id) => {
                            log::debug!("selection changed: {id:?}");
                        }
                        GraphEvent::HoverChanged(id) => log::debug!("hover changed: {id:?}"),
                    }
                }

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.input_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            // A fresh payload replaces the whole panel,
                            // viewport included.
                            transition = Some(match result {
                                Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
