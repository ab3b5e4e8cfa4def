use super::entities::BubbleNode;
use super::forces::{CenterX, CenterY, Collide, Drift, Force, ManyBody};
use crate::domain::logging::LogComponent;
use crate::log_debug;
use crate::view_state::ViewState;

pub const FORCE_X: &str = "x";
pub const FORCE_Y: &str = "y";
pub const FORCE_COLLIDE: &str = "collide";
pub const FORCE_CHARGE: &str = "charge";
pub const FORCE_DRIFT: &str = "drift";

/// Energy and force parameters of the layout
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub alpha_decay: f64,
    /// Energy floor; the simulation never cools below it.
    pub alpha_min: f64,
    pub alpha_target: f64,
    pub velocity_decay: f64,
    /// Energy used to re-integrate a node after hover
    pub release_alpha: f64,
    pub center_strength: f64,
    pub collision_padding: f64,
    pub collision_strength: f64,
    pub charge_strength: f64,
    pub drift_magnitude: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            alpha_decay: 0.002,
            alpha_min: 0.05,
            alpha_target: 0.0,
            velocity_decay: 0.4,
            release_alpha: 0.1,
            center_strength: 0.01,
            collision_padding: 15.0,
            collision_strength: 1.0,
            charge_strength: -30.0,
            drift_magnitude: 1.5,
        }
    }
}

/// Force-directed layout over the current bubbles.
///
/// Hovered bubbles are parked outside the active set so that forces neither
/// move them nor collide with them.
pub struct Simulation {
    active: Vec<BubbleNode>,
    parked: Vec<BubbleNode>,
    forces: Vec<(String, Box<dyn Force>)>,
    alpha: f64,
    settings: SimulationSettings,
    view: ViewState,
    ticks: u64,
}

impl Simulation {
    /// Empty simulation without forces.
    pub fn new(settings: SimulationSettings, view: ViewState) -> Self {
        Self {
            active: Vec::new(),
            parked: Vec::new(),
            forces: Vec::new(),
            alpha: 1.0,
            settings,
            view,
            ticks: 0,
        }
    }

    /// Centering, collision, charge and drift forces configured from `settings`.
    pub fn with_default_forces(settings: SimulationSettings, view: ViewState, seed: u64) -> Self {
        let mut sim = Self::new(settings, view);
        let s = sim.settings.clone();
        sim.recenter();
        sim.force(FORCE_COLLIDE, Collide { padding: s.collision_padding, strength: s.collision_strength })
            .force(FORCE_CHARGE, ManyBody::new(s.charge_strength))
            .force(FORCE_DRIFT, Drift::new(s.drift_magnitude, seed));
        sim
    }

    /// Register `force` under `name`, replacing any force already there.
    pub fn force(&mut self, name: &str, force: impl Force + 'static) -> &mut Self {
        let boxed: Box<dyn Force> = Box::new(force);
        match self.forces.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => slot.1 = boxed,
            None => self.forces.push((name.to_string(), boxed)),
        }
        self
    }

    pub fn remove_force(&mut self, name: &str) -> bool {
        let before = self.forces.len();
        self.forces.retain(|(existing, _)| existing != name);
        before != self.forces.len()
    }

    pub fn force_names(&self) -> Vec<&str> {
        self.forces.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Reheat to `alpha`.
    pub fn restart(&mut self, alpha: f64) {
        self.alpha = alpha.max(self.settings.alpha_min);
    }

    /// Replace every node (new data) and reheat fully.
    pub fn set_nodes(&mut self, nodes: Vec<BubbleNode>) {
        self.parked.clear();
        self.active = nodes;
        for node in &mut self.active {
            node.release();
            let (x, y) = self.view.clamp(node.x, node.y, node.radius);
            node.x = x;
            node.y = y;
        }
        self.restart(1.0);
        log_debug!(LogComponent::Domain("Simulation"), "Loaded {} nodes", self.active.len());
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.parked.clear();
    }

    /// New viewport: re-target the centering forces and reheat fully.
    pub fn resize(&mut self, view: ViewState) {
        self.view = view;
        self.recenter();
        for node in &mut self.parked {
            let (x, y) = view.clamp(node.x, node.y, node.radius);
            node.x = x;
            node.y = y;
            node.fixed = Some((x, y));
        }
        self.restart(1.0);
    }

    fn recenter(&mut self) {
        let (cx, cy) = self.view.center();
        let strength = self.settings.center_strength;
        self.force(FORCE_X, CenterX { target: cx, strength })
            .force(FORCE_Y, CenterY { target: cy, strength });
    }

    /// Advance one step: cool, apply forces, integrate, clamp.
    pub fn tick(&mut self) {
        let s = &self.settings;
        self.alpha += (s.alpha_target - self.alpha) * s.alpha_decay;
        if self.alpha < s.alpha_min {
            self.alpha = s.alpha_min;
        }

        for (_, force) in self.forces.iter_mut() {
            force.apply(&mut self.active, self.alpha);
        }

        let keep = 1.0 - self.settings.velocity_decay;
        for node in &mut self.active {
            node.vx *= keep;
            node.vy *= keep;
            let (x, y) = self.view.clamp(node.x + node.vx, node.y + node.vy, node.radius);
            node.x = x;
            node.y = y;
        }
        self.ticks += 1;
    }

    /// Pin a node where it is and take it out of the force set.
    pub fn hover_enter(&mut self, id: &str) -> bool {
        let Some(index) = self.active.iter().position(|n| n.id == id) else {
            return false;
        };
        let mut node = self.active.remove(index);
        let (x, y) = self.view.clamp(node.x, node.y, node.radius);
        node.x = x;
        node.y = y;
        node.pin(x, y);
        self.parked.push(node);
        self.restart(1.0);
        true
    }

    /// Return a hovered node to the force set with a gentle reheat.
    pub fn hover_exit(&mut self, id: &str) -> bool {
        let Some(index) = self.parked.iter().position(|n| n.id == id) else {
            if self.active.iter().any(|n| n.id == id) {
                self.restart(self.settings.release_alpha);
            }
            return false;
        };
        let mut node = self.parked.remove(index);
        node.release();
        self.active.push(node);
        self.restart(self.settings.release_alpha);
        true
    }

    /// Active nodes followed by hovered ones.
    pub fn nodes(&self) -> impl Iterator<Item = &BubbleNode> {
        self.active.iter().chain(self.parked.iter())
    }

    pub fn active_nodes(&self) -> &[BubbleNode] {
        &self.active
    }

    pub fn hovered_nodes(&self) -> &[BubbleNode] {
        &self.parked
    }

    pub fn node(&self, id: &str) -> Option<&BubbleNode> {
        self.nodes().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.parked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
