//! Simulation driver.
//!
//! Owns the graph, the force registry, alpha and the run state. One call to
//! [`Simulation::step`] is one scheduled tick:
//!
//! 1. every registered force adds to velocities at the current alpha
//! 2. velocities decay and are integrated into positions (pinned nodes snap
//!    to their pin instead)
//! 3. alpha moves toward its target by `alpha_decay`
//! 4. listeners are notified; if alpha dropped below `alpha_min` the
//!    simulation converges and stops stepping until reheated
//!
//! The host's animation loop decides when to call `step`; nothing here
//! schedules itself, so two steps of one simulation can never overlap.

mod publisher;

pub use publisher::{TickFrame, TickListener, TickPublisher};

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::force::{Force, ForceContext, ForceRegistry, Jiggle};
use crate::graph::{Graph, NodeId};
use crate::spatial::SpatialIndex;

/// Run state of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built but never started.
    Idle,
    Running,
    /// Alpha fell below `alpha_min`; waiting for a reheat.
    Converged,
    /// Halted by [`Simulation::stop`].
    Stopped,
}

/// What a call to [`Simulation::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A tick ran and the simulation is still running.
    Ticked,
    /// A tick ran and alpha fell below the threshold.
    Converged,
    /// Not running; nothing happened.
    Idle,
}

pub struct Simulation {
    graph: Graph,
    forces: ForceRegistry,
    publisher: TickPublisher,
    config: SimulationConfig,
    alpha: f64,
    alpha_target: f64,
    phase: Phase,
    ticks: u64,
    jiggle: Jiggle,
}

impl Simulation {
    /// Wrap `graph` in an idle simulation with no forces.
    pub fn new(graph: Graph, config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            graph,
            forces: ForceRegistry::new(),
            publisher: TickPublisher::new(),
            alpha: config.alpha,
            alpha_target: config.alpha_target,
            phase: Phase::Idle,
            ticks: 0,
            jiggle: Jiggle::new(config.seed),
            config,
        })
    }

    // =========================================================================
    // Forces
    // =========================================================================

    /// Register or replace the force called `name`.
    ///
    /// On error the previous force of that name, if any, stays active.
    pub fn force(&mut self, name: &str, force: impl Force + 'static) -> Result<(), ConfigError> {
        self.forces.insert(name, Box::new(force), &self.graph)
    }

    /// Register a batch of boxed forces in order, stopping at the first
    /// rejected one.
    pub fn register_all<I, S>(&mut self, forces: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (S, Box<dyn Force>)>,
        S: AsRef<str>,
    {
        for (name, force) in forces {
            self.forces.insert(name.as_ref(), force, &self.graph)?;
        }
        Ok(())
    }

    pub fn remove_force(&mut self, name: &str) -> bool {
        self.forces.remove(name)
    }

    pub fn forces(&self) -> &ForceRegistry {
        &self.forces
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Subscribe `listener` to tick and end notifications under `name`.
    pub fn on_tick(&mut self, name: &str, listener: impl TickListener + 'static) {
        self.publisher.subscribe(name, Box::new(listener));
    }

    pub fn remove_listener(&mut self, name: &str) -> bool {
        self.publisher.unsubscribe(name)
    }

    // =========================================================================
    // Run control
    // =========================================================================

    /// Begin (or resume) stepping.
    pub fn start(&mut self) {
        if self.phase != Phase::Running {
            log::info!("simulation started (alpha {:.4})", self.alpha);
            self.phase = Phase::Running;
        }
    }

    /// Raise alpha's target and resume stepping from any state.
    pub fn reheat(&mut self, target: f64) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&target) {
            return Err(ConfigError::InvalidSimulation {
                parameter: "alpha_target",
                value: target,
            });
        }
        self.alpha_target = target;
        if self.phase != Phase::Running {
            log::debug!("simulation reheated from {:?} (target {target})", self.phase);
            self.phase = Phase::Running;
        }
        Ok(())
    }

    /// Let alpha decay back to zero.
    pub fn settle(&mut self) {
        self.alpha_target = 0.0;
        log::debug!("simulation settling (alpha {:.4})", self.alpha);
    }

    /// Halt stepping. Positions keep their last values. Idempotent.
    pub fn stop(&mut self) {
        if self.phase != Phase::Stopped {
            log::info!("simulation stopped after {} ticks", self.ticks);
            self.phase = Phase::Stopped;
        }
    }

    /// Set alpha directly, e.g. to restart a converged layout at full heat.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ConfigError::InvalidSimulation {
                parameter: "alpha",
                value: alpha,
            });
        }
        self.alpha = alpha;
        Ok(())
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Run one scheduled tick if running, notifying listeners.
    pub fn step(&mut self) -> StepOutcome {
        if self.phase != Phase::Running {
            return StepOutcome::Idle;
        }

        self.advance();
        let frame = TickFrame {
            tick: self.ticks,
            alpha: self.alpha,
            graph: &self.graph,
        };
        self.publisher.publish_tick(&frame);

        if self.alpha < self.config.alpha_min {
            self.publisher.publish_end(&frame);
            self.phase = Phase::Converged;
            log::info!("simulation converged after {} ticks", self.ticks);
            return StepOutcome::Converged;
        }
        StepOutcome::Ticked
    }

    /// Advance `n` ticks immediately, without notifying listeners and
    /// regardless of the run state. Useful to pre-settle a layout before
    /// its first frame is drawn.
    pub fn tick(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn advance(&mut self) {
        let mut ctx = ForceContext {
            bodies: self.graph.bodies_mut(),
            alpha: self.alpha,
            jiggle: &mut self.jiggle,
        };
        self.forces.apply_all(&mut ctx);
        self.graph
            .bodies_mut()
            .integrate(1.0 - self.config.velocity_decay);
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        self.ticks += 1;
    }

    // =========================================================================
    // Pins (interaction layer only)
    // =========================================================================

    pub(crate) fn pin(&mut self, id: NodeId, x: f64, y: f64) -> bool {
        if id.index() >= self.graph.node_count() {
            return false;
        }
        self.graph.bodies_mut().set_pin(id.index(), x, y);
        true
    }

    pub(crate) fn unpin(&mut self, id: NodeId) -> bool {
        if id.index() >= self.graph.node_count() {
            return false;
        }
        self.graph.bodies_mut().clear_pin(id.index());
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Nearest node within `radius` of a point in simulation coordinates.
    pub fn find(&self, x: f64, y: f64, radius: f64) -> Option<NodeId> {
        let bodies = self.graph.bodies();
        SpatialIndex::from_positions(bodies.positions_x(), bodies.positions_y())
            .nearest_within(x, y, radius)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Ticks taken so far, manual ones included.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}
