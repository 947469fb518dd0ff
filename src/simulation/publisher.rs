//! Tick publication.
//!
//! Listeners are notified synchronously, once per scheduled step, with a
//! borrowed view of the live graph. The view is shared, so a renderer can
//! read positions but cannot mutate them or re-enter the simulation while
//! the step is in progress.

use crate::graph::{Graph, NodeId};

/// Read-only view of the simulation after one step.
#[derive(Clone, Copy)]
pub struct TickFrame<'a> {
    /// Number of steps taken so far, this one included.
    pub tick: u64,
    /// Alpha after this step's decay.
    pub alpha: f64,
    pub graph: &'a Graph,
}

impl<'a> TickFrame<'a> {
    /// Current position of every node, by id.
    pub fn positions(&self) -> impl Iterator<Item = (NodeId, (f64, f64))> + 'a {
        let graph = self.graph;
        graph
            .nodes()
            .iter()
            .map(move |node| (node.id(), graph.bodies().position(node.id().index())))
    }

    /// Current endpoint positions of every link, in link order.
    pub fn link_segments(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + 'a {
        self.graph.link_segments()
    }
}

/// Receives tick notifications.
pub trait TickListener {
    fn on_tick(&mut self, frame: &TickFrame<'_>);

    /// Called once when the simulation converges.
    fn on_end(&mut self, _frame: &TickFrame<'_>) {}
}

impl<F> TickListener for F
where
    F: FnMut(&TickFrame<'_>),
{
    fn on_tick(&mut self, frame: &TickFrame<'_>) {
        self(frame)
    }
}

/// Named listeners, notified in registration order.
#[derive(Default)]
pub struct TickPublisher {
    listeners: Vec<(String, Box<dyn TickListener>)>,
}

impl TickPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under `name`, replacing any listener of that
    /// name in place.
    pub fn subscribe(&mut self, name: &str, listener: Box<dyn TickListener>) {
        match self.listeners.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = listener,
            None => self.listeners.push((name.to_string(), listener)),
        }
    }

    pub fn unsubscribe(&mut self, name: &str) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(n, _)| n != name);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn publish_tick(&mut self, frame: &TickFrame<'_>) {
        for (_, listener) in &mut self.listeners {
            listener.on_tick(frame);
        }
    }

    pub fn publish_end(&mut self, frame: &TickFrame<'_>) {
        for (_, listener) in &mut self.listeners {
            listener.on_end(frame);
        }
    }
}
