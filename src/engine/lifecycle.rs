// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine entry points: run, stop, drain and introspection.

use std::fmt;
use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::config::{load_graph, validate_graph, EngineOptions, Graph, OperatorRegistry};
use crate::engine::builder::DagBuilder;
use crate::engine::node::{NodeContext, RuntimeSettings, Topology};
use crate::engine::snapshot::GraphSnapshot;
use crate::errors::{ConfigError, EngineError};
use crate::observability::messages::engine::{EngineStarted, EngineStopped};
use crate::observability::messages::StructuredLog;

/// Top-level orchestrator for one running graph.
///
/// `run` validates and materializes a graph, then starts every node from the
/// roots downward. While a graph is running, further `run` calls are rejected.
/// `stop` cancels the whole forest and returns the engine to idle; the stopped
/// topology stays available to [`Engine::snapshot`] until the next `run`.
///
/// # Examples
/// ```
/// use the_dagstream::config::OperatorRegistry;
/// use the_dagstream::engine::Engine;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = Engine::new(OperatorRegistry::with_builtin_operators().freeze());
/// let yaml = r#"
/// engine:
///   numbers:
///     module: source/sequence
///     config: { start: 0, step: 3 }
///   sink:
///     module: sink/blackhole
///     parent: [numbers]
/// "#;
///
/// engine.run(&CancellationToken::new(), yaml.as_bytes())?;
/// assert!(engine.is_running());
///
/// engine.shutdown().await;
/// assert!(!engine.is_running());
/// # Ok(())
/// # }
/// ```
pub struct Engine {
    registry: Arc<OperatorRegistry>,
    options: EngineOptions,
    state: Mutex<EngineState>,
}

#[derive(Default)]
struct EngineState {
    running: bool,
    root: Option<CancellationToken>,
    topology: Option<Arc<Topology>>,
}

impl EngineState {
    /// Running, and the caller's cancellation root has not fired.
    fn is_active(&self) -> bool {
        self.running
            && self
                .root
                .as_ref()
                .map(|root| !root.is_cancelled())
                .unwrap_or(false)
    }
}

impl Engine {
    pub fn new(registry: Arc<OperatorRegistry>) -> Self {
        Self::with_options(registry, EngineOptions::default())
    }

    pub fn with_options(registry: Arc<OperatorRegistry>, options: EngineOptions) -> Self {
        Self {
            registry,
            options,
            state: Mutex::new(EngineState::default()),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<OperatorRegistry> {
        &self.registry
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a graph is running. Cancelling the token passed to `run`
    /// also ends the run.
    pub fn is_running(&self) -> bool {
        self.lock_state().is_active()
    }

    /// Decode a graph document from `source` and run it.
    ///
    /// Every node scope derives from `cancel`; cancelling it stops the graph
    /// exactly like [`Engine::stop`].
    pub fn run<R: Read>(&self, cancel: &CancellationToken, source: R) -> Result<(), EngineError> {
        if self.is_running() {
            return Err(EngineError::AlreadyRunning);
        }
        let graph = load_graph(source).map_err(ConfigError::from)?;
        self.run_graph(cancel, graph)
    }

    /// Validate, build and start an already decoded graph.
    ///
    /// Validation and build failures return before any worker is spawned.
    pub fn run_graph(&self, cancel: &CancellationToken, graph: Graph) -> Result<(), EngineError> {
        let handle = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;

        let mut state = self.lock_state();
        if state.is_active() {
            return Err(EngineError::AlreadyRunning);
        }

        validate_graph(&graph).map_err(ConfigError::from)?;

        let settings = RuntimeSettings::new(self.options.slow_threshold, self.options.logger.clone());
        let topology = DagBuilder::new(&graph, &self.registry, self.options.qps_window_capacity)
            .build(cancel, settings)?;

        topology.start(&handle);
        EngineStarted {
            node_count: topology.node_count(),
            root_count: topology.root_count(),
        }
        .log();

        state.running = true;
        state.root = Some(cancel.clone());
        state.topology = Some(topology);
        Ok(())
    }

    /// Cancel every running node. Idempotent.
    ///
    /// Returns without waiting for workers; see [`Engine::shutdown`].
    pub fn stop(&self) {
        let mut state = self.lock_state();
        if !state.running {
            return;
        }
        if let Some(topology) = &state.topology {
            topology.cancel_roots();
            EngineStopped {
                node_count: topology.node_count(),
            }
            .log();
        }
        state.running = false;
    }

    /// Stop, then wait until every worker and sampler has returned.
    pub async fn shutdown(&self) {
        self.stop();
        let topology = self.lock_state().topology.clone();
        if let Some(topology) = topology {
            topology.drained().await;
        }
    }

    /// Point-in-time view of the current (or last stopped) topology.
    pub fn snapshot(&self) -> Option<GraphSnapshot> {
        self.lock_state()
            .topology
            .as_deref()
            .map(GraphSnapshot::capture)
    }

    /// Snapshot rendered as Graphviz DOT.
    pub fn render_dot(&self) -> Option<String> {
        self.snapshot().map(|snapshot| snapshot.render_dot())
    }

    /// Context of a materialized node, as handed to its workers.
    pub fn node_context(&self, name: &str) -> Option<NodeContext> {
        self.lock_state()
            .topology
            .as_ref()
            .and_then(|topology| topology.context(name))
    }

    /// Workers still running across the current topology.
    pub fn active_workers(&self) -> usize {
        self.lock_state()
            .topology
            .as_ref()
            .map(|topology| topology.active_workers())
            .unwrap_or(0)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("running", &state.is_active())
            .field("topology", &state.topology)
            .finish()
    }
}
