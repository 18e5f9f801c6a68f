/// Petgraph-based simulated execution engine
///
/// Compiles a workflow's connections into a directed graph, rejects cyclic
/// graphs, and walks the nodes reachable from the trigger entry points in
/// dependency order. Every node status transition is written back to the
/// store and hot-swapped into the registry, so dashboard polls observe the
/// run progressing. The walk checks the shared cancellation flag between
/// nodes and finishes by parking the workflow in the paused state.

use crate::runtime::controller::{RunController, RunToken};
use crate::runtime::executor::NodeExecutor;
use crate::workflow::registry::{CompiledWorkflow, WorkflowRegistry};
use crate::workflow::storage::WorkflowStore;
use crate::workflow::types::{Node, NodeRunState, NodeType, Workflow, WorkflowStatus};
use anyhow::Result;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Simulated execution engine over the workflow dependency graph
#[derive(Debug)]
pub struct ExecutionEngine {
    /// Node executor providing the per-type simulated pace
    executor: Arc<NodeExecutor>,
    /// Persistent store the run writes progress into
    storage: WorkflowStore,
    /// Hot registry swapped after every persisted mutation
    registry: Arc<WorkflowRegistry>,
    /// Single-run guard with the shared cancellation flag
    controller: Arc<RunController>,
}

/// Validated, ordered run plan for one workflow
///
/// Produced before the run starts so structural problems (no trigger,
/// unknown connection endpoints, cycles) surface synchronously.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    /// Workflow the plan was built for
    pub workflow_id: String,
    /// Node IDs in dependency order, restricted to nodes reachable from a trigger
    pub ordered_node_ids: Vec<String>,
}

/// Summary of a finished (or cancelled) simulated run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Node executions performed across all passes
    pub nodes_executed: usize,
    /// Whether the run was stopped before completing
    pub cancelled: bool,
    /// Number of passes over the graph (2 when the workflow looped once)
    pub passes: usize,
}

impl ExecutionEngine {
    /// Create new execution engine over the shared runtime pieces
    pub fn new(
        executor: Arc<NodeExecutor>,
        storage: WorkflowStore,
        registry: Arc<WorkflowRegistry>,
        controller: Arc<RunController>,
    ) -> Self {
        Self {
            executor,
            storage,
            registry,
            controller,
        }
    }

    /// Build and validate the run plan for a compiled workflow
    ///
    /// Fails when the workflow has no trigger node, a connection references
    /// an unknown node, or the connection graph contains a cycle.
    pub fn plan(&self, compiled: &CompiledWorkflow) -> Result<ExecutionPlan> {
        let workflow = &compiled.workflow;

        if compiled.start_node_ids.is_empty() {
            return Err(anyhow::anyhow!(
                "No trigger node found - a workflow needs at least one trigger node to start"
            ));
        }

        let graph = build_dependency_graph(workflow)?;

        // Cycle rejection doubles as the dependency-order computation
        let topo_order = toposort(&graph.graph, None)
            .map_err(|_| anyhow::anyhow!("Workflow connections contain a cycle"))?;

        // Union of nodes reachable from every trigger entry point
        let mut reachable = HashSet::new();
        for start_id in &compiled.start_node_ids {
            let start_index = graph
                .node_id_to_index
                .get(start_id)
                .ok_or_else(|| anyhow::anyhow!("Trigger node not found in graph: {}", start_id))?;
            collect_reachable(&graph.graph, *start_index, &mut reachable);
        }

        let ordered_node_ids: Vec<String> = topo_order
            .iter()
            .filter(|idx| reachable.contains(idx))
            .map(|idx| graph.graph[*idx].id.clone())
            .collect();

        tracing::debug!(
            "📋 Planned run for '{}': {} of {} nodes reachable",
            workflow.id,
            ordered_node_ids.len(),
            workflow.nodes.len()
        );

        Ok(ExecutionPlan {
            workflow_id: workflow.id.clone(),
            ordered_node_ids,
        })
    }

    /// Execute a planned run to completion, cancellation, or failure
    ///
    /// Claims the single run slot, walks the plan (twice when the workflow
    /// is flagged to loop), and always parks the workflow in the paused
    /// state before releasing the slot.
    pub async fn run(&self, plan: ExecutionPlan) -> Result<RunOutcome> {
        let token = self.controller.begin(&plan.workflow_id);
        let started = std::time::Instant::now();

        tracing::info!(
            "🚀 Starting simulated run of '{}' ({} nodes)",
            plan.workflow_id,
            plan.ordered_node_ids.len()
        );

        let outcome = self.run_passes(&plan, &token).await;

        // The workflow ends paused whether the run succeeded, failed, or was stopped
        if let Err(e) = self
            .set_workflow_status(&plan.workflow_id, WorkflowStatus::Paused)
            .await
        {
            tracing::error!("Failed to park workflow '{}' as paused: {}", plan.workflow_id, e);
        }
        self.controller.finish(&token);

        match &outcome {
            Ok(result) if result.cancelled => {
                tracing::info!(
                    "⏹️ Run of '{}' stopped after {} nodes in {:?}",
                    plan.workflow_id,
                    result.nodes_executed,
                    started.elapsed()
                );
            }
            Ok(result) => {
                tracing::info!(
                    "🎉 Run of '{}' completed: {} nodes over {} pass(es) in {:?}",
                    plan.workflow_id,
                    result.nodes_executed,
                    result.passes,
                    started.elapsed()
                );
            }
            Err(e) => {
                tracing::error!("❌ Run of '{}' failed: {}", plan.workflow_id, e);
            }
        }

        outcome
    }

    /// Walk the plan once, replaying a second time for loop-flagged workflows
    async fn run_passes(&self, plan: &ExecutionPlan, token: &RunToken) -> Result<RunOutcome> {
        self.set_workflow_status(&plan.workflow_id, WorkflowStatus::Running)
            .await?;

        let mut nodes_executed = 0;
        let mut passes = 0;
        let mut replayed = false;

        loop {
            passes += 1;
            let cancelled = self.run_single_pass(plan, token, &mut nodes_executed).await?;
            if cancelled {
                return Ok(RunOutcome {
                    nodes_executed,
                    cancelled: true,
                    passes,
                });
            }

            // Loop-flagged workflows replay exactly once, then drop the flag
            let workflow = self.load_workflow(&plan.workflow_id).await?;
            if workflow.is_looping && !replayed {
                replayed = true;
                tracing::info!("🔁 Looping workflow '{}' one more time", plan.workflow_id);
                self.mutate_workflow(&plan.workflow_id, |wf| {
                    wf.reset_node_states();
                })
                .await?;
                continue;
            }

            if replayed {
                self.mutate_workflow(&plan.workflow_id, |wf| {
                    wf.is_looping = false;
                })
                .await?;
            }

            return Ok(RunOutcome {
                nodes_executed,
                cancelled: false,
                passes,
            });
        }
    }

    /// Execute every planned node once, in order
    ///
    /// Returns true when the run was cancelled at a node boundary.
    async fn run_single_pass(
        &self,
        plan: &ExecutionPlan,
        token: &RunToken,
        nodes_executed: &mut usize,
    ) -> Result<bool> {
        for (step, node_id) in plan.ordered_node_ids.iter().enumerate() {
            if token.is_cancelled() {
                tracing::info!(
                    "Run of '{}' stopped before step {}",
                    plan.workflow_id,
                    step + 1
                );
                return Ok(true);
            }

            let node = self
                .mark_node(&plan.workflow_id, node_id, NodeRunState::Running)
                .await?;

            tracing::info!(
                "📍 Step {}/{}: node '{}' ({:?})",
                step + 1,
                plan.ordered_node_ids.len(),
                node.name,
                node.node_type
            );

            self.executor.execute_node(&node).await?;

            self.mark_node(&plan.workflow_id, node_id, NodeRunState::Completed)
                .await?;
            *nodes_executed += 1;
        }

        Ok(false)
    }

    /// Persist a node status transition and return the updated node
    async fn mark_node(
        &self,
        workflow_id: &str,
        node_id: &str,
        state: NodeRunState,
    ) -> Result<Node> {
        let mut marked = None;
        self.mutate_workflow(workflow_id, |wf| {
            if let Some(node) = wf.nodes.iter_mut().find(|n| n.id == node_id) {
                node.status = state;
                if state == NodeRunState::Running && node.node_type == NodeType::Agent {
                    node.current_task = Some("Processing...".to_string());
                }
                marked = Some(node.clone());
            }
        })
        .await?;

        marked.ok_or_else(|| {
            anyhow::anyhow!("Node '{}' disappeared from workflow '{}'", node_id, workflow_id)
        })
    }

    /// Persist a workflow status transition
    pub async fn set_workflow_status(
        &self,
        workflow_id: &str,
        status: WorkflowStatus,
    ) -> Result<()> {
        self.mutate_workflow(workflow_id, |wf| {
            wf.status = status;
        })
        .await
    }

    /// Load, mutate, save, and hot-reload a workflow record
    async fn mutate_workflow<F>(&self, workflow_id: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Workflow),
    {
        let mut workflow = self.load_workflow(workflow_id).await?;
        mutate(&mut workflow);
        self.storage.save_workflow(&workflow).await?;
        self.registry.reload_workflow(workflow_id).await?;
        Ok(())
    }

    async fn load_workflow(&self, workflow_id: &str) -> Result<Workflow> {
        self.storage
            .get_workflow(workflow_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Workflow not found: {}", workflow_id))
    }
}

/// Workflow connections as a petgraph DiGraph with ID mappings
struct DependencyGraph {
    graph: DiGraph<Node, ()>,
    node_id_to_index: HashMap<String, NodeIndex>,
}

/// Build the dependency graph, rejecting connections to unknown nodes
fn build_dependency_graph(workflow: &Workflow) -> Result<DependencyGraph> {
    let mut graph = DiGraph::new();
    let mut node_id_to_index = HashMap::new();

    for node in &workflow.nodes {
        let index = graph.add_node(node.clone());
        node_id_to_index.insert(node.id.clone(), index);
    }

    for connection in &workflow.connections {
        let from = node_id_to_index.get(&connection.from).ok_or_else(|| {
            anyhow::anyhow!("Connection references unknown node: {}", connection.from)
        })?;
        let to = node_id_to_index.get(&connection.to).ok_or_else(|| {
            anyhow::anyhow!("Connection references unknown node: {}", connection.to)
        })?;
        graph.add_edge(*from, *to, ());
    }

    Ok(DependencyGraph {
        graph,
        node_id_to_index,
    })
}

/// BFS from a start node, adding every reachable node to `reachable`
fn collect_reachable(
    graph: &DiGraph<Node, ()>,
    start: NodeIndex,
    reachable: &mut HashSet<NodeIndex>,
) {
    let mut queue = VecDeque::new();
    queue.push_back(start);
    reachable.insert(start);

    while let Some(current) = queue.pop_front() {
        for target in graph.neighbors(current) {
            if reachable.insert(target) {
                queue.push_back(target);
            }
        }
    }
}
