//! Team execution under the five composition strategies

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::context::SharedContext;
use super::errors::{InvocationError, OrchestrationError, OrchestrationResult};
use super::invoker::{InvocationRequest, WorkerInvoker};
use super::registry::WorkerRegistry;
use crate::domain::team::{TeamConfiguration, TeamMember, TeamResult, TeamRunStatus, TeamStrategy};
use crate::domain::worker::WorkerResult;
use crate::domain::Payload;

/// Context key written with the leader's output in LEADER_FOLLOWER runs
pub const LEADER_OUTPUT_KEY: &str = "leader_output";

/// Output key holding the leader's output in LEADER_FOLLOWER runs
///
/// Follower outputs share the map under their worker ids, so no member of
/// such a team may be called `leader`.
pub const LEADER_KEY: &str = "leader";

/// Output key holding the grouped values of a CONSENSUS run
///
/// Member outputs share the map under their worker ids, so no member of a
/// consensus team may be called `consensus`.
pub const CONSENSUS_KEY: &str = "consensus";

fn output_key(worker_id: &str) -> String {
    format!("{}_output", worker_id)
}

/// A failed attempt keeps both the recorded result and the typed cause
type Attempt = Result<WorkerResult, (WorkerResult, OrchestrationError)>;

/// Accumulates per-worker results while a strategy runs
#[derive(Default)]
struct RunState {
    worker_results: Vec<WorkerResult>,
    outputs: Payload,
    error: Option<OrchestrationError>,
}

impl RunState {
    fn failed(error: OrchestrationError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// First required failure decides the run error
    fn fail(&mut self, error: OrchestrationError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Records a failed attempt; returns true when the run must stop
    fn record_failure(&mut self, member: &TeamMember, result: WorkerResult, error: OrchestrationError) -> bool {
        self.worker_results.push(result);
        if member.required {
            error!("Required member {} failed: {}", member.worker_id, error);
            self.fail(OrchestrationError::required(&member.worker_id, error));
            true
        } else {
            warn!("Optional member {} failed: {}. Continuing.", member.worker_id, error);
            false
        }
    }
}

/// Runs teams of workers and single worker invocations
#[derive(Clone)]
pub struct StrategyExecutor {
    registry: Arc<WorkerRegistry>,
    invoker: Arc<dyn WorkerInvoker>,
}

impl StrategyExecutor {
    pub fn new(registry: Arc<WorkerRegistry>, invoker: Arc<dyn WorkerInvoker>) -> Self {
        Self { registry, invoker }
    }

    pub fn registry(&self) -> &Arc<WorkerRegistry> {
        &self.registry
    }

    /// Execute a team and report the outcome
    ///
    /// Never fails: misconfiguration and member failures are reported through
    /// `TeamResult::status` and `TeamResult::error`.
    #[instrument(skip_all, fields(team_id = %config.team_id, strategy = %config.strategy))]
    pub async fn execute(&self, config: &TeamConfiguration, input: &Payload, owner_id: Uuid) -> TeamResult {
        let started = Instant::now();
        let context = SharedContext::new(
            Uuid::new_v4(),
            owner_id,
            Some(config.team_id.clone()),
            config.shared_context.clone(),
        );

        info!(
            "Executing team {} with {} members (run {})",
            config.team_id,
            config.members.len(),
            context.run_id()
        );

        let run = match self.preflight(config) {
            Err(error) => {
                error!("Team {} rejected before invocation: {}", config.team_id, error);
                RunState::failed(error)
            }
            Ok(()) => match config.strategy {
                TeamStrategy::Sequential => self.run_sequential(config, input, &context).await,
                TeamStrategy::Parallel => self.run_parallel(config, input, &context).await,
                TeamStrategy::Pipeline => self.run_pipeline(config, input, &context).await,
                TeamStrategy::LeaderFollower => self.run_leader_follower(config, input, &context).await,
                TeamStrategy::Consensus => self.run_consensus(config, input, &context).await,
            },
        };

        let status = match run.error {
            None => TeamRunStatus::Success,
            Some(_) => TeamRunStatus::Error,
        };
        let duration = started.elapsed();
        info!("Team {} finished with status {} in {:?}", config.team_id, status, duration);

        TeamResult {
            team_id: config.team_id.clone(),
            run_id: context.run_id(),
            status,
            outputs: run.outputs,
            worker_results: run.worker_results,
            error: run.error.map(|e| e.to_string()),
            duration_ms: duration.as_millis() as u64,
            context: context.snapshot().await,
        }
    }

    /// Resolve and call one worker, bounded by `timeout`
    pub async fn invoke_worker(
        &self,
        worker_id: &str,
        payload: &Payload,
        context: &SharedContext,
        timeout: Duration,
    ) -> OrchestrationResult<Payload> {
        let endpoint = self.registry.resolve(worker_id)?;
        let request = InvocationRequest {
            worker_id: worker_id.to_string(),
            task_payload: payload.clone(),
            context: context.envelope().await,
        };

        let outcome = match tokio::time::timeout(timeout, self.invoker.invoke(&endpoint, &request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(InvocationError::Timeout(timeout)),
        };

        outcome.map_err(|source| OrchestrationError::WorkerInvocation {
            worker_id: worker_id.to_string(),
            source,
        })
    }

    async fn attempt(&self, worker_id: &str, payload: &Payload, context: &SharedContext, timeout: Duration) -> Attempt {
        let started = Instant::now();
        match self.invoke_worker(worker_id, payload, context, timeout).await {
            Ok(output) => Ok(WorkerResult::success(worker_id, output, started.elapsed())),
            Err(error) => Err((WorkerResult::failure(worker_id, &error, started.elapsed()), error)),
        }
    }

    /// Reject configurations that cannot run before anything is invoked
    fn preflight(&self, config: &TeamConfiguration) -> OrchestrationResult<()> {
        if config.members.is_empty() {
            return Err(OrchestrationError::StrategyMisconfigured(format!(
                "team {} has no members",
                config.team_id
            )));
        }

        let mut seen = HashSet::new();
        for member in &config.members {
            if !seen.insert(member.worker_id.as_str()) {
                return Err(OrchestrationError::StrategyMisconfigured(format!(
                    "worker {} appears more than once in team {}",
                    member.worker_id, config.team_id
                )));
            }
        }

        let reserved = match config.strategy {
            TeamStrategy::LeaderFollower => Some(LEADER_KEY),
            TeamStrategy::Consensus => Some(CONSENSUS_KEY),
            _ => None,
        };
        if let Some(key) = reserved {
            if seen.contains(key) {
                return Err(OrchestrationError::StrategyMisconfigured(format!(
                    "worker id {} is reserved for the {} output of team {}",
                    key, config.strategy, config.team_id
                )));
            }
        }

        let leader = match config.strategy {
            TeamStrategy::LeaderFollower => leader_of(&config.members).map(|m| m.worker_id.as_str()),
            _ => None,
        };

        for member in &config.members {
            let must_resolve = member.required || leader == Some(member.worker_id.as_str());
            if must_resolve {
                if let Err(error) = self.registry.resolve(&member.worker_id) {
                    return Err(OrchestrationError::required(&member.worker_id, error));
                }
            }
        }

        Ok(())
    }

    async fn run_sequential(&self, config: &TeamConfiguration, input: &Payload, context: &SharedContext) -> RunState {
        let mut run = RunState::default();

        for member in by_priority(&config.members) {
            match self.attempt(&member.worker_id, input, context, config.timeout()).await {
                Ok(result) => {
                    let output = Value::Object(result.output.clone());
                    context.set(output_key(&member.worker_id), output.clone()).await;
                    run.outputs.insert(member.worker_id.clone(), output);
                    run.worker_results.push(result);
                }
                Err((result, error)) => {
                    if run.record_failure(member, result, error) {
                        break;
                    }
                }
            }
        }

        run
    }

    async fn run_parallel(&self, config: &TeamConfiguration, input: &Payload, context: &SharedContext) -> RunState {
        let started = Instant::now();
        let mut join_set = JoinSet::new();
        let mut members_by_task = HashMap::new();

        for seat in &config.members {
            let executor = self.clone();
            let member = seat.clone();
            let input = input.clone();
            let context = context.clone();
            let timeout = config.timeout();

            let handle = join_set.spawn(async move {
                let attempt = executor.attempt(&member.worker_id, &input, &context, timeout).await;
                if let Ok(result) = &attempt {
                    context
                        .set(output_key(&member.worker_id), Value::Object(result.output.clone()))
                        .await;
                }
                (member, attempt)
            });
            members_by_task.insert(handle.id(), seat.clone());
        }

        let mut run = RunState::default();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((member, Ok(result))) => {
                    run.outputs.insert(member.worker_id.clone(), Value::Object(result.output.clone()));
                    run.worker_results.push(result);
                }
                Ok((member, Err((result, error)))) => {
                    run.record_failure(&member, result, error);
                }
                Err(join_error) => {
                    error!("Team member task aborted: {}", join_error);
                    let aborted = OrchestrationError::MemberAborted(join_error.to_string());
                    match members_by_task.get(&join_error.id()) {
                        Some(member) => {
                            let result = WorkerResult::failure(&member.worker_id, &aborted, started.elapsed());
                            run.record_failure(member, result, aborted);
                        }
                        None => run.fail(aborted),
                    }
                }
            }
        }

        run
    }

    async fn run_pipeline(&self, config: &TeamConfiguration, input: &Payload, context: &SharedContext) -> RunState {
        let mut run = RunState::default();
        let mut stage_input = input.clone();
        let mut last_output = None;

        for member in by_priority(&config.members) {
            match self.attempt(&member.worker_id, &stage_input, context, config.timeout()).await {
                Ok(result) => {
                    stage_input = result.output.clone();
                    last_output = Some(result.output.clone());
                    run.worker_results.push(result);
                }
                Err((result, error)) => {
                    if run.record_failure(member, result, error) {
                        break;
                    }
                }
            }
        }

        run.outputs = last_output.unwrap_or_default();
        run
    }

    async fn run_leader_follower(
        &self,
        config: &TeamConfiguration,
        input: &Payload,
        context: &SharedContext,
    ) -> RunState {
        let mut run = RunState::default();
        let Some(leader) = leader_of(&config.members) else {
            return run;
        };

        match self.attempt(&leader.worker_id, input, context, config.timeout()).await {
            Ok(result) => {
                let output = Value::Object(result.output.clone());
                context.set(LEADER_OUTPUT_KEY, output.clone()).await;
                run.outputs.insert(LEADER_KEY.to_string(), output);
                run.worker_results.push(result);
            }
            Err((result, error)) => {
                error!("Leader {} failed: {}", leader.worker_id, error);
                run.worker_results.push(result);
                run.fail(OrchestrationError::required(&leader.worker_id, error));
                return run;
            }
        }

        let followers = config.members.iter().filter(|m| m.worker_id != leader.worker_id);
        for member in followers {
            match self.attempt(&member.worker_id, input, context, config.timeout()).await {
                Ok(result) => {
                    run.outputs.insert(member.worker_id.clone(), Value::Object(result.output.clone()));
                    run.worker_results.push(result);
                }
                Err((result, error)) => {
                    if run.record_failure(member, result, error) {
                        break;
                    }
                }
            }
        }

        run
    }

    async fn run_consensus(&self, config: &TeamConfiguration, input: &Payload, context: &SharedContext) -> RunState {
        let mut run = self.run_parallel(config, input, context).await;
        let grouped = group_by_key(&config.members, &run.worker_results);
        run.outputs.insert(CONSENSUS_KEY.to_string(), Value::Object(grouped));
        run
    }
}

/// Members ordered by descending priority; ties keep configuration order
fn by_priority(members: &[TeamMember]) -> Vec<&TeamMember> {
    let mut ordered: Vec<&TeamMember> = members.iter().collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority));
    ordered
}

/// Highest priority member, first in configuration order on ties
fn leader_of(members: &[TeamMember]) -> Option<&TeamMember> {
    members.iter().fold(None, |best: Option<&TeamMember>, member| match best {
        Some(current) if current.priority >= member.priority => Some(current),
        _ => Some(member),
    })
}

/// Collect each successful member's output values by key
///
/// Values are listed in member configuration order, independent of the
/// order in which the members finished.
fn group_by_key(members: &[TeamMember], results: &[WorkerResult]) -> Payload {
    let mut grouped = Payload::new();

    for member in members {
        let Some(result) = results
            .iter()
            .find(|r| r.worker_id == member.worker_id && r.is_success())
        else {
            continue;
        };

        for (key, value) in &result.output {
            let slot = grouped
                .entry(key.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(values) = slot {
                values.push(value.clone());
            }
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::worker::{WorkerMetadata, WorkerOutcome};
    use crate::orchestration::invoker::LocalInvoker;
    use serde_json::json;
    use std::sync::Mutex;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap_or_default()
    }

    fn executor(ids: &[&str], invoker: LocalInvoker) -> StrategyExecutor {
        let registry = WorkerRegistry::new();
        for id in ids {
            registry.register(*id, WorkerMetadata::with_endpoint(format!("local://{}", id)));
        }
        StrategyExecutor::new(Arc::new(registry), Arc::new(invoker))
    }

    fn team(strategy: TeamStrategy, members: Vec<TeamMember>) -> TeamConfiguration {
        TeamConfiguration::new("team", strategy, members)
    }

    #[tokio::test]
    async fn sequential_happy_path_propagates_context() {
        let seen_by_b = Arc::new(Mutex::new(Value::Null));
        let seen = seen_by_b.clone();

        let invoker = LocalInvoker::new()
            .handler("A", |_| Ok(payload(json!({"y": 2}))))
            .handler("B", move |req| {
                *seen.lock().unwrap() = req.context.data.get("A_output").cloned().unwrap_or(Value::Null);
                Ok(payload(json!({"z": 3})))
            });
        let executor = executor(&["A", "B"], invoker);
        let config = team(
            TeamStrategy::Sequential,
            vec![TeamMember::new("B", 1), TeamMember::new("A", 2)],
        );

        let result = executor.execute(&config, &payload(json!({"x": 1})), Uuid::new_v4()).await;

        assert!(result.is_success());
        assert_eq!(Value::Object(result.outputs.clone()), json!({"A": {"y": 2}, "B": {"z": 3}}));
        assert_eq!(result.invocation_order(), vec!["A", "B"]);
        assert_eq!(*seen_by_b.lock().unwrap(), json!({"y": 2}));
        assert_eq!(result.context["A_output"], json!({"y": 2}));
    }

    #[tokio::test]
    async fn sequential_order_is_stable_for_equal_priority() {
        let invoker = LocalInvoker::new()
            .handler("first", |_| Ok(Payload::new()))
            .handler("second", |_| Ok(Payload::new()))
            .handler("top", |_| Ok(Payload::new()));
        let executor = executor(&["first", "second", "top"], invoker);
        let config = team(
            TeamStrategy::Sequential,
            vec![
                TeamMember::new("first", 1),
                TeamMember::new("second", 1),
                TeamMember::new("top", 5),
            ],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.invocation_order(), vec!["top", "first", "second"]);
    }

    #[tokio::test]
    async fn sequential_required_failure_stops_run() {
        let invoker = LocalInvoker::new()
            .handler("A", |_| Err("boom".to_string()))
            .handler("B", |_| Ok(Payload::new()));
        let executor = executor(&["A", "B"], invoker);
        let config = team(
            TeamStrategy::Sequential,
            vec![TeamMember::new("A", 2), TeamMember::new("B", 1)],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert_eq!(result.invocation_order(), vec!["A"]);
        assert!(result.error.unwrap().contains("Required member A failed"));
    }

    #[tokio::test]
    async fn optional_failures_do_not_fail_run() {
        let invoker = LocalInvoker::new()
            .handler("A", |_| Err("flaky".to_string()))
            .handler("B", |_| Ok(payload(json!({"ok": true}))))
            .handler("C", |_| Err("also flaky".to_string()));
        let executor = executor(&["A", "B", "C"], invoker);

        for strategy in [TeamStrategy::Sequential, TeamStrategy::Parallel, TeamStrategy::Pipeline] {
            let config = team(
                strategy,
                vec![
                    TeamMember::new("A", 3).optional(),
                    TeamMember::new("B", 2).optional(),
                    TeamMember::new("C", 1).optional(),
                ],
            );

            let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

            assert!(result.is_success(), "{} should succeed", strategy);
            assert_eq!(result.worker_results.len(), 3);
            assert_eq!(result.result_for("A").unwrap().status, WorkerOutcome::Error);
            assert_eq!(result.result_for("B").unwrap().status, WorkerOutcome::Success);
            assert_eq!(result.result_for("C").unwrap().status, WorkerOutcome::Error);
        }
    }

    #[tokio::test]
    async fn parallel_required_failure_marks_error_but_runs_everyone() {
        let invoker = LocalInvoker::new()
            .handler("A", |_| Err("down".to_string()))
            .handler("B", |_| Ok(payload(json!({"b": 1}))))
            .handler("C", |_| Ok(payload(json!({"c": 1}))))
            .latency("B", Duration::from_millis(20));
        let executor = executor(&["A", "B", "C"], invoker);
        let config = team(
            TeamStrategy::Parallel,
            vec![TeamMember::new("A", 1), TeamMember::new("B", 1), TeamMember::new("C", 1)],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert_eq!(result.worker_results.len(), 3);
        assert_eq!(result.outputs["B"], json!({"b": 1}));
        assert_eq!(result.context["C_output"], json!({"c": 1}));
    }

    #[tokio::test]
    async fn parallel_members_run_concurrently() {
        let delay = Duration::from_millis(200);
        let invoker = LocalInvoker::new()
            .handler("A", |_| Ok(Payload::new()))
            .handler("B", |_| Ok(Payload::new()))
            .handler("C", |_| Ok(Payload::new()))
            .latency("A", delay)
            .latency("B", delay)
            .latency("C", delay);
        let executor = executor(&["A", "B", "C"], invoker);
        let config = team(
            TeamStrategy::Parallel,
            vec![TeamMember::new("A", 1), TeamMember::new("B", 1), TeamMember::new("C", 1)],
        );

        let started = Instant::now();
        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert!(result.is_success());
        assert!(started.elapsed() < delay * 3);
    }

    #[tokio::test]
    async fn pipeline_required_failure_keeps_earlier_output() {
        let invoker = LocalInvoker::new()
            .handler("A", |_| Ok(payload(json!({"v": 5}))))
            .handler("B", |_| Err("stage broke".to_string()));
        let executor = executor(&["A", "B"], invoker);
        let config = team(
            TeamStrategy::Pipeline,
            vec![TeamMember::new("A", 2), TeamMember::new("B", 1)],
        );

        let result = executor.execute(&config, &payload(json!({"raw": true})), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert_eq!(Value::Object(result.outputs.clone()), json!({"v": 5}));
        assert_eq!(result.result_for("B").unwrap().status, WorkerOutcome::Error);
    }

    #[tokio::test]
    async fn pipeline_feeds_each_stage_the_previous_output() {
        let invoker = LocalInvoker::new()
            .handler("parse", |req| {
                let raw = req.task_payload["raw"].as_i64().unwrap_or(0);
                Ok(payload(json!({"parsed": raw * 10})))
            })
            .handler("flaky", |_| Err("skipped".to_string()))
            .handler("score", |req| {
                let parsed = req.task_payload["parsed"].as_i64().unwrap_or(0);
                Ok(payload(json!({"score": parsed + 1})))
            });
        let executor = executor(&["parse", "flaky", "score"], invoker);
        let config = team(
            TeamStrategy::Pipeline,
            vec![
                TeamMember::new("score", 1),
                TeamMember::new("flaky", 2).optional(),
                TeamMember::new("parse", 3),
            ],
        );

        let result = executor.execute(&config, &payload(json!({"raw": 4})), Uuid::new_v4()).await;

        assert!(result.is_success());
        assert_eq!(result.invocation_order(), vec!["parse", "flaky", "score"]);
        assert_eq!(Value::Object(result.outputs), json!({"score": 41}));
    }

    #[tokio::test]
    async fn leader_output_is_visible_to_followers() {
        let invoker = LocalInvoker::new()
            .handler("lead", |_| Ok(payload(json!({"plan": "outline"}))))
            .handler("writer", |req| {
                let plan = req.context.data.get(LEADER_OUTPUT_KEY).cloned().unwrap_or(Value::Null);
                Ok(payload(json!({"saw": plan})))
            });
        let executor = executor(&["lead", "writer"], invoker);
        let config = team(
            TeamStrategy::LeaderFollower,
            vec![TeamMember::new("writer", 1), TeamMember::new("lead", 9).optional()],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert!(result.is_success());
        assert_eq!(result.invocation_order(), vec!["lead", "writer"]);
        assert_eq!(result.outputs["leader"], json!({"plan": "outline"}));
        assert_eq!(result.outputs["writer"], json!({"saw": {"plan": "outline"}}));
    }

    #[tokio::test]
    async fn leader_failure_stops_run_even_when_marked_optional() {
        let invoker = LocalInvoker::new()
            .handler("lead", |_| Err("no plan".to_string()))
            .handler("writer", |_| Ok(Payload::new()));
        let executor = executor(&["lead", "writer"], invoker);
        let config = team(
            TeamStrategy::LeaderFollower,
            vec![TeamMember::new("lead", 9).optional(), TeamMember::new("writer", 1)],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert_eq!(result.invocation_order(), vec!["lead"]);
    }

    #[tokio::test]
    async fn consensus_groups_values_in_configuration_order() {
        let invoker = LocalInvoker::new()
            .handler("a", |_| Ok(payload(json!({"score": 0.9, "label": "hot"}))))
            .handler("b", |_| Ok(payload(json!({"score": 0.4}))))
            .handler("c", |_| Err("offline".to_string()))
            .latency("a", Duration::from_millis(30));
        let executor = executor(&["a", "b", "c"], invoker);
        let config = team(
            TeamStrategy::Consensus,
            vec![TeamMember::new("a", 1), TeamMember::new("b", 1), TeamMember::new("c", 1).optional()],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert!(result.is_success());
        assert_eq!(
            result.outputs[CONSENSUS_KEY],
            json!({"score": [0.9, 0.4], "label": ["hot"]})
        );
    }

    #[tokio::test]
    async fn empty_team_is_misconfigured() {
        let executor = executor(&[], LocalInvoker::new());
        let config = team(TeamStrategy::Parallel, vec![]);

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert!(result.worker_results.is_empty());
        assert!(result.error.unwrap().starts_with("Strategy misconfigured"));
    }

    #[tokio::test]
    async fn duplicate_members_are_misconfigured() {
        let executor = executor(&["A"], LocalInvoker::new().handler("A", |_| Ok(Payload::new())));
        let config = team(
            TeamStrategy::Sequential,
            vec![TeamMember::new("A", 1), TeamMember::new("A", 2)],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert!(result.worker_results.is_empty());
    }

    #[tokio::test]
    async fn unresolvable_required_member_fails_before_any_call() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let invoker = LocalInvoker::new().handler("A", move |_| {
            *counter.lock().unwrap() += 1;
            Ok(Payload::new())
        });
        let executor = executor(&["A"], invoker);
        let config = team(
            TeamStrategy::Sequential,
            vec![TeamMember::new("A", 2), TeamMember::new("ghost", 1)],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert_eq!(*calls.lock().unwrap(), 0);
        assert!(result.error.unwrap().contains("Worker not found: ghost"));
    }

    #[tokio::test]
    async fn unresolvable_optional_member_is_recorded_at_its_turn() {
        let invoker = LocalInvoker::new().handler("A", |_| Ok(Payload::new()));
        let executor = executor(&["A"], invoker);
        let config = team(
            TeamStrategy::Sequential,
            vec![TeamMember::new("ghost", 2).optional(), TeamMember::new("A", 1)],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert!(result.is_success());
        assert_eq!(result.invocation_order(), vec!["ghost", "A"]);
        let ghost = result.result_for("ghost").unwrap();
        assert_eq!(ghost.error.as_deref(), Some("Worker not found: ghost"));
    }

    #[tokio::test]
    async fn slow_member_times_out() {
        let invoker = LocalInvoker::new()
            .handler("slow", |_| Ok(Payload::new()))
            .latency("slow", Duration::from_secs(5));
        let executor = executor(&["slow"], invoker);
        let config = team(TeamStrategy::Sequential, vec![TeamMember::new("slow", 1)])
            .with_timeout(Duration::from_secs(1));

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert!(result.result_for("slow").unwrap().error.as_deref().unwrap().contains("timed out"));
    }

    fn panicking(_: &InvocationRequest) -> Result<Payload, String> {
        panic!("handler crashed")
    }

    #[tokio::test]
    async fn panicked_optional_member_is_recorded_without_failing_run() {
        let invoker = LocalInvoker::new()
            .handler("a", |_| Ok(payload(json!({"v": 1}))))
            .handler("b", panicking);
        let executor = executor(&["a", "b"], invoker);
        let config = team(
            TeamStrategy::Parallel,
            vec![TeamMember::new("a", 1).optional(), TeamMember::new("b", 1).optional()],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert!(result.is_success());
        assert_eq!(result.worker_results.len(), 2);
        let crashed = result.result_for("b").unwrap();
        assert_eq!(crashed.status, WorkerOutcome::Error);
        assert!(crashed.error.as_deref().unwrap().starts_with("Member task aborted"));
        assert_eq!(result.outputs["a"], json!({"v": 1}));
    }

    #[tokio::test]
    async fn panicked_required_member_fails_run() {
        let invoker = LocalInvoker::new()
            .handler("a", |_| Ok(Payload::new()))
            .handler("b", panicking);
        let executor = executor(&["a", "b"], invoker);
        let config = team(
            TeamStrategy::Consensus,
            vec![TeamMember::new("a", 1), TeamMember::new("b", 1)],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert_eq!(result.result_for("b").unwrap().status, WorkerOutcome::Error);
        assert!(result.error.unwrap().contains("Required member b failed"));
    }

    #[tokio::test]
    async fn required_follower_failure_stops_run() {
        let invoker = LocalInvoker::new()
            .handler("lead", |_| Ok(payload(json!({"plan": "outline"}))))
            .handler("editor", |_| Err("rejected draft".to_string()))
            .handler("writer", |_| Ok(Payload::new()));
        let executor = executor(&["lead", "editor", "writer"], invoker);
        let config = team(
            TeamStrategy::LeaderFollower,
            vec![
                TeamMember::new("lead", 9),
                TeamMember::new("editor", 1),
                TeamMember::new("writer", 1),
            ],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert_eq!(result.invocation_order(), vec!["lead", "editor"]);
        assert_eq!(result.outputs[LEADER_KEY], json!({"plan": "outline"}));
        assert!(result.error.unwrap().contains("Required member editor failed"));
    }

    #[tokio::test]
    async fn optional_follower_failure_continues_run() {
        let invoker = LocalInvoker::new()
            .handler("lead", |_| Ok(payload(json!({"plan": "outline"}))))
            .handler("editor", |_| Err("rejected draft".to_string()))
            .handler("writer", |_| Ok(payload(json!({"draft": 1}))));
        let executor = executor(&["lead", "editor", "writer"], invoker);
        let config = team(
            TeamStrategy::LeaderFollower,
            vec![
                TeamMember::new("lead", 9),
                TeamMember::new("editor", 1).optional(),
                TeamMember::new("writer", 1),
            ],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert!(result.is_success());
        assert_eq!(result.invocation_order(), vec!["lead", "editor", "writer"]);
        assert_eq!(result.result_for("editor").unwrap().status, WorkerOutcome::Error);
        assert_eq!(result.outputs["writer"], json!({"draft": 1}));
        assert!(result.outputs.get("editor").is_none());
    }

    #[tokio::test]
    async fn consensus_required_failure_still_groups_successes() {
        let invoker = LocalInvoker::new()
            .handler("a", |_| Ok(payload(json!({"label": "hot"}))))
            .handler("b", |_| Err("offline".to_string()))
            .handler("c", |_| Ok(payload(json!({"label": "warm"}))));
        let executor = executor(&["a", "b", "c"], invoker);
        let config = team(
            TeamStrategy::Consensus,
            vec![TeamMember::new("a", 1), TeamMember::new("b", 1), TeamMember::new("c", 1)],
        );

        let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

        assert_eq!(result.status, TeamRunStatus::Error);
        assert_eq!(result.worker_results.len(), 3);
        assert_eq!(result.outputs[CONSENSUS_KEY], json!({"label": ["hot", "warm"]}));
        assert!(result.error.unwrap().contains("Required member b failed"));
    }

    #[tokio::test]
    async fn aggregate_output_keys_cannot_be_member_ids() {
        let invoker = LocalInvoker::new()
            .handler("consensus", |_| Ok(Payload::new()))
            .handler("leader", |_| Ok(Payload::new()))
            .handler("b", |_| Ok(Payload::new()));
        let executor = executor(&["consensus", "leader", "b"], invoker);

        for (strategy, reserved) in [
            (TeamStrategy::Consensus, "consensus"),
            (TeamStrategy::LeaderFollower, "leader"),
        ] {
            let config = team(strategy, vec![TeamMember::new(reserved, 1), TeamMember::new("b", 1)]);

            let result = executor.execute(&config, &Payload::new(), Uuid::new_v4()).await;

            assert_eq!(result.status, TeamRunStatus::Error);
            assert!(result.worker_results.is_empty());
            assert!(result.error.unwrap().starts_with("Strategy misconfigured"));
        }

        // the names are only reserved where they collide
        let config = team(
            TeamStrategy::Sequential,
            vec![TeamMember::new("consensus", 1), TeamMember::new("leader", 1)],
        );
        assert!(executor.execute(&config, &Payload::new(), Uuid::new_v4()).await.is_success());
    }

    #[test]
    fn leader_prefers_first_on_ties() {
        let members = vec![TeamMember::new("x", 3), TeamMember::new("y", 3), TeamMember::new("z", 1)];
        assert_eq!(leader_of(&members).unwrap().worker_id, "x");
    }
}
