use std::sync::{Arc, Mutex};

use action_core::{
    Action, ActionContext, ActionEvent, ActionEventKind, ActionExecutor, ActionRegistry,
    ActionRun, ActionState, ActionUnit, Activity, Actor, ActorId, LifecycleProbe, ObjectId,
    Priority, Rejection, ScriptedAction, TickOutcome, run,
};
use strum::IntoEnumIterator;

type EventLog = Arc<Mutex<Vec<(ActionEventKind, String)>>>;

struct Harness {
    executor: ActionExecutor,
    actor: Actor,
    events: EventLog,
}

impl Harness {
    fn new(actions: Vec<ScriptedAction>) -> Self {
        let actor = Actor::new(0, "player");
        let registry: ActionRegistry = actions.into_iter().map(ActionUnit::shared).collect();
        let mut executor = ActionExecutor::new(actor.clone(), registry);

        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        executor
            .observers_mut()
            .subscribe(move |event: &ActionEvent| {
                sink.lock()
                    .unwrap()
                    .push((event.kind, event.action.clone()));
            });

        Self {
            executor,
            actor,
            events,
        }
    }

    fn ctx(&self) -> ActionContext {
        ActionContext::new(self.actor.clone())
    }

    fn request(&mut self, name: &str) -> bool {
        let ctx = self.ctx();
        self.executor.try_execute(name, ctx)
    }

    fn current_name(&self) -> Option<String> {
        self.executor
            .current_action()
            .map(|unit| unit.name().to_owned())
    }

    fn events(&self) -> Vec<(ActionEventKind, String)> {
        self.events.lock().unwrap().clone()
    }

    fn count(&self, kind: ActionEventKind, action: &str) -> usize {
        self.events()
            .iter()
            .filter(|(k, a)| *k == kind && a == action)
            .count()
    }

    /// Ticks until idle, returning the number of ticks taken.
    fn run_to_idle(&mut self) -> u32 {
        let mut ticks = 0;
        while !self.executor.tick().is_idle() {
            ticks += 1;
            assert!(ticks < 1_000, "executor never became idle");
        }
        ticks
    }
}

fn attack() -> ScriptedAction {
    ScriptedAction::builder("Attack")
        .priority(Priority::High)
        .duration(3)
        .build()
}

fn sit() -> ScriptedAction {
    ScriptedAction::builder("Sit")
        .priority(Priority::Low)
        .duration(2)
        .build()
}

fn talk() -> ScriptedAction {
    ScriptedAction::builder("Talk")
        .priority(Priority::Normal)
        .cancellable(false)
        .duration(4)
        .build()
}

fn magic_never_ready() -> ScriptedAction {
    ScriptedAction::builder("Magic")
        .priority(Priority::Critical)
        .ready_when(|_| false)
        .build()
}

fn assert_settled(h: &Harness, unit: &str) {
    assert!(h.executor.current_action().is_none());
    assert!(!h.executor.is_executing());
    assert_eq!(h.actor.activity(), Activity::Idle);
    let unit = h.executor.registry().get(unit).unwrap();
    assert_eq!(unit.state(), ActionState::Ready);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_idle_actor_accepts_attack() {
    let mut h = Harness::new(vec![attack()]);

    assert!(h.request("Attack"));
    assert_eq!(h.current_name().as_deref(), Some("Attack"));
    assert_eq!(h.actor.activity(), Activity::Interacting);
    assert!(h.executor.is_executing());
    assert_eq!(h.events(), vec![(ActionEventKind::Started, "Attack".into())]);
}

#[test]
fn scenario_b_lower_priority_is_rejected() {
    let mut h = Harness::new(vec![attack(), sit()]);
    assert!(h.request("Attack"));

    assert!(!h.request("Sit"));
    assert_eq!(h.current_name().as_deref(), Some("Attack"));
    assert_eq!(h.actor.activity(), Activity::Interacting);
    assert_eq!(h.count(ActionEventKind::Cancelled, "Attack"), 0);
}

#[test]
fn scenario_c_preempted_incumbent_stays_cancelled_when_requester_not_ready() {
    let attack = attack();
    let attack_probe = attack.probe();
    let mut h = Harness::new(vec![attack, magic_never_ready()]);
    assert!(h.request("Attack"));

    assert!(!h.request("Magic"));

    assert!(h.current_name().is_none());
    assert_eq!(h.actor.activity(), Activity::Idle);
    assert_settled(&h, "Attack");
    assert_eq!(attack_probe.counts().cancelled, 1);
    assert_eq!(attack_probe.counts().ended, 0);
    assert_eq!(
        h.events(),
        vec![
            (ActionEventKind::Started, "Attack".into()),
            (ActionEventKind::Cancelled, "Attack".into()),
        ]
    );
}

#[test]
fn scenario_d_unknown_name_changes_nothing() {
    let mut h = Harness::new(vec![attack()]);

    let ctx = h.ctx();
    let err = h.executor.request("Unregistered", ctx).unwrap_err();

    assert_eq!(
        err,
        Rejection::UnknownAction {
            name: "Unregistered".into()
        }
    );
    assert!(h.current_name().is_none());
    assert_eq!(h.actor.activity(), Activity::Idle);
    assert!(h.events().is_empty());
}

#[test]
fn scenario_e_non_cancellable_runs_to_completion() {
    let talk = talk();
    let talk_probe = talk.probe();
    let mut h = Harness::new(vec![talk, attack()]);
    assert!(h.request("Talk"));

    let ctx = h.ctx();
    let err = h.executor.request("Attack", ctx).unwrap_err();
    assert_eq!(
        err,
        Rejection::NotCancellable {
            current: "Talk".into()
        }
    );
    assert_eq!(h.current_name().as_deref(), Some("Talk"));

    h.run_to_idle();

    assert_eq!(h.count(ActionEventKind::Completed, "Talk"), 1);
    assert_eq!(h.count(ActionEventKind::Cancelled, "Talk"), 0);
    assert_eq!(talk_probe.counts().steps, 4);
    assert_settled(&h, "Talk");
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn priority_at_or_below_incumbent_is_always_rejected() {
    for current in Priority::iter() {
        for requested in Priority::iter().filter(|p| *p <= current) {
            let incumbent = ScriptedAction::builder("Incumbent")
                .priority(current)
                .duration(10)
                .build();
            let challenger = ScriptedAction::builder("Challenger")
                .priority(requested)
                .build();
            let mut h = Harness::new(vec![incumbent, challenger]);
            assert!(h.request("Incumbent"));

            let ctx = h.ctx();
            let err = h.executor.request("Challenger", ctx).unwrap_err();
            assert!(
                matches!(err, Rejection::Outranked { .. }),
                "{requested} vs {current}: {err}"
            );
            assert_eq!(h.current_name().as_deref(), Some("Incumbent"));
            assert!(h.executor.is_executing());
        }
    }
}

#[test]
fn strictly_higher_priority_preempts_cancellable_incumbent() {
    let sit = sit();
    let sit_probe = sit.probe();
    let mut h = Harness::new(vec![sit, attack()]);
    assert!(h.request("Sit"));

    assert!(h.request("Attack"));

    assert_eq!(h.current_name().as_deref(), Some("Attack"));
    assert_eq!(h.actor.activity(), Activity::Interacting);
    assert_eq!(sit_probe.counts().cancelled, 1);
    assert_eq!(
        h.executor.registry().get("Sit").unwrap().state(),
        ActionState::Ready
    );
    assert_eq!(
        h.events(),
        vec![
            (ActionEventKind::Started, "Sit".into()),
            (ActionEventKind::Cancelled, "Sit".into()),
            (ActionEventKind::Started, "Attack".into()),
        ]
    );
}

#[test]
fn non_cancellable_incumbent_blocks_every_priority() {
    for requested in Priority::iter() {
        let guard = ScriptedAction::builder("Guard")
            .priority(Priority::Low)
            .cancellable(false)
            .duration(5)
            .build();
        let challenger = ScriptedAction::builder("Challenger")
            .priority(requested)
            .build();
        let mut h = Harness::new(vec![guard, challenger]);
        assert!(h.request("Guard"));

        assert!(!h.request("Challenger"));
        assert_eq!(h.current_name().as_deref(), Some("Guard"));
        assert_eq!(h.count(ActionEventKind::Cancelled, "Guard"), 0);
    }
}

#[test]
fn re_requesting_current_action_fails_while_it_runs() {
    let mut h = Harness::new(vec![attack()]);
    assert!(h.request("Attack"));

    for _ in 0..2 {
        assert!(!h.request("Attack"));
        assert!(matches!(h.executor.tick(), TickOutcome::Running { .. }));
    }
    assert!(!h.request("Attack"));
    assert_eq!(h.count(ActionEventKind::Started, "Attack"), 1);

    // Once finished the same unit is reusable.
    assert!(h.executor.tick().is_completed());
    assert!(h.request("Attack"));
    assert_eq!(h.count(ActionEventKind::Started, "Attack"), 2);
}

#[test]
fn request_by_reference_follows_the_same_rules() {
    let mut h = Harness::new(vec![attack()]);
    let unit = h.executor.registry().get("Attack").unwrap();

    let ctx = h.ctx();
    assert!(h.executor.try_execute(&unit, ctx.clone()));
    assert!(!h.executor.try_execute(&unit, ctx));
    assert!(Arc::ptr_eq(&h.executor.current_action().unwrap(), &unit));
}

#[test]
fn exactly_one_terminal_event_per_accepted_run() {
    let mut h = Harness::new(vec![sit(), attack(), talk()]);

    assert!(h.request("Sit"));
    assert!(h.request("Attack")); // cancels Sit
    h.run_to_idle(); // completes Attack
    assert!(h.request("Talk"));
    assert!(h.executor.cancel_current()); // explicit cancel ignores cancellable
    assert!(h.request("Sit"));
    h.run_to_idle();

    let events = h.events();
    let started = events
        .iter()
        .filter(|(k, _)| *k == ActionEventKind::Started)
        .count();
    let terminal = events
        .iter()
        .filter(|(k, _)| *k != ActionEventKind::Started)
        .count();
    assert_eq!(started, 4);
    assert_eq!(terminal, 4);

    // Each Started is followed by exactly one terminal event before the next Started.
    let mut open: Option<&str> = None;
    for (kind, action) in &events {
        match kind {
            ActionEventKind::Started => {
                assert!(open.is_none(), "overlapping runs");
                open = Some(action.as_str());
            }
            _ => {
                assert_eq!(open.take(), Some(action.as_str()));
            }
        }
    }
    assert!(open.is_none());
}

#[test]
fn settled_after_completion_and_after_cancellation() {
    let attack = attack();
    let probe: LifecycleProbe = attack.probe();
    let mut h = Harness::new(vec![attack]);

    assert!(h.request("Attack"));
    assert_eq!(h.run_to_idle(), 3);
    assert_settled(&h, "Attack");

    assert!(h.request("Attack"));
    h.executor.tick();
    assert!(h.executor.cancel_current());
    assert_settled(&h, "Attack");

    let counts = probe.counts();
    assert_eq!(counts.started, 2);
    assert_eq!(counts.ended, 1);
    assert_eq!(counts.cancelled, 1);
    assert_eq!(counts.resets, 2);
    // 3 steps for the first run, 1 before the cancel.
    assert_eq!(counts.steps, 4);
}

#[test]
fn cancellation_discards_remaining_steps() {
    let attack = attack();
    let probe = attack.probe();
    let mut h = Harness::new(vec![attack]);

    assert!(h.request("Attack"));
    assert!(h.executor.cancel_current());
    for _ in 0..5 {
        assert!(h.executor.tick().is_idle());
    }

    assert_eq!(probe.counts().steps, 0);
    assert_eq!(probe.counts().ended, 0);
    assert!(!h.executor.cancel_current());
}

#[test]
fn external_activity_writer_is_not_clobbered_on_completion() {
    let mut h = Harness::new(vec![sit()]);
    assert!(h.request("Sit"));

    // Something unrelated (a cutscene, say) takes the flag mid-run.
    h.actor.set_activity(Activity::Idle);
    h.run_to_idle();

    assert_eq!(h.count(ActionEventKind::Completed, "Sit"), 1);
    assert_eq!(h.actor.activity(), Activity::Idle);
    assert!(h.executor.current_action().is_none());
}

#[test]
fn readiness_is_only_checked_for_the_requester() {
    let gate = Arc::new(Mutex::new(true));
    let open = Arc::clone(&gate);
    let door = ScriptedAction::builder("OpenDoor")
        .duration(3)
        .ready_when(move |_| *open.lock().unwrap())
        .build();
    let mut h = Harness::new(vec![door]);

    assert!(h.request("OpenDoor"));
    *gate.lock().unwrap() = false;

    // The running action keeps going even though it would no longer be ready.
    h.run_to_idle();
    assert_eq!(h.count(ActionEventKind::Completed, "OpenDoor"), 1);
    assert!(!h.request("OpenDoor"));
}

#[test]
fn events_carry_actor_identity() {
    let actor = Actor::new(42, "npc");
    let mut registry = ActionRegistry::new();
    registry.register_action(sit());
    let mut executor = ActionExecutor::new(actor.clone(), registry);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    executor
        .observers_mut()
        .subscribe(move |event: &ActionEvent| sink.lock().unwrap().push(event.actor));

    assert!(executor.try_execute("Sit", ActionContext::new(actor)));
    assert_eq!(*seen.lock().unwrap(), vec![ActorId(42)]);
}

#[test]
fn dynamic_registration_during_play() {
    let mut h = Harness::new(vec![sit()]);
    assert!(h.request("Sit"));

    h.executor.registry_mut().register_action(attack());
    assert!(h.request("Attack"));
    assert_eq!(h.current_name().as_deref(), Some("Attack"));
}

/// Records the target and distance of every context `on_cancel` receives.
struct Escort {
    cancelled_with: Arc<Mutex<Vec<(Option<ObjectId>, f32)>>>,
}

impl Action for Escort {
    fn name(&self) -> &str {
        "Escort"
    }

    fn run(&self, _ctx: &ActionContext) -> Box<dyn ActionRun> {
        run::wait(10)
    }

    fn on_cancel(&self, ctx: &ActionContext) {
        self.cancelled_with
            .lock()
            .unwrap()
            .push((ctx.target, ctx.distance));
    }
}

#[test]
fn on_cancel_receives_actor_only_context() {
    let actor = Actor::new(0, "player");
    let cancelled_with = Arc::new(Mutex::new(Vec::new()));
    let mut registry = ActionRegistry::new();
    registry.register_action(Escort {
        cancelled_with: Arc::clone(&cancelled_with),
    });
    registry.register_action(attack());
    let mut executor = ActionExecutor::new(actor.clone(), registry);

    let escort_ctx = || {
        ActionContext::new(actor.clone())
            .with_target(ObjectId(9))
            .with_distance(3.0)
    };

    // Direct cancellation.
    assert!(executor.try_execute("Escort", escort_ctx()));
    assert_eq!(
        executor.current_context().map(|ctx| ctx.target),
        Some(Some(ObjectId(9)))
    );
    assert!(executor.cancel_current());

    // Preemption by a higher-priority request.
    assert!(executor.try_execute("Escort", escort_ctx()));
    assert!(executor.try_execute("Attack", ActionContext::new(actor.clone())));

    assert_eq!(*cancelled_with.lock().unwrap(), vec![(None, 0.0), (None, 0.0)]);
}
