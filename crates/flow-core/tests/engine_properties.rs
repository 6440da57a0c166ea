use std::cell::{Cell, RefCell};
use std::rc::Rc;

use flow_core::{CoreEngineError, EventStore, ExecutionContext, FlowEngine, FlowState, OutcomeKey, Step, StepError,
                StepHandle, Target, TransitionTable};
use thiserror::Error;

/// Step de prueba: registra su nombre en un log compartido, opcionalmente
/// escribe en el contexto y devuelve el outcome indicado por `decide`.
struct Probe {
    name: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
    decide: fn(&mut ExecutionContext) -> Result<OutcomeKey, StepError>,
}

impl Step for Probe {
    fn name(&self) -> &str {
        self.name
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<OutcomeKey, StepError> {
        self.log.borrow_mut().push(self.name);
        (self.decide)(ctx)
    }
}

fn probe(table: &mut TransitionTable,
         log: &Rc<RefCell<Vec<&'static str>>>,
         name: &'static str,
         decide: fn(&mut ExecutionContext) -> Result<OutcomeKey, StepError>)
         -> StepHandle {
    table.register_step(Probe { name,
                                log: Rc::clone(log),
                                decide })
}

fn done(_ctx: &mut ExecutionContext) -> Result<OutcomeKey, StepError> {
    Ok(OutcomeKey::from_static("done"))
}

#[derive(Debug, Error, PartialEq)]
#[error("ledger unavailable: {0}")]
struct LedgerDown(u16);

#[test]
fn diamond_follows_the_outcome_of_the_first_step() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut table = TransitionTable::new();
    let a = probe(&mut table, &log, "A", |ctx| {
        Ok(if ctx.get_bool("answer").unwrap_or(false) { "yes".into() } else { "no".into() })
    });
    let b = probe(&mut table, &log, "B", done);
    let c = probe(&mut table, &log, "C", done);
    let d = probe(&mut table, &log, "D", done);
    table.add_transition(a, "yes", b)
         .add_transition(a, "no", c)
         .add_transition(b, "done", Target::Terminal)
         .add_transition(c, "done", Target::Terminal);

    let mut engine = FlowEngine::new(&table).with_start(a);

    let mut yes = ExecutionContext::new();
    yes.insert("answer", true);
    let run = engine.run(&mut yes).expect("yes branch completes");
    assert_eq!(engine.trace(run), vec![a, b]);

    let mut no = ExecutionContext::new();
    no.insert("answer", false);
    let run = engine.run(&mut no).expect("no branch completes");
    assert_eq!(engine.trace(run), vec![a, c]);

    assert_eq!(*log.borrow(), vec!["A", "B", "A", "C"]);
    assert!(!engine.trace(run).contains(&d));
}

#[test]
fn latest_registration_wins_at_run_time() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut table = TransitionTable::new();
    let a = probe(&mut table, &log, "A", |_| Ok("x".into()));
    let b = probe(&mut table, &log, "B", done);
    let c = probe(&mut table, &log, "C", done);
    table.add_transition(a, "x", b);
    table.add_transition(a, "x", c);

    let mut engine = FlowEngine::new(&table).with_start(a);
    engine.run(&mut ExecutionContext::new()).unwrap();
    assert_eq!(*log.borrow(), vec!["A", "C"]);
}

#[test]
fn step_error_propagates_verbatim_and_halts_the_run() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut table = TransitionTable::new();
    let a = probe(&mut table, &log, "A", |ctx| {
        ctx.insert("a_ran", true);
        Ok("next".into())
    });
    let b = probe(&mut table, &log, "B", |ctx| {
        ctx.insert("b_partial", "written before failing");
        Err(LedgerDown(503).into())
    });
    let c = probe(&mut table, &log, "C", done);
    table.add_transition(a, "next", b)
         .add_transition(b, "next", c)
         .add_transition(c, "done", Target::Terminal);

    let mut engine = FlowEngine::new(&table).with_start(a);
    let mut ctx = ExecutionContext::new();
    let err = engine.run(&mut ctx).unwrap_err();

    assert_eq!(err.to_string(), "ledger unavailable: 503");
    assert_eq!(err.step_error::<LedgerDown>(), Some(&LedgerDown(503)));
    assert_eq!(*log.borrow(), vec!["A", "B"]);
    assert_eq!(ctx.get_bool("a_ran"), Some(true));
    assert_eq!(ctx.get_str("b_partial"), Some("written before failing"));

    let run = engine.last_flow_id().expect("run id recorded even on failure");
    assert_eq!(engine.trace(run), vec![a, b]);
    assert_eq!(engine.event_variants(run), vec!["I", "S", "F", "S", "X"]);

    let source = err.into_step_error().expect("execution error");
    assert_eq!(source.downcast_ref::<LedgerDown>(), Some(&LedgerDown(503)));
}

#[test]
fn stepping_after_a_failure_is_refused() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut table = TransitionTable::new();
    let a = probe(&mut table, &log, "A", |_| Err("boom".into()));

    let mut engine = FlowEngine::new(&table).with_start(a);
    let mut ctx = ExecutionContext::new();
    let mut flow = engine.start(&mut ctx).unwrap();
    assert!(matches!(flow.step(), Err(CoreEngineError::Execution(_))));
    assert!(matches!(flow.step(), Err(CoreEngineError::FlowHasFailed)));
    assert_eq!(flow.state(), FlowState::Running(a));
    assert_eq!(*log.borrow(), vec!["A"]);
}

#[test]
fn self_loop_never_terminates_under_an_external_cap() {
    struct Spin(Cell<u64>);

    impl Step for Spin {
        fn name(&self) -> &str {
            "spin"
        }

        fn execute(&self, _ctx: &mut ExecutionContext) -> Result<OutcomeKey, StepError> {
            self.0.set(self.0.get() + 1);
            Ok("loop".into())
        }
    }

    let mut table = TransitionTable::new();
    let a = table.register_step(Spin(Cell::new(0)));
    table.add_transition(a, "loop", a);

    const CAP: u64 = 10_000;
    let mut engine = FlowEngine::new(&table).with_start(a);
    let mut ctx = ExecutionContext::new();
    let mut flow = engine.start(&mut ctx).unwrap();
    let state = flow.run_n(CAP).expect("looping is not an error");

    assert_eq!(state, FlowState::Running(a));
    assert_eq!(flow.steps_executed(), CAP);
    let flow_id = flow.flow_id();
    assert!(!engine.event_variants(flow_id).contains(&"C"));
}

#[test]
fn long_self_loop_retains_no_events_without_trace() {
    let mut table = TransitionTable::new();
    let a = table.register_step(Loop);
    table.add_transition(a, "loop", a);

    const TICKS: u64 = 200_000;
    let mut engine = FlowEngine::without_trace(&table).with_start(a);
    let mut ctx = ExecutionContext::new();
    let mut flow = engine.start(&mut ctx).unwrap();
    assert_eq!(flow.run_n(TICKS).unwrap(), FlowState::Running(a));
    assert_eq!(flow.steps_executed(), TICKS);
    let flow_id = flow.flow_id();

    assert!(engine.event_store().list(flow_id).is_empty());
    assert!(engine.trace(flow_id).is_empty());
    // FlowInitialized + (StepStarted, StepFinished) por tick
    assert_eq!(engine.event_store().appended(), 1 + 2 * TICKS);
}

#[test]
fn recorded_history_can_be_dropped_between_runs() {
    let mut table = TransitionTable::new();
    let a = table.register_step(Loop);
    table.add_transition(a, "loop", a);

    let mut engine = FlowEngine::new(&table).with_start(a);
    let mut ids = Vec::new();
    for _ in 0..3 {
        let mut ctx = ExecutionContext::new();
        let mut flow = engine.start(&mut ctx).unwrap();
        flow.run_n(100).unwrap();
        ids.push(flow.flow_id());
    }
    assert_eq!(engine.event_store().flow_count(), 3);
    assert_eq!(engine.events_for(ids[0]).len(), 201);

    for id in &ids {
        engine.clear_events(*id);
    }
    assert_eq!(engine.event_store().flow_count(), 0);
    assert!(engine.trace(ids[2]).is_empty());
}

struct Loop;

impl Step for Loop {
    fn name(&self) -> &str {
        "loop"
    }

    fn execute(&self, _ctx: &mut ExecutionContext) -> Result<OutcomeKey, StepError> {
        Ok(OutcomeKey::from_static("loop"))
    }
}

#[test]
#[should_panic(expected = "step exploded")]
fn panics_unwind_through_run() {
    struct Explode;

    impl Step for Explode {
        fn name(&self) -> &str {
            "explode"
        }

        fn execute(&self, _ctx: &mut ExecutionContext) -> Result<OutcomeKey, StepError> {
            panic!("step exploded");
        }
    }

    let mut table = TransitionTable::new();
    let a = table.register_step(Explode);
    let mut engine = FlowEngine::new(&table).with_start(a);
    let _ = engine.run(&mut ExecutionContext::new());
}
