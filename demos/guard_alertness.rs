//! A guard NPC that patrols, grows suspicious and searches for an intruder.
//!
//! Run with `RUST_LOG=statecraft=debug cargo run --example guard_alertness`
//! to see every transition the runtime performs.

use statecraft::builder::FnState;
use statecraft::rules::TransitionRules;
use statecraft::{
    state_keys, ChildStates, Composite, CompositeBehavior, ConfigurationError, DriverBuilder,
    Settings,
};
use tracing_subscriber::EnvFilter;

state_keys! {
    mod top {
        PATROL = "Patrol",
        ALERT = "Alert",
    }
}

state_keys! {
    mod patrol {
        WALKING = "Walking",
        WAITING = "Waiting",
    }
}

state_keys! {
    mod alert {
        SEARCHING = "Searching",
        COMBAT = "Combat",
    }
}

/// World state the guard senses each tick.
#[derive(Debug, Default)]
struct Senses {
    tick: u32,
    suspicion: f32,
    target_visible: bool,
    waypoint_timer: u32,
    calm_ticks: u32,
}

struct PatrolRoute;

impl CompositeBehavior<Senses> for PatrolRoute {
    fn name(&self) -> &str {
        top::PATROL
    }

    fn initialize_child_states(
        &mut self,
        children: &mut ChildStates<Senses>,
    ) -> Result<(), ConfigurationError> {
        children.add_child_state(
            patrol::WALKING,
            FnState::new(patrol::WALKING)
                .on_enter(|s: &mut Senses| s.waypoint_timer = 0)
                .on_update(|s: &mut Senses| s.waypoint_timer += 1),
        )?;
        children.add_child_state(
            patrol::WAITING,
            FnState::new(patrol::WAITING)
                .on_enter(|s: &mut Senses| s.waypoint_timer = 0)
                .on_update(|s: &mut Senses| s.waypoint_timer += 1),
        )
    }

    fn default_child_key(&self) -> &str {
        patrol::WALKING
    }

    fn on_parent_update(&mut self, senses: &mut Senses, children: &mut ChildStates<Senses>) {
        let next = match children.current_key() {
            Some(patrol::WALKING) if senses.waypoint_timer >= 3 => patrol::WAITING,
            Some(patrol::WAITING) if senses.waypoint_timer >= 2 => patrol::WALKING,
            _ => return,
        };
        if let Err(err) = children.transition_to_child(next, senses) {
            tracing::warn!(%err, "patrol step skipped");
        }
    }
}

struct Alertness;

impl CompositeBehavior<Senses> for Alertness {
    fn name(&self) -> &str {
        top::ALERT
    }

    fn initialize_child_states(
        &mut self,
        children: &mut ChildStates<Senses>,
    ) -> Result<(), ConfigurationError> {
        children.add_child_state(
            alert::SEARCHING,
            FnState::new(alert::SEARCHING).on_update(|s: &mut Senses| {
                s.suspicion = (s.suspicion - 0.1).max(0.0);
            }),
        )?;
        children.add_child_state(
            alert::COMBAT,
            FnState::new(alert::COMBAT).on_enter(|s: &mut Senses| {
                tracing::info!(tick = s.tick, "intruder engaged");
            }),
        )
    }

    fn default_child_key(&self) -> &str {
        alert::SEARCHING
    }

    fn on_parent_enter(&mut self, senses: &mut Senses) {
        senses.calm_ticks = 0;
    }

    fn on_parent_update(&mut self, senses: &mut Senses, _children: &mut ChildStates<Senses>) {
        if senses.target_visible || senses.suspicion > 0.2 {
            senses.calm_ticks = 0;
        } else {
            senses.calm_ticks += 1;
        }
    }
}

fn alert_rules() -> Result<TransitionRules<Senses>, ConfigurationError> {
    let mut rules = TransitionRules::new();
    rules.add_rule(alert::SEARCHING, alert::COMBAT, |s: &Senses| s.target_visible, 10)?;
    rules.add_rule(alert::COMBAT, alert::SEARCHING, |s: &Senses| !s.target_visible, 0)?;
    Ok(rules)
}

fn top_rules() -> Result<TransitionRules<Senses>, ConfigurationError> {
    let mut rules = TransitionRules::new();
    rules.add_rule(top::PATROL, top::ALERT, |s: &Senses| s.target_visible, 10)?;
    rules.add_rule(top::PATROL, top::ALERT, |s: &Senses| s.suspicion >= 0.5, 0)?;
    rules.add_rule(top::ALERT, top::PATROL, |s: &Senses| s.calm_ticks >= 3, 0)?;
    Ok(rules)
}

/// Scripted stimulus for each tick: suspicion gained and whether the intruder is seen.
fn stimulus(tick: u32) -> (f32, bool) {
    match tick {
        4..=6 => (0.2, false),
        8..=9 => (0.0, true),
        _ => (0.0, false),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_json(r#"{ "history_capacity": 16 }"#)?;

    let mut guard = DriverBuilder::new()
        .name("guard")
        .state(top::PATROL, Composite::with_settings(PatrolRoute, &settings))
        .state(
            top::ALERT,
            Composite::with_settings(Alertness, &settings).with_rules(alert_rules()?),
        )
        .initial(top::PATROL)
        .rules(top_rules()?)
        .settings(settings)
        .build(Senses::default())?;

    for tick in 0..20 {
        let (gain, visible) = stimulus(tick);
        let senses = guard.context_mut();
        senses.tick = tick;
        senses.suspicion += gain;
        senses.target_visible = visible;

        guard.update();

        let snapshot = guard.snapshot();
        tracing::info!(
            tick,
            path = %snapshot.active_path().join(" > "),
            suspicion = guard.context().suspicion,
            "tick"
        );
    }

    println!("{}", guard.snapshot().to_json()?);
    println!("visited: {}", guard.history().get_path().join(" -> "));
    println!(
        "states: {:?} / patrol {:?} / alert {:?}",
        top::ALL,
        patrol::ALL,
        alert::ALL
    );

    let senses = guard.shutdown();
    println!("final senses: {senses:?}");
    Ok(())
}
