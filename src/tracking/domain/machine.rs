//! Data-driven state machine with phase-keyed transition callbacks.
//!
//! A [`TransitionTable`] maps each event to a [`TransitionRule`] naming the
//! target state, the states it may be fired from, and per-state rejection
//! messages. Validation yields a [`PendingTransition`], the explicit record of
//! a transition in flight. [`Callbacks`] holds ordered hooks keyed by event and
//! [`CallbackPhase`]; only hooks registered for the pending transition's event
//! run, and they can only be run while a pending transition exists.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Bound shared by machine states and events.
pub trait MachineSymbol: Copy + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T> MachineSymbol for T where T: Copy + Eq + Hash + fmt::Debug + fmt::Display {}

/// Rule describing a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRule<S> {
    target: S,
    allowed_from: Vec<S>,
    rejections: Vec<(S, &'static str)>,
}

impl<S: MachineSymbol> TransitionRule<S> {
    /// Creates a rule moving to `target` that is not yet allowed from any state.
    #[must_use]
    pub const fn to(target: S) -> Self {
        Self {
            target,
            allowed_from: Vec::new(),
            rejections: Vec::new(),
        }
    }

    /// Adds states the event may be fired from.
    #[must_use]
    pub fn from(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.allowed_from.extend(states);
        self
    }

    /// Adds an explicit rejection message for firing the event from `state`.
    #[must_use]
    pub fn reject(mut self, state: S, message: &'static str) -> Self {
        self.rejections.push((state, message));
        self
    }

    /// Returns the state the event moves to.
    #[must_use]
    pub const fn target(&self) -> S {
        self.target
    }

    /// Returns whether the event may be fired from `from`.
    #[must_use]
    pub fn allows(&self, from: S) -> bool {
        self.allowed_from.contains(&from)
    }

    /// Returns the rejection message for firing the event from `from`.
    ///
    /// States with no explicit rejection get a generic message.
    #[must_use]
    pub fn rejection_message(&self, from: S) -> String {
        self.rejections
            .iter()
            .find(|(state, _)| *state == from)
            .map_or_else(
                || format!("can't go from {from} to {}", self.target),
                |(_, message)| (*message).to_owned(),
            )
    }
}

/// Transition table keyed by event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable<S, E>
where
    E: MachineSymbol,
{
    rules: HashMap<E, TransitionRule<S>>,
}

impl<S: MachineSymbol, E: MachineSymbol> TransitionTable<S, E> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Adds or replaces the rule for `event`.
    #[must_use]
    pub fn with_rule(mut self, event: E, rule: TransitionRule<S>) -> Self {
        self.rules.insert(event, rule);
        self
    }

    /// Validates firing `event` from `from` without mutating anything.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionRejection`] when the table has no rule for the
    /// event or the rule does not allow `from`.
    pub fn validate(
        &self,
        event: E,
        from: S,
        at: DateTime<Utc>,
    ) -> Result<PendingTransition<S, E>, TransitionRejection<S, E>> {
        let Some(rule) = self.rules.get(&event) else {
            return Err(TransitionRejection {
                event,
                from,
                target: None,
                message: format!("no transition is defined for {event}"),
            });
        };

        if !rule.allows(from) {
            return Err(TransitionRejection {
                event,
                from,
                target: Some(rule.target()),
                message: rule.rejection_message(from),
            });
        }

        Ok(PendingTransition {
            event,
            from,
            to: rule.target(),
            at,
            committed: false,
        })
    }
}

impl<S: MachineSymbol, E: MachineSymbol> Default for TransitionTable<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reason a transition was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRejection<S, E> {
    /// Requested event.
    pub event: E,
    /// State at the time of the request.
    pub from: S,
    /// State the event would have moved to, when the event is known.
    pub target: Option<S>,
    /// Human-readable message.
    pub message: String,
}

impl<S, E> fmt::Display for TransitionRejection<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Point in the save cycle at which a callback runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackPhase {
    /// Before any save.
    BeforeSave,
    /// Before a save that inserts a new record.
    BeforeCreate,
    /// After a save that inserted a new record.
    AfterCreate,
    /// Before a save that updates an existing record.
    BeforeUpdate,
    /// After a save that updated an existing record.
    AfterUpdate,
    /// After any save.
    AfterSave,
}

/// Kind of save a transition commits with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    /// The subject is new and will be inserted.
    Create,
    /// The subject already exists and will be updated.
    Update,
}

impl SaveKind {
    /// Phases run before the save, in order.
    #[must_use]
    pub const fn before_phases(self) -> [CallbackPhase; 2] {
        match self {
            Self::Create => [CallbackPhase::BeforeSave, CallbackPhase::BeforeCreate],
            Self::Update => [CallbackPhase::BeforeSave, CallbackPhase::BeforeUpdate],
        }
    }

    /// Phases run after the save, in order.
    #[must_use]
    pub const fn after_phases(self) -> [CallbackPhase; 2] {
        match self {
            Self::Create => [CallbackPhase::AfterCreate, CallbackPhase::AfterSave],
            Self::Update => [CallbackPhase::AfterUpdate, CallbackPhase::AfterSave],
        }
    }
}

/// A validated transition that has not finished saving.
///
/// Holding one of these is what it means for a subject to be "in
/// transition": the value is consumed by [`PendingTransition::complete`] once
/// the save succeeds and simply dropped when any step fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition<S, E> {
    event: E,
    from: S,
    to: S,
    at: DateTime<Utc>,
    committed: bool,
}

impl<S: MachineSymbol, E: MachineSymbol> PendingTransition<S, E> {
    /// Returns the event in flight.
    #[must_use]
    pub const fn event(&self) -> E {
        self.event
    }

    /// Returns the state captured before the transition.
    #[must_use]
    pub const fn from(&self) -> S {
        self.from
    }

    /// Returns the state being moved to.
    #[must_use]
    pub const fn to(&self) -> S {
        self.to
    }

    /// Returns the instant the transition was requested.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Returns whether the new state has been applied to the subject.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// Records that the new state has been applied to the subject.
    pub const fn mark_committed(&mut self) {
        self.committed = true;
    }

    /// Ends the transition, returning its permanent record.
    #[must_use]
    pub fn complete(self) -> Transition<S, E> {
        Transition {
            event: self.event,
            from: self.from,
            to: self.to,
            at: self.at,
        }
    }
}

/// Record of a completed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S, E> {
    /// Event that fired.
    pub event: E,
    /// State before the transition.
    pub from: S,
    /// State after the transition.
    pub to: S,
    /// Instant of the transition.
    pub at: DateTime<Utc>,
}

/// Boxed transition callback.
pub type Callback<S, E, T, Err> =
    Box<dyn Fn(&PendingTransition<S, E>, &mut T) -> Result<(), Err> + Send + Sync>;

/// Ordered callbacks keyed by event and phase.
pub struct Callbacks<S, E, T, Err> {
    hooks: HashMap<(E, CallbackPhase), Vec<Callback<S, E, T, Err>>>,
}

impl<S: MachineSymbol, E: MachineSymbol, T, Err> Callbacks<S, E, T, Err> {
    /// Creates an empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Appends a callback for `event` at `phase`.
    pub fn register<F>(&mut self, event: E, phase: CallbackPhase, callback: F) -> &mut Self
    where
        F: Fn(&PendingTransition<S, E>, &mut T) -> Result<(), Err> + Send + Sync + 'static,
    {
        self.hooks
            .entry((event, phase))
            .or_default()
            .push(Box::new(callback));
        self
    }

    /// Returns how many callbacks are registered for `event` at `phase`.
    #[must_use]
    pub fn count(&self, event: E, phase: CallbackPhase) -> usize {
        self.hooks.get(&(event, phase)).map_or(0, Vec::len)
    }

    /// Runs the callbacks for the pending transition's event at `phase`.
    ///
    /// Callbacks run in registration order and the first failure stops the
    /// sequence.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a callback.
    pub fn run(
        &self,
        phase: CallbackPhase,
        pending: &PendingTransition<S, E>,
        subject: &mut T,
    ) -> Result<(), Err> {
        let Some(callbacks) = self.hooks.get(&(pending.event(), phase)) else {
            return Ok(());
        };
        for callback in callbacks {
            callback(pending, subject)?;
        }
        Ok(())
    }
}

impl<S: MachineSymbol, E: MachineSymbol, T, Err> Default for Callbacks<S, E, T, Err> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E: fmt::Debug, T, Err> fmt::Debug for Callbacks<S, E, T, Err> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for ((event, phase), callbacks) in &self.hooks {
            map.entry(&(event, phase), &callbacks.len());
        }
        map.finish()
    }
}
