//! Transitions and their column-wise batches.
use std::fmt::Debug;

/// A single step of experience collected by one agent.
///
/// `next_state` is `None` if and only if the transition ends an episode.
/// `time` counts the steps elapsed within the episode and is used as the
/// exponent of the discount in policy distillation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<O> {
    /// Observation before the action.
    pub state: O,

    /// Index of the action taken.
    pub action: i64,

    /// Observation after the action, `None` for a terminal step.
    pub next_state: Option<O>,

    /// Reward received.
    pub reward: f32,

    /// Steps elapsed within the episode.
    pub time: u32,

    /// Index of the agent (or environment) that produced the transition.
    pub agent_id: usize,
}

impl<O> Transition<O> {
    /// Creates a transition.
    pub fn new(
        state: O,
        action: i64,
        next_state: Option<O>,
        reward: f32,
        time: u32,
        agent_id: usize,
    ) -> Self {
        Self {
            state,
            action,
            next_state,
            reward,
            time,
            agent_id,
        }
    }

    /// Returns `true` if the transition ends an episode.
    pub fn is_terminal(&self) -> bool {
        self.next_state.is_none()
    }
}

/// Column-wise transpose of a sequence of [`Transition`]s.
///
/// All fields have the same length. The batch is also used as the
/// whole-memory accumulator of policy distillation, which only grows
/// through [`TransitionBatch::append`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionBatch<O> {
    /// Observations before the action.
    pub states: Vec<O>,

    /// Actions taken.
    pub actions: Vec<i64>,

    /// Observations after the action, `None` for terminal steps.
    pub next_states: Vec<Option<O>>,

    /// Rewards.
    pub rewards: Vec<f32>,

    /// Steps elapsed within the episode.
    pub times: Vec<u32>,

    /// Originating agents.
    pub agent_ids: Vec<usize>,
}

impl<O> Default for TransitionBatch<O> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<O> TransitionBatch<O> {
    /// Creates an empty batch.
    pub fn empty() -> Self {
        Self {
            states: vec![],
            actions: vec![],
            next_states: vec![],
            rewards: vec![],
            times: vec![],
            agent_ids: vec![],
        }
    }

    /// Transposes transitions into a batch.
    pub fn from_transitions(transitions: Vec<Transition<O>>) -> Self {
        let n = transitions.len();
        let mut batch = Self {
            states: Vec::with_capacity(n),
            actions: Vec::with_capacity(n),
            next_states: Vec::with_capacity(n),
            rewards: Vec::with_capacity(n),
            times: Vec::with_capacity(n),
            agent_ids: Vec::with_capacity(n),
        };

        for tr in transitions {
            batch.states.push(tr.state);
            batch.actions.push(tr.action);
            batch.next_states.push(tr.next_state);
            batch.rewards.push(tr.reward);
            batch.times.push(tr.time);
            batch.agent_ids.push(tr.agent_id);
        }

        batch
    }

    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the batch holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Appends all fields of `other` after the ones of `self`.
    pub fn append(&mut self, mut other: Self) {
        self.states.append(&mut other.states);
        self.actions.append(&mut other.actions);
        self.next_states.append(&mut other.next_states);
        self.rewards.append(&mut other.rewards);
        self.times.append(&mut other.times);
        self.agent_ids.append(&mut other.agent_ids);
    }

    /// Mask of non-terminal next states.
    pub fn non_final_mask(&self) -> Vec<bool> {
        self.next_states.iter().map(|s| s.is_some()).collect()
    }

    /// Next states that are not terminal, in batch order.
    pub fn non_final_next_states(&self) -> Vec<&O> {
        self.next_states.iter().filter_map(|s| s.as_ref()).collect()
    }
}

impl<O: Clone> TransitionBatch<O> {
    /// Returns the `i`-th transition.
    pub fn get(&self, i: usize) -> Option<Transition<O>> {
        if i >= self.len() {
            return None;
        }
        Some(Transition {
            state: self.states[i].clone(),
            action: self.actions[i],
            next_state: self.next_states[i].clone(),
            reward: self.rewards[i],
            time: self.times[i],
            agent_id: self.agent_ids[i],
        })
    }
}
