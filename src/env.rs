use rand::Rng;

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Determine if the state is active or terminal
    fn is_active(&self) -> bool;

    /// Update the environment in response to an action taken by an agent, producing
    /// the next state, the associated reward, and how the episode stands afterwards
    fn step(&mut self, action: Self::Action) -> Step<Self::State>;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;
}

/// An environment whose action set is finite and known up front
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions for the current state
    ///
    /// The returned vector should never be empty, instead specify an action that represents
    /// doing nothing if necessary.
    fn actions(&self) -> Vec<Self::Action>;

    /// Pick one of the available actions uniformly at random
    fn random_action<R: Rng>(&self, rng: &mut R) -> Self::Action {
        let mut actions = self.actions();
        assert!(
            !actions.is_empty(),
            "There is always at least one action available"
        );
        let i = rng.gen_range(0..actions.len());
        actions.swap_remove(i)
    }
}

/// How an episode stands after a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Continue
    }
}

/// The result of a single environment step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step<S> {
    /// The state of the environment after the action, present even when terminal
    pub next_state: S,
    /// The reward received for the action
    pub reward: f32,
    pub outcome: Outcome,
}

/// Represents a single experience or transition in the environment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Exp<S, A> {
    /// The state of the environment before taking the action
    pub state: S,
    /// The action taken in the given state
    pub action: A,
    /// The state of the environment after the action is taken
    pub next_state: S,
    /// The reward received after taking the action
    pub reward: f32,
}
