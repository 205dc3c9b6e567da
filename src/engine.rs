use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    algo::tabular::{ActionValues, QTable, QTableAgent},
    env::{Environment, Exp, Outcome},
    gym::{Action, Grid, GridWorld, Pos},
    params::{HyperParameterUpdate, HyperParameters},
};

/// What happened when the engine applied an action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub reward: f32,
    /// The agent entered a goal or hazard cell
    pub episode_done: bool,
    /// The episode ended on a goal cell
    pub won: bool,
}

/// The agent/environment engine: a grid world, the agent's position in it,
/// a dense Q-table, and the hyperparameters that drive learning
///
/// The engine is purely reactive. A caller drives it one tick at a time with
/// [`select_action`](Engine::select_action) followed by
/// [`apply_action`](Engine::apply_action) (or both at once with
/// [`step`](Engine::step)), and decides when episodes start over. Nothing here
/// resets the position or decays exploration on its own.
///
/// ### Generics
/// - `R` - The random number generator used for exploration and tie-breaking
#[derive(Debug, Clone)]
pub struct Engine<R = StdRng> {
    env: GridWorld,
    agent: QTableAgent,
    rng: R,
}

impl Engine<StdRng> {
    /// Initialize an engine on `grid` with an entropy-seeded generator
    pub fn new(grid: Grid, params: HyperParameters) -> Self {
        Self::with_rng(grid, params, StdRng::from_entropy())
    }
}

impl<R: Rng> Engine<R> {
    /// Initialize an engine on `grid` with a caller-provided generator
    ///
    /// The agent starts on the grid's start cell with every action value at zero.
    pub fn with_rng(grid: Grid, params: HyperParameters, rng: R) -> Self {
        let agent = QTableAgent::new(&grid, params);
        let env = GridWorld::new(grid);
        debug!(
            "engine initialized on {}x{} grid, start at {:?}",
            env.grid().width(),
            env.grid().height(),
            env.start()
        );
        Self { env, agent, rng }
    }

    /// Pick the next action with the epsilon greedy policy
    ///
    /// Leaves the position, table and hyperparameters untouched.
    pub fn select_action(&mut self) -> Action {
        self.agent.act(&self.env, self.env.pos(), &mut self.rng)
    }

    /// Move the agent, compute the reward, and update the Q-table in one step
    ///
    /// Walking into a wall keeps the agent in place; the update still runs,
    /// bootstrapping from the current cell.
    pub fn apply_action(&mut self, action: Action) -> StepResult {
        let state = self.env.pos();
        let step = self.env.step(action);

        self.agent.learn(Exp {
            state,
            action,
            next_state: step.next_state,
            reward: step.reward,
        });

        StepResult {
            reward: step.reward,
            episode_done: step.outcome.is_terminal(),
            won: step.outcome == Outcome::Won,
        }
    }

    /// Select and apply one action
    pub fn step(&mut self) -> (Action, StepResult) {
        let action = self.select_action();
        (action, self.apply_action(action))
    }

    /// Decay the exploration rate, once per finished episode
    pub fn decay_exploration(&mut self) {
        self.agent.decay_exploration();
    }

    /// Move the agent back to the start cell, keeping everything it learned
    pub fn reset_position(&mut self) {
        self.env.reset();
    }

    /// Replace the layout, move to its start cell, and zero the Q-table
    pub fn replace_grid(&mut self, grid: Grid) {
        debug!(
            "replacing {}x{} grid with {}x{}",
            self.env.grid().width(),
            self.env.grid().height(),
            grid.width(),
            grid.height()
        );
        self.agent.reset(&grid);
        self.env.set_grid(grid);
    }

    /// Merge new values into the hyperparameters without validating them
    pub fn update_hyper_parameters(&mut self, update: &HyperParameterUpdate) {
        self.agent.params_mut().merge(update);
    }

    pub fn hyper_parameters(&self) -> &HyperParameters {
        self.agent.params()
    }

    /// Snapshot of the learned values at `(x, y)`, all zeros if never updated
    pub fn action_values(&self, x: usize, y: usize) -> ActionValues {
        self.agent.q_table().get(Pos::new(x, y))
    }

    pub fn q_table(&self) -> &QTable {
        self.agent.q_table()
    }

    pub fn position(&self) -> Pos {
        self.env.pos()
    }

    /// Whether the agent stands on a non-terminal cell
    pub fn is_active(&self) -> bool {
        self.env.is_active()
    }

    pub fn start(&self) -> Pos {
        self.env.start()
    }

    pub fn grid(&self) -> &Grid {
        self.env.grid()
    }
}
