use rand::Rng;

use crate::{
    decay::{Decay, Geometric},
    env::{DiscreteActionSpace, Exp},
    exploration::{self, Choice, EpsilonGreedy},
    gym::{Action, Grid, GridWorld, Pos},
    params::HyperParameters,
};

/// The learned values of the four actions in one cell, indexed by [`Action::index`]
pub type ActionValues = [f32; Action::COUNT];

/// A dense table of [`ActionValues`], one entry per grid cell
///
/// Entries are stored row-major and start at zero, so every cell of the grid
/// always has a value vector.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    width: usize,
    height: usize,
    values: Vec<ActionValues>,
}

impl QTable {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![[0.0; Action::COUNT]; width * height],
        }
    }

    /// Allocate a zeroed table covering `grid`
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.width(), grid.height())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        (pos.x < self.width && pos.y < self.height).then_some(pos.y * self.width + pos.x)
    }

    /// Snapshot of the values at `pos`
    ///
    /// Positions outside the table read as all zeros.
    pub fn get(&self, pos: Pos) -> ActionValues {
        self.index(pos)
            .map(|i| self.values[i])
            .unwrap_or([0.0; Action::COUNT])
    }

    /// Value of the best action at `pos`
    pub fn max(&self, pos: Pos) -> f32 {
        self.get(pos).into_iter().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Iterate over every stored vector in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &ActionValues)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (Pos::new(i % self.width, i / self.width), v))
    }

    /// One-step temporal difference update
    ///
    /// Q(s,a) ← Q(s,a) + α (r + γ max<sub>a'</sub> Q(s',a') − Q(s,a))
    ///
    /// The bootstrap term is taken from the stored vector of `next_state` even
    /// when the transition ended the episode.
    ///
    /// **Returns** the new value of Q(s,a)
    pub fn update(&mut self, exp: &Exp<Pos, Action>, alpha: f32, gamma: f32) -> f32 {
        let Some(i) = self.index(exp.state) else {
            return 0.0;
        };

        let max_next_q = self.max(exp.next_state);
        let q = &mut self.values[i][exp.action.index()];
        *q += alpha * (exp.reward + gamma * max_next_q - *q);
        *q
    }
}

/// A Q-learning agent that keeps its values in a dense [`QTable`]
///
/// The agent owns its table and hyperparameters; the exploration rate decays
/// once per finished episode via [`QTableAgent::decay_exploration`].
#[derive(Debug, Clone)]
pub struct QTableAgent {
    q_table: QTable,
    params: HyperParameters,
}

impl QTableAgent {
    /// Initialize a new agent with a zeroed table sized to `grid`
    pub fn new(grid: &Grid, params: HyperParameters) -> Self {
        Self {
            q_table: QTable::for_grid(grid),
            params,
        }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn params(&self) -> &HyperParameters {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut HyperParameters {
        &mut self.params
    }

    /// Forget everything learned and size the table to `grid`
    pub fn reset(&mut self, grid: &Grid) {
        self.q_table = QTable::for_grid(grid);
    }

    /// Choose an action for `state` with the epsilon greedy policy
    pub fn act<R: Rng>(&self, env: &GridWorld, state: Pos, rng: &mut R) -> Action {
        match EpsilonGreedy::new(self.params.exploration_rate).choose(rng) {
            Choice::Explore => env.random_action(rng),
            Choice::Exploit => {
                let i = exploration::greedy(&self.q_table.get(state), rng);
                Action::from_index(i).expect("Action values have one entry per action")
            }
        }
    }

    /// Apply the Q-learning update for one transition
    pub fn learn(&mut self, exp: Exp<Pos, Action>) -> f32 {
        let HyperParameters {
            learning_rate,
            discount_factor,
            ..
        } = self.params;
        self.q_table.update(&exp, learning_rate, discount_factor)
    }

    /// Decay the exploration rate, called once per finished episode
    pub fn decay_exploration(&mut self) {
        let schedule = Geometric::new(self.params.exploration_decay, self.params.min_exploration);
        self.params.exploration_rate = schedule.decay(self.params.exploration_rate);
    }
}
