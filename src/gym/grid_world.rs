use strum::VariantArray;

use crate::env::{DiscreteActionSpace, Environment, Outcome, Step};

use super::{Cell, Grid, Pos};

/// Reward for reaching a goal cell
pub const GOAL_REWARD: f32 = 100.0;
/// Reward for stepping onto a hazard
pub const HAZARD_REWARD: f32 = -100.0;
/// Reward for walking into a wall
pub const WALL_REWARD: f32 = -5.0;
/// Living cost of every other step
pub const STEP_REWARD: f32 = -1.0;

/// A move in one of the four compass directions
///
/// The discriminant doubles as the index into an action-value vector.
#[derive(VariantArray, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Action {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Action {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::VARIANTS.get(i).copied()
    }
}

/// A deterministic maze built from a [`Grid`]
///
/// Moves are clamped to the grid bounds, walls block movement, and goal and
/// hazard cells end the episode.
#[derive(Clone, Debug)]
pub struct GridWorld {
    grid: Grid,
    start: Pos,
    pos: Pos,
}

impl GridWorld {
    pub fn new(grid: Grid) -> Self {
        let start = grid.start();
        Self {
            grid,
            start,
            pos: start,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Swap in a new layout and move back to its start cell
    pub fn set_grid(&mut self, grid: Grid) {
        self.start = grid.start();
        self.pos = self.start;
        self.grid = grid;
    }

    /// Reward and episode outcome for attempting to enter a cell
    pub fn reward(cell: Cell) -> (f32, Outcome) {
        match cell {
            Cell::Goal => (GOAL_REWARD, Outcome::Won),
            Cell::Hazard => (HAZARD_REWARD, Outcome::Lost),
            Cell::Wall => (WALL_REWARD, Outcome::Continue),
            Cell::Empty | Cell::Start => (STEP_REWARD, Outcome::Continue),
        }
    }
}

impl DiscreteActionSpace for GridWorld {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}

impl Environment for GridWorld {
    type State = Pos;
    type Action = Action;

    fn is_active(&self) -> bool {
        !self.grid[self.pos].is_terminal()
    }

    fn step(&mut self, action: Self::Action) -> Step<Self::State> {
        let target = self.grid.neighbor(self.pos, action);
        let cell = self.grid[target];

        if cell != Cell::Wall {
            self.pos = target;
        }

        let (reward, outcome) = Self::reward(cell);
        Step {
            next_state: self.pos,
            reward,
            outcome,
        }
    }

    fn reset(&mut self) -> Self::State {
        self.pos = self.start;
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn world(layout: &str) -> GridWorld {
        GridWorld::new(layout.parse().unwrap())
    }

    #[test]
    fn grid_world_actions() {
        let mut env = world(
            "
            EEE
            ESE
            EEE
            ",
        );
        assert_eq!(env.pos(), Pos::new(1, 1));

        env.step(Action::Up);
        assert_eq!(env.pos(), Pos::new(1, 0), "Up action works");

        env.step(Action::Right);
        assert_eq!(env.pos(), Pos::new(2, 0), "Right action works");

        env.step(Action::Down);
        assert_eq!(env.pos(), Pos::new(2, 1), "Down action works");

        env.step(Action::Left);
        assert_eq!(env.pos(), Pos::new(1, 1), "Left action works");

        assert!(env.is_active(), "Env is active");
    }

    #[test]
    fn wall_blocks_movement() {
        let mut env = world("SW");
        let step = env.step(Action::Right);
        assert_eq!(step.next_state, Pos::new(0, 0));
        assert_eq!(step.reward, WALL_REWARD);
        assert_eq!(step.outcome, Outcome::Continue);
    }

    #[test]
    fn boundary_is_not_a_wall() {
        let mut env = world("SE");
        let step = env.step(Action::Up);
        assert_eq!(step.next_state, Pos::new(0, 0));
        assert_eq!(step.reward, STEP_REWARD, "Start cell costs a regular step");
        assert_eq!(step.outcome, Outcome::Continue);

        let mut env = world("SW");
        env.step(Action::Right);
        let step = env.step(Action::Left);
        assert_eq!(step.reward, STEP_REWARD);
    }

    #[test]
    fn terminal_cells() {
        let mut env = world("HSG");
        let step = env.step(Action::Right);
        assert_eq!(step.next_state, Pos::new(2, 0));
        assert_eq!(step.reward, GOAL_REWARD);
        assert_eq!(step.outcome, Outcome::Won);
        assert!(!env.is_active());

        assert_eq!(env.reset(), Pos::new(1, 0));
        let step = env.step(Action::Left);
        assert_eq!(step.reward, HAZARD_REWARD);
        assert_eq!(step.outcome, Outcome::Lost);
        assert!(!env.is_active());
    }

    #[test]
    fn set_grid_moves_to_new_start() {
        let mut env = world("SEG");
        env.step(Action::Right);
        env.set_grid("EEE\nGES".parse().unwrap());
        assert_eq!(env.start(), Pos::new(2, 1));
        assert_eq!(env.pos(), Pos::new(2, 1));
    }

    #[test]
    fn random_actions_cover_action_space() {
        let env = world("S");
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; Action::COUNT];
        for _ in 0..100 {
            seen[env.random_action(&mut rng).index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn action_indices() {
        for (i, action) in Action::VARIANTS.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i), Some(*action));
        }
        assert_eq!(Action::from_index(4), None);
    }
}
