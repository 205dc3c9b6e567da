use log::{info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    engine::{Engine, StepResult},
    error::Result,
    gym::{Action, Grid},
    history::{EpisodeHistory, EpisodeRecord},
    params::{HyperParameterUpdate, HyperParameters},
    services::{self, Analyst, MapSource, ANALYSIS_WINDOW},
};

/// Configuration for a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Hyperparameters restored by [`Session::reset`]
    pub params: HyperParameters,
    /// Number of recent episodes a chart displays
    pub chart_window: usize,
    /// Number of recent episodes handed to an analyst
    pub analysis_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            params: HyperParameters::default(),
            chart_window: 50,
            analysis_window: ANALYSIS_WINDOW,
        }
    }
}

/// Report for a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub action: Action,
    pub result: StepResult,
    /// Set when this tick finished an episode
    pub finished: Option<EpisodeRecord>,
}

/// A training run on top of an [`Engine`]
///
/// The session plays the part of the scheduler: every [`tick`](Session::tick)
/// runs one engine step, and when an episode ends it records the episode,
/// decays exploration and sends the agent back to the start.
pub struct Session<R = StdRng> {
    engine: Engine<R>,
    config: SessionConfig,
    history: EpisodeHistory,
    episode_reward: f32,
    episode_steps: u64,
}

impl Session<StdRng> {
    pub fn new(grid: Grid, config: SessionConfig) -> Self {
        Self::with_rng(grid, config, StdRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(grid: Grid, config: SessionConfig, rng: R) -> Self {
        Self {
            engine: Engine::with_rng(grid, config.params, rng),
            config,
            history: EpisodeHistory::new(),
            episode_reward: 0.0,
            episode_steps: 0,
        }
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &EpisodeHistory {
        &self.history
    }

    /// Number of finished episodes since the last reset or map change
    pub fn episodes(&self) -> u32 {
        self.history.len() as u32
    }

    /// Reward collected so far in the running episode
    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    /// Steps taken so far in the running episode
    pub fn episode_steps(&self) -> u64 {
        self.episode_steps
    }

    /// Episodes to plot, the most recent [`SessionConfig::chart_window`]
    pub fn chart_window(&self) -> &[EpisodeRecord] {
        self.history.recent(self.config.chart_window)
    }

    /// Episodes to analyze, the most recent [`SessionConfig::analysis_window`]
    pub fn analysis_window(&self) -> &[EpisodeRecord] {
        self.history.recent(self.config.analysis_window)
    }

    /// Run one engine step and close out the episode if it ended
    pub fn tick(&mut self) -> Tick {
        let (action, result) = self.engine.step();
        self.episode_reward += result.reward;
        self.episode_steps += 1;

        let finished = result.episode_done.then(|| self.finish_episode(result.won));
        Tick {
            action,
            result,
            finished,
        }
    }

    fn finish_episode(&mut self, won: bool) -> EpisodeRecord {
        debug_assert!(!self.engine.is_active());
        let record = EpisodeRecord {
            episode: self.episodes() + 1,
            reward: self.episode_reward,
            steps: self.episode_steps,
        };
        self.history.push(record);

        self.engine.decay_exploration();
        self.engine.reset_position();
        self.episode_reward = 0.0;
        self.episode_steps = 0;

        info!(
            "episode {} {}: reward {:.1}, steps {}, epsilon {:.3}",
            record.episode,
            if won { "won" } else { "lost" },
            record.reward,
            record.steps,
            self.engine.hyper_parameters().exploration_rate
        );
        record
    }

    /// Tick until `episodes` more episodes finish or `max_steps` ticks pass
    ///
    /// **Returns** the records of the episodes finished during the run
    pub fn run_episodes(&mut self, episodes: u32, max_steps: u64) -> Vec<EpisodeRecord> {
        let mut finished = Vec::with_capacity(episodes as usize);
        let mut steps = 0;
        while (finished.len() as u32) < episodes && steps < max_steps {
            if let Some(record) = self.tick().finished {
                finished.push(record);
            }
            steps += 1;
        }

        if (finished.len() as u32) < episodes {
            warn!(
                "stopped after {steps} steps with {} of {episodes} episodes finished",
                finished.len()
            );
        }
        finished
    }

    fn clear_progress(&mut self) {
        self.history.clear();
        self.episode_reward = 0.0;
        self.episode_steps = 0;
    }

    /// Forget everything learned and restore the configured hyperparameters,
    /// keeping the current grid
    pub fn reset(&mut self) {
        let grid = self.engine.grid().clone();
        self.engine.replace_grid(grid);
        self.engine
            .update_hyper_parameters(&HyperParameterUpdate::from(self.config.params));
        self.clear_progress();
    }

    /// Switch to a new layout, starting learning and exploration over
    pub fn replace_grid(&mut self, grid: Grid) {
        self.engine.replace_grid(grid);
        self.engine
            .update_hyper_parameters(&HyperParameterUpdate::default().with_exploration_rate(1.0));
        self.clear_progress();
    }

    /// Generate a layout from `description` and switch to it
    ///
    /// On failure the current grid and everything learned on it are kept.
    pub fn load_map<M: MapSource + ?Sized>(
        &mut self,
        source: &mut M,
        description: &str,
    ) -> Result<()> {
        match source.generate_grid(description) {
            Ok(grid) => {
                info!("loaded generated {}x{} map", grid.width(), grid.height());
                self.replace_grid(grid);
                Ok(())
            }
            Err(e) => {
                warn!("map generation failed, keeping current map: {e}");
                Err(e)
            }
        }
    }

    /// Commentary on recent episodes; never fails
    pub fn analyze<A: Analyst + ?Sized>(&self, analyst: &mut A) -> String {
        services::summarize_or_fallback(
            analyst,
            self.analysis_window(),
            self.engine.hyper_parameters(),
        )
    }

    pub fn update_hyper_parameters(&mut self, update: &HyperParameterUpdate) {
        self.engine.update_hyper_parameters(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        gym::{grid_world::GOAL_REWARD, Pos},
        services::{GenerativeAnalyst, Request, FALLBACK_ANALYSIS},
    };

    fn session(layout: &str, params: HyperParameters) -> Session {
        Session::with_rng(
            layout.parse().unwrap(),
            SessionConfig {
                params,
                ..Default::default()
            },
            StdRng::seed_from_u64(11),
        )
    }

    struct FixedMap(Option<Grid>);

    impl MapSource for FixedMap {
        fn generate_grid(&mut self, _: &str) -> Result<Grid> {
            self.0.clone().ok_or_else(|| Error::service("offline"))
        }
    }

    struct Echo;

    impl Analyst for Echo {
        fn summarize(
            &mut self,
            history: &[EpisodeRecord],
            params: &HyperParameters,
        ) -> Result<String> {
            Ok(format!("{} {}", history.len(), params.exploration_rate))
        }
    }

    struct Broken;

    impl Analyst for Broken {
        fn summarize(&mut self, _: &[EpisodeRecord], _: &HyperParameters) -> Result<String> {
            Err(Error::service("timeout"))
        }
    }

    #[test]
    fn episode_bookkeeping() {
        let mut s = session(
            "SG",
            HyperParameters {
                exploration_rate: 0.0,
                exploration_decay: 0.5,
                min_exploration: 0.0,
                ..Default::default()
            },
        );
        s.update_hyper_parameters(&HyperParameterUpdate::default().with_exploration_rate(0.8));

        let mut ticks = vec![s.tick()];
        while ticks.last().map_or(true, |t| t.finished.is_none()) {
            ticks.push(s.tick());
        }

        let last = ticks.last().unwrap();
        let record = last.finished.unwrap();
        assert_eq!(last.result.reward, GOAL_REWARD);
        assert_eq!(record.episode, 1);
        assert_eq!(record.steps, ticks.len() as u64);
        assert_eq!(
            record.reward,
            ticks.iter().map(|t| t.result.reward).sum::<f32>()
        );
        assert_eq!(s.engine().position(), Pos::new(0, 0), "Back at start");
        assert!(s.engine().is_active());
        assert_eq!(s.engine().hyper_parameters().exploration_rate, 0.4);
        assert_eq!(s.episode_steps(), 0);
        assert_eq!(s.episode_reward(), 0.0);
        assert_eq!(s.episodes(), 1);
    }

    #[test]
    fn run_episodes_on_demo_map() {
        let mut rng = StdRng::seed_from_u64(5);
        let grid = Grid::demo(&mut rng);
        let mut s = Session::with_rng(grid, SessionConfig::default(), rng);

        let records = s.run_episodes(100, 1_000_000);
        assert_eq!(records.len(), 100);
        assert_eq!(s.history().len(), 100);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.episode, i as u32 + 1);
            assert!(r.steps > 0);
        }
        assert_eq!(s.chart_window().len(), 50);
        assert_eq!(s.chart_window()[0].episode, 51);
        assert_eq!(s.analysis_window().len(), 20);
        assert!(s.engine().hyper_parameters().exploration_rate < 1.0);
    }

    #[test]
    fn run_episodes_respects_step_cap() {
        // The goal is walled off and there is no hazard, so no episode ends
        let mut s = session("SWG", HyperParameters::default());
        let records = s.run_episodes(3, 500);
        assert!(records.is_empty());
        assert_eq!(s.episode_steps(), 500);

        s.run_episodes(1, 700);
        assert_eq!(s.episode_steps(), 1_200, "Running episode spans batches");
    }

    #[test]
    fn reset_restores_config() {
        let mut s = session("SEG", HyperParameters::default());
        s.run_episodes(5, 100_000);
        s.update_hyper_parameters(&HyperParameterUpdate::default().with_learning_rate(0.9));
        s.reset();

        assert!(s.history().is_empty());
        assert_eq!(*s.engine().hyper_parameters(), HyperParameters::default());
        assert!(s.engine().q_table().iter().all(|(_, v)| *v == [0.0; 4]));
        assert_eq!(s.engine().position(), Pos::new(0, 0));
    }

    #[test]
    fn load_map_success_replaces_grid() {
        let mut s = session("SEG", HyperParameters::default());
        s.run_episodes(5, 100_000);

        let new_grid: Grid = "EG\nSE".parse().unwrap();
        s.load_map(&mut FixedMap(Some(new_grid.clone())), "two by two")
            .unwrap();

        assert_eq!(s.engine().grid(), &new_grid);
        assert_eq!(s.engine().position(), Pos::new(0, 1));
        assert!(s.history().is_empty());
        assert_eq!(s.engine().hyper_parameters().exploration_rate, 1.0);
    }

    #[test]
    fn load_map_failure_keeps_grid_and_memory() {
        let mut s = session("SEG", HyperParameters::default());
        s.run_episodes(5, 100_000);
        let grid = s.engine().grid().clone();
        let q_table = s.engine().q_table().clone();
        let episodes = s.episodes();

        let result = s.load_map(&mut FixedMap(None), "anything");
        assert!(matches!(result, Err(Error::Service { .. })));
        assert_eq!(s.engine().grid(), &grid);
        assert_eq!(s.engine().q_table(), &q_table);
        assert_eq!(s.episodes(), episodes);
    }

    #[test]
    fn analyze_windows_and_falls_back() {
        let mut s = session(
            "SG",
            HyperParameters {
                exploration_rate: 0.0,
                ..Default::default()
            },
        );
        s.run_episodes(30, 100_000);
        assert_eq!(s.analyze(&mut Echo), "20 0");
        assert_eq!(s.analyze(&mut Broken), FALLBACK_ANALYSIS);
    }

    #[test]
    fn analyst_prompt_follows_configured_window() {
        let mut s = Session::with_rng(
            "SG".parse().unwrap(),
            SessionConfig {
                params: HyperParameters {
                    exploration_rate: 0.0,
                    ..Default::default()
                },
                analysis_window: 40,
                ..Default::default()
            },
            StdRng::seed_from_u64(11),
        );
        s.run_episodes(60, 100_000);

        let mut prompt = String::new();
        let text = s.analyze(&mut GenerativeAnalyst::new(
            |request: &Request<'_>| -> Result<String> {
                prompt = request.prompt.to_string();
                Ok("ok".to_string())
            },
        ));
        assert_eq!(text, "ok");
        assert_eq!(prompt.matches(r#""episode":"#).count(), 40);
        assert!(prompt.contains("last 40 episodes"));
        assert!(prompt.contains(r#""episode":21,"#));
        assert!(!prompt.contains(r#""episode":20,"#));
    }
}
