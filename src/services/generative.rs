use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    gym::{Cell, Grid},
    history::EpisodeRecord,
    params::HyperParameters,
};

use super::{Analyst, MapSource};

/// Commentary used when the provider answers with an empty body
pub const EMPTY_ANALYSIS: &str = "Analysis unavailable.";

/// A prompt for a [`TextGenerator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub prompt: &'a str,
    /// The response must be a single JSON document
    pub json: bool,
}

/// A text-generation provider
///
/// Implemented for closures so tests and thin provider clients can plug in
/// directly.
pub trait TextGenerator {
    fn generate(&mut self, request: &Request<'_>) -> Result<String>;
}

impl<F> TextGenerator for F
where
    F: FnMut(&Request<'_>) -> Result<String>,
{
    fn generate(&mut self, request: &Request<'_>) -> Result<String> {
        self(request)
    }
}

/// Prompt asking for a 10x10 layout matching `description`
pub fn map_prompt(description: &str) -> String {
    let size = Grid::DEFAULT_SIZE;
    format!(
        "Generate a 2D grid layout for a reinforcement learning game.\n\
         The grid should be {size}x{size}.\n\
         Characters:\n\
         - 'E': Empty space\n\
         - 'W': Wall (obstacle)\n\
         - 'S': Start position (must have exactly one)\n\
         - 'G': Goal (must have exactly one)\n\
         - 'H': Hazard (negative reward)\n\
         \n\
         User description: {description}\n\
         \n\
         Ensure there is a valid path from Start to Goal.\n\
         Return ONLY a JSON object of the form \
         {{\"width\": {size}, \"height\": {size}, \"layout\": [\"...\", ...]}} \
         with one string per row."
    )
}

/// Prompt asking for brief tactical commentary on `history`
///
/// Every record is included; windowing is up to the caller.
pub fn analysis_prompt(history: &[EpisodeRecord], params: &HyperParameters) -> Result<String> {
    let count = history.len();
    let recent = serde_json::to_string(history)?;
    Ok(format!(
        "Analyze the performance of a Q-learning agent.\n\
         \n\
         Current parameters:\n\
         Alpha (learning rate): {alpha}\n\
         Gamma (discount): {gamma}\n\
         Epsilon (exploration): {epsilon}\n\
         \n\
         Recent performance (last {count} episodes):\n\
         {recent}\n\
         \n\
         Provide a brief, encouraging, tactical analysis of at most 100 words. \
         Is the agent learning? Is it stuck? Should the parameters change, for \
         example lower epsilon to exploit more or raise gamma to value future \
         rewards?",
        alpha = params.learning_rate,
        gamma = params.discount_factor,
        epsilon = params.exploration_rate,
    ))
}

/// The JSON document a provider returns for a map request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapResponse {
    #[serde(default)]
    pub width: Option<usize>,
    #[serde(default)]
    pub height: Option<usize>,
    pub layout: Vec<String>,
}

impl TryFrom<MapResponse> for Grid {
    type Error = Error;

    /// Build the grid from the layout rows; the declared width and height are
    /// advisory and the rows decide
    fn try_from(response: MapResponse) -> Result<Self> {
        let grid = Grid::from_rows(&response.layout)?;

        let size = Grid::DEFAULT_SIZE;
        if grid.width() != size || grid.height() != size {
            return Err(Error::InvalidDimensions {
                expected_width: size,
                expected_height: size,
                width: grid.width(),
                height: grid.height(),
            });
        }

        let count = grid.count(Cell::Start);
        if count != 1 {
            return Err(Error::StartCount { count });
        }
        if grid.count(Cell::Goal) == 0 {
            return Err(Error::MissingGoal);
        }

        Ok(grid)
    }
}

/// Decode a provider's map response into a validated grid
pub fn decode_map(text: &str) -> Result<Grid> {
    let response: MapResponse = serde_json::from_str(text.trim())?;
    response.try_into()
}

/// A [`MapSource`] backed by a [`TextGenerator`]
pub struct GenerativeMapSource<G> {
    generator: G,
}

impl<G: TextGenerator> GenerativeMapSource<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }
}

impl<G: TextGenerator> MapSource for GenerativeMapSource<G> {
    fn generate_grid(&mut self, description: &str) -> Result<Grid> {
        let prompt = map_prompt(description);
        let text = self.generator.generate(&Request {
            prompt: &prompt,
            json: true,
        })?;
        decode_map(&text)
    }
}

/// An [`Analyst`] backed by a [`TextGenerator`]
pub struct GenerativeAnalyst<G> {
    generator: G,
}

impl<G: TextGenerator> GenerativeAnalyst<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }
}

impl<G: TextGenerator> Analyst for GenerativeAnalyst<G> {
    fn summarize(&mut self, history: &[EpisodeRecord], params: &HyperParameters) -> Result<String> {
        let prompt = analysis_prompt(history, params)?;
        let text = self.generator.generate(&Request {
            prompt: &prompt,
            json: false,
        })?;

        let text = text.trim();
        Ok(if text.is_empty() {
            EMPTY_ANALYSIS.to_string()
        } else {
            text.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gym::Pos;

    fn layout() -> Vec<String> {
        let mut rows = vec!["E".repeat(10); 10];
        rows[0] = "SEEEEEEEEE".to_string();
        rows[4] = "EEEEHWEEEE".to_string();
        rows[9] = "EEEEEEEEEG".to_string();
        rows
    }

    fn response_json(rows: &[String]) -> String {
        serde_json::to_string(&MapResponse {
            width: Some(10),
            height: Some(10),
            layout: rows.to_vec(),
        })
        .unwrap()
    }

    #[test]
    fn decode_valid_map() {
        let grid = decode_map(&response_json(&layout())).unwrap();
        assert_eq!(grid.start(), Pos::new(0, 0));
        assert_eq!(grid[Pos::new(4, 4)], Cell::Hazard);
        assert_eq!(grid[Pos::new(5, 4)], Cell::Wall);
        assert_eq!(grid[Pos::new(9, 9)], Cell::Goal);
    }

    #[test]
    fn decode_without_declared_size() {
        let text = serde_json::json!({ "layout": layout() }).to_string();
        assert!(decode_map(&text).is_ok());
    }

    #[test]
    fn decode_rejects_bad_maps() {
        assert!(matches!(decode_map("not json"), Err(Error::Json(_))));

        let mut rows = layout();
        rows.pop();
        assert!(matches!(
            decode_map(&response_json(&rows)),
            Err(Error::InvalidDimensions { height: 9, .. })
        ));

        let mut rows = layout();
        rows[3] = "EESEEEEEEE".to_string();
        assert!(matches!(
            decode_map(&response_json(&rows)),
            Err(Error::StartCount { count: 2 })
        ));

        let mut rows = layout();
        rows[9] = "E".repeat(10);
        assert!(matches!(
            decode_map(&response_json(&rows)),
            Err(Error::MissingGoal)
        ));

        let mut rows = layout();
        rows[2] = "EEE".to_string();
        assert!(matches!(
            decode_map(&response_json(&rows)),
            Err(Error::RaggedLayout { row: 2, .. })
        ));
    }

    #[test]
    fn map_source_sends_json_request() {
        let rows = layout();
        let mut source = GenerativeMapSource::new(|request: &Request<'_>| -> Result<String> {
            assert!(request.json);
            assert!(request.prompt.contains("a maze with a treasure room"));
            Ok(response_json(&rows))
        });
        let grid = source.generate_grid("a maze with a treasure room").unwrap();
        assert_eq!(grid.count(Cell::Goal), 1);
    }

    #[test]
    fn map_source_propagates_failure() {
        let mut source =
            GenerativeMapSource::new(|_: &Request<'_>| -> Result<String> {
            Err(Error::service("missing credential"))
        });
        assert!(matches!(
            source.generate_grid("anything"),
            Err(Error::Service { .. })
        ));
    }

    #[test]
    fn analysis_prompt_carries_all_records() {
        let history = (1..=30)
            .map(|episode| EpisodeRecord {
                episode,
                reward: -1.0,
                steps: 1,
            })
            .collect::<Vec<_>>();
        let prompt = analysis_prompt(&history, &HyperParameters::default()).unwrap();
        assert!(prompt.contains(r#""episode":1,"#));
        assert!(prompt.contains(r#""episode":30,"#));
        assert_eq!(prompt.matches(r#""episode":"#).count(), 30);
        assert!(prompt.contains("last 30 episodes"));
        assert!(prompt.contains("Alpha (learning rate): 0.1"));

        let prompt = analysis_prompt(&history[25..], &HyperParameters::default()).unwrap();
        assert_eq!(prompt.matches(r#""episode":"#).count(), 5);
        assert!(prompt.contains("last 5 episodes"));
    }

    #[test]
    fn analyst_trims_and_defaults() {
        let mut analyst = GenerativeAnalyst::new(|request: &Request<'_>| -> Result<String> {
            assert!(!request.json);
            Ok("  Keep exploring.\n".to_string())
        });
        let text = analyst.summarize(&[], &HyperParameters::default()).unwrap();
        assert_eq!(text, "Keep exploring.");

        let mut analyst =
            GenerativeAnalyst::new(|_: &Request<'_>| -> Result<String> { Ok(String::new()) });
        let text = analyst.summarize(&[], &HyperParameters::default()).unwrap();
        assert_eq!(text, EMPTY_ANALYSIS);
    }
}
