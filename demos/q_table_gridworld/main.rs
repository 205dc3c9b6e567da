use std::{error::Error, fs, path::Path};

use neurogrid::{
    policy::{greedy_arrow, ValueTint},
    Action, Cell, Grid, Pos, Session, SessionConfig,
};
use rand::thread_rng;

const NUM_EPISODES: u32 = 500;
const MAX_STEPS: u64 = 1_000_000;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let path = Path::new("demos/q_table_gridworld");

    let grid = Grid::demo(&mut thread_rng());
    println!("{grid}\n");

    let mut session = Session::new(grid, SessionConfig::default());
    let records = session.run_episodes(NUM_EPISODES, MAX_STEPS);

    fs::create_dir_all(path.join("out"))?;
    let mut wtr = csv::Writer::from_path(path.join("out/history.csv"))?;
    for record in &records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    let engine = session.engine();
    let grid = engine.grid();
    for y in 0..grid.height() {
        let row = (0..grid.width())
            .map(|x| {
                let values = engine.action_values(x, y);
                match grid[Pos::new(x, y)] {
                    Cell::Empty | Cell::Start => match greedy_arrow(&values) {
                        Some(Action::Up) => '^',
                        Some(Action::Right) => '>',
                        Some(Action::Down) => 'v',
                        Some(Action::Left) => '<',
                        None => '.',
                    },
                    cell => cell.symbol(),
                }
            })
            .collect::<String>();
        let tints = (0..grid.width())
            .map(|x| match ValueTint::of(&engine.action_values(x, y)) {
                ValueTint::Promising => '+',
                ValueTint::Dangerous => '-',
                ValueTint::Neutral => ' ',
            })
            .collect::<String>();
        println!("{row}   {tints}");
    }

    let wins = session
        .chart_window()
        .iter()
        .filter(|r| r.reward > 0.0)
        .count();
    println!(
        "\n{} episodes, {wins} of the last {} with positive reward, epsilon {:.3}",
        records.len(),
        session.chart_window().len(),
        engine.hyper_parameters().exploration_rate
    );

    Ok(())
}
