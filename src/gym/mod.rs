pub mod grid;
pub mod grid_world;

pub use grid::{Cell, Grid, Pos};
pub use grid_world::{Action, GridWorld};
