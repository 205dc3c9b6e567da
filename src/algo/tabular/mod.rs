pub mod q_table;

pub use q_table::{ActionValues, QTable, QTableAgent};
