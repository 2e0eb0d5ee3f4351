pub mod analysis;
pub mod audit;
pub mod block;
pub mod cell;
pub mod config;
pub mod functions;
pub mod output;
pub mod server;
pub mod stage;

pub use cell::{CellOutput, CellValue};
pub use functions::{impact_score, impact_verdict, standard_block, RatioError, Verdict};
