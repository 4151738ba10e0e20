mod display;
mod domains;
pub mod formulas;
mod models;
mod utils;

pub use display::*;
pub use domains::*;
pub use models::*;
pub use utils::*;
