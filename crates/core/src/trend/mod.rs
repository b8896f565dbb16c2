mod compound_state;
mod moving_average;
mod transition_finder;
mod trend_model;

pub use compound_state::{compose, compose_states};
pub use moving_average::{evaluate, state_of, trailing_ma20};
pub use transition_finder::find_transition;
pub use trend_model::*;
