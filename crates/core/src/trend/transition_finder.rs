//! Backward search for the date the current daily state began.

use trendwatch_market_data::Series;

use super::moving_average::{state_of, trailing_ma20};
use super::trend_model::Transition;
use crate::constants::MA_PERIOD;

/// Find the first trading day of the current unbroken run of `current_state`.
///
/// Walks back one bar at a time from the bar before the latest one. At each
/// historical bar the MA20 is recomputed from that bar and the 19 before it,
/// never from later bars. The first bar whose state differs from
/// `current_state` ends the search and the bar right after it is the
/// transition date.
///
/// Returns [`Transition::NotFound`] when `max_lookback` bars were checked
/// without a differing state, or when history runs out first (the state has
/// held since the first bar with a defined MA20).
pub fn find_transition(daily: &Series, current_state: bool, max_lookback: usize) -> Transition {
    let bars = daily.bars();
    let Some(latest) = bars.len().checked_sub(1) else {
        return Transition::NotFound;
    };

    for step in 1..=max_lookback {
        let Some(index) = latest.checked_sub(step) else {
            break;
        };
        // No MA20 before the twentieth bar
        if index + 1 < MA_PERIOD {
            break;
        }

        let state = state_of(&bars[..=index]).is_above();
        if state == Some(!current_state) {
            let start = index + 1;
            return match trailing_ma20(&bars[..=start]) {
                Some(ma20) => Transition::Found {
                    date: bars[start].date,
                    ma20,
                },
                None => Transition::NotFound,
            };
        }
    }

    Transition::NotFound
}
