use super::trend_model::{CompoundState, TimeframeState, TrendState};

/// Combine weekly and monthly states into one label.
///
/// An insufficient-data timeframe keeps its explicit marker.
pub fn compose(weekly: TrendState, monthly: TrendState) -> CompoundState {
    CompoundState { weekly, monthly }
}

pub fn compose_states(weekly: &TimeframeState, monthly: &TimeframeState) -> CompoundState {
    compose(weekly.state, monthly.state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(compose(TrendState::Above, TrendState::Above).to_string(), "above/above");
        assert_eq!(compose(TrendState::Above, TrendState::Below).to_string(), "above/below");
        assert_eq!(compose(TrendState::Below, TrendState::Above).to_string(), "below/above");
        assert_eq!(compose(TrendState::Below, TrendState::Below).to_string(), "below/below");
    }

    #[test]
    fn test_insufficient_slot_keeps_marker() {
        let label = compose(TrendState::Below, TrendState::InsufficientData);
        assert_eq!(label.monthly, TrendState::InsufficientData);
        assert_eq!(label.to_string(), "below/n/a");
        assert!(!label.is_aligned_below());
    }

    #[test]
    fn test_alignment() {
        assert!(compose(TrendState::Above, TrendState::Above).is_aligned_above());
        assert!(compose(TrendState::Below, TrendState::Below).is_aligned_below());
        assert!(!compose(TrendState::Above, TrendState::Below).is_aligned_above());
    }
}
