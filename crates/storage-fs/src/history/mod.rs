mod json_history_store;

pub use json_history_store::JsonRankingHistoryStore;
