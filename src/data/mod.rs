//! Data module - literal chart inputs

mod scores;

pub use scores::GroupedScores;
