mod strategies;

pub use strategies::{detect_listing, Anchor, DetectionReport, MatchMethod, StrategyMatch};
