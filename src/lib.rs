//! Rank candidate products against a weighted criteria catalog.
//!
//! Preferences (weight, relevance, knockout) live per subcriterion and are
//! kept consistent by [`preferences`]; [`evaluation`] turns them plus the
//! evidence scores into a knockout-aware ranking.

pub mod browser;
pub mod catalog;
pub mod config;
pub mod evaluation;
pub mod output;
pub mod preferences;
pub mod prompt;
pub mod rails;
pub mod selection;
pub mod wizard;
pub mod workspace;
