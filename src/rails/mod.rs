pub mod resolver;
pub mod spec;
pub mod state;

pub use resolver::{find_ids_by_keywords, KeywordRails, RailResolver, RailStrategy, StaticRails};
pub use spec::{default_rails, keys, RailSpec};
pub use state::{rail_state, RailBook, RailState, ResolvedRail};
