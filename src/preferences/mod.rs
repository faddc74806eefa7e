pub mod domain_weights;
pub mod mutate;
pub mod normalize;
pub mod storage;
pub mod types;

pub use domain_weights::{apply_domain_multiplier_change, DomainMultipliers};
pub use mutate::{
    apply_patch_many, scale_weight_many, set_ko, set_ko_many, set_ko_threshold,
    set_ko_threshold_many, set_relevance, set_relevance_many, set_weight, set_weight_many,
    PreferencePatch,
};
pub use normalize::{normalize, normalize_all, reconcile};
pub use storage::{AppliedFlag, PreferenceStore};
pub use types::{KoThreshold, Preference, RelevanceLevel, MAX_WEIGHT};
