pub mod formatter;
pub mod views;

pub use formatter::{
    format_ko_badge, format_norm_score, format_ranking_table, format_ranking_tsv, rank_products,
    should_use_colors, RankedProduct,
};
pub use views::{
    format_compare, format_preference_label, format_preferences, format_product_detail,
    format_rails, format_status, format_wizard_summary,
};
