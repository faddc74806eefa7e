use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::catalog::Product;
use crate::evaluation::ProductEvaluation;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
pub(crate) fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
pub(crate) fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Normalized score as "75/100", green from 70, yellow from 40, red below.
pub fn format_norm_score(norm: u8, use_colors: bool) -> String {
    let text = format!("{:>3}/100", norm);
    if !use_colors {
        return text;
    }
    if norm >= 70 {
        text.green().to_string()
    } else if norm >= 40 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

/// Knockout marker: empty when the product passed every knockout.
pub fn format_ko_badge(violations: usize, use_colors: bool) -> String {
    if violations == 0 {
        return String::new();
    }
    let text = format!("KO x{}", violations);
    if use_colors {
        text.red().bold().to_string()
    } else {
        text
    }
}

/// A product with its evaluation for display
pub struct RankedProduct<'a> {
    pub product: &'a Product,
    pub evaluation: &'a ProductEvaluation,
}

/// Pair evaluations with their products, keeping evaluation order.
/// Evaluations whose product is unknown are skipped.
pub fn rank_products<'a>(
    products: &'a [Product],
    evaluations: &'a [ProductEvaluation],
) -> Vec<RankedProduct<'a>> {
    evaluations
        .iter()
        .filter_map(|evaluation| {
            products
                .iter()
                .find(|p| p.id == evaluation.product_id)
                .map(|product| RankedProduct {
                    product,
                    evaluation,
                })
        })
        .collect()
}

/// Format the ranking as a table with columns: Index, Score, KO, Name, Id
/// Index column: 3 chars (fits "99."), right-aligned
/// KO column is 6 chars wide and blank for knockout-free products
pub fn format_ranking_table(ranked: &[RankedProduct], use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No products found.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 3;
    let score_width = 7;
    let ko_width: usize = 6;
    let separator = "  ";

    ranked
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score = format_norm_score(row.evaluation.total_norm_0_100, use_colors);
            let violations = row.evaluation.ko_violations.len();
            let ko_plain = format_ko_badge(violations, false);
            let ko_pad = " ".repeat(ko_width.saturating_sub(ko_plain.chars().count()));
            let ko = format!("{}{}", format_ko_badge(violations, use_colors), ko_pad);

            let id_len = row.product.id.chars().count();
            let fixed_width = index_width + 1 + score_width + ko_width + separator.len() * 3 + id_len;
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate(&row.product.name, width - fixed_width)
                }
                Some(_) => truncate(&row.product.name, 20),
                None => row.product.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score,
                    separator,
                    ko,
                    separator,
                    name.bold(),
                    separator,
                    row.product.id.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score, separator, ko, separator, name, separator, row.product.id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: norm, raw, ko_violations, id, name (no headers, no colors)
pub fn format_ranking_tsv(ranked: &[RankedProduct]) -> String {
    ranked
        .iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                row.evaluation.total_norm_0_100,
                row.evaluation.total_raw,
                row.evaluation.ko_violations.len(),
                row.product.id,
                row.product.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
