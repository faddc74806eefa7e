use owo_colors::OwoColorize;

use super::formatter::{format_ko_badge, format_norm_score, get_terminal_width, truncate};
use crate::catalog::{Catalog, EvidenceIndex, Product};
use crate::evaluation::{CompareRow, DomainStats, ProductEvaluation};
use crate::preferences::{AppliedFlag, Preference, RelevanceLevel};
use crate::rails::{rail_state, RailBook};

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().underline().to_string()
    } else {
        text.to_string()
    }
}

fn dim(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

fn evidence_mark(score: u8, use_colors: bool) -> String {
    let text = match score {
        2 => "++",
        1 => "+ ",
        _ => "--",
    };
    match (use_colors, score) {
        (false, _) => text.to_string(),
        (true, 2) => text.green().to_string(),
        (true, 1) => text.yellow().to_string(),
        (true, _) => text.red().to_string(),
    }
}

/// Compact preference label, e.g. "must w10 KO>=2" or "can w1".
pub fn format_preference_label(pref: &Preference) -> String {
    let mut label = format!("{} w{}", pref.relevance_level, pref.weight);
    if pref.is_ko {
        label.push_str(&format!(" KO>={}", pref.ko_threshold));
    }
    label
}

/// Product page: score, knockout violations, per-domain statistics and
/// every evidence record with its citations.
pub fn format_product_detail(
    product: &Product,
    evaluation: &ProductEvaluation,
    stats: &[DomainStats],
    catalog: &Catalog,
    index: &EvidenceIndex,
    use_colors: bool,
) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "{}  {}  {}",
        heading(&product.name, use_colors),
        format_norm_score(evaluation.total_norm_0_100, use_colors),
        format_ko_badge(evaluation.ko_violations.len(), use_colors)
    )
    .trim_end()
    .to_string());
    if let Some(ref description) = product.description {
        out.push(format!("  {}", description));
    }
    out.push(format!("  Raw score: {}", evaluation.total_raw));

    for violation in &evaluation.ko_violations {
        let name = catalog
            .find_subcriterion(&violation.subcriterion_id)
            .map(|s| s.name.as_str())
            .unwrap_or(violation.subcriterion_id.as_str());
        out.push(format!(
            "  Knockout: {} (needs {}, has {})",
            name, violation.threshold, violation.actual_score
        ));
    }

    for stat in stats {
        out.push(String::new());
        out.push(format!(
            "{}  {}/{} ({}%)  critical {}  citations {} on {}/{}",
            heading(&stat.domain_name, use_colors),
            stat.sum,
            stat.max,
            stat.percent(),
            stat.critical_count,
            stat.citation_count,
            stat.with_citations_count,
            stat.visible_count
        ));
        let Some(domain) = catalog.find_domain(&stat.domain_id) else {
            continue;
        };
        for sub in domain.subcriteria() {
            let Some(record) = index.get(&product.id, &sub.id) else {
                continue;
            };
            out.push(format!(
                "  {} {}  {}",
                evidence_mark(record.score, use_colors),
                sub.name,
                dim(&sub.id, use_colors)
            ));
            if !record.audit_comment.is_empty() {
                out.push(format!("       {}", record.audit_comment));
            }
            for (i, link) in record.evidenz_links.iter().enumerate() {
                let url = if use_colors {
                    link.url.underline().to_string()
                } else {
                    link.url.clone()
                };
                out.push(format!("       [{}] {}  {}", i + 1, link.label, url));
            }
        }
    }

    out.join("\n")
}

/// Preferences grouped by domain, in catalog order.
pub fn format_preferences(catalog: &Catalog, prefs: &[Preference], use_colors: bool) -> String {
    let mut out = Vec::new();
    for domain in &catalog.domains {
        out.push(heading(&domain.name, use_colors));
        for sub in domain.subcriteria() {
            let label = prefs
                .iter()
                .find(|p| p.subcriterion_id == sub.id)
                .map(format_preference_label)
                .unwrap_or_else(|| "-".to_string());
            let label = if use_colors && label.contains("KO") {
                label.red().to_string()
            } else {
                label
            };
            out.push(format!("  {:<16} {:<18} {}", sub.id, label, sub.name));
        }
    }
    out.join("\n")
}

/// One line per rail: key, member count, aggregate state.
pub fn format_rails(book: &RailBook, prefs: &[Preference], use_colors: bool) -> String {
    if book.iter().next().is_none() {
        return "No rails configured.".to_string();
    }
    book.iter()
        .map(|rail| {
            let state = match rail_state(prefs, &rail.ids) {
                Some(state) => {
                    let mut s = format!("{} w{}", state.relevance_level, state.weight);
                    if state.is_ko {
                        s.push_str(&format!(" KO>={}", state.ko_threshold));
                    }
                    if state.mixed {
                        s.push_str(" (mixed)");
                    }
                    s
                }
                None => dim("not mapped", use_colors),
            };
            format!(
                "{:<16} {:>3} subcriteria  {:<24} {}",
                rail.spec.key,
                rail.ids.len(),
                state,
                rail.spec.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comparison matrix: one line per subcriterion, one score column per product.
pub fn format_compare(rows: &[CompareRow], products: &[&Product], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No differences to show.".to_string();
    }
    let column = 8;
    let name_width = match get_terminal_width() {
        Some(width) if width > 40 + products.len() * column => width - 8 - products.len() * column,
        _ => 40,
    };

    let mut out = Vec::new();
    let header: String = products
        .iter()
        .map(|p| format!("{:>width$}", truncate(&p.name, column - 1), width = column))
        .collect();
    out.push(format!("{:<width$}{}", "", header, width = name_width + 8));

    let mut current_domain = "";
    for row in rows {
        if row.domain_name != current_domain {
            current_domain = &row.domain_name;
            out.push(heading(current_domain, use_colors));
        }
        let marker = match &row.preference {
            Some(p) if p.is_ko => "KO",
            Some(p) if p.relevance_level == RelevanceLevel::Must => "! ",
            _ => "  ",
        };
        let cells: String = row
            .cells
            .iter()
            .map(|cell| {
                let text = format!("{:>width$}", cell.score, width = column);
                if cell.ko_fail && use_colors {
                    text.red().bold().to_string()
                } else if cell.ko_fail {
                    format!("{:>width$}", format!("{}!", cell.score), width = column)
                } else {
                    text
                }
            })
            .collect();
        out.push(format!(
            "  {} {:<width$}{}",
            marker,
            truncate(&row.subcriterion_name, name_width),
            cells,
            width = name_width + 3
        ));
    }
    out.join("\n")
}

pub fn format_wizard_summary(summary: &[String]) -> String {
    summary
        .iter()
        .map(|line| format!("  - {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Draft/applied state, preference count and comparison selection.
pub fn format_status(
    applied: Option<&AppliedFlag>,
    customized: usize,
    total: usize,
    selection: &[String],
) -> String {
    let state = match applied {
        Some(flag) if flag.applied => format!("applied ({})", flag.updated_at.format("%Y-%m-%d %H:%M UTC")),
        Some(flag) => format!("draft ({})", flag.updated_at.format("%Y-%m-%d %H:%M UTC")),
        None => "defaults (nothing saved)".to_string(),
    };
    let compare = if selection.is_empty() {
        "none".to_string()
    } else {
        selection.join(", ")
    };
    format!(
        "Preferences: {}\nCustomized:  {}/{} subcriteria\nCompare:     {}",
        state, customized, total, compare
    )
}
