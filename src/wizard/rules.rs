use super::answers::{
    CostFocus, DataResidency, Hosting, Sensitivity, SsoNeed, SupportNeed, TeamSize, WizardAnswers,
};
use crate::catalog::Catalog;
use crate::preferences::{apply_patch_many, scale_weight_many, Preference, PreferencePatch};
use crate::rails::{keys, RailBook};
use serde::{Deserialize, Serialize};

/// Domains the sensitivity multipliers act on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WizardDomains {
    #[serde(default = "default_security_domain")]
    pub security_domain: String,
    #[serde(default = "default_governance_domain")]
    pub governance_domain: String,
}

fn default_security_domain() -> String {
    "d1".to_string()
}

fn default_governance_domain() -> String {
    "d2".to_string()
}

impl Default for WizardDomains {
    fn default() -> Self {
        Self {
            security_domain: default_security_domain(),
            governance_domain: default_governance_domain(),
        }
    }
}

/// Result of a wizard run: the patched preferences and one summary line per rule.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardOutcome {
    pub preferences: Vec<Preference>,
    pub summary: Vec<String>,
}

/// (security, governance) multipliers per sensitivity tier.
fn sensitivity_multipliers(sensitivity: Sensitivity) -> (f64, f64) {
    match sensitivity {
        Sensitivity::Normal => (0.9, 1.0),
        Sensitivity::Sensitive => (1.15, 1.1),
        Sensitivity::Regulated => (1.35, 1.25),
    }
}

const SECURITY_OVER_COST_BOOST: f64 = 1.1;

struct Run<'a> {
    rails: &'a RailBook,
    prefs: Vec<Preference>,
    summary: Vec<String>,
}

impl Run<'_> {
    fn note(&mut self, line: impl Into<String>) {
        self.summary.push(line.into());
    }

    /// Patch every rail in `rail_keys`; records `ok` or `missing` depending on
    /// whether any of them resolved to a subcriterion.
    fn patch_rails(&mut self, rail_keys: &[&str], patch: PreferencePatch, ok: &str, missing: &str) {
        let rails = self.rails;
        let mut mapped = false;
        for key in rail_keys {
            let ids = rails.ids(key);
            if ids.is_empty() {
                tracing::debug!(rail = %key, "wizard rail not mapped");
                continue;
            }
            mapped = true;
            self.prefs = apply_patch_many(&self.prefs, ids, &patch);
        }
        self.note(if mapped { ok } else { missing });
    }

    fn scale(&mut self, ids: &[String], factor: f64) {
        self.prefs = scale_weight_many(&self.prefs, ids, factor);
    }
}

/// Translate questionnaire answers into preference edits.
///
/// Rules run in a fixed order and later rules overwrite earlier ones for the
/// same subcriterion. Every rule emits exactly one summary line, including
/// no-ops and rails that matched nothing.
pub fn apply_wizard_answers(
    catalog: &Catalog,
    prefs: &[Preference],
    answers: &WizardAnswers,
    rails: &RailBook,
    domains: &WizardDomains,
) -> WizardOutcome {
    let mut run = Run {
        rails,
        prefs: prefs.to_vec(),
        summary: Vec::new(),
    };
    let security_ids = catalog.subcriterion_ids_in_domain(&domains.security_domain);
    let governance_ids = catalog.subcriterion_ids_in_domain(&domains.governance_domain);

    // 1. domain emphasis
    let (security_factor, governance_factor) = sensitivity_multipliers(answers.sensitivity);
    run.scale(&security_ids, security_factor);
    run.scale(&governance_ids, governance_factor);
    run.note(match answers.sensitivity {
        Sensitivity::Normal => "Security: normal weighting.",
        Sensitivity::Sensitive => "Security & evidence: weighted higher (sensitive).",
        Sensitivity::Regulated => "Security & compliance: strongly prioritized (regulated).",
    });

    // 2. cost focus
    match answers.cost_focus {
        CostFocus::Cost => run.patch_rails(
            &[keys::TCO],
            PreferencePatch::weight(8),
            "Cost/TCO: weighted high.",
            "Cost/TCO: not mapped to any subcriterion.",
        ),
        CostFocus::Security => {
            run.scale(&security_ids, SECURITY_OVER_COST_BOOST);
            run.note("Security before cost: security emphasized further.");
        }
        CostFocus::Balance => run.note("Cost focus: balanced, no change."),
    }

    // 3. guard rails
    match answers.hosting {
        Hosting::SelfHostRequired => run.patch_rails(
            &[keys::SELF_HOSTING],
            PreferencePatch::hard_ko(),
            "Required (KO): self-hosting must be possible.",
            "Self-hosting KO: not mapped to any subcriterion.",
        ),
        Hosting::SelfHostPreferred => run.patch_rails(
            &[keys::SELF_HOSTING],
            PreferencePatch::soft(6),
            "Self-hosting: marked important (no KO).",
            "Self-hosting: not mapped to any subcriterion.",
        ),
        Hosting::SaasOk => run.note("Hosting: SaaS accepted, no change."),
    }

    match answers.sso {
        SsoNeed::Required => run.patch_rails(
            &[keys::SSO],
            PreferencePatch::hard_ko(),
            "Required (KO): SSO is mandatory.",
            "SSO KO: not mapped to any subcriterion.",
        ),
        SsoNeed::NiceToHave => run.patch_rails(
            &[keys::SSO],
            PreferencePatch::soft(6),
            "SSO: important (no KO).",
            "SSO: not mapped to any subcriterion.",
        ),
        SsoNeed::NotNeeded => run.note("SSO: not needed, no change."),
    }

    match answers.data_residency {
        DataResidency::Ch => run.patch_rails(
            &[keys::DATA_RESIDENCY],
            PreferencePatch::hard_ko(),
            "Required (KO): data must reside in Switzerland.",
            "Data residency CH: not mapped to any subcriterion.",
        ),
        DataResidency::ChEu => run.patch_rails(
            &[keys::DATA_RESIDENCY],
            PreferencePatch::soft(8),
            "Data residency: CH/EU weighted high.",
            "Data residency CH/EU: not mapped to any subcriterion.",
        ),
        DataResidency::Eu => run.patch_rails(
            &[keys::DATA_RESIDENCY],
            PreferencePatch::soft(6),
            "Data residency: EU important.",
            "Data residency EU: not mapped to any subcriterion.",
        ),
        DataResidency::Any => run.note("Data residency: no preference, no change."),
    }

    match answers.team_size {
        TeamSize::Large => run.patch_rails(
            &[keys::SCIM, keys::RBAC],
            PreferencePatch::soft(8),
            "Large team: SCIM provisioning and roles (RBAC) prioritized.",
            "Large team: SCIM/RBAC not mapped to any subcriterion.",
        ),
        TeamSize::Medium => run.patch_rails(
            &[keys::SCIM, keys::RBAC],
            PreferencePatch::soft(6),
            "Mid-sized team: SCIM and roles marked important.",
            "Mid-sized team: SCIM/RBAC not mapped to any subcriterion.",
        ),
        TeamSize::Small => run.note("Small team: provisioning and roles unchanged."),
    }

    match answers.support {
        SupportNeed::Critical => run.patch_rails(
            &[keys::INCIDENT_OPS],
            PreferencePatch::soft(8),
            "Operations: SLA/status/incident handling weighted high.",
            "Operations: not mapped to any subcriterion.",
        ),
        SupportNeed::Important => run.patch_rails(
            &[keys::INCIDENT_OPS],
            PreferencePatch::soft(6),
            "Operations: SLA/status/incident handling important.",
            "Operations: not mapped to any subcriterion.",
        ),
        SupportNeed::Standard => run.note("Operations: standard support, no change."),
    }

    // 4. evidence and crypto for sensitive profiles
    match answers.sensitivity {
        Sensitivity::Normal => run.note("Evidence & crypto design: unchanged (normal sensitivity)."),
        tier => {
            let weight = if tier == Sensitivity::Regulated { 9 } else { 7 };
            run.patch_rails(
                &[keys::AUDIT_EVIDENCE, keys::CRYPTO_ZK],
                PreferencePatch::weight(weight),
                "Evidence & crypto design: set to must (sensitive/regulated).",
                "Evidence & crypto design: not mapped to any subcriterion.",
            );
        }
    }

    // 5. exit is always worth something
    run.patch_rails(
        &[keys::EXPORT_EXIT],
        PreferencePatch::weight(5),
        "Export/exit: set to should.",
        "Export/exit: not mapped to any subcriterion.",
    );

    tracing::debug!(rules = run.summary.len(), "wizard answers applied");
    WizardOutcome {
        preferences: run.prefs,
        summary: run.summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::fixtures::sample_catalog;
    use crate::preferences::{reconcile, set_weight_many, KoThreshold, RelevanceLevel};
    use crate::rails::{default_rails, KeywordRails, RailSpec, StaticRails};

    fn find<'a>(prefs: &'a [Preference], id: &str) -> &'a Preference {
        prefs.iter().find(|p| p.subcriterion_id == id).unwrap()
    }

    fn static_rail(key: &str, ids: &[&str]) -> RailSpec {
        RailSpec {
            key: key.to_string(),
            title: key.to_string(),
            helper: String::new(),
            keywords: vec![],
            subcriterion_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn keyword_book() -> RailBook {
        RailBook::resolve(&sample_catalog(), &default_rails(), &KeywordRails)
    }

    fn run(prefs: &[Preference], answers: &WizardAnswers, book: &RailBook) -> WizardOutcome {
        apply_wizard_answers(&sample_catalog(), prefs, answers, book, &WizardDomains::default())
    }

    #[test]
    fn test_one_summary_line_per_rule() {
        let prefs = reconcile(&sample_catalog(), &[]);
        let book = keyword_book();
        let all = [
            WizardAnswers::default(),
            WizardAnswers {
                sensitivity: Sensitivity::Normal,
                data_residency: DataResidency::Any,
                hosting: Hosting::SaasOk,
                sso: SsoNeed::NotNeeded,
                team_size: TeamSize::Small,
                support: SupportNeed::Standard,
                cost_focus: CostFocus::Balance,
            },
            WizardAnswers {
                sensitivity: Sensitivity::Regulated,
                data_residency: DataResidency::Ch,
                hosting: Hosting::SelfHostRequired,
                sso: SsoNeed::Required,
                team_size: TeamSize::Large,
                support: SupportNeed::Critical,
                cost_focus: CostFocus::Cost,
            },
        ];
        for answers in &all {
            assert_eq!(run(&prefs, answers, &book).summary.len(), 9);
        }
    }

    #[test]
    fn test_unmapped_rails_are_noted() {
        let prefs = reconcile(&sample_catalog(), &[]);
        let answers = WizardAnswers {
            hosting: Hosting::SelfHostRequired,
            cost_focus: CostFocus::Cost,
            ..WizardAnswers::default()
        };
        let outcome = run(&prefs, &answers, &RailBook::default());
        assert_eq!(outcome.summary[1], "Cost/TCO: not mapped to any subcriterion.");
        assert_eq!(outcome.summary[2], "Self-hosting KO: not mapped to any subcriterion.");
        assert_eq!(outcome.summary[8], "Export/exit: not mapped to any subcriterion.");
    }

    #[test]
    fn test_sensitivity_multiplies_current_weights() {
        let catalog = sample_catalog();
        let prefs = set_weight_many(&reconcile(&catalog, &[]), &catalog.subcriterion_ids(), 4);
        let answers = WizardAnswers {
            sensitivity: Sensitivity::Regulated,
            data_residency: DataResidency::Any,
            sso: SsoNeed::NotNeeded,
            team_size: TeamSize::Small,
            support: SupportNeed::Standard,
            ..WizardAnswers::default()
        };
        let outcome = run(&prefs, &answers, &RailBook::default());
        // 4 * 1.35 = 5.4 -> 5 in security, 4 * 1.25 = 5 in governance
        assert_eq!(find(&outcome.preferences, "s2").weight, 5);
        assert_eq!(find(&outcome.preferences, "s4").weight, 5);
    }

    #[test]
    fn test_sensitivity_skips_not_applicable() {
        let catalog = sample_catalog();
        let prefs = set_weight_many(&reconcile(&catalog, &[]), &["s2"], 0);
        let outcome = run(&prefs, &WizardAnswers::default(), &RailBook::default());
        assert_eq!(find(&outcome.preferences, "s2").weight, 0);
    }

    #[test]
    fn test_security_over_cost_boost() {
        let catalog = sample_catalog();
        let prefs = set_weight_many(&reconcile(&catalog, &[]), &catalog.subcriterion_ids(), 6);
        let answers = WizardAnswers {
            sensitivity: Sensitivity::Normal,
            cost_focus: CostFocus::Security,
            ..WizardAnswers::default()
        };
        let outcome = run(&prefs, &answers, &RailBook::default());
        // 6 * 0.9 = 5.4 -> 5, then 5 * 1.1 = 5.5 -> 6
        assert_eq!(find(&outcome.preferences, "s2").weight, 6);
        assert_eq!(find(&outcome.preferences, "s5").weight, 6);
    }

    #[test]
    fn test_hard_ko_rails() {
        let catalog = sample_catalog();
        let prefs = reconcile(&catalog, &[]);
        let answers = WizardAnswers {
            sso: SsoNeed::Required,
            data_residency: DataResidency::Ch,
            ..WizardAnswers::default()
        };
        let outcome = run(&prefs, &answers, &keyword_book());
        for id in ["s1", "s4"] {
            let p = find(&outcome.preferences, id);
            assert!(p.is_ko, "{}", id);
            assert_eq!(p.weight, 10);
            assert_eq!(p.relevance_level, RelevanceLevel::Must);
            assert_eq!(p.ko_threshold, KoThreshold::Two);
        }
        assert_eq!(outcome.summary[3], "Required (KO): SSO is mandatory.");
    }

    #[test]
    fn test_hard_ko_rails_override_not_applicable() {
        let catalog = sample_catalog();
        let prefs = set_weight_many(&reconcile(&catalog, &[]), &["s1", "s4"], 0);
        let answers = WizardAnswers {
            sso: SsoNeed::Required,
            data_residency: DataResidency::Ch,
            ..WizardAnswers::default()
        };
        let outcome = run(&prefs, &answers, &keyword_book());
        for id in ["s1", "s4"] {
            let p = find(&outcome.preferences, id);
            assert!(p.is_ko, "{}", id);
            assert_eq!(p.weight, 10);
            assert_eq!(p.relevance_level, RelevanceLevel::Must);
            assert_eq!(p.ko_threshold, KoThreshold::Two);
        }
    }

    #[test]
    fn test_soft_patch_replaces_earlier_ko() {
        let catalog = sample_catalog();
        let prefs = crate::preferences::set_ko(&reconcile(&catalog, &[]), "s1", true);
        let answers = WizardAnswers {
            sso: SsoNeed::NiceToHave,
            ..WizardAnswers::default()
        };
        let outcome = run(&prefs, &answers, &keyword_book());
        let s1 = find(&outcome.preferences, "s1");
        assert!(!s1.is_ko);
        assert_eq!(s1.weight, 6);
        assert_eq!(s1.relevance_level, RelevanceLevel::Should);
    }

    #[test]
    fn test_later_rules_overwrite_earlier() {
        let catalog = sample_catalog();
        let prefs = reconcile(&catalog, &[]);
        let book = RailBook::resolve(
            &catalog,
            &[static_rail(keys::TCO, &["s5"]), static_rail(keys::EXPORT_EXIT, &["s5"])],
            &StaticRails,
        );
        let answers = WizardAnswers {
            cost_focus: CostFocus::Cost,
            ..WizardAnswers::default()
        };
        let outcome = run(&prefs, &answers, &book);
        assert_eq!(outcome.summary[1], "Cost/TCO: weighted high.");
        assert_eq!(find(&outcome.preferences, "s5").weight, 5);
    }

    #[test]
    fn test_audit_and_crypto_tier_weights() {
        let catalog = sample_catalog();
        let prefs = reconcile(&catalog, &[]);
        let book = keyword_book();
        let sensitive = run(&prefs, &WizardAnswers::default(), &book);
        assert_eq!(find(&sensitive.preferences, "s6").weight, 7);
        assert_eq!(find(&sensitive.preferences, "s3").weight, 7);

        let regulated = run(
            &prefs,
            &WizardAnswers {
                sensitivity: Sensitivity::Regulated,
                ..WizardAnswers::default()
            },
            &book,
        );
        assert_eq!(find(&regulated.preferences, "s6").weight, 9);
        assert_eq!(find(&regulated.preferences, "s6").relevance_level, RelevanceLevel::Must);
    }

    #[test]
    fn test_export_exit_always_applied() {
        let catalog = sample_catalog();
        let prefs = set_weight_many(&reconcile(&catalog, &[]), &["s5"], 9);
        let answers = WizardAnswers {
            sensitivity: Sensitivity::Normal,
            ..WizardAnswers::default()
        };
        let outcome = run(&prefs, &answers, &keyword_book());
        assert_eq!(find(&outcome.preferences, "s5").weight, 5);
        assert_eq!(outcome.summary[8], "Export/exit: set to should.");
    }

    #[test]
    fn test_wizard_is_deterministic() {
        let prefs = reconcile(&sample_catalog(), &[]);
        let book = keyword_book();
        let a = run(&prefs, &WizardAnswers::default(), &book);
        let b = run(&prefs, &WizardAnswers::default(), &book);
        assert_eq!(a, b);
    }
}
