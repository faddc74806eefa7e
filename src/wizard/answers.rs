use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    Normal,
    #[default]
    Sensitive,
    Regulated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DataResidency {
    Any,
    Eu,
    #[default]
    ChEu,
    Ch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Hosting {
    #[default]
    SaasOk,
    SelfHostPreferred,
    SelfHostRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SsoNeed {
    NotNeeded,
    #[default]
    NiceToHave,
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TeamSize {
    /// Fewer than 20 people
    Small,
    /// 20 to 200 people
    #[default]
    Medium,
    /// More than 200 people
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SupportNeed {
    Standard,
    #[default]
    Important,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CostFocus {
    Cost,
    #[default]
    Balance,
    Security,
}

/// Questionnaire answers. Defaults describe a sensitive mid-sized team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WizardAnswers {
    pub sensitivity: Sensitivity,
    pub data_residency: DataResidency,
    pub hosting: Hosting,
    pub sso: SsoNeed,
    pub team_size: TeamSize,
    pub support: SupportNeed,
    pub cost_focus: CostFocus,
}

/// One questionnaire question with its selectable answers (value, label).
pub struct Question {
    pub title: &'static str,
    pub helper: &'static str,
    pub options: Vec<(String, &'static str)>,
}

fn options<T: ValueEnum>(labels: &[&'static str]) -> Vec<(String, &'static str)> {
    T::value_variants()
        .iter()
        .zip(labels)
        .filter_map(|(v, label)| {
            v.to_possible_value()
                .map(|pv| (pv.get_name().to_string(), *label))
        })
        .collect()
}

/// Questions in the order they are asked.
pub fn questions() -> Vec<Question> {
    vec![
        Question {
            title: "How sensitive are your data and accesses?",
            helper: "Drives how strongly security, evidence and incident resilience are weighted.",
            options: options::<Sensitivity>(&[
                "Normal",
                "Sensitive (customer data, admin access)",
                "Highly sensitive / regulated (finance, health)",
            ]),
        },
        Question {
            title: "Where should your data live?",
            helper: "Sets priorities for data residency and jurisdiction.",
            options: options::<DataResidency>(&[
                "Doesn't matter",
                "EU is fine",
                "Switzerland or EU",
                "Switzerland only",
            ]),
        },
        Question {
            title: "Operating model",
            helper: "Anything required becomes a knockout.",
            options: options::<Hosting>(&[
                "SaaS is fine",
                "Self-hosting would be nice",
                "Self-hosting is required (knockout)",
            ]),
        },
        Question {
            title: "Central sign-on (SSO)",
            helper: "Often a big lever for security and adoption.",
            options: options::<SsoNeed>(&[
                "Not needed",
                "Nice to have",
                "Required (knockout)",
            ]),
        },
        Question {
            title: "Team size",
            helper: "From mid-sized teams on, SCIM provisioning and roles matter more.",
            options: options::<TeamSize>(&["< 20", "20-200", "> 200"]),
        },
        Question {
            title: "Support & availability",
            helper: "Weights SLA, status/incident handling and operations.",
            options: options::<SupportNeed>(&["Standard is enough", "Important", "Very important"]),
        },
        Question {
            title: "Cost focus",
            helper: "How strongly TCO and cost components are weighted.",
            options: options::<CostFocus>(&["Cost first", "Balance", "Security before cost"]),
        },
    ]
}
