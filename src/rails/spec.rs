use serde::{Deserialize, Serialize};

/// Rail keys the wizard addresses.
pub mod keys {
    pub const DATA_RESIDENCY: &str = "data_residency";
    pub const SELF_HOSTING: &str = "self_hosting";
    pub const SSO: &str = "sso";
    pub const SCIM: &str = "scim";
    pub const RBAC: &str = "rbac";
    pub const AUDIT_EVIDENCE: &str = "audit_evidence";
    pub const CRYPTO_ZK: &str = "crypto_zk";
    pub const INCIDENT_OPS: &str = "incident_ops";
    pub const EXPORT_EXIT: &str = "export_exit";
    pub const SUPPORT: &str = "support";
    pub const TCO: &str = "tco";
}

/// A named group of subcriteria edited as one unit.
///
/// `keywords` feed keyword resolution, `subcriterion_ids` feed static
/// resolution. A rail may carry both; the configured strategy picks one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RailSpec {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub helper: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub subcriterion_ids: Vec<String>,
}

fn rail(key: &str, title: &str, helper: &str, keywords: &[&str]) -> RailSpec {
    RailSpec {
        key: key.to_string(),
        title: title.to_string(),
        helper: helper.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        subcriterion_ids: Vec::new(),
    }
}

/// Built-in rail set. Keywords cover the English and German catalog wording.
pub fn default_rails() -> Vec<RailSpec> {
    vec![
        rail(
            keys::DATA_RESIDENCY,
            "Data residency",
            "Where data lives, which regions are selectable, jurisdiction.",
            &["datenresidenz", "data residency", "jurisdiktion", "jurisdiction", "region", "standort", "schweiz", "switzerland", "eu"],
        ),
        rail(
            keys::SELF_HOSTING,
            "Self-hosting / on-prem",
            "Option to run the product on own infrastructure.",
            &["self-host", "self host", "on-prem", "on prem", "on-premise", "on premise", "selfhosting"],
        ),
        rail(
            keys::SSO,
            "SSO (SAML/OIDC)",
            "Central sign-on for adoption and security.",
            &["sso", "saml", "oidc", "openid", "single sign-on"],
        ),
        rail(
            keys::SCIM,
            "SCIM / provisioning",
            "Automated user lifecycle (joiner/mover/leaver).",
            &["scim", "provision", "provisioning", "user lifecycle"],
        ),
        rail(
            keys::RBAC,
            "Roles & permissions (RBAC)",
            "Fine-grained admin rights and role model.",
            &["rbac", "rollen", "role based", "berechtigung", "permission"],
        ),
        rail(
            keys::AUDIT_EVIDENCE,
            "Evidence (ISO/SOC/pen test)",
            "Audit reports and verifiable evidence.",
            &["soc", "soc 2", "iso 27001", "iso", "audit", "penetration", "pen test", "nachweise", "compliance"],
        ),
        rail(
            keys::CRYPTO_ZK,
            "Crypto design / zero knowledge",
            "End-to-end encryption, key management, recovery model.",
            &["zero knowledge", "end-to-end", "e2e", "krypto", "crypt", "encryption", "schluessel", "key", "recovery"],
        ),
        rail(
            keys::INCIDENT_OPS,
            "Operations (SLA/status/incidents)",
            "Availability, status history, incident response.",
            &["sla", "status", "incident", "vorfall", "rto", "rpo", "availability", "zuverlaessigkeit", "performance"],
        ),
        rail(
            keys::EXPORT_EXIT,
            "Export & exit (lock-in)",
            "Export capability, open APIs, exit terms.",
            &["export", "exit", "lock-in", "vendor lock", "api", "migration"],
        ),
        rail(
            keys::SUPPORT,
            "Support & enablement",
            "Support SLAs, documentation, onboarding, languages and time zones.",
            &["support", "onboarding", "doku", "documentation", "csm", "success", "schulung", "training"],
        ),
        rail(
            keys::TCO,
            "Cost / TCO",
            "Licence model, pricing transparency, total cost of ownership.",
            &["tco", "kosten", "cost", "preis", "pricing", "lizenz", "licen"],
        ),
    ]
}
