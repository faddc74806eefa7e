pub mod answers;
pub mod interactive;
pub mod rules;

pub use answers::{
    questions, CostFocus, DataResidency, Hosting, Question, Sensitivity, SsoNeed, SupportNeed,
    TeamSize, WizardAnswers,
};
pub use interactive::ask_answers;
pub use rules::{apply_wizard_answers, WizardDomains, WizardOutcome};
