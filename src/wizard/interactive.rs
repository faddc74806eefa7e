use super::answers::{questions, Question, WizardAnswers};
use crate::prompt::Console;
use anyhow::Result;
use clap::ValueEnum;
use std::io::{BufRead, Write};

/// Ask one question until the reply is empty (keep `current`), a 1-based
/// option number, or an option value such as `self_host_required`.
fn choose<T, R, W>(console: &mut Console<R, W>, question: &Question, current: T) -> Result<T>
where
    T: ValueEnum + Copy,
    R: BufRead,
    W: Write,
{
    let current_name = current
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default();

    console.say("")?;
    console.typewriter(question.title)?;
    console.say(&format!("  {}", question.helper))?;
    let mut default_index = 1;
    for (i, (value, label)) in question.options.iter().enumerate() {
        let marker = if *value == current_name {
            default_index = i + 1;
            "*"
        } else {
            " "
        };
        console.say(&format!(" {}{}) {}", marker, i + 1, label))?;
    }

    loop {
        let reply = console.prompt_with_default("Choice", &default_index.to_string())?;
        let picked = match reply.parse::<usize>() {
            Ok(n) if n >= 1 && n <= question.options.len() => Some(question.options[n - 1].0.as_str()),
            Ok(_) => None,
            Err(_) => Some(reply.as_str()),
        };
        if let Some(value) = picked {
            if let Ok(answer) = T::from_str(value, true) {
                return Ok(answer);
            }
        }
        console.say(&format!(
            "  Invalid: enter 1-{} or leave empty. Try again.",
            question.options.len()
        ))?;
    }
}

/// Walk through all questions, starting from `defaults`.
pub fn ask_answers<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    defaults: WizardAnswers,
) -> Result<WizardAnswers> {
    let qs = questions();
    Ok(WizardAnswers {
        sensitivity: choose(console, &qs[0], defaults.sensitivity)?,
        data_residency: choose(console, &qs[1], defaults.data_residency)?,
        hosting: choose(console, &qs[2], defaults.hosting)?,
        sso: choose(console, &qs[3], defaults.sso)?,
        team_size: choose(console, &qs[4], defaults.team_size)?,
        support: choose(console, &qs[5], defaults.support)?,
        cost_focus: choose(console, &qs[6], defaults.cost_focus)?,
    })
}
