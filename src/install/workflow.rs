//! # Interactive Install Workflow
//!
//! Drives a batch from preparation to disk through at most three levels of
//! confirmation.
//!
//! ```text
//!              all installed? ──yes──► "Already installed!"
//!                    │ no
//!                    ▼
//!   ┌──────────── Initial ─────────────┐   [y/N/?]
//!   │ y               │ ?              │ n / Enter
//!   │                 ▼                │
//!   │   ┌────────── Details ────────┐  │   [y/N/s]
//!   │   │ y           │ s           │ n│
//!   ▼   ▼             ▼             ▼  ▼
//!  ApplyAll       StepByStep        Declined
//!                 (per file [y/N], apply on yes)
//! ```
//!
//! Any other keystroke is an error and ends the workflow before anything
//! is written. Files are shown, asked about and written in batch order.

use log::{debug, info};

use crate::prompt::style::StyledText;
use crate::prompt::{Choice, NO, PromptError, Terminal, YES, ask_choice, ask_yes_no};

use super::apply::apply;
use super::error::InstallError;
use super::render::{action_line, preview, summary};
use super::spec::{FileSpec, all_installed, prepare};

const RULE: &str = "────────────────";

const DETAILS: Choice = Choice::new(b'?', "Details");
const STEP_BY_STEP: Choice = Choice::new(b's', "Step by step");

/// How the workflow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every file already matched; nothing was asked.
    AlreadyInstalled,
    /// The user said no (or pressed Enter) at a batch-level prompt.
    Declined,
    /// The whole batch was applied; holds the number of files written.
    AppliedAll(usize),
    /// Per-file answers were collected.
    SteppedThrough { applied: usize, skipped: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Details,
    StepByStep,
    ApplyAll,
}

enum Step {
    Next(State),
    Finish(Outcome),
}

/// Prepares `files` and walks the user through installing them.
pub fn run(term: &mut dyn Terminal, files: &mut [FileSpec]) -> Result<Outcome, InstallError> {
    prepare(files)?;

    print_rule(term)?;
    if all_installed(files) {
        print(term, "Already installed!")?;
        info!("Nothing to install, {} file(s) already in place", files.len());
        return Ok(Outcome::AlreadyInstalled);
    }

    print(term, "The following actions will be performed:")?;
    for file in files.iter() {
        write_line(term, &summary(file))?;
    }

    let mut state = State::Initial;
    loop {
        debug!("Install workflow state: {state:?}");
        let step = match state {
            State::Initial => initial(term)?,
            State::Details => details(term, files)?,
            State::StepByStep => return step_by_step(term, files),
            State::ApplyAll => return apply_all(term, files),
        };
        match step {
            Step::Next(next) => state = next,
            Step::Finish(outcome) => return Ok(outcome),
        }
    }
}

fn initial(term: &mut dyn Terminal) -> Result<Step, InstallError> {
    let answer = ask_choice(
        term,
        "Apply the actions? ('?' for details)",
        " [y/N/?] ",
        b'n',
        &[YES, NO, DETAILS],
    )?;
    Ok(match answer {
        b'y' => Step::Next(State::ApplyAll),
        b'?' => Step::Next(State::Details),
        _ => Step::Finish(Outcome::Declined),
    })
}

fn details(term: &mut dyn Terminal, files: &[FileSpec]) -> Result<Step, InstallError> {
    print_rule(term)?;
    print_preview(term, files)?;
    let answer = ask_choice(
        term,
        "Apply the actions? ('s' for step by step)",
        " [y/N/s] ",
        b'n',
        &[YES, NO, STEP_BY_STEP],
    )?;
    Ok(match answer {
        b'y' => Step::Next(State::ApplyAll),
        b's' => Step::Next(State::StepByStep),
        _ => Step::Finish(Outcome::Declined),
    })
}

fn apply_all(term: &mut dyn Terminal, files: &[FileSpec]) -> Result<Outcome, InstallError> {
    print_rule(term)?;
    let written = apply_reporting(term, files)?;
    info!("Applied {written} of {} file(s)", files.len());
    Ok(Outcome::AppliedAll(written))
}

/// Each answer is acted on immediately; a "no" never undoes earlier files.
fn step_by_step(term: &mut dyn Terminal, files: &[FileSpec]) -> Result<Outcome, InstallError> {
    let mut applied = 0;
    let mut skipped = 0;
    for single in files.chunks(1) {
        print_rule(term)?;
        print_preview(term, single)?;
        if ask_yes_no(term, "Apply the action?", false)? {
            applied += apply_reporting(term, single)?;
        } else {
            skipped += 1;
        }
    }
    info!("Step by step finished: {applied} applied, {skipped} skipped");
    Ok(Outcome::SteppedThrough { applied, skipped })
}

fn apply_reporting(term: &mut dyn Terminal, files: &[FileSpec]) -> Result<usize, InstallError> {
    apply(files, |file| write_line(term, &action_line(file)))
}

fn print_preview(term: &mut dyn Terminal, files: &[FileSpec]) -> Result<(), InstallError> {
    for line in preview(files) {
        write_line(term, &line)?;
    }
    Ok(())
}

fn print_rule(term: &mut dyn Terminal) -> Result<(), InstallError> {
    print(term, RULE)
}

fn print(term: &mut dyn Terminal, text: &str) -> Result<(), InstallError> {
    write_line(term, &StyledText::plain_text(text))
}

fn write_line(term: &mut dyn Terminal, text: &StyledText) -> Result<(), InstallError> {
    term.write_line(text)
        .map_err(|e| InstallError::Prompt(PromptError::Io(e)))
}
