//! Client side: collect attributes, derive features, submit, render.

pub mod api;
pub mod display;
pub mod form;
pub mod session;

pub use api::PredictionClient;
pub use form::{LineReader, QuoteForm, TerminalReader};
pub use session::{Submission, SubmissionState};

use crate::errors::Result;
use crate::features::FeatureRules;
use crate::types::{FeatureRecord, RawUserInput};
use colored::Colorize;
use tracing::info;

/// Run one request through `submission`, which must be Idle
pub async fn submit(
    client: &PredictionClient,
    record: &FeatureRecord,
    submission: &mut Submission,
) -> Result<SubmissionState> {
    submission.begin()?;
    let outcome = client.predict(record).await;
    let state = submission.complete(outcome)?;
    info!(outcome = state.name(), "Submission finished");
    Ok(state.clone())
}

/// Validate, derive, submit and print one quote
pub async fn run_quote(
    client: &PredictionClient,
    rules: &FeatureRules,
    input: &RawUserInput,
    submission: &mut Submission,
    show_progress: bool,
) -> Result<SubmissionState> {
    let record = rules.derive(input)?;
    println!("{}", display::render_bmi(input.bmi()));

    let pb = display::spinner("Consulting the model...", show_progress);
    let state = submit(client, &record, submission).await;
    pb.finish_and_clear();
    let state = state?;

    match state.result() {
        Some(result) => println!("{}", display::render_result(result)),
        None => {
            if let Some(line) = display::render_failure(&state) {
                println!("{}", line);
            }
        }
    }

    Ok(state)
}

/// Interactive loop: fill the form, submit, ask whether to go again.
/// Returns the number of submissions sent.
pub async fn run_form<R: LineReader>(
    client: &PredictionClient,
    rules: &FeatureRules,
    form: &mut QuoteForm<R>,
    show_progress: bool,
) -> Result<usize> {
    println!("{}", "🛡️  Insurance Premium Predictor".bold().cyan());
    println!("Estimate your insurance risk category.");

    let mut submission = Submission::new();
    let mut sent = 0;
    loop {
        let Some(input) = form.collect()? else {
            break;
        };

        run_quote(client, rules, &input, &mut submission, show_progress).await?;
        sent += 1;

        if !form.confirm("Submit another quote?", true)? {
            break;
        }
        submission.reset()?;
    }

    println!("\n{}", display::DISCLAIMER.dimmed());
    Ok(sent)
}
