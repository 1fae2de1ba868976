//! Terminal rendering for quote results

use crate::client::session::SubmissionState;
use crate::types::PredictionResult;
use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Width of the probability bars in characters
pub const BAR_WIDTH: usize = 30;

/// Banner style for a predicted category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub icon: &'static str,
    pub color: Color,
    pub message: &'static str,
}

/// Style for a label; labels the client doesn't know get a neutral look
pub fn category_style(label: &str) -> CategoryStyle {
    match label {
        "Low" => CategoryStyle {
            icon: "🟢",
            color: Color::Green,
            message: "Great! You are eligible for standard rates.",
        },
        "Medium" => CategoryStyle {
            icon: "🟡",
            color: Color::Yellow,
            message: "Moderate risk. Premium will be average.",
        },
        "High" => CategoryStyle {
            icon: "🔴",
            color: Color::Red,
            message: "High risk detected. Expect a surcharge.",
        },
        _ => CategoryStyle {
            icon: "❓",
            color: Color::White,
            message: "No guidance is available for this category.",
        },
    }
}

/// Percentage with one decimal place
pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Horizontal bar filled in proportion to `p`
pub fn probability_bar(p: f64, width: usize) -> String {
    let filled = ((p.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn render_bmi(bmi: f64) -> String {
    format!("💡 Calculated BMI: {}", format!("{:.1}", bmi).bold())
}

/// Banner, confidence line and per-class breakdown
pub fn render_result(result: &PredictionResult) -> String {
    let style = category_style(&result.predicted_category);
    let mut out = String::new();

    let banner = format!(
        " {} {} Premium ",
        style.icon, result.predicted_category
    );
    out.push_str(&format!("\n{}\n", banner.bold().color(style.color).reversed()));
    out.push_str(&format!(
        "Confidence: {}\n",
        format_percent(result.confidence).bold()
    ));
    out.push_str(&format!("{}\n\n", style.message.color(style.color)));

    out.push_str(&format!("{}\n", "Detailed probabilities".bold().cyan()));
    let label_width = result
        .class_probabilities
        .labels()
        .map(str::len)
        .max()
        .unwrap_or(0);
    for (label, p) in result.class_probabilities.iter() {
        let color = category_style(label).color;
        out.push_str(&format!(
            "  {:<width$} {} {:>6}\n",
            label,
            probability_bar(p, BAR_WIDTH).color(color),
            format_percent(p),
            width = label_width
        ));
    }

    out
}

/// Error line for a failed submission
pub fn render_failure(state: &SubmissionState) -> Option<String> {
    let message = state.message()?;
    let line = match state {
        SubmissionState::ServerError {
            transient: true, ..
        }
        | SubmissionState::Timeout { .. } => format!("⏳ {}", message).yellow(),
        SubmissionState::ConnectionError(_) => format!("🔌 {}", message).red(),
        _ => format!("❌ {}", message).red(),
    };
    Some(line.to_string())
}

pub const DISCLAIMER: &str =
    "AI estimates are for informational purposes only. Consult an agent for actual quotes.";

/// Spinner shown while waiting on the backend; hidden when `visible` is false
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
