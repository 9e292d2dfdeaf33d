use console::Style;

use crate::scoring::{FinalVerdict, RiskColor};

pub fn dim() -> Style {
    Style::new().dim()
}

fn blue() -> Style {
    Style::new().blue()
}

fn cyan() -> Style {
    Style::new().cyan()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn yellow() -> Style {
    Style::new().yellow()
}

fn bold() -> Style {
    Style::new().bold()
}

fn input_prefix() -> String {
    blue().apply_to("[INPUT]").to_string()
}

fn score_prefix() -> String {
    yellow().apply_to("[SCORE]").to_string()
}

fn verdict_prefix() -> String {
    bold().apply_to("[VERDICT]").to_string()
}

pub fn log_acquire_start(input: &str) {
    let preview: String = input.chars().take(60).collect();
    println!(
        "{} analyzing {}...",
        input_prefix(),
        cyan().apply_to(preview)
    );
}

pub fn log_acquire_done(chars: usize) {
    println!(
        "{} {} characters ready for scoring.",
        input_prefix(),
        cyan().apply_to(chars)
    );
}

pub fn log_signal(name: &str, score: u8, evidence: usize) {
    println!(
        "{} {} {}/100 {}",
        score_prefix(),
        name,
        bold().apply_to(score),
        dim().apply_to(format!("({evidence} flags)"))
    );
}

pub fn log_verdict(verdict: &FinalVerdict) {
    let style = match verdict.color {
        RiskColor::Green => green(),
        RiskColor::Yellow => yellow(),
        RiskColor::Red => red(),
    };
    println!(
        "{} {} ({}) {}",
        verdict_prefix(),
        style.apply_to(&verdict.final_verdict),
        verdict.risk_level,
        dim().apply_to(format!("confidence: {}", verdict.confidence))
    );
}

pub fn log_error(message: &str) {
    eprintln!("{} {}", red().apply_to("[ERROR]"), message);
}
