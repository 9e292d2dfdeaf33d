use anyhow::Result;
use scamshield::acquire::acquire;
use scamshield::pipeline::analyze;
use scamshield::report;
use scamshield::scoring::{ContextReport, FixedScorer, RemoteScorer};
use scamshield::utils::{log_acquire_done, log_acquire_start, log_signal, log_verdict};
use std::env;
use std::process;
use tracing::subscriber::set_global_default;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn print_usage() {
    eprintln!("Usage: scamshield <url|text> [--llm-json <record>]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <url|text>           Job posting text, or a URL to fetch and analyze");
    eprintln!("  --llm-json <record>  Pre-computed contextual record as JSON");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SCAMSHIELD_LLM_URL   Endpoint for the remote contextual scorer");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("scamshield=info".parse()?))
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        );
    set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let mut llm_json: Option<String> = None;
    let mut input_parts = Vec::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--llm-json" {
            llm_json = args.next();
            if llm_json.is_none() {
                print_usage();
                process::exit(1);
            }
        } else {
            input_parts.push(arg);
        }
    }

    if input_parts.is_empty() {
        print_usage();
        process::exit(1);
    }
    let input = input_parts.join(" ");

    log_acquire_start(&input);
    let text = acquire(&input).await;
    log_acquire_done(text.chars().count());

    // A malformed contextual record is a hard failure; the combiner stage
    // does not degrade silently.
    let verdict = if let Some(raw) = llm_json {
        let record: ContextReport = serde_json::from_str(&raw)?;
        analyze(&text, &FixedScorer(record)).await?
    } else if let Ok(endpoint) = env::var("SCAMSHIELD_LLM_URL") {
        analyze(&text, &RemoteScorer::new(endpoint)?).await?
    } else {
        analyze(&text, &FixedScorer::neutral()).await?
    };

    log_signal(
        "heuristic",
        verdict.breakdown.heuristic,
        verdict.heuristic_flags.len(),
    );
    log_signal("domain", verdict.breakdown.domain, verdict.domain_flags.len());
    log_signal("context", verdict.breakdown.llm, verdict.top_reasons.len());
    log_verdict(&verdict);

    let json = serde_json::to_string(&verdict)?;
    println!();
    println!("{}", report::render(&json));

    Ok(())
}
