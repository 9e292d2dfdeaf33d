use scamshield::scoring::domain::inspect_url;
use scamshield::utils::log_error;
use std::env;
use std::process;

fn print_usage() {
    eprintln!("Usage: check-url <url>");
    eprintln!();
    eprintln!("Fetches a single URL and prints the resulting score delta and flags.");
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(url) = args.first() else {
        print_usage();
        process::exit(1);
    };

    match inspect_url(url).await {
        Ok((delta, flags)) => {
            println!("delta: {delta:+}");
            for flag in flags {
                println!("  {flag}");
            }
        }
        Err(err) => {
            log_error(&format!("inspection failed: {err}"));
            process::exit(1);
        }
    }
}
