use std::env;
use std::error::Error;
use std::io;
use std::process;

use purse_ledger::run;

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run_cli() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run_cli() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        return Err("Usage: cargo run -- operations.csv".into());
    }
    run(&args[1], io::stdout().lock())
}
