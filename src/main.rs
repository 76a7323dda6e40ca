use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let code = matinee::cli::run_with_args(&args);
    process::exit(code);
}
