#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = vacplot::run_from_env() {
        eprintln!("vacplot: {error}");
        std::process::exit(error.exit_code());
    }
}
