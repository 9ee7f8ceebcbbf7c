//! Entry point for the melodico command-line interface.
#![forbid(unsafe_code)]

fn main() {
    colog::init();
    if let Err(err) = melodico_cli::run() {
        eprintln!("melodico: {err}");
        std::process::exit(1);
    }
}
