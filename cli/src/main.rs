fn main() {
    if let Err(e) = ontosheet_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
