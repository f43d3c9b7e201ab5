fn main() {
    if let Err(err) = gtc::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
