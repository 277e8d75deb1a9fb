fn main() {
    if let Err(err) = dtpick_cli::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
