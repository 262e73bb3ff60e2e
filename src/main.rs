fn main() {
    if let Err(err) = csv_refine::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
