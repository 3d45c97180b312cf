fn main() {
    if let Err(e) = toon_ngin::scene::run() {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
