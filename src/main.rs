fn main() {
    if let Err(err) = dmrs_arc_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
