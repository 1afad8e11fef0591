fn main() {
    if let Err(err) = rets_decode::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
