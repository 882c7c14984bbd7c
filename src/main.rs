fn main() {
    if let Err(err) = puli::run() {
        puli::ui::error(&err.to_string());
        std::process::exit(1);
    }
}
