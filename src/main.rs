fn main() {
    std::process::exit(lisa_lib::run())
}
