fn main() -> Result<(), Box<dyn std::error::Error>> {
    provscope_cli::run()
}
