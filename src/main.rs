fn main() -> anyhow::Result<()> {
    runbox::cli::run()
}
