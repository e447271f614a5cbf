fn main() -> anyhow::Result<()> {
    chipdat::cli::run_cli()
}
