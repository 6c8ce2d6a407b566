fn main() -> anyhow::Result<()> {
    distframe::run_cli()
}
