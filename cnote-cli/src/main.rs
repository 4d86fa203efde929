fn main() -> anyhow::Result<()> {
    cnote_cli_lib::run()
}
