fn main() -> anyhow::Result<()> {
    daygrid_lib::run()
}
