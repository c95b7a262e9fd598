fn main() -> anyhow::Result<()> {
    study_desk::run()
}
