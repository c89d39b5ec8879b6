//! Vitrine - windowed showcase scene entry point.

fn main() -> anyhow::Result<()> {
    vitrine_client::run()
}
