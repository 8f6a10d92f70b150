mod app;
pub use app::App;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = App::from_args(std::env::args())?;
    app.run()?;

    Ok(())
}
