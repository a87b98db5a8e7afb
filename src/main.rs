use anyhow::Result;
use bikeshare::{
    config::Settings, config::SETTINGS_FILE, input::InterruptibleStdin, prompt::Console,
    session::Session,
};
use std::io;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging (stderr, so it never mixes with the report) ──
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();
    info!("startup");

    // ─── 2) settings ─────────────────────────────────────────────────
    let settings = Settings::load(SETTINGS_FILE)?;

    // ─── 3) interactive session (Ctrl-C aborts the current prompt) ───
    let input = InterruptibleStdin::spawn()?;
    let stdout = io::stdout();
    let console = Console::new(input, stdout.lock());
    Session::new(console, settings).run()?;

    info!("all done");
    Ok(())
}
