mod bootstrap;

use anyhow::Result;
use assistant_core::models::Attachment;
use assistant_core::settings::Settings;
use assistant_runtime::data_manager::DataManager;
use assistant_runtime::responder::Responder;
use assistant_runtime::session::{ChatSession, SystemClock};
use assistant_ui::app::App;
use assistant_ui::chart_view::chart_to_text;

/// Bar width used when a chart is printed to stdout.
const TEXT_CHART_WIDTH: u16 = 40;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = match (&settings.log_file, settings.is_one_shot()) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => None,
        (None, false) => Some(bootstrap::default_log_file()),
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("BI Assistant v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Theme: {}, Timezone: {}, Top N: {}",
        settings.theme,
        settings.timezone,
        settings.top_n
    );

    let cwd = std::env::current_dir()?;
    let data_path = bootstrap::discover_data_path(settings.data_file.as_deref(), &cwd);
    match &data_path {
        Some(path) => tracing::info!("Using data file {}", path.display()),
        None => tracing::warn!("No sales data file found under {}", cwd.display()),
    }

    let session = ChatSession::new(
        DataManager::new(data_path),
        Responder::new(settings.top_n as usize),
        Box::new(SystemClock::new(&settings.timezone)),
    );

    match settings.query.as_deref() {
        Some(query) => run_one_shot(session, query),
        None => {
            let app = App::new(&settings.theme, session, settings.timezone.clone());

            // The TUI exits on Esc / Ctrl+C itself; the OS signal covers the
            // window before raw mode is enabled.
            tokio::select! {
                result = app.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
            Ok(())
        }
    }
}

/// Answer `query` on stdout and return.
fn run_one_shot(mut session: ChatSession, query: &str) -> Result<()> {
    // Force the load so a failure is reported before the answer.
    session.dataset();
    if let Some(err) = session.data().last_error() {
        eprintln!("Data load failed: {err}");
    }

    let Some(reply) = session.ask(query) else {
        eprintln!("Nothing to answer: the query is blank.");
        return Ok(());
    };

    println!("{}", reply.content);
    if let Some(Attachment::Chart(spec)) = &reply.attachment {
        println!();
        println!("{}", chart_to_text(spec, TEXT_CHART_WIDTH));
    }
    Ok(())
}
