use std::{
    fs,
    io::{self, Write},
    num::NonZeroUsize,
    path::Path,
    process,
};

use postpager::{
    application::{
        error::AppError, events::FILTER_APPLIED_EVENT, location::MemoryLocation,
        session::Session,
    },
    config,
    infra::{error::InfraError, telemetry},
};
use serde_json::json;
use tracing::{Dispatch, Level, debug, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;
use url::Url;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) =
        config::load_with_cli().map_err(|err| InfraError::configuration(err.to_string()))?;

    telemetry::init(&settings.logging)?;
    let page_size = settings.pagination.page_size;

    match cli_args.command {
        config::Command::Render(args) => run_render(page_size, args),
        config::Command::Inspect(args) => run_inspect(page_size, args),
    }
}

fn run_render(page_size: NonZeroUsize, args: config::RenderArgs) -> Result<(), AppError> {
    let html = read_page(&args.page.file)?;
    let location = page_location(&args.page)?;

    let output = match Session::attach(html.clone(), location, page_size)? {
        Some(mut session) => {
            session.controller_mut().subscribe(|event| {
                debug!(
                    target = "postpager::render",
                    event = FILTER_APPLIED_EVENT,
                    year = %event.choice,
                    visible = event.visible,
                    total = event.total,
                    "notification published"
                );
            });

            for step in &args.steps {
                let changed = session.apply(step);
                debug!(target = "postpager::render", ?step, changed, "step applied");
            }

            let controller = session.controller();
            info!(
                target = "postpager::render",
                page = controller.current_page(),
                total_pages = controller.total_pages(),
                fragment = controller.location().url().fragment().unwrap_or_default(),
                "render complete"
            );
            session.render()?
        }
        None => html,
    };

    match args.output.as_deref() {
        Some(path) => fs::write(path, output).map_err(InfraError::from)?,
        None => io::stdout()
            .lock()
            .write_all(output.as_bytes())
            .map_err(InfraError::from)?,
    }

    Ok(())
}

fn run_inspect(page_size: NonZeroUsize, args: config::InspectArgs) -> Result<(), AppError> {
    let html = read_page(&args.page.file)?;
    let location = page_location(&args.page)?;

    let report = match Session::attach(html, location, page_size)? {
        Some(session) => {
            let controller = session.controller();
            json!({
                "attached": true,
                "selector": session.list().selector,
                "items": session.list().items.len(),
                "years": controller.filter().map(|filter| filter.catalog()),
                "fragment": controller.location().url().fragment(),
                "view": session.view(),
            })
        }
        None => json!({ "attached": false }),
    };

    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|err| AppError::unexpected(format!("failed to encode report: {err}")))?;
    println!("{rendered}");
    Ok(())
}

fn read_page(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path)
        .map_err(InfraError::from)
        .map_err(AppError::from)
}

/// The URL the page is served at: `--url` when given, else the file itself.
fn page_location(page: &config::PageArgs) -> Result<MemoryLocation, AppError> {
    if let Some(url) = page.url.as_deref() {
        return MemoryLocation::parse(url)
            .map_err(|err| AppError::validation(format!("invalid --url `{url}`: {err}")));
    }

    let url = fs::canonicalize(&page.file)
        .ok()
        .and_then(|path| Url::from_file_path(path).ok());
    match url {
        Some(url) => Ok(MemoryLocation::new(url)),
        None => MemoryLocation::parse("file:///")
            .map_err(|err| AppError::unexpected(format!("failed to build page url: {err}"))),
    }
}
