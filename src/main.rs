// SPDX-License-Identifier: MPL-2.0
use folio_sync::config;
use folio_sync::domain::Language;
use folio_sync::i18n;
use folio_sync::paths;
use folio_sync::persistence::{FileStorage, PersistenceGateway};
use folio_sync::selectors::{self, Selectors};
use folio_sync::store::{RootState, Store};
use folio_sync::theming::{self, ThemePreference};
use folio_sync::transport::HttpFetcher;
use folio_sync::{Error, Result};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
folio_sync - sync portfolio data for the stored language

USAGE:
  folio_sync [OPTIONS]

OPTIONS:
  --lang <en|es>               Store a new language preference
  --theme <light|dark|system>  Store a new theme preference
  --reset                      Restore default settings
  --purge                      Delete persisted settings before starting
  --base-url <url>             Override the JSON host
  --config-dir <dir>           Override the config directory
  --data-dir <dir>             Override the data directory
  -h, --help                   Print this help
";

struct Flags {
    lang: Option<Language>,
    theme: Option<ThemePreference>,
    reset: bool,
    purge: bool,
    base_url: Option<String>,
}

fn parse_flags() -> Result<Option<Flags>> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let arg_error = |e: pico_args::Error| Error::Config(e.to_string());
    let config_dir: Option<String> = args.opt_value_from_str("--config-dir").map_err(arg_error)?;
    let data_dir: Option<String> = args.opt_value_from_str("--data-dir").map_err(arg_error)?;
    paths::init_cli_overrides(data_dir, config_dir);

    let flags = Flags {
        lang: args.opt_value_from_str("--lang").map_err(arg_error)?,
        theme: args.opt_value_from_str("--theme").map_err(arg_error)?,
        reset: args.contains("--reset"),
        purge: args.contains("--purge"),
        base_url: args.opt_value_from_str("--base-url").map_err(arg_error)?,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(Error::Config(format!("unexpected arguments: {rest:?}")));
    }
    Ok(Some(flags))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio_sync=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(state: &RootState, views: &Selectors) {
    let settings = state.settings;
    let scheme = theming::effective_color_scheme(settings.theme);
    println!(
        "settings: theme={} (renders {}), language={}",
        settings.theme,
        if scheme.is_dark() { "dark" } else { "light" },
        settings.language
    );

    let profile: &Option<_> = selectors::select_profile(state);
    match (profile, selectors::select_profile_error(state)) {
        (Some(profile), _) => println!(
            "profile: {} - {}",
            profile.name,
            profile.title.as_deref().unwrap_or("")
        ),
        (None, Some(error)) => println!("profile: error: {error}"),
        (None, None) => println!("profile: none"),
    }

    match selectors::select_education_error(state) {
        Some(error) => println!("education: error: {error}"),
        None => {
            let certified = views.education_with_certificates(state);
            println!(
                "education: {} entries, {} with certificates",
                selectors::select_education(state).len(),
                certified.len()
            );
        }
    }

    match selectors::select_work_experience_error(state) {
        Some(error) => println!("work experience: error: {error}"),
        None => match (*views.current_position(state)).as_ref() {
            Some(job) => println!("currently: {} at {}", job.position, job.company),
            None => println!(
                "work experience: {} entries, no current position",
                selectors::select_work_experience(state).len()
            ),
        },
    }
}

async fn run(flags: Flags) -> Result<()> {
    let (mut config, warning) = config::load();
    if let Some(key) = warning {
        tracing::warn!(%key, "config could not be loaded; using defaults");
    }
    if let Some(url) = flags.base_url {
        config.remote.base_url = url;
    }

    let store = Store::new(Arc::new(HttpFetcher::new()?), &config.remote);
    let storage = FileStorage::in_app_data_dir(None)?;
    tracing::debug!(dir = %storage.dir().display(), "settings storage");
    let gateway = PersistenceGateway::new(Arc::new(storage), config.persistence.clone());

    if flags.purge {
        gateway.purge().await?;
    }
    let (outcome, writer) = gateway.start(&store).await;

    // Nothing stored yet: seed the preference from the device locale.
    if outcome.is_first_launch() {
        store.set_language(i18n::detect_language());
    }
    if flags.reset {
        store.reset_settings();
    }
    if let Some(theme) = flags.theme {
        store.set_theme(theme);
    }
    if let Some(lang) = flags.lang {
        store.set_language(lang);
    }

    for handle in store.fetch_all(store.settings().language) {
        if let Err(err) = handle.await {
            tracing::error!(error = %err, "fetch task aborted");
        }
    }

    let views = Selectors::new(&config.selectors);
    print_report(&store.state(), &views);

    // Dropping the last store handle lets the writer flush and stop.
    drop(store);
    if let Err(err) = writer.await {
        tracing::error!(error = %err, "settings writer aborted");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    match run(flags).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "folio_sync failed");
            ExitCode::FAILURE
        }
    }
}
