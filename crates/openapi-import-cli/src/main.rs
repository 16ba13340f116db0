mod config;
mod fetch;

use crate::config::{CliConfig, HashPolicy, default_config_path, load_config};
use crate::fetch::{build_client, read_spec_file, spec_text, verify_spec_hash};
use anyhow::Context as _;
use clap::Parser;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};
use unrelated_openapi_import::{
    ImportOptions, ImportResult, SecuritySelection, SpecSource, import_tools,
};

/// Convert an `OpenAPI` 3.x / Swagger 2.0 spec into REST tool definitions (JSON).
#[derive(Debug, Parser)]
#[command(name = "unrelated-openapi-import", version)]
struct Args {
    /// Fetch the spec from this URL.
    #[arg(long, env = "OPENAPI_IMPORT_URL")]
    url: Option<String>,

    /// Read the spec from this file.
    #[arg(long, env = "OPENAPI_IMPORT_FILE")]
    file: Option<PathBuf>,

    /// Prefix every tool name with `<namespace>_`.
    #[arg(long, env = "OPENAPI_IMPORT_NAMESPACE")]
    namespace: Option<String>,

    /// Use this security scheme instead of the first declared one.
    #[arg(long, env = "OPENAPI_IMPORT_SECURITY_SCHEME")]
    security_scheme: Option<String>,

    /// JSON config file (defaults to `$XDG_CONFIG_HOME/unrelated/openapi-import.json`).
    #[arg(long, env = "OPENAPI_IMPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Write the result here instead of stdout.
    #[arg(long, env = "OPENAPI_IMPORT_OUTPUT")]
    output: Option<PathBuf>,

    #[arg(long, env = "OPENAPI_IMPORT_PRETTY")]
    pretty: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, env = "OPENAPI_IMPORT_LOG_JSON")]
    log_json: bool,

    /// HTTP timeout for `--url` fetches.
    #[arg(long, env = "OPENAPI_IMPORT_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Expected `sha256:<hex>` digest of the raw spec text.
    #[arg(long, env = "OPENAPI_IMPORT_SPEC_HASH")]
    spec_hash: Option<String>,

    #[arg(long, value_enum, env = "OPENAPI_IMPORT_SPEC_HASH_POLICY")]
    spec_hash_policy: Option<HashPolicy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);
    run(args).await
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "unrelated_openapi_import=info,unrelated_openapi_import_cli=info".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => match default_config_path() {
            Ok(path) => load_config(&path)?,
            Err(_) => CliConfig::default(),
        },
    };

    let content = args.file.as_deref().map(read_spec_file).transpose()?;
    let source = SpecSource::from_parts(args.url.clone(), content)?;
    tracing::debug!(source = source.location(), "Resolved spec source");

    let timeout = args
        .timeout_secs
        .unwrap_or_else(|| cfg.fetch_timeout_secs());
    let client = build_client(Duration::from_secs(timeout))?;
    let raw = spec_text(&client, source).await?;

    if let Some(expected) = &args.spec_hash {
        let policy = args.spec_hash_policy.or(cfg.spec_hash_policy).unwrap_or_default();
        verify_spec_hash(&raw, expected, policy)?;
    }

    let result = import_tools(&raw, &import_options(&args, &cfg)).context("import spec")?;
    tracing::info!(
        title = %result.title,
        tools = result.tools.len(),
        "Import complete"
    );
    write_output(&result, args.output.as_deref(), args.pretty)
}

fn import_options(args: &Args, cfg: &CliConfig) -> ImportOptions {
    let mut options = ImportOptions::default();
    if let Some(namespace) = args.namespace.clone().or_else(|| cfg.namespace.clone()) {
        options = options.with_namespace(namespace);
    }
    if let Some(scheme) = args
        .security_scheme
        .clone()
        .or_else(|| cfg.security_scheme.clone())
    {
        options = options.with_security(SecuritySelection::Named(scheme));
    }
    options
}

fn write_output(result: &ImportResult, output: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let mut bytes = if pretty {
        serde_json::to_vec_pretty(result)
    } else {
        serde_json::to_vec(result)
    }
    .context("serialize result as json")?;
    bytes.push(b'\n');

    match output {
        Some(path) => {
            std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
        }
        None => std::io::stdout()
            .lock()
            .write_all(&bytes)
            .context("write stdout"),
    }
}
