//! Primary CLI: documentation probe plus IAM permission catalog dump.
//!
//! The two operations are independent; each failure is reported as a
//! printed line and neither affects the exit code. Only a missing
//! resource-name argument exits nonzero, before any network activity.

use anyhow::{Result, anyhow, bail};
use permscout::{
    AmbientCredentials, DocLocator, PermissionCatalogFetcher, http_agent, render_catalog,
    render_doc_lookup, render_summary, request_timeout, resolve_docs_base, resolve_iam_endpoint,
    resolve_metadata_endpoint,
};
use std::env;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    let agent = http_agent(request_timeout());

    let docs_base = resolve_docs_base(cli.docs_base.as_deref())?;
    let locator = DocLocator::new(docs_base, agent.clone())?;
    let lookup = locator.locate(&cli.resource_name)?;

    let endpoint = resolve_iam_endpoint(cli.endpoint.as_deref())?;
    let credentials = AmbientCredentials::new(agent.clone(), resolve_metadata_endpoint()?);
    let fetcher = PermissionCatalogFetcher::new(endpoint, agent, Box::new(credentials));
    let catalog = fetcher.fetch_all();

    if cli.json {
        let summary = render_summary(&cli.resource_name, &lookup, &catalog);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print!("{}", render_doc_lookup(&cli.resource_name, &lookup));
    println!();
    match &catalog {
        Ok(catalog) => print!("{}", render_catalog(catalog)),
        Err(err) => println!("Unable to fetch the IAM permission catalog: {err}"),
    }
    Ok(())
}

struct Cli {
    resource_name: String,
    docs_base: Option<String>,
    endpoint: Option<String>,
    json: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut resource_name: Option<String> = None;
        let mut docs_base = None;
        let mut endpoint = None;
        let mut json = false;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--docs-base" => {
                    docs_base = Some(next_value(&mut args, "--docs-base")?);
                }
                "--endpoint" => {
                    endpoint = Some(next_value(&mut args, "--endpoint")?);
                }
                "--json" => json = true,
                "--help" | "-h" => usage(0),
                other if other.starts_with('-') => bail!("unknown flag: {other}"),
                other => {
                    if resource_name.is_some() {
                        bail!("unexpected extra argument: {other}");
                    }
                    let trimmed = other.trim();
                    if trimmed.is_empty() {
                        usage(1);
                    }
                    resource_name = Some(trimmed.to_string());
                }
            }
        }

        let Some(resource_name) = resource_name else {
            usage(1);
        };

        Ok(Self {
            resource_name,
            docs_base,
            endpoint,
            json,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = std::ffi::OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: permscout <resource-name> [options]\n\nChecks the Terraform registry documentation page for <resource-name> and\ndumps every IAM role together with its included permissions.\n\nOptions:\n      --docs-base <url>     Override the documentation base URL (or set PERMSCOUT_DOCS_BASE).\n      --endpoint <url>      Override the IAM endpoint root (or set PERMSCOUT_IAM_ENDPOINT).\n      --json                Emit a machine-readable run summary instead of text.\n      --help                Show this help text.\n"
    );
    std::process::exit(code);
}
