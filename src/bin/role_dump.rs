//! IAM role catalog dump on its own.
//!
//! Unlike the combined CLI, this helper exits nonzero when the fetch
//! fails, so scripts can gate on it. `--token` bypasses the ambient
//! credential chain with an explicit bearer token.

use anyhow::{Result, anyhow, bail};
use permscout::{
    AmbientCredentials, CredentialProvider, PermissionCatalogFetcher, StaticToken, http_agent,
    render_catalog, request_timeout, resolve_iam_endpoint, resolve_metadata_endpoint,
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
    let cli = CliArgs::parse()?;
    let agent = http_agent(request_timeout());

    let credentials: Box<dyn CredentialProvider> = match cli.token {
        Some(token) => Box::new(StaticToken::new(token)),
        None => Box::new(AmbientCredentials::new(
            agent.clone(),
            resolve_metadata_endpoint()?,
        )),
    };
    let endpoint = resolve_iam_endpoint(cli.endpoint.as_deref())?;
    let fetcher = PermissionCatalogFetcher::new(endpoint, agent, credentials);
    let catalog = fetcher.fetch_all()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else {
        print!("{}", render_catalog(&catalog));
    }
    Ok(())
}

struct CliArgs {
    endpoint: Option<String>,
    token: Option<String>,
    json: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut endpoint = None;
        let mut token = None;
        let mut json = false;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--endpoint" => {
                    endpoint = Some(next_value(&mut args, "--endpoint")?);
                }
                "--token" => {
                    token = Some(next_value(&mut args, "--token")?);
                }
                "--json" => json = true,
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument: {other}"),
            }
        }

        Ok(Self {
            endpoint,
            token,
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
        "Usage: role-dump [options]\n\nDumps every IAM role together with its included permissions.\n\nOptions:\n      --endpoint <url>      Override the IAM endpoint root (or set PERMSCOUT_IAM_ENDPOINT).\n      --token <token>       Use an explicit bearer token instead of ambient credentials.\n      --json                Emit the catalog as a JSON object.\n      --help                Show this help text.\n"
    );
    std::process::exit(code);
}
