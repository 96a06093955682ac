//! Documentation probe on its own.
//!
//! Reads the resource name from an argument or, with `--stdin`, from
//! standard input, so the lookup can sit in a pipeline the way the old
//! interactive flow did. Prints the same block the combined CLI prints.

use anyhow::{Result, anyhow, bail};
use permscout::{DocLocator, http_agent, render_doc_lookup, request_timeout, resolve_docs_base};
use std::env;
use std::io::Read;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse()?;
    let name = cli.source.read()?;
    if name.is_empty() {
        bail!("resource name must not be empty");
    }

    let docs_base = resolve_docs_base(cli.docs_base.as_deref())?;
    let locator = DocLocator::new(docs_base, http_agent(request_timeout()))?;
    let lookup = locator.locate(&name)?;
    print!("{}", render_doc_lookup(&name, &lookup));
    Ok(())
}

struct CliArgs {
    source: NameSource,
    docs_base: Option<String>,
}

enum NameSource {
    Arg(String),
    Stdin,
}

impl NameSource {
    fn read(self) -> Result<String> {
        match self {
            NameSource::Arg(name) => Ok(name),
            NameSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|err| anyhow!("reading stdin: {err}"))?;
                Ok(buf.trim().to_string())
            }
        }
    }
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut source: Option<NameSource> = None;
        let mut docs_base = None;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--stdin" => {
                    if source.is_some() {
                        bail!("resource name provided more than once");
                    }
                    source = Some(NameSource::Stdin);
                }
                "--docs-base" => {
                    docs_base = Some(next_value(&mut args, "--docs-base")?);
                }
                "--help" | "-h" => usage(0),
                other if other.starts_with('-') => bail!("unknown flag: {other}"),
                other => {
                    if source.is_some() {
                        bail!("resource name provided more than once");
                    }
                    source = Some(NameSource::Arg(other.trim().to_string()));
                }
            }
        }

        let Some(source) = source else {
            usage(1);
        };

        Ok(Self { source, docs_base })
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
        "Usage: doc-probe (<resource-name> | --stdin) [options]\n\nChecks the Terraform registry documentation page for a resource and\nprints its URL when the page is reachable.\n\nOptions:\n      --stdin               Read the resource name from standard input.\n      --docs-base <url>     Override the documentation base URL (or set PERMSCOUT_DOCS_BASE).\n      --help                Show this help text.\n"
    );
    std::process::exit(code);
}
