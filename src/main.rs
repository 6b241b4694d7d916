use std::path::PathBuf;
use tracing::info;

use api_scout::loadtest::{self, PlanOptions};
use api_scout::{discover_endpoints, DiscoveryConfig};

#[derive(Debug, PartialEq)]
struct CliArgs {
    target: String,
    rps: Option<u32>,
    duration: Option<u32>,
    method: Option<String>,
    output: Option<PathBuf>,
    preflight: bool,
}

fn print_usage() {
    eprintln!("Usage: api-scout <target-url> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --rps <n>          requests per second in the emitted plan (default 10)");
    eprintln!("  --duration <secs>  test duration in the emitted plan (default 10)");
    eprintln!("  --method <verb>    endpoint method to include in the plan (default GET)");
    eprintln!("  --output <file>    also write the plan JSON to a file");
    eprintln!("  --no-preflight     skip the HTTP reachability check");
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut target: Option<String> = None;
    let mut rps = None;
    let mut duration = None;
    let mut method = None;
    let mut output = None;
    let mut preflight = true;

    while let Some(arg) = args.next() {
        // Accept both `--flag value` and `--flag=value`.
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) => (f.to_string(), Some(v.to_string())),
            None => (arg.clone(), None),
        };
        match flag.as_str() {
            "--rps" => {
                let v = inline.clone().or_else(|| args.next());
                rps = Some(parse_number(&flag, v)?);
            }
            "--duration" => {
                let v = inline.clone().or_else(|| args.next());
                duration = Some(parse_number(&flag, v)?);
            }
            "--method" => {
                let v = inline.clone().or_else(|| args.next());
                method = Some(v.ok_or_else(|| format!("missing value for {}", flag))?);
            }
            "--output" => {
                let v = inline.clone().or_else(|| args.next());
                output = Some(PathBuf::from(
                    v.ok_or_else(|| format!("missing value for {}", flag))?,
                ));
            }
            "--no-preflight" => preflight = false,
            "--help" | "-h" => return Err(String::new()),
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {}", other));
            }
            _ => {
                if target.is_some() {
                    return Err(format!("unexpected extra argument: {}", arg));
                }
                target = Some(arg);
            }
        }
    }

    let target = target.ok_or_else(|| "missing target URL".to_string())?;
    Ok(CliArgs {
        target,
        rps,
        duration,
        method,
        output,
        preflight,
    })
}

fn parse_number(flag: &str, value: Option<String>) -> Result<u32, String> {
    let v = value.ok_or_else(|| format!("missing value for {}", flag))?;
    v.trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid value for {}: {}", flag, v))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("Error: {}", msg);
                eprintln!();
            }
            print_usage();
            std::process::exit(1);
        }
    };

    let mut cfg = DiscoveryConfig::from_env();
    if !cli.preflight {
        cfg.preflight = false;
    }

    let report = discover_endpoints(&cli.target, &cfg).await?;

    if report.endpoints.is_empty() {
        println!("No API endpoints discovered.");
        return Ok(());
    }

    println!("\n🎯 Discovered API endpoints:");
    for endpoint in &report.endpoints {
        println!("- {}", endpoint);
    }

    let opts = PlanOptions {
        rps: cli.rps.unwrap_or(loadtest::DEFAULT_RPS),
        duration: cli.duration.unwrap_or(loadtest::DEFAULT_DURATION_SECS),
        method: cli
            .method
            .unwrap_or_else(|| loadtest::DEFAULT_METHOD.to_string()),
    };
    let plan = api_scout::plan_from_report(&report, &opts);

    println!("\n✅ Load-test plan:");
    println!("{}", serde_json::to_string_pretty(&plan)?);

    if let Some(path) = cli.output {
        loadtest::write_plan(&plan, &path)?;
    }

    info!("Done in {} ms", report.duration_ms);
    Ok(())
}
