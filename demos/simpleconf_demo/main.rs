//! # simpleconf demo application
//!
//! Binds one struct to flags and environment variables and prints the
//! result.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example simpleconf_demo
//! cargo run --example simpleconf_demo -- --help
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                     | How to exercise it                                                          |
//! |-----------------------------|-----------------------------------------------------------------------------|
//! | Field defaults              | `cargo run --example simpleconf_demo`                                       |
//! | Flags                       | `cargo run --example simpleconf_demo -- --port 0x2000 --color blue`         |
//! | Prefixed env vars           | `SIMPLECONF_DEMO_HOST=0.0.0.0 cargo run --example simpleconf_demo`          |
//! | Env beats flag              | `SIMPLECONF_DEMO_PORT=1 cargo run --example simpleconf_demo -- --port 2`    |
//! | Env-only field              | `SIMPLECONF_DEMO_API_TOKEN=x cargo run --example simpleconf_demo`           |
//! | Exit on bad input           | `SIMPLECONF_DEMO_PORT=abc cargo run --example simpleconf_demo` (status 2)   |
//! | Ambient env set             | `DEMO_VERBOSE=1 cargo run --example simpleconf_demo`                        |
//! | Logging                     | `RUST_LOG=simpleconf=debug cargo run --example simpleconf_demo`             |

mod config;

use simpleconf::{ErrorHandling, Parser, ambient};
use tracing_subscriber::EnvFilter;

use config::DemoConfig;

const ENV_PREFIX: &str = "SIMPLECONF_DEMO";

fn ansi_color_code(name: &str) -> &str {
    match name {
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Process-wide switch, read through the ambient set.
    let verbose: &'static mut i64 = Box::leak(Box::new(0));
    ambient::int64_var(verbose, "DEMO_VERBOSE")?;
    ambient::parse()?;
    let verbose = ambient::is_set("DEMO_VERBOSE")?;

    let mut config = DemoConfig::default();
    let operands = Parser::new(&mut config)
        .set_env_prefix(ENV_PREFIX)
        .error_handling(ErrorHandling::ExitOnError)
        .parse()?;

    let color = ansi_color_code(&config.color);
    if verbose {
        println!("{color}[verbose] resolved configuration for {:?}{RESET}", config.name);
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let entries = [
        ("name", config.name.clone()),
        ("host", config.host.clone()),
        ("port", config.port.to_string()),
        ("api_token", if config.api_token.is_empty() { "<unset>".into() } else { "<redacted>".into() }),
        ("started_by", config.started_by.clone()),
    ];
    let max_key_len = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in &entries {
        println!("{color}{key:<max_key_len$}{RESET}  {value}");
    }
    if !operands.is_empty() {
        println!("operands: {}", operands.join(" "));
    }
    Ok(())
}
