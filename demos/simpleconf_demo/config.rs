//! Configuration record for the simpleconf demo application.
//!
//! | Flag         | Env var                      | Field         |
//! |--------------|------------------------------|---------------|
//! | `--name`     | `SIMPLECONF_DEMO_NAME`       | `name`        |
//! | `--host`     | `SIMPLECONF_DEMO_HOST`       | `host`        |
//! | `--port`     | `SIMPLECONF_DEMO_PORT`       | `port`        |
//! | `--color`    |                              | `color`       |
//! |              | `SIMPLECONF_DEMO_API_TOKEN`  | `api_token`   |
//!
//! `started_by` is not listed and is never bound.

use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct DemoConfig {
    pub name: String,
    pub host: String,
    pub port: i64,
    pub color: String,
    #[serde(skip)]
    pub api_token: String,
    pub started_by: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            name: "simpleconf-demo".into(),
            host: "127.0.0.1".into(),
            port: 8080,
            color: "yellow".into(),
            api_token: String::new(),
            started_by: "demo".into(),
        }
    }
}

simpleconf::record!(DemoConfig {
    name => { flag: "name", env: "NAME", usage: "application name shown in the banner" },
    host => { flag: "host", env: "HOST", usage: "server host" },
    port => { flag: "port", env: "PORT", usage: "server port (accepts 0x, 0o, 0b prefixes)" },
    color => { flag: "color", usage: "banner color: red, green, yellow, blue, magenta, cyan" },
    api_token => { env: "API_TOKEN" },
});
