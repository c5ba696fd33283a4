//! Command-line and environment configuration for the server binary.

use clap::Parser;

/// Todo list HTTP backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "todo-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Output logs as JSON
    #[arg(long, env = "JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_localhost_3000() {
        let config = Config::try_parse_from(["todo-server"]).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert!(!config.json_logs);
    }

    #[test]
    fn flags_override_defaults() {
        let config =
            Config::try_parse_from(["todo-server", "--host", "0.0.0.0", "-p", "8080", "--json-logs"])
                .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.json_logs);
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(Config::try_parse_from(["todo-server", "--port", "70000"]).is_err());
    }
}
