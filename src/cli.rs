use std::path::PathBuf;

use clap::Parser;

use lv_base::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "launchviz", about = "Override launch arguments and explore the resulting launch tree")]
pub struct Cli {
    /// Launch file to analyze
    pub launch_file: PathBuf,
    /// Analyzer port (0 picks a free one when spawning)
    #[arg(long)]
    pub port: Option<u16>,
    /// Analyzer host
    #[arg(long)]
    pub host: Option<String>,
    /// Connect to an analyzer that is already running instead of starting one
    #[arg(long)]
    pub no_spawn: bool,
    /// YAML file merged over the built-in configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `lv_mod_tree=trace`
    #[arg(long, env = "LAUNCHVIZ_LOG")]
    pub log: Option<String>,
}

impl Cli {
    /// Command line flags win over file configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.analyzer.port = port;
        }
        if let Some(host) = &self.host {
            config.analyzer.host = host.clone();
        }
        if self.no_spawn {
            config.analyzer.spawn = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn launch_file_is_required() {
        let parsed = Cli::try_parse_from(["launchviz"]);
        let err = parsed.err().expect("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from(["launchviz", "bringup.launch.py", "--port", "5000", "--host", "10.0.0.2", "--no-spawn"])
            .expect("flags should parse");
        let mut config = AppConfig::defaults().expect("defaults parse");
        cli.apply(&mut config);
        assert_eq!(config.analyzer.port, 5000);
        assert_eq!(config.analyzer.host, "10.0.0.2");
        assert!(!config.analyzer.spawn);
        assert_eq!(cli.launch_file, PathBuf::from("bringup.launch.py"));
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = Cli::try_parse_from(["launchviz", "a.launch.py"]).expect("should parse");
        let mut config = AppConfig::defaults().expect("defaults parse");
        let before = config.analyzer.clone();
        cli.apply(&mut config);
        assert_eq!(config.analyzer.port, before.port);
        assert_eq!(config.analyzer.host, before.host);
        assert_eq!(config.analyzer.spawn, before.spawn);
    }

    #[test]
    fn rejects_invalid_port() {
        let parsed = Cli::try_parse_from(["launchviz", "a.launch.py", "--port", "99999"]);
        assert!(parsed.is_err());
    }
}
