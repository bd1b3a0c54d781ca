use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use rlex_status::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub log_level: Option<String>,
    pub version: bool,
    pub url: Option<String>,
    pub path: Option<String>,
    pub timeout_secs: Option<u64>,
    pub interval_secs: Option<u64>,
    pub format: OutputFormat,
    pub watch: bool,
    pub count: Option<u64>,
}

impl CliOptions {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let format = match m.get_one::<String>("format").map(String::as_str) {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        };
        Self {
            log_level: m.get_one::<String>("log-level").cloned(),
            version: m.get_flag("version"),
            url: m.get_one::<String>("url").cloned(),
            path: m.get_one::<String>("path").cloned(),
            timeout_secs: m.get_one::<u64>("timeout").copied(),
            interval_secs: m.get_one::<u64>("interval").copied(),
            format,
            watch: m.get_flag("watch"),
            count: m.get_one::<u64>("count").copied(),
        }
    }

    /// Flags win over environment values.
    pub fn apply_to(&self, cfg: &mut Config) {
        if let Some(url) = &self.url {
            cfg.base_url = url.clone();
        }
        if let Some(path) = &self.path {
            cfg.limit_path = path.clone();
        }
        if let Some(t) = self.timeout_secs {
            cfg.timeout_secs = t;
        }
        if let Some(i) = self.interval_secs {
            cfg.interval_secs = i;
        }
    }
}

pub fn build_cli() -> Command {
    Command::new("rlex-status")
        .about("Show the Docker Hub pull limit reported by an rlex exporter")
        .arg(
            Arg::new("url")
                .long("url")
                .num_args(1)
                .help("Exporter base URL (overrides RLEX_URL)"),
        )
        .arg(
            Arg::new("path")
                .long("path")
                .num_args(1)
                .help("Limit endpoint path (overrides RLEX_LIMIT_PATH)"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .num_args(1)
                .value_parser(value_parser!(u64))
                .help("HTTP timeout in seconds (overrides RLEX_HTTP_TIMEOUT_SECS)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .num_args(1)
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("watch")
                .long("watch")
                .short('w')
                .help("Keep polling the exporter")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("interval")
                .long("interval")
                .short('i')
                .num_args(1)
                .value_parser(value_parser!(u64))
                .help("Seconds between polls in watch mode (overrides RLEX_INTERVAL_SECS)"),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .short('n')
                .num_args(1)
                .value_parser(value_parser!(u64).range(1..))
                .requires("watch")
                .help("Stop watching after this many fetches"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
}

pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, then RUST_LOG, then info. Logs stay on stderr, output on stdout.
    let mut builder = match level {
        Some(lvl) => {
            let mut b = env_logger::Builder::new();
            b.parse_filters(lvl);
            b
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")),
    };
    builder.target(env_logger::Target::Stderr).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        let mut argv = vec!["rlex-status"];
        argv.extend_from_slice(args);
        CliOptions::from_matches(&build_cli().get_matches_from(argv))
    }

    #[test]
    fn defaults_to_one_shot_text() {
        let o = parse(&[]);
        assert_eq!(o.format, OutputFormat::Text);
        assert!(!o.watch);
        assert!(o.count.is_none());
    }

    #[test]
    fn flags_override_config() {
        let o = parse(&[
            "--url",
            "http://127.0.0.1:9000",
            "--path",
            "/v1/limit",
            "--timeout",
            "3",
            "--watch",
            "-i",
            "10",
            "-n",
            "2",
            "--format",
            "json",
        ]);
        let mut cfg = Config::default();
        o.apply_to(&mut cfg);
        assert_eq!(cfg.limit_url().unwrap().as_str(), "http://127.0.0.1:9000/v1/limit");
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.interval_secs, 10);
        assert_eq!(o.count, Some(2));
        assert_eq!(o.format, OutputFormat::Json);
    }

    #[test]
    fn count_requires_watch() {
        let res = build_cli().try_get_matches_from(["rlex-status", "--count", "2"]);
        assert!(res.is_err());
    }
}
