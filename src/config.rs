//! Command-line configuration of the `rxplay` binary.

use clap::Parser;

use crate::{
    errors::ConfigError,
    feed::{CompanyFeed, Delay, MOCK_COMPANIES},
    playground::Demo,
};

#[derive(Debug, Parser)]
#[command(
    name = "rxplay",
    about = "Runs one of the publisher demos against the mock company feed",
    version
)]
pub struct Cli {
    /// Which publisher flavour to demonstrate.
    #[arg(long, value_enum, default_value_t = Demo::MultipleSubscribers)]
    pub demo: Demo,

    /// Fixed delay before each company, in seconds.
    #[arg(long, default_value_t = 1.0)]
    pub delay: f64,

    /// Lower bound of a random per-company delay, in seconds.
    #[arg(long, requires = "max_delay")]
    pub min_delay: Option<f64>,

    /// Upper bound of a random per-company delay, in seconds.
    #[arg(long, requires = "min_delay")]
    pub max_delay: Option<f64>,

    /// Company to serve instead of the built-in mock list. Repeatable.
    #[arg(long = "company", value_name = "NAME")]
    pub companies: Vec<String>,

    /// Serve an empty feed, which fails with a "no items" error.
    #[arg(long, conflicts_with = "companies")]
    pub empty: bool,

    /// Append the waited delay to every emitted company.
    #[arg(long)]
    pub label_delay: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Validated demo configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaygroundConfig {
    pub demo: Demo,
    pub delay: Delay,
    pub companies: Vec<String>,
    pub label_with_delay: bool,
    pub log_level: String,
}

impl PlaygroundConfig {
    /// Builds the company feed described by this configuration.
    pub fn feed(&self) -> CompanyFeed {
        CompanyFeed::new(self.companies.iter().cloned(), self.delay)
            .label_with_delay(self.label_with_delay)
    }
}

impl TryFrom<Cli> for PlaygroundConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let delay = match (cli.min_delay, cli.max_delay) {
            (Some(min), Some(max)) => Delay::range_secs(min, max)?,
            (None, None) => Delay::fixed_secs(cli.delay)?,
            _ => return Err(ConfigError::IncompleteRange),
        };

        let companies = if cli.empty {
            Vec::new()
        } else if cli.companies.is_empty() {
            MOCK_COMPANIES.iter().map(|c| c.to_string()).collect()
        } else {
            cli.companies
        };

        Ok(PlaygroundConfig {
            demo: cli.demo,
            delay,
            companies,
            label_with_delay: cli.label_delay,
            log_level: cli.log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn parse(args: &[&str]) -> Result<PlaygroundConfig, ConfigError> {
        let cli = Cli::try_parse_from(std::iter::once("rxplay").chain(args.iter().copied()))
            .expect("arguments should parse");
        PlaygroundConfig::try_from(cli)
    }

    #[test]
    fn defaults_run_two_subscribers_over_the_mock_list() {
        let config = parse(&[]).unwrap();

        assert_eq!(config.demo, Demo::MultipleSubscribers);
        assert_eq!(config.delay, Delay::Fixed(Duration::from_secs(1)));
        assert_eq!(config.companies.len(), MOCK_COMPANIES.len());
        assert!(!config.label_with_delay);
    }

    #[test]
    fn delay_range_and_custom_companies() {
        let config = parse(&[
            "--demo",
            "shared-subscribers",
            "--min-delay",
            "1",
            "--max-delay",
            "3",
            "--company",
            "A",
            "--company",
            "B",
        ])
        .unwrap();

        assert_eq!(config.demo, Demo::SharedSubscribers);
        assert_eq!(
            config.delay,
            Delay::Range {
                min: Duration::from_secs(1),
                max: Duration::from_secs(3)
            }
        );
        assert_eq!(config.feed().names(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn empty_feed_and_invalid_delay() {
        let config = parse(&["--empty"]).unwrap();
        assert!(config.companies.is_empty());

        assert_eq!(
            parse(&["--delay=-2"]),
            Err(ConfigError::InvalidDelay(-2.0))
        );
        assert_eq!(
            parse(&["--min-delay=3", "--max-delay=1"]),
            Err(ConfigError::InvertedRange { min: 3.0, max: 1.0 })
        );
    }
}
