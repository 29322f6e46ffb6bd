//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use chomik_mirror::DEFAULT_WORKERS;

/// Mirror audio files from a remote directory listing.
///
/// Walks the directory tree starting at URL breadth-first, decodes the
/// service's encoded resource names, and downloads every discovered audio
/// file into a local directory structure matching the remote one.
#[derive(Parser, Debug)]
#[command(name = "chomik-mirror")]
#[command(author, version, about)]
pub struct Args {
    /// Starting directory URL on the remote service
    pub url: String,

    /// Number of concurrent download workers (1-64)
    #[arg(short = 'j', long, default_value_t = DEFAULT_WORKERS as u8, value_parser = clap::value_parser!(u8).range(1..=64))]
    pub workers: u8,

    /// Local mirror root directory
    #[arg(short = 'o', long, default_value = ".")]
    pub output: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_url() {
        let result = Args::try_parse_from(["chomik-mirror"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_defaults() {
        let args = Args::try_parse_from(["chomik-mirror", "http://example/dir"]).unwrap();
        assert_eq!(args.url, "http://example/dir");
        assert_eq!(args.workers, 4); // DEFAULT_WORKERS
        assert_eq!(args.output, PathBuf::from("."));
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_workers_short_flag() {
        let args = Args::try_parse_from(["chomik-mirror", "-j", "8", "http://example/d"]).unwrap();
        assert_eq!(args.workers, 8);
    }

    #[test]
    fn test_cli_workers_zero_rejected() {
        let result = Args::try_parse_from(["chomik-mirror", "-j", "0", "http://example/d"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_workers_over_max_rejected() {
        let result = Args::try_parse_from(["chomik-mirror", "-j", "65", "http://example/d"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_output_flag() {
        let args =
            Args::try_parse_from(["chomik-mirror", "-o", "/tmp/mirror", "http://example/d"])
                .unwrap();
        assert_eq!(args.output, PathBuf::from("/tmp/mirror"));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["chomik-mirror", "-vv", "http://example/d"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["chomik-mirror", "--quiet", "http://example/d"]).unwrap();
        assert!(args.quiet);
    }
}
