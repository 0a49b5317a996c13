//! Miette report conversion for CLI errors.

use folio_planner::PlanError;
use miette::Report;

use crate::error::CliError;

/// Convert CliError to a miette Report.
///
/// Library errors go through [`PlanError`]'s diagnostic implementation so
/// every report carries an error code and, where one exists, a help line.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Plan(e) => Report::new(e),
        CliError::Config(e) => Report::new(PlanError::Config(e)),
        CliError::Graph(e) => Report::new(PlanError::Graph(e)),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_carry_a_code() {
        let report = cli_error_to_miette(CliError::Config(folio_config::ConfigError::NoPages));
        assert_eq!(report.code().unwrap().to_string(), "INVALID_CONFIG");
        assert_eq!(report.to_string(), "no pages configured");
    }

    #[test]
    fn plain_errors_keep_their_message() {
        let report = cli_error_to_miette(CliError::FileNotFound("graph.json".into()));
        assert_eq!(report.to_string(), "File not found: graph.json");
    }
}
