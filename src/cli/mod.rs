//! Command-line parsing for the training and serving binaries.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline and server code. Every flag has a default, so both binaries run
//! with no arguments at all.

use std::path::PathBuf;

use clap::Parser;

/// `loan-train` options.
#[derive(Debug, Parser, Clone)]
#[command(name = "loan-train", version, about = "Train the loan approval classifier")]
pub struct TrainArgs {
    /// Training dataset (CSV with a header row).
    #[arg(long, value_name = "CSV", default_value = "loan_data.csv")]
    pub data: PathBuf,

    /// Where to write the classifier artifact.
    #[arg(long, default_value = "model.json")]
    pub model_out: PathBuf,

    /// Where to write the scaler artifact.
    #[arg(long, default_value = "scaler.json")]
    pub scaler_out: PathBuf,

    /// Fraction of rows withheld for the holdout split.
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,

    /// Random seed for the train/holdout split.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Solver iteration budget.
    #[arg(long, default_value_t = 2000)]
    pub max_iter: usize,

    /// Inverse L2 regularization strength.
    #[arg(long = "c", default_value_t = 1.0)]
    pub c: f64,

    /// Export per-row holdout predictions to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_predictions: Option<PathBuf>,
}

/// `loan-serve` options. Each can also come from the environment (or `.env`).
#[derive(Debug, Parser, Clone)]
#[command(name = "loan-serve", version, about = "Serve loan approval predictions over HTTP")]
pub struct ServeArgs {
    /// Interface to bind.
    #[arg(long, env = "LOAN_SERVE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Classifier artifact produced by `loan-train`.
    #[arg(long, env = "MODEL_PATH", default_value = "model.json")]
    pub model: PathBuf,

    /// Scaler artifact produced by `loan-train`.
    #[arg(long, env = "SCALER_PATH", default_value = "scaler.json")]
    pub scaler: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn train_defaults_need_no_arguments() {
        let args = TrainArgs::try_parse_from(["loan-train"]).unwrap();
        assert_eq!(args.data, PathBuf::from("loan_data.csv"));
        assert_eq!(args.seed, 42);
        assert_eq!(args.max_iter, 2000);
        assert!(args.export_predictions.is_none());
    }

    #[test]
    fn serve_flags_override_defaults() {
        let args = ServeArgs::try_parse_from(["loan-serve", "--port", "9001", "--host", "127.0.0.1"]).unwrap();
        assert_eq!(args.port, 9001);
        assert_eq!(args.host, "127.0.0.1");
    }

    #[test]
    fn host_ignores_generic_host_variable() {
        let arg = ServeArgs::command()
            .get_arguments()
            .find(|a| a.get_id() == "host")
            .cloned()
            .unwrap();
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new("LOAN_SERVE_HOST")));
    }
}
