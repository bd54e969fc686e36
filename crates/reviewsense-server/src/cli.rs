use clap::{Args, Parser, Subcommand};
use reviewsense_classifiers::ClassifierBackend;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reviewsense")]
#[command(author, version, about = "Sentiment analysis API for customer reviews")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "reviewsense.yaml",
        env = "REVIEWSENSE_CONFIG",
        global = true
    )]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),

    /// Fetch the configured model into the local cache and smoke-test it
    DownloadModel(ModelArgs),
}

/// Overrides applied on top of the configuration file
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Listen address
    #[arg(short, long, env = "REVIEWSENSE_LISTEN")]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "REVIEWSENSE_PORT")]
    pub port: Option<u16>,

    /// Maximum words per review before truncation or rejection
    #[arg(long)]
    pub max_words: Option<usize>,

    /// Classifier backend (distilbert or lexicon)
    #[arg(short, long, env = "REVIEWSENSE_BACKEND")]
    pub backend: Option<ClassifierBackend>,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ModelArgs {
    /// HuggingFace model repository
    #[arg(short, long, env = "REVIEWSENSE_MODEL", conflicts_with = "model_path")]
    pub model: Option<String>,

    /// Local directory with config.json, model.safetensors and a tokenizer
    #[arg(long, env = "REVIEWSENSE_MODEL_PATH")]
    pub model_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["reviewsense"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, "reviewsense.yaml");
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from([
            "reviewsense",
            "serve",
            "--port",
            "9000",
            "--backend",
            "lexicon",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.backend, Some(ClassifierBackend::Lexicon));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_model_and_path_conflict() {
        let result = Cli::try_parse_from([
            "reviewsense",
            "download-model",
            "--model",
            "a/b",
            "--model-path",
            "/tmp/model",
        ]);
        assert!(result.is_err());
    }
}
