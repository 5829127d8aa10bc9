use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use eyre::Result;
use log::{error, info};

use ytquiz::config::{self, Config};
use ytquiz::{GeminiClient, Pipeline, PipelineOptions, YouTubeClient, chunk, gemini, output, quiz};

mod cli;

use cli::Cli;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytquiz.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytquiz")
        .join("logs")
}

fn build_after_help() -> String {
    let key_line = match std::env::var(config::API_KEY_VAR) {
        Ok(v) if !v.trim().is_empty() => format!("  \x1b[32m✅\x1b[0m {}", config::API_KEY_VAR),
        _ => format!(
            "  \x1b[31m❌\x1b[0m {}     (not set; export it or add it to ./.env)",
            config::API_KEY_VAR
        ),
    };

    format!(
        "\nCREDENTIALS:\n{key_line}\n\nConfig file: {}\nLogs are written to: {}",
        config::config_path().display(),
        log_dir().join("ytquiz.log").display()
    )
}

fn prompt_for_url() -> io::Result<String> {
    println!("Enter YouTube video URL:");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn run(cli: Cli, config: Config) -> ytquiz::Result<()> {
    // Credential is checked before anything is asked of the user
    let api_key = config::api_key_from_env()?;

    let lang = cli.lang.or(config.default_lang.clone()).unwrap_or_else(|| "en".to_string());
    let model = cli
        .model
        .or(config.default_model.clone())
        .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string());
    let options = PipelineOptions {
        chunk_words: cli
            .chunk_words
            .map(|n| n as usize)
            .or(config.chunk_words())
            .unwrap_or(chunk::DEFAULT_CHUNK_WORDS),
        quiz_questions: cli
            .questions
            .map(|n| n as usize)
            .or(config.quiz_questions())
            .unwrap_or(quiz::DEFAULT_QUESTIONS),
        combine_summaries: cli.combine,
    };

    if cli.verbose {
        eprintln!("Model: {model}\nLanguage: {lang}\nOptions: {options:?}");
    }

    let url = match cli.url {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    let client = reqwest::Client::new();
    let provider = YouTubeClient::new(client.clone(), lang);
    let generator = GeminiClient::new(client, api_key, model).with_temperature(config.temperature);
    let pipeline = Pipeline::new(provider, generator, options);

    let report = pipeline.run(&url, &mut io::stdout()).await?;
    let rendered = output::render_report(&report).map_err(|e| ytquiz::Error::QuizGeneration(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup_logging()?;
    config::load_dotenv();

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Ignoring config file: {e}");
            Config::default()
        }
    };

    if cli.verbose {
        let config_path = config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
    }

    if let Err(e) = run(cli, config).await {
        error!("{e:?}");
        eprintln!("{e}");
        std::process::exit(1);
    }

    Ok(())
}
