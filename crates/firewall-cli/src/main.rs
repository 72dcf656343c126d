use clap::{Parser, Subcommand, ValueEnum};
use firewall_cli::error::{CliError, Result};
use firewall_cli::reporters::{print_json, print_result, print_sarif, print_summary};
use firewall_cli::ssrf::validate_url;
use firewall_core::{FirewallConfig, ValidationResult, load_config};
use firewall_pipeline::{ValidationPipeline, validate_llm_output};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "firewall", version = VERSION, about = "AI Hallucination Firewall — validates AI-generated code against real sources")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Terminal,
    Json,
    Sarif,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LanguageArg {
    Python,
    Javascript,
    Typescript,
}

#[derive(Subcommand)]
enum Command {
    /// Validate code files for hallucinated APIs, wrong signatures, and more.
    Check {
        files: Vec<PathBuf>,
        #[arg(long)]
        stdin: bool,
        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Terminal)]
        output_format: OutputFormat,
        #[arg(short, long, value_enum)]
        language: Option<LanguageArg>,
    },
    /// Parse and validate code blocks from LLM markdown output.
    Parse {
        file: Option<PathBuf>,
        #[arg(long = "stdin")]
        use_stdin: bool,
        #[arg(long)]
        url: Option<String>,
        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Terminal)]
        output_format: OutputFormat,
    },
    /// Start the validation API server.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Create a .firewall.toml config file in the current directory.
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting firewall v{VERSION}");

    let cli = Cli::parse();

    let exit_code = match run(cli.command).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    };
    std::process::exit(exit_code);
}

async fn run(command: Command) -> Result<i32> {
    match command {
        Command::Check {
            files,
            stdin,
            output_format,
            language,
        } => check(files, stdin, output_format, language).await,
        Command::Parse {
            file,
            use_stdin,
            url,
            output_format,
        } => parse(file, use_stdin, url, output_format).await,
        Command::Serve { host, port } => serve(host, port).await,
        Command::Init => init(),
    }
}

async fn check(
    files: Vec<PathBuf>,
    stdin: bool,
    output_format: OutputFormat,
    language: Option<LanguageArg>,
) -> Result<i32> {
    if files.is_empty() && !stdin {
        return Err(CliError::NoInput);
    }

    let config = load_config(None).map_err(firewall_pipeline::PipelineError::from)?;
    let pipeline = ValidationPipeline::new(Some(config))?;

    let mut results = Vec::new();
    if stdin {
        let mut code = String::new();
        std::io::stdin().read_to_string(&mut code)?;
        let ext = match language {
            Some(LanguageArg::Python) | None => "py",
            Some(LanguageArg::Javascript) => "js",
            Some(LanguageArg::Typescript) => "ts",
        };
        results.push(pipeline.validate_code(&code, &format!("<stdin>.{ext}")).await);
    } else {
        for file in &files {
            let path = file.to_string_lossy().to_string();
            results.push(pipeline.validate_file(&path).await?);
        }
    }
    pipeline.close().await?;

    render(&results, output_format);

    Ok(i32::from(results.iter().any(|r| !r.passed)))
}

async fn parse(
    file: Option<PathBuf>,
    use_stdin: bool,
    url: Option<String>,
    output_format: OutputFormat,
) -> Result<i32> {
    let markdown = read_parse_input(file, use_stdin, url).await?;
    let report = validate_llm_output(&markdown, None).await?;

    match output_format {
        OutputFormat::Json => print_json(&report.results),
        OutputFormat::Sarif => print_sarif(&report.results),
        OutputFormat::Terminal => {
            println!("\nLLM Output Validation Report");
            println!("Total blocks: {}", report.total_blocks);
            println!("Passed: {}", report.blocks_passed);
            println!("Failed: {}", report.blocks_failed);
            println!();
            for result in &report.results {
                print_result(result);
            }
        }
    }

    Ok(i32::from(!report.passed()))
}

async fn read_parse_input(
    file: Option<PathBuf>,
    use_stdin: bool,
    url: Option<String>,
) -> Result<String> {
    if use_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    if let Some(url) = url {
        let validated = validate_url(&url)?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|source| CliError::Fetch { url: url.clone(), source })?;
        let response = client
            .get(validated)
            .send()
            .await
            .map_err(|source| CliError::Fetch { url: url.clone(), source })?;
        return response
            .text()
            .await
            .map_err(|source| CliError::Fetch { url, source });
    }
    if let Some(file) = file {
        return Ok(tokio::fs::read_to_string(file).await?);
    }
    Err(CliError::NoInput)
}

async fn serve(host: String, port: u16) -> Result<i32> {
    let config = load_config(None).map_err(firewall_pipeline::PipelineError::from)?;
    let pipeline = ValidationPipeline::new(Some(config))?;
    let router = firewall_cli::server::build_router(pipeline);

    let addr = format!("{host}:{port}");
    tracing::info!(%addr, "starting firewall API server");
    println!("Starting firewall API server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;
    Ok(0)
}

fn init() -> Result<i32> {
    let config_path = std::env::current_dir()?.join(".firewall.toml");
    if config_path.exists() {
        println!("Config file already exists");
        return Ok(0);
    }

    let default = FirewallConfig::default();
    let contents = format!(
        "[firewall]\n\
         languages = [\"python\", \"javascript\"]\n\
         severity_threshold = \"warning\"\n\
         cache_ttl_seconds = {}\n\
         output_format = \"terminal\"\n\
         \n\
         [firewall.registries]\n\
         pypi_enabled = {}\n\
         npm_enabled = {}\n\
         timeout_seconds = {}\n",
        default.cache_ttl_seconds,
        default.registries.pypi_enabled,
        default.registries.npm_enabled,
        default.registries.timeout_seconds,
    );
    std::fs::write(&config_path, contents)?;
    println!("Created {}", config_path.display());
    Ok(0)
}

fn render(results: &[ValidationResult], output_format: OutputFormat) {
    match output_format {
        OutputFormat::Json => print_json(results),
        OutputFormat::Sarif => print_sarif(results),
        OutputFormat::Terminal => {
            for result in results {
                print_result(result);
            }
            if results.len() > 1 {
                print_summary(results);
            }
        }
    }
}
