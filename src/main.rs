use anyhow::{Context, Result};
use clap::Parser;
use openrouter_node::image::{load_image, load_tensor};
use openrouter_node::models::Config;
use openrouter_node::{NodeInputs, OpenRouterNode};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "openrouter-node")]
#[command(about = "Run the OpenRouter completion node once and print its output")]
struct CliArgs {
    /// Prompt text sent as the user message.
    #[arg(short, long, default_value = "")]
    prompt: String,

    /// Optional system prompt.
    #[arg(short, long, default_value = "")]
    system_prompt: String,

    /// Chat-completion endpoint URL [env: OPENROUTER_BASE_URL]
    #[arg(long)]
    base_url: Option<String>,

    /// Model identifier [env: OPENROUTER_MODEL]
    #[arg(short, long)]
    model: Option<String>,

    /// API key sent as a bearer token [env: OPENROUTER_API_KEY]
    #[arg(long)]
    api_key: Option<String>,

    #[arg(short, long, default_value_t = 0.7, value_parser = parse_temperature)]
    temperature: f64,

    /// Keep <think>...</think> blocks in the output.
    #[arg(long)]
    keep_think: bool,

    /// Image file to attach.
    #[arg(long, conflicts_with = "tensor")]
    image: Option<PathBuf>,

    /// JSON pixel tensor ({"shape": [...], "data": [...]}) to attach.
    #[arg(long)]
    tensor: Option<PathBuf>,

    /// Print the node definition as JSON and exit.
    #[arg(long)]
    describe: bool,
}

fn parse_temperature(input: &str) -> std::result::Result<f64, String> {
    let value: f64 = input
        .parse()
        .map_err(|_| format!("Invalid temperature '{}'", input))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "Temperature {} out of range. Expected 0.0 to 1.0",
            value
        ))
    }
}

fn build_inputs(args: CliArgs, config: Config) -> Result<NodeInputs> {
    let defaults = NodeInputs::default();

    let image_input = match (&args.image, &args.tensor) {
        (Some(path), _) => Some(
            load_image(path).with_context(|| format!("Failed to load image {}", path.display()))?,
        ),
        (None, Some(path)) => Some(
            load_tensor(path)
                .with_context(|| format!("Failed to load tensor {}", path.display()))?,
        ),
        (None, None) => None,
    };

    Ok(NodeInputs {
        base_url: args
            .base_url
            .or(config.base_url)
            .unwrap_or(defaults.base_url),
        model: args.model.or(config.model).unwrap_or(defaults.model),
        api_key: args.api_key.or(config.api_key).unwrap_or_default(),
        prompt: args.prompt,
        system_prompt: args.system_prompt,
        temperature: args.temperature,
        trim_think: !args.keep_think,
        image_input,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openrouter_node=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let node = OpenRouterNode::new();

    if args.describe {
        println!("{}", serde_json::to_string_pretty(&node.definition())?);
        return Ok(());
    }

    let inputs = build_inputs(args, Config::from_env())?;
    info!("Requesting completion from {} (model: {})", inputs.base_url, inputs.model);

    println!("{}", node.get_completion(&inputs).await);
    Ok(())
}
