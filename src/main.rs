use anyhow::{anyhow, Context, Result};
use dinacrab::{Authenticator, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let mut first_args = std::env::args().take(3);
    let (program_name, config_file, action) = (
        first_args.next().unwrap_or("dinacrab".to_string()),
        first_args.next(),
        first_args.next(),
    );

    let (config_file, action) = match (config_file, action) {
        (Some(config_file), Some(action)) => (config_file, action),
        _ => return Err(usage(&program_name)),
    };

    let config = Config::try_from_file(&config_file)
        .with_context(|| format!("loading config from {config_file}"))?;
    tracing::debug!("loaded config from {config_file}");

    let domain = std::env::var("CERTBOT_DOMAIN").context("CERTBOT_DOMAIN is not set")?;
    let validation =
        std::env::var("CERTBOT_VALIDATION").context("CERTBOT_VALIDATION is not set")?;
    let validation_name = Authenticator::validation_name(&domain);
    let authenticator = config.authenticator().await?;

    match action.as_str() {
        "auth" => {
            tracing::info!("creating challenge record {validation_name}");
            authenticator
                .perform(&domain, &validation_name, &validation)
                .await?;
            authenticator.wait_for_propagation().await;
        }
        "cleanup" => {
            tracing::info!("removing challenge record {validation_name}");
            authenticator
                .cleanup(&domain, &validation_name, &validation)
                .await?;
        }
        _ => return Err(usage(&program_name)),
    }
    tracing::info!("done");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dinacrab=info".into()),
        )
        .init();
}

fn usage(program_name: &str) -> anyhow::Error {
    anyhow!("usage: {program_name} /path/to/config.json <auth|cleanup>")
}
