//! fhir-tutorial: create one patient, then page through the patient list.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fhir_client::{CollectOptions, Config, FhirClient, collect_patients, create_patient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        server = %config.server_url,
        timeout_secs = config.timeout.as_secs(),
        "Using FHIR server"
    );

    let client = FhirClient::new(&config)?;

    create_patient(&client, "Juan", "Perez").await?;

    let collection = collect_patients(&client, &CollectOptions::default()).await?;
    println!("Found {} patients!", collection.len());

    Ok(())
}
