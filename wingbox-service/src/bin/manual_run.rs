#[path = "../config.rs"]
mod config;
#[path = "../executor.rs"]
mod executor;
#[path = "../generator.rs"]
mod generator;
#[path = "../models.rs"]
mod models;

use std::path::PathBuf;

use config::ServiceConfig;
use executor::SolverExecutor;
use generator::{write_atomic, BulkDataGenerator};
use models::AnalysisRequest;
use uuid::Uuid;
use wingbox_core::pipeline::Pipeline;

const USAGE: &str = "usage: manual_run <request.json> [output.bdf] [--run]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let run = args.iter().any(|a| a == "--run");
    let mut paths = args.iter().filter(|a| !a.starts_with("--"));
    let request_path = paths.next().ok_or(USAGE)?;
    let deck_path = paths
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("wingbox.bdf"));

    let json = std::fs::read_to_string(request_path)?;
    let request: AnalysisRequest = serde_json::from_str(&json)?;

    let config = ServiceConfig::from_env();
    let resolver = config.load_materials()?;
    let mut output = Pipeline::new(&resolver).run(&request.input)?;
    if let Some(title) = request.title {
        output.model.title = title;
    }

    let deck = BulkDataGenerator::new().generate(&output.model)?;
    write_atomic(&deck_path, &deck)?;
    eprintln!("Wrote {:?}", deck_path);
    println!("{}", serde_json::to_string_pretty(&output.model.summary())?);

    if run {
        let executor = SolverExecutor::new(config.solver);
        let results = executor.execute(&Uuid::new_v4(), &deck, &output.model).await?;
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    Ok(())
}
