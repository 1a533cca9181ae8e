use clap::Parser;
use kaidoku::prelude::*;
use std::fs;
use std::time::Instant;

/// A workflow-metadata resolution engine CLI.
///
/// Reads the workflow/prompt JSON payloads (and optionally the companion
/// parameter block) from files and prints the resolved parameter record.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the UI workflow JSON file
    #[arg(short, long)]
    workflow: Option<String>,

    /// Path to the execution prompt JSON file
    #[arg(short, long)]
    prompt: Option<String>,

    /// Path to the textual parameter block file
    #[arg(short = 'b', long)]
    parameters: Option<String>,

    /// Print the record as pretty JSON instead of a summary
    #[arg(short, long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.workflow.is_none() && cli.prompt.is_none() {
        exit_with_error("at least one of --workflow or --prompt is required");
    }

    let workflow_json = cli.workflow.map(|path| read_file(&path));
    let prompt_json = cli.prompt.map(|path| read_file(&path));
    let parameter_block = cli.parameters.map(|path| read_file(&path));

    let payload = MetadataPayload {
        workflow_json: workflow_json.as_deref(),
        prompt_json: prompt_json.as_deref(),
        parameter_block: parameter_block.as_deref(),
    };

    let start = Instant::now();
    let extractor = MetadataExtractor::new();
    let record = extractor
        .extract(&payload)
        .unwrap_or_else(|e| exit_with_error(&format!("extraction failed: {}", e)));
    let duration = start.elapsed();

    if cli.json {
        let rendered = serde_json::to_string_pretty(&record)
            .unwrap_or_else(|e| exit_with_error(&format!("could not render record: {}", e)));
        println!("{}", rendered);
        return;
    }

    println!("Resolved in {:?}", duration);
    println!("  prompt:          {}", preview(&record.prompt));
    println!("  negative prompt: {}", preview(&record.negative_prompt));
    println!("  model:           {}", record.model);
    println!("  loras:           {}", record.loras.join(", "));
    println!("  vae:             {}", record.vae);
    println!("  seed:            {}", record.seed);
    println!("  steps:           {}", record.steps);
    println!("  cfg:             {}", record.cfg);
    println!("  sampler:         {}", record.sampler_name);
    println!("  scheduler:       {}", record.scheduler);
    println!("  denoise:         {}", record.denoise);
    println!("  size:            {}x{}", record.width, record.height);
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("failed to read '{}': {}", path, e)))
}

/// First line of a possibly multi-line prompt, truncated for the summary.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > 80 {
        let head: String = line.chars().take(80).collect();
        format!("{}…", head)
    } else {
        line.to_string()
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
