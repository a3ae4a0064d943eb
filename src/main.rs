use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::fs;
use std::sync::Arc;

use seoscan_analysis::{
    ParallelSeoAnalyzer, ProductTransformer, RawProduct, SimplifiedAnalyzer, StructuredModel,
};
use seoscan_core::BrandContext;
use seoscan_watsonx::WatsonxClient;

#[derive(Parser)]
#[command(name = "seoscan")]
#[command(about = "AI-powered SEO analysis for Shopify product catalogs", long_about = None)]
struct Cli {
    /// Path to a JSON file containing an array of raw product records
    #[arg(short, long)]
    products: String,

    /// Skip the model backend and score with heuristics only
    #[arg(long)]
    offline: bool,

    /// Print aggregate numbers instead of per-product suggestions
    #[arg(long)]
    summary: bool,

    /// Brand name injected into analysis prompts
    #[arg(long)]
    brand_name: Option<String>,

    /// Brand tone injected into analysis prompts
    #[arg(long)]
    tone: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.products)
        .with_context(|| format!("failed to read {}", cli.products))?;
    let products: Vec<RawProduct> =
        serde_json::from_str(&raw).context("failed to parse product JSON")?;

    let brand = match (cli.brand_name, cli.tone) {
        (Some(brand_name), tone) => Some(BrandContext {
            brand_name,
            tone: tone.unwrap_or_else(|| "professional".to_string()),
            ..Default::default()
        }),
        _ => None,
    };

    let model = if cli.offline {
        None
    } else {
        match connect_model().await {
            Ok(model) => Some(model),
            Err(e) => {
                println!(
                    "{} Model backend unavailable: {}. Continuing with heuristic scoring.",
                    "⚠️".yellow(),
                    e
                );
                None
            }
        }
    };

    if cli.summary {
        print_summary(&products, model, brand).await;
    } else {
        print_analyses(&products, model, brand).await;
    }

    Ok(())
}

async fn connect_model() -> Result<Arc<dyn StructuredModel>> {
    let mut client = WatsonxClient::from_env()?;
    client.connect().await?;
    Ok(Arc::new(client))
}

async fn print_summary(
    products: &[RawProduct],
    model: Option<Arc<dyn StructuredModel>>,
    brand: Option<BrandContext>,
) {
    let mut analyzer = match model {
        Some(model) => ParallelSeoAnalyzer::with_model(model),
        None => ParallelSeoAnalyzer::new(),
    };
    if let Some(brand) = brand {
        analyzer = analyzer.with_brand_context(brand);
    }

    let transformer = ProductTransformer::new();
    let inputs: Vec<_> = products.iter().map(|p| transformer.transform(p)).collect();
    let results = analyzer.analyze_multiple_products(&inputs).await;
    let summary = ParallelSeoAnalyzer::analysis_summary(&results);

    println!("{}", "📊 Scan summary".bold());
    println!("  Products analyzed:       {}", results.len());
    println!("  Average score:           {}", score_colored(summary.average_score));
    println!("  Total suggestions:       {}", summary.total_suggestions);
    println!("  High priority:           {}", summary.high_priority_suggestions);
    println!("  Analysis time:           {}ms", summary.analysis_time_ms);
}

async fn print_analyses(
    products: &[RawProduct],
    model: Option<Arc<dyn StructuredModel>>,
    brand: Option<BrandContext>,
) {
    let mut facade = match model {
        Some(model) => SimplifiedAnalyzer::with_model(model),
        None => SimplifiedAnalyzer::new(),
    };
    if let Some(brand) = brand {
        facade = facade.with_brand_context(brand);
    }

    let analyses = facade.analyze_products_simplified(products).await;

    for analysis in &analyses {
        println!(
            "\n{} {} ({})",
            score_colored(analysis.overall_score),
            analysis.title.bold(),
            analysis.handle.dimmed()
        );
        for suggestion in &analysis.suggestions {
            let priority = match suggestion.suggestion.priority {
                seoscan_analysis::Priority::High => "high".red(),
                seoscan_analysis::Priority::Medium => "medium".yellow(),
                seoscan_analysis::Priority::Low => "low".green(),
            };
            println!(
                "  [{}] {} {} - {}",
                suggestion.score,
                priority,
                suggestion.suggestion.field.bold(),
                suggestion.suggestion.reason
            );
            println!("      {} {}", "→".green(), suggestion.suggestion.suggested);
        }
        if analysis.suggestions.is_empty() {
            println!("  {}", "No suggestions - looking good.".green());
        }
    }
}

fn score_colored(score: i32) -> ColoredString {
    let text = format!("{:>3}", score);
    if score >= 80 {
        text.green()
    } else if score >= 60 {
        text.yellow()
    } else {
        text.red()
    }
}
