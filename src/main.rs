use papergen::engine::paper_generation;
use papergen::error::PaperError;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    let started = Instant::now();
    match paper_generation(&config_path) {
        Ok(result) => {
            println!("=== final selection ===");
            for q in &result.chosen {
                println!("[{}] id={} | diff={}", q.content_type, q.id, q.difficulty);
            }
            println!("\n{}", result.stats);
            println!(
                "status: {:?} | solve {:.3}s | total {:.3}s",
                result.status,
                result.solve_time.as_secs_f64(),
                started.elapsed().as_secs_f64()
            );
        }
        Err(err @ (PaperError::Config(_) | PaperError::Bank(_))) => {
            eprintln!("configuration problem: {err}");
            std::process::exit(2);
        }
        Err(err @ PaperError::NoFeasibleSolution { .. }) => {
            eprintln!("paper generation failed: {err}");
            std::process::exit(1);
        }
    }
}
