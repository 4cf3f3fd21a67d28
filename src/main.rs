//! Picobot CLI - Evolve a rule table from JSON configuration.

use std::fs;
use std::path::PathBuf;

use picobot::compute::evolution::{EvolutionEngine, save_program};
use picobot::schema::EvolutionConfig;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [output.txt]", args[0]);
        eprintln!();
        eprintln!("Evolve a Picobot program from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to evolution configuration file");
        eprintln!("  output.txt   Where to save the best program (default: best.txt)");
        eprintln!();
        eprintln!("Example configuration is printed with the --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let output_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("best.txt"));

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: EvolutionConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    println!("Picobot Evolution");
    println!("=================");
    println!(
        "Room: {}x{} ({} states)",
        config.world.width, config.world.height, config.world.num_states
    );
    println!(
        "Population: {} ({} elite + {} offspring), {} generations",
        config.population.size,
        config.reproduction.elite_count,
        config.reproduction.offspring_count,
        config.population.max_generations
    );
    println!(
        "Evaluation: {} trials x {} steps",
        config.evaluation.trials, config.evaluation.steps
    );
    println!();

    let mut engine = EvolutionEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    let result = engine
        .run_with_callback(|report| {
            println!("Generation {}", report.stats.generation);
            println!("Average fitness: {:.6}", report.stats.avg_fitness);
            println!("Best fitness: {:.6}", report.stats.max_fitness);
        })
        .unwrap_or_else(|e| {
            eprintln!("Evolution failed: {}", e);
            std::process::exit(1);
        });

    println!();
    println!("Best program (fitness {:.6}):", result.best.fitness);
    print!("{}", result.best.program);

    if let Err(e) = save_program(&output_path, &result.best.program) {
        eprintln!("Error writing {}: {}", output_path.display(), e);
        std::process::exit(1);
    }

    println!();
    println!("Saved to {}", output_path.display());
    println!(
        "Time: {:.2}s ({:.1} evaluations/s)",
        result.stats.elapsed_seconds, result.stats.evaluations_per_second
    );
}

fn print_example_config() {
    let config = EvolutionConfig::default();

    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
