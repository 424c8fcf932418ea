use limnos_core::{Algorithm, GeneratorConfig};
use limnos_host::{generate_maze, load_config, load_maze, save_maze, verify_maze, MazeArtifact};
use std::env;
use std::time::Instant;

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("🧭 Limnos Maze Generator");
    println!("{}", "=".repeat(70));
    println!();

    // Parse CLI arguments
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "generate" => {
            if args.len() < 4 {
                eprintln!(
                    "Usage: {} generate <width> <height> [--algorithm <a>] [--seed <n>] [--config <file>] [output_file]",
                    args[0]
                );
                std::process::exit(1);
            }

            let width = parse_dimension(&args[2], "width");
            let height = parse_dimension(&args[3], "height");

            let mut algorithm = Algorithm::default();
            let mut seed: Option<u32> = None;
            let mut config = GeneratorConfig::default();
            let mut output_file = None;

            let mut i = 4;
            while i < args.len() {
                match args[i].as_str() {
                    "--algorithm" => {
                        let value = flag_value(&args, i, "sprouting|wilsons");
                        algorithm = value.parse().unwrap_or_else(|e| {
                            eprintln!("❌ Error: {}", e);
                            std::process::exit(1);
                        });
                        i += 2;
                    }
                    "--seed" => {
                        let value = flag_value(&args, i, "an integer seed");
                        seed = Some(value.parse().unwrap_or_else(|_| {
                            eprintln!(
                                "❌ Error: Invalid seed '{}'. Must be a positive integer.",
                                value
                            );
                            std::process::exit(1);
                        }));
                        i += 2;
                    }
                    "--config" => {
                        let value = flag_value(&args, i, "a JSON config file");
                        config = load_config(value).unwrap_or_else(|e| {
                            eprintln!("❌ Error loading config '{}': {}", value, e);
                            std::process::exit(1);
                        });
                        i += 2;
                    }
                    other if output_file.is_none() && !other.starts_with("--") => {
                        output_file = Some(other.to_string());
                        i += 1;
                    }
                    other => {
                        eprintln!("❌ Error: Unexpected argument '{}'", other);
                        std::process::exit(1);
                    }
                }
            }

            let seed = seed.unwrap_or_else(clock_seed);
            generate_command(width, height, algorithm, seed, &config, output_file.as_deref());
        }

        "verify" => {
            if args.len() < 3 {
                eprintln!("Usage: {} verify <maze_file> [--config <file>]", args[0]);
                eprintln!("Error: Missing required argument");
                std::process::exit(1);
            }

            let maze_file = &args[2];

            let mut config = GeneratorConfig::default();
            if args.len() > 3 && args[3] == "--config" {
                let value = flag_value(&args, 3, "a JSON config file");
                config = load_config(value).unwrap_or_else(|e| {
                    eprintln!("❌ Error loading config '{}': {}", value, e);
                    std::process::exit(1);
                });
            }

            verify_command(maze_file, &config);
        }

        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  generate <width> <height> [--algorithm <a>] [--seed <n>] [--config <file>] [output_file]");
    eprintln!("      Generate a maze and save it as JSON");
    eprintln!("      - width, height: Grid size in cells (at least 1)");
    eprintln!("      - --algorithm: sprouting|wilsons");
    eprintln!("                     Default: wilsons");
    eprintln!("      - --seed: Integer seed; defaults to one taken from the clock");
    eprintln!("      - --config: Optional JSON file of generator tunables");
    eprintln!("      - output_file: Optional file to save the maze (JSON)");
    eprintln!("                     Defaults to: <seed>_maze.json");
    eprintln!();
    eprintln!("  verify <maze_file> [--config <file>]");
    eprintln!("      Check a saved maze and regenerate it from its seed");
    eprintln!("      - maze_file: JSON file written by 'generate'");
    eprintln!("      - --config: Must match the config used to generate the maze");
    eprintln!();
    eprintln!("Algorithms:");
    eprintln!("  sprouting: Randomised solution path plus sprouted branches (fast)");
    eprintln!("  wilsons:   Loop-erased random walks; uniform over all mazes");
    eprintln!();
    eprintln!("Example workflow:");
    eprintln!("  1. Generate maze: {} generate 20 20 --seed 2918957128", program);
    eprintln!("     (saves to 2918957128_maze.json)");
    eprintln!("  2. Verify maze:   {} verify 2918957128_maze.json", program);
}

fn parse_dimension(value: &str, name: &str) -> usize {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            eprintln!("❌ Error: Invalid {} '{}'. Must be a positive integer.", name, value);
            std::process::exit(1);
        }
    }
}

fn flag_value<'a>(args: &'a [String], idx: usize, expected: &str) -> &'a str {
    match args.get(idx + 1) {
        Some(value) => value,
        None => {
            eprintln!("❌ Error: {} requires a value ({})", args[idx], expected);
            std::process::exit(1);
        }
    }
}

fn clock_seed() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn generate_command(
    width: usize,
    height: usize,
    algorithm: Algorithm,
    seed: u32,
    config: &GeneratorConfig,
    output_file: Option<&str>,
) {
    println!("📋 Generating maze");
    println!("  Size: {}x{} cells", width, height);
    println!("  Algorithm: {}", algorithm);
    println!("  Seed: {}", seed);
    println!();

    let start = Instant::now();

    match generate_maze(width, height, algorithm, seed, config) {
        Ok(maze) => {
            let duration = start.elapsed();
            println!("  Generation time: {:.3}s", duration.as_secs_f64());
            println!();
            print_summary(&maze);
            println!();

            // Use default filename pattern if no output file specified
            let default_filename = format!("{}_maze.json", seed);
            let file_to_save = output_file.unwrap_or(&default_filename);

            match save_maze(&maze, file_to_save) {
                Ok(_) => {
                    println!("💾 Maze saved to: {}", file_to_save);
                    println!("   Use 'verify {}' to check it against its seed", file_to_save);
                }
                Err(e) => {
                    eprintln!("❌ Error saving maze: {}", e);
                    std::process::exit(1);
                }
            }

            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            eprintln!();
            eprintln!("❌ Error generating maze: {}", e);
            eprintln!("{}", "=".repeat(70));
            std::process::exit(1);
        }
    }
}

fn verify_command(maze_file: &str, config: &GeneratorConfig) {
    println!("📋 Verifying maze");
    println!("  Maze file: {}", maze_file);
    println!();

    let maze = match load_maze(maze_file) {
        Ok(maze) => maze,
        Err(e) => {
            eprintln!("❌ Error loading maze: {}", e);
            std::process::exit(1);
        }
    };

    println!("📦 Loaded maze (seed: {}, algorithm: {})", maze.seed, maze.algorithm);
    println!();

    let start = Instant::now();

    match verify_maze(&maze, config) {
        Ok(()) => {
            let duration = start.elapsed();
            println!("  Verification time: {:.3}s", duration.as_secs_f64());
            println!();
            println!("✅ Maze verified!");
            println!();
            println!("The maze file satisfies that:");
            println!("  1. Every cell is reachable by exactly one corridor");
            println!("  2. The solution path runs from start to finish");
            println!("  3. No wall blocks a corridor");
            println!("  4. The maze was generated from seed {}", maze.seed);
            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            eprintln!();
            eprintln!("❌ Maze verification failed: {}", e);
            eprintln!();
            eprintln!("This could mean:");
            eprintln!("  - The maze file was edited by hand");
            eprintln!("  - It was generated with a different config");
            eprintln!("  - The file is corrupted");
            eprintln!("{}", "=".repeat(70));
            std::process::exit(1);
        }
    }
}

fn print_summary(maze: &MazeArtifact) {
    println!("✅ Maze generated successfully!");
    println!("  Grid size: {}x{} cells", maze.width, maze.height);
    println!("  Solution path: {} cells", maze.solution_length());
    println!("  Corridors: {}", maze.trails.route_count());
    println!("  Walls: {}", maze.walls.len());
}
