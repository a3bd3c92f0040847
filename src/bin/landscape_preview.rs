use clap::Parser;
use landscape::{Config, Landscape, LandscapeResult, Square};

/// Generate a landscape and print it as an ASCII map.
#[derive(Parser, Debug)]
#[command(name = "landscape_preview")]
struct Args {
    /// Grid width in squares
    #[arg(long, default_value_t = 32)]
    size_x: i32,

    /// Grid depth in squares
    #[arg(long, default_value_t = 32)]
    size_y: i32,

    /// Seed for the generation run
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Largest height magnitude (both up and down)
    #[arg(long, default_value_t = 4)]
    max_height: i32,

    /// Largest allowed height step between playable squares
    #[arg(long, default_value_t = 2)]
    max_height_difference: i32,

    /// Upper bound for rolled patch sizes
    #[arg(long, default_value_t = 40)]
    max_patch_size: i32,

    /// Baseline number of patch-growth attempts
    #[arg(long, default_value_t = 30)]
    changes_count: i32,
}

fn main() -> LandscapeResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::new(
        args.max_height,
        args.max_height_difference,
        args.max_patch_size,
        args.changes_count,
    )?;
    let mut landscape = Landscape::new(args.size_x, args.size_y, config)?;

    println!(
        "Generating {}x{} landscape (seed {})",
        args.size_x, args.size_y, args.seed
    );
    landscape.generate(args.seed);

    // highest rows first so north points up
    let mut playable = 0usize;
    let mut rock = 0usize;
    for y in (0..landscape.size_y()).rev() {
        let mut row = String::with_capacity(landscape.size_x() as usize);
        for x in 0..landscape.size_x() {
            row.push(match landscape.square_height(x, y)? {
                Square::Playable(height) => {
                    playable += 1;
                    height_glyph(height)
                }
                Square::Unplayable => {
                    rock += 1;
                    '#'
                }
            });
        }
        println!("{row}");
    }

    let total = playable + rock;
    println!(
        "{playable}/{total} squares playable, {rock} rock ({:.1}%)",
        rock as f64 * 100.0 / total as f64
    );
    Ok(())
}

/// One character per square: digits for heights >= 0, letters below ground.
fn height_glyph(height: i32) -> char {
    if height >= 0 {
        char::from_digit((height as u32).min(9), 10).unwrap_or('9')
    } else {
        char::from_u32('a' as u32 + (-height as u32 - 1).min(25)).unwrap_or('z')
    }
}
