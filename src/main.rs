use dotenv::dotenv;
use slidepath::SearchLimits;
use slidepath::infra::{BatchOptions, DefaultObserver, solve_folder, write_solutions};
use std::env;
use std::path::Path;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn get_env_var_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|val| val.parse::<usize>().ok())
}

fn get_env_var_bool(key: &str) -> bool {
    env::var(key)
        .ok()
        .and_then(|val| val.parse::<bool>().ok())
        .unwrap_or(false)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("slidepath=info,warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let maps_folder = env::var("SLIDEPATH_MAPS_FOLDER")
        .map_err(|_| "SLIDEPATH_MAPS_FOLDER environment variable is required")?;
    let map = env::var("SLIDEPATH_MAP").ok();
    let output_folder = env::var("SLIDEPATH_OUTPUT_FOLDER").ok();
    let show_map = get_env_var_bool("SLIDEPATH_SHOW_MAP");
    let options = BatchOptions {
        force_switch_off: get_env_var_bool("SLIDEPATH_FORCE_SWITCH_OFF"),
        limits: SearchLimits {
            max_expansions: get_env_var_usize("SLIDEPATH_MAX_EXPANSIONS"),
        },
    };

    let folder = Path::new(&maps_folder);
    if !folder.is_dir() {
        return Err(format!("maps folder {:?} does not exist", maps_folder).into());
    }

    tracing::info!("Solving maps in {}", folder.display());
    if options.force_switch_off {
        tracing::info!("Switches held off");
    }

    let mut observer = DefaultObserver::new(show_map);
    let solutions = solve_folder(folder, map.as_deref(), options, &mut observer)?;

    match output_folder {
        Some(output) => {
            let written = write_solutions(Path::new(&output), &solutions)?;
            tracing::info!("Solutions written to {}", written.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&solutions)?),
    }

    Ok(())
}
