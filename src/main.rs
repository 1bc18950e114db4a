use std::process::exit;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::Parser;

use linesense::camera::{PatternSource, Resolution};
use linesense::cli::{Args, Command, ConfigAction};
use linesense::config::{self, Config};
use linesense::pipeline;
use linesense::serial::{SerialSink, WriterSink};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Some(Command::Config { action }) = &args.command {
        handle_config_command(action, &args);
        return;
    }

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };
    if let Some(size) = args.size {
        config.camera.width = size.width;
        config.camera.height = size.height;
    }
    if let Some(fps) = args.fps {
        config.camera.fps = fps;
    }
    if let Some(path) = &args.serial {
        config.serial.path = Some(path.clone());
    }

    let resolution = Resolution {
        width: config.camera.width,
        height: config.camera.height,
    };
    let source = Box::new(PatternSource::new(resolution));

    let sink: Box<dyn SerialSink> = match &config.serial.path {
        Some(path) => match WriterSink::open(path) {
            Ok(sink) => {
                log::info!("transmitting on {}", path.display());
                Box::new(sink)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                exit(1);
            }
        },
        None => {
            log::info!("no serial device configured, writing to stdout");
            Box::new(WriterSink::stdout())
        }
    };

    let mut handle = pipeline::spawn(config.pipeline_settings(), source, sink);
    log::info!("pipeline running at {} ({} Hz)", resolution, config.camera.fps);

    let stop = handle.stop_flag();
    if let Err(e) = ctrlc::set_handler(move || {
        stop.store(true, Ordering::SeqCst);
    }) {
        eprintln!("Warning: Could not set up Ctrl+C handler: {}", e);
    }

    // Park until ctrl-c flips the flag, then join the workers
    let stop = handle.stop_flag();
    while !stop.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }
    log::info!("shutting down");
    handle.stop();
}

fn handle_config_command(action: &ConfigAction, args: &Args) {
    match action {
        ConfigAction::Show => match Config::load(args.config.as_deref()) {
            Ok(config) => println!("{:#?}", config),
            Err(e) => {
                eprintln!("Error: {}", e);
                exit(1);
            }
        },
        ConfigAction::Init => {
            let path = args.config.clone().unwrap_or_else(config::default_path);
            if path.exists() {
                eprintln!("Config file already exists at {}", path.display());
                exit(1);
            }
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating {}: {}", parent.display(), e);
                    exit(1);
                }
            }
            match std::fs::write(&path, config::DEFAULT_CONFIG_TEMPLATE) {
                Ok(()) => println!("Created {}", path.display()),
                Err(e) => {
                    eprintln!("Error writing {}: {}", path.display(), e);
                    exit(1);
                }
            }
        }
    }
}
