//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::camera::Resolution;

/// Parse and validate a frame size (WIDTHxHEIGHT format).
pub fn parse_size(s: &str) -> Result<Resolution, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid size format '{}'. Use WIDTHxHEIGHT (e.g., 160x120)",
            s
        ));
    }
    let width: u32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid width '{}' in size", parts[0]))?;
    let height: u32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid height '{}' in size", parts[1]))?;
    if width == 0 || height == 0 {
        return Err("Size width and height must be greater than 0".to_string());
    }
    Ok(Resolution { width, height })
}

/// Line-following sensing pipeline: camera frames in, steering angle out
/// over serial
#[derive(Parser, Debug)]
#[command(name = "linesense")]
#[command(version, about = "Line-following sensing pipeline", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Serial device to transmit on (e.g. /dev/ttyUSB0); stdout when omitted
    #[arg(long, short)]
    pub serial: Option<PathBuf>,

    /// Frame size (WIDTHxHEIGHT)
    #[arg(long, value_parser = parse_size)]
    pub size: Option<Resolution>,

    /// Acquisition loop rate in Hz
    #[arg(long)]
    pub fps: Option<u32>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Create a default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_valid() {
        assert_eq!(
            parse_size("160x120"),
            Ok(Resolution {
                width: 160,
                height: 120
            })
        );
    }

    #[test]
    fn test_parse_size_rejects_bad_format() {
        assert!(parse_size("160").is_err());
        assert!(parse_size("axb").is_err());
        assert!(parse_size("160x0").is_err());
        assert!(parse_size("0x120").is_err());
    }

    #[test]
    fn test_args_parse_defaults() {
        let args = Args::parse_from(["linesense"]);
        assert!(args.command.is_none());
        assert!(args.serial.is_none());
        assert!(args.size.is_none());
    }

    #[test]
    fn test_args_parse_overrides() {
        let args = Args::parse_from([
            "linesense",
            "--serial",
            "/dev/ttyUSB0",
            "--size",
            "320x240",
            "--fps",
            "50",
        ]);
        assert_eq!(args.serial, Some(PathBuf::from("/dev/ttyUSB0")));
        assert_eq!(
            args.size,
            Some(Resolution {
                width: 320,
                height: 240
            })
        );
        assert_eq!(args.fps, Some(50));
    }

    #[test]
    fn test_args_parse_config_subcommand() {
        let args = Args::parse_from(["linesense", "config", "init"]);
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Init
            })
        ));
    }
}
