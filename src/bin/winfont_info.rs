//! Inspect Windows .FON bitmap fonts
//!
//! Prints short font information or draws a glyph as ASCII art.
//!
//! Usage:
//!   cargo run --bin winfont_info -- -s fonts/vgaoem.fon
//!   cargo run --bin winfont_info -- -c 65 fonts/vgaoem.fon
//!   cargo run --bin winfont_info -- -d 65 --json fonts/*.fon
//!
//! Set RUST_LOG=debug to see every header field.

use std::path::PathBuf;
use std::process::ExitCode;
use winfont::{Font, FontSummary};

const BIT_ON: &str = "\u{2588}";
const BIT_OFF: &str = " ";
const DEBUG_BIT_ON: &str = "#";
const DEBUG_BIT_OFF: &str = ".";

struct InfoConfig {
    glyph: Option<usize>,
    debug_chars: bool,
    short: bool,
    json: bool,
    paths: Vec<PathBuf>,
}

impl InfoConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut config = Self {
            glyph: None,
            debug_chars: false,
            short: false,
            json: false,
            paths: Vec::new(),
        };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                flag @ ("-c" | "-d") => {
                    i += 1;
                    let value = args
                        .get(i)
                        .ok_or_else(|| format!("{} needs a glyph number", flag))?;
                    let glyph = value
                        .parse::<usize>()
                        .map_err(|_| format!("expected number got {}", value))?;
                    config.glyph = Some(glyph);
                    config.debug_chars = flag == "-d";
                },
                "-s" => config.short = true,
                "--json" => config.json = true,
                other if other.starts_with('-') => return Err(format!("unknown option {}", other)),
                path => config.paths.push(PathBuf::from(path)),
            }
            i += 1;
        }

        if config.paths.is_empty() {
            return Err("no font paths given".to_string());
        }
        Ok(config)
    }
}

fn usage() {
    eprintln!("usage: winfont_info [-c glyph | -d glyph] [-s] [--json] fontpath ...");
}

fn print_short_info(summary: &FontSummary) {
    println!(
        "{}: {} glyphs, {}x{} px, {} byte(s)/row, {:?}, FNT {}",
        summary.face_name.as_deref().unwrap_or("<unnamed>"),
        summary.glyph_count,
        summary.width,
        summary.height,
        summary.byte_width,
        summary.charset,
        summary.version
    );
}

/// Draw one glyph, skipping the pad bits past the pixel width.
fn print_ascii_art_glyph(font: &Font, glyph: usize, on: &str, off: &str) {
    for y in 0..font.height() {
        let line: String = (0..font.width())
            .map(|x| match font.is_pixel_set(glyph, x, y) {
                Some(true) => on,
                _ => off,
            })
            .collect();
        println!("{}", line);
    }
}

fn inspect(font: &Font, config: &InfoConfig) -> Result<(), String> {
    if config.short {
        print_short_info(&font.summary());
    }

    if config.json {
        let json = serde_json::to_string_pretty(&font.summary()).map_err(|e| e.to_string())?;
        println!("{}", json);
    }

    if let Some(glyph) = config.glyph {
        if glyph >= font.glyph_count() {
            return Err(format!(
                "glyph {} out of range (font has {})",
                glyph,
                font.glyph_count()
            ));
        }
        let (on, off) = if config.debug_chars {
            (DEBUG_BIT_ON, DEBUG_BIT_OFF)
        } else {
            (BIT_ON, BIT_OFF)
        };
        print_ascii_art_glyph(font, glyph, on, off);
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let config = match InfoConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            usage();
            return ExitCode::from(2);
        },
    };

    let mut failed = false;
    for path in &config.paths {
        let font = match Font::open(path) {
            Ok(font) => font,
            Err(e) => {
                eprintln!("Unable to read {}: {}", path.display(), e);
                failed = true;
                continue;
            },
        };

        if let Err(e) = inspect(&font, &config) {
            eprintln!("{}: {}", path.display(), e);
            failed = true;
        }
        font.release();
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
