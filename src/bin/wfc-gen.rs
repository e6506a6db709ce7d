//! Command-line front end for the overlapping engine (spec.md §6).
//!
//! Every flag takes a value, in either the short `-x N` or long `--name=N`
//! form; `-x/-y/-r/-e` take `0` or `1`. Exit code is 0 on success, non-zero
//! on argument error, load/save error, or contradiction.

use std::env;
use std::process::ExitCode;

use wfc_forge::tile::BuildFlags;
use wfc_forge::{Engine, EngineConfig};

struct Args {
    method: Option<String>,
    width: Option<usize>,
    height: Option<usize>,
    tile_width: Option<usize>,
    tile_height: Option<usize>,
    expand_image: bool,
    xflip: bool,
    yflip: bool,
    rotate: bool,
    input: Option<String>,
    output: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            method: None,
            width: None,
            height: None,
            tile_width: None,
            tile_height: None,
            expand_image: false,
            xflip: false,
            yflip: false,
            rotate: false,
            input: None,
            output: None,
        }
    }
}

fn usage() -> &'static str {
    "usage: wfc-gen -m overlapping -w W -h H -W TW -H TH [-e 0|1] [-x 0|1] [-y 0|1] [-r 0|1] <input_image> <output_image>"
}

/// Splits a `--name=value` flag into its parts, or returns `None` if `arg`
/// isn't of that form.
fn split_long(arg: &str) -> Option<(&str, &str)> {
    let rest = arg.strip_prefix("--")?;
    rest.split_once('=')
}

fn parse_args(raw: Vec<String>) -> Result<Args, String> {
    let mut args = Args::default();
    let mut positionals = Vec::new();

    let mut iter = raw.into_iter().peekable();
    while let Some(arg) = iter.next() {
        if let Some((name, value)) = split_long(&arg) {
            apply_flag(&mut args, name, Some(value.to_string()))?;
            continue;
        }

        if let Some(short) = arg.strip_prefix('-') {
            if short.is_empty() || arg.starts_with("--") {
                return Err(format!("malformed flag: {arg}"));
            }
            let long_name = match short {
                "m" => "method",
                "w" => "width",
                "h" => "height",
                "W" => "tile-width",
                "H" => "tile-height",
                "e" => "expand-image",
                "x" => "xflip",
                "y" => "yflip",
                "r" => "rotate",
                other => return Err(format!("unknown flag: -{other}")),
            };
            let value = iter.next().ok_or_else(|| format!("flag -{short} needs a value"))?;
            apply_flag(&mut args, long_name, Some(value))?;
            continue;
        }

        positionals.push(arg);
    }

    if positionals.len() != 2 {
        return Err(format!("expected 2 positional arguments, got {}\n{}", positionals.len(), usage()));
    }
    args.output = positionals.pop();
    args.input = positionals.pop();

    Ok(args)
}

fn apply_flag(args: &mut Args, name: &str, value: Option<String>) -> Result<(), String> {
    match name {
        "method" => args.method = value,
        "width" => args.width = Some(parse_usize(name, value)?),
        "height" => args.height = Some(parse_usize(name, value)?),
        "tile-width" => args.tile_width = Some(parse_usize(name, value)?),
        "tile-height" => args.tile_height = Some(parse_usize(name, value)?),
        "expand-image" => args.expand_image = parse_bool_flag(name, value)?,
        "xflip" => args.xflip = parse_bool_flag(name, value)?,
        "yflip" => args.yflip = parse_bool_flag(name, value)?,
        "rotate" => args.rotate = parse_bool_flag(name, value)?,
        other => return Err(format!("unknown flag: --{other}")),
    }
    Ok(())
}

fn parse_usize(name: &str, value: Option<String>) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("--{name} needs a value"))?;
    value.parse().map_err(|_| format!("--{name} expects an integer, got '{value}'"))
}

fn parse_bool_flag(name: &str, value: Option<String>) -> Result<bool, String> {
    let value = value.ok_or_else(|| format!("--{name} needs a value (0 or 1)"))?;
    match value.as_str() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(format!("--{name} expects 0 or 1, got '{other}'")),
    }
}

fn run(raw: Vec<String>) -> Result<(), String> {
    let args = parse_args(raw)?;

    match args.method.as_deref() {
        Some("overlapping") => {}
        Some(other) => return Err(format!("unsupported method: {other}")),
        None => return Err(format!("-m/--method is required\n{}", usage())),
    }

    let width = args.width.ok_or("-w/--width is required")?;
    let height = args.height.ok_or("-h/--height is required")?;
    let tile_width = args.tile_width.ok_or("-W/--tile-width is required")?;
    let tile_height = args.tile_height.ok_or("-H/--tile-height is required")?;
    let input_path = args.input.ok_or("missing input_image")?;
    let output_path = args.output.ok_or("missing output_image")?;

    let input = wfc_forge::image::load(&input_path).map_err(|e| format!("failed to load {input_path}: {e}"))?;

    let config = EngineConfig {
        output_width: width,
        output_height: height,
        tile_width,
        tile_height,
        flags: BuildFlags {
            expand: args.expand_image,
            xflip: args.xflip,
            yflip: args.yflip,
            rotate: args.rotate,
        },
        seed: None,
    };

    let mut engine = Engine::new(&input, config).map_err(|e| format!("failed to build engine: {e}"))?;
    engine.run(None).map_err(|e| format!("contradiction: {e}"))?;

    let output = engine.output_image();
    wfc_forge::image::save(&output, &output_path).map_err(|e| format!("failed to save {output_path}: {e}"))?;

    Ok(())
}

fn main() -> ExitCode {
    let raw: Vec<String> = env::args().skip(1).collect();
    match run(raw) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("wfc-gen: {msg}");
            ExitCode::FAILURE
        }
    }
}
