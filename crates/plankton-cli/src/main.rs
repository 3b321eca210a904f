use plankton::render::{generate, DiagramConfig};
use plankton::{parse_plan, ParseOptions};
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(String),
    Io(std::io::Error),
    Parse(plankton::Error),
    Render(plankton::render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Parse(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<plankton::Error> for CliError {
    fn from(value: plankton::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<plankton::render::Error> for CliError {
    fn from(value: plankton::render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    Parse,
    #[default]
    Generate,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    out: Option<String>,
    pretty: bool,
    strict: bool,
    box_width: Option<f64>,
    box_height: Option<f64>,
    vertical_spacing: Option<f64>,
    horizontal_spacing: Option<f64>,
    font_size: Option<f64>,
}

const USAGE: &str = "\
Usage: plankton [COMMAND] [OPTIONS] [INPUT]

Render physical-plan text (DataFusion EXPLAIN style) as whiteboard-scene JSON.

Commands:
  generate     plan text -> scene document (default)
  parse        plan text -> parsed tree as JSON

Arguments:
  INPUT        input file, or '-' for stdin (default)

Options:
  -o, --out <FILE>              write to FILE instead of stdout
      --pretty                  pretty-print the JSON output
      --strict                  reject malformed indentation
      --box-width <N>           operator box width (default 200)
      --box-height <N>          operator box height (default 80)
      --vertical-spacing <N>    vertical spacing between boxes (default 100)
      --horizontal-spacing <N>  horizontal spacing between siblings (default 50)
      --font-size <N>           base font size (default 16)
  -h, --help                    print this help
  -V, --version                 print version
";

fn parse_args() -> Result<Option<Args>, CliError> {
    let mut args = Args::default();
    let mut positionals: Vec<String> = Vec::new();
    let mut argv = std::env::args().skip(1);

    fn number(flag: &str, value: Option<String>) -> Result<f64, CliError> {
        let Some(value) = value else {
            return Err(CliError::Usage(format!("{flag} expects a value")));
        };
        value
            .parse::<f64>()
            .map_err(|_| CliError::Usage(format!("{flag} expects a number, got '{value}'")))
    }

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print!("{USAGE}");
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("plankton {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "-o" | "--out" => {
                args.out = Some(argv.next().ok_or_else(|| {
                    CliError::Usage("--out expects a file path".to_string())
                })?);
            }
            "--pretty" => args.pretty = true,
            "--strict" => args.strict = true,
            "--box-width" => args.box_width = Some(number("--box-width", argv.next())?),
            "--box-height" => args.box_height = Some(number("--box-height", argv.next())?),
            "--vertical-spacing" => {
                args.vertical_spacing = Some(number("--vertical-spacing", argv.next())?)
            }
            "--horizontal-spacing" => {
                args.horizontal_spacing = Some(number("--horizontal-spacing", argv.next())?)
            }
            "--font-size" => args.font_size = Some(number("--font-size", argv.next())?),
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(format!("unknown option '{other}'")));
            }
            _ => positionals.push(arg),
        }
    }

    let mut positionals = positionals.into_iter();
    match positionals.next() {
        Some(p) if p == "parse" => args.command = Command::Parse,
        Some(p) if p == "generate" => args.command = Command::Generate,
        Some(p) => args.input = Some(p),
        None => {}
    }
    if args.input.is_none() {
        args.input = positionals.next();
    }
    if let Some(extra) = positionals.next() {
        return Err(CliError::Usage(format!("unexpected argument '{extra}'")));
    }

    Ok(Some(args))
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn diagram_config(args: &Args) -> DiagramConfig {
    let mut config = DiagramConfig::default();
    if let Some(v) = args.box_width {
        config.box_width = v;
    }
    if let Some(v) = args.box_height {
        config.box_height = v;
    }
    if let Some(v) = args.vertical_spacing {
        config.vertical_spacing = v;
    }
    if let Some(v) = args.horizontal_spacing {
        config.horizontal_spacing = v;
    }
    if let Some(v) = args.font_size {
        config.font_size = v;
    }
    config
}

fn run(args: &Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let options = if args.strict {
        ParseOptions::strict()
    } else {
        ParseOptions::lenient()
    };
    let root = parse_plan(&text, options)?;

    let json = match args.command {
        Command::Parse => {
            if args.pretty {
                serde_json::to_string_pretty(&root)?
            } else {
                serde_json::to_string(&root)?
            }
        }
        Command::Generate => {
            let config = diagram_config(args);
            let doc = generate(root.as_ref(), &config)?;
            if args.pretty {
                serde_json::to_string_pretty(&doc)?
            } else {
                serde_json::to_string(&doc)?
            }
        }
    };

    match args.out.as_deref() {
        Some(path) => std::fs::write(path, json + "\n")?,
        None => println!("{json}"),
    }
    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => return,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
