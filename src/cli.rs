// Command line front end for the decoder.
//
// Reads one encoded term from a file or stdin, either raw or as hex text,
// and prints it in Erlang notation or as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::ext::decoder::{self, DecodeOptions};
use crate::ext::tag;
use crate::term::Term;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Erlang external term format decoder.
#[derive(Parser, Debug)]
#[command(
    name = "erlext",
    version,
    about = "Erlang external term format decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Quiet mode (suppress non-error output on stderr).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode one term and print it.
    Decode(DecodeArgs),
    /// Print the envelope of an encoded term.
    Header(InputArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input is hex text (whitespace ignored) instead of raw bytes.
    #[arg(long = "hex")]
    hex: bool,

    /// Input file (stdin when omitted).
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Fail when a compressed envelope's size field is wrong.
    #[arg(long = "verify-size-hint")]
    verify_size_hint: bool,

    /// Fail when bytes follow the record.
    #[arg(long)]
    strict: bool,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Decode,
    Header,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    hex: bool,
    input_file: Option<PathBuf>,
    decode: DecodeOptions,
}

fn resolve_options(cli: Cli) -> Options {
    let base = |command, input: Option<InputArgs>, decode| {
        let (hex, input_file) = input.map_or((false, None), |i| (i.hex, i.input));
        Options {
            command,
            quiet: cli.quiet,
            verbose: cli.verbose.min(2),
            json_output: cli.json_output,
            hex,
            input_file,
            decode,
        }
    };

    match cli.command {
        Cmd::Decode(args) => base(
            Command::Decode,
            Some(args.input),
            DecodeOptions {
                verify_size_hint: args.verify_size_hint,
                reject_trailing: args.strict,
            },
        ),
        Cmd::Header(args) => base(Command::Header, Some(args), DecodeOptions::default()),
        Cmd::Config => base(Command::Config, None, DecodeOptions::default()),
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn parse_hex(text: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if !digits.len().is_multiple_of(2) {
        return Err("hex input has an odd number of digits".into());
    }
    digits
        .chunks(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).map_err(|_| "hex input is not ASCII".to_string())?;
            u8::from_str_radix(s, 16).map_err(|e| format!("invalid hex byte '{s}': {e}"))
        })
        .collect()
}

fn read_input(opts: &Options) -> Result<Vec<u8>, String> {
    let raw = match &opts.input_file {
        Some(path) => fs::read(path).map_err(|e| format!("input file: {}: {e}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| format!("stdin: {e}"))?;
            buf
        }
    };
    if !opts.hex {
        return Ok(raw);
    }
    let text = String::from_utf8(raw).map_err(|_| "hex input is not UTF-8".to_string())?;
    parse_hex(&text)
}

// ---------------------------------------------------------------------------
// JSON rendering
// ---------------------------------------------------------------------------

/// Bignums become strings so no precision is lost; non-finite floats become
/// `null`; improper lists become `{"elements": [...], "tail": ...}`.
fn term_to_json(term: &Term) -> serde_json::Value {
    use serde_json::Value;

    match term {
        Term::Int64(v) => Value::from(*v),
        Term::BigInt(v) => Value::String(v.to_string()),
        Term::Float(v) => serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number),
        Term::Nil => Value::Array(Vec::new()),
        Term::List { elements, tail } => {
            let items: Vec<Value> = elements.iter().map(term_to_json).collect();
            if tail.is_nil() {
                Value::Array(items)
            } else {
                serde_json::json!({ "elements": items, "tail": term_to_json(tail) })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let bytes = match read_input(opts) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("erlext: {e}");
            return 1;
        }
    };

    let term = match decoder::decode_with(&bytes, &opts.decode) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("erlext: decode error: {e}");
            return 1;
        }
    };

    if opts.json_output {
        println!("{}", term_to_json(&term));
    } else {
        println!("{term}");
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "erlext: decoded {} from {} input bytes",
            term.kind(),
            bytes.len()
        );
    }

    0
}

fn cmd_header(opts: &Options) -> i32 {
    let bytes = match read_input(opts) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("erlext: {e}");
            return 1;
        }
    };

    let info = match decoder::inspect(&bytes[..]) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("erlext: header error: {e}");
            return 1;
        }
    };

    let tag_name = info.tag_name().unwrap_or("unknown");
    if opts.json_output {
        let json = serde_json::json!({
            "version": tag::VERSION_MAGIC,
            "compressed": info.compressed,
            "size_hint": info.size_hint,
            "tag": info.tag,
            "tag_name": tag_name,
            "decodable": info.has_decoder(),
        });
        println!("{json}");
        return 0;
    }

    println!("version:    {}", tag::VERSION_MAGIC);
    println!("compressed: {}", info.compressed);
    if let Some(hint) = info.size_hint {
        println!("size hint:  {hint}");
    }
    println!("tag:        {} ({tag_name})", info.tag);
    println!("decodable:  {}", info.has_decoder());
    0
}

fn cmd_config(opts: &Options) -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    let decodable: Vec<&str> = (0..=u8::MAX)
        .filter(|&t| decoder::decoder_for(t).is_some())
        .filter_map(tag::name)
        .collect();
    let parallel = cfg!(feature = "parallel");

    if opts.json_output {
        let json = serde_json::json!({
            "version": version,
            "parallel": parallel,
            "decodable_tags": decodable,
        });
        println!("{json}");
        return 0;
    }

    println!("erlext version {version}");
    println!("PARALLEL={}", parallel as u8);
    println!("DECODABLE_TAGS={}", decodable.join(","));
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    let default_filter = match opts.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match opts.command {
        Command::Decode => cmd_decode(&opts),
        Command::Header => cmd_header(&opts),
        Command::Config => cmd_config(&opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
