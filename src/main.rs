extern crate clap;
extern crate env_logger;
extern crate log;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::{debug, error, info};
use thiserror::Error;

use std::fs;
use std::io;
use std::io::{Read, Write};
use std::process;

use des_modes::des::Action;
use des_modes::{DesError, Mode};

// Prefix of the line that carries the IV in front of CFB output.
const IV_HEADER: &str = "iv:";

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Des(#[from] DesError),
}

// Read the whole input, either from the given file or from stdin. Piped
// input usually ends with newlines the user never meant to encrypt.
fn read_input(file_name: Option<&str>) -> Result<String, io::Error> {
    match file_name {
        Some(name) => fs::read_to_string(name),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(strip_trailing_newlines(buffer))
        }
    }
}

fn strip_trailing_newlines(mut text: String) -> String {
    while text.ends_with('\n') {
        text.pop();
    }
    return text;
}

// Write `text` as is to a new file (never overwrite) or to stdout.
fn write_output(file_name: Option<&str>, text: &str) -> Result<(), io::Error> {
    match file_name {
        Some(name) => {
            let mut out_file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(name)?;
            out_file.write_all(text.as_bytes())
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(text.as_bytes())?;
            handle.flush()
        }
    }
}

// CFB output is written as an `iv:` line followed by the hex ciphertext. The
// final newline is harmless, hex decoding trims it.
fn render_ciphertext(ciphertext: &str, iv: Option<&str>) -> String {
    match iv {
        Some(iv) => format!("{} {}\n{}\n", IV_HEADER, iv, ciphertext),
        None => format!("{}\n", ciphertext),
    }
}

// Undo `render_ciphertext`: split off a leading `iv:` line, if any.
fn split_iv_header(text: &str) -> (Option<String>, String) {
    let mut lines = text.lines();
    let first = match lines.next() {
        Some(line) => line.trim(),
        None => return (None, String::new()),
    };
    match first.get(..IV_HEADER.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(IV_HEADER) => {}
        _ => return (None, text.to_string()),
    }

    let iv = first[IV_HEADER.len()..].trim().to_string();
    let body: Vec<&str> = lines.skip_while(|line| line.trim().is_empty()).collect();
    return (Some(iv), body.join("\n"));
}

// Encrypt or decrypt according to arguments.
fn run(action: Action, args: &ArgMatches) -> Result<(), CliError> {
    let mode: Mode = args.value_of("mode").unwrap_or("ecb").parse()?;
    let files = Files {
        input: args.value_of("in"),
        output: args.value_of("out"),
    };
    process(
        action,
        mode,
        args.value_of("key").unwrap_or_default(),
        args.value_of("iv"),
        &files,
    )
}

// Where to read from and write to; `None` means stdin / stdout.
struct Files<'a> {
    input: Option<&'a str>,
    output: Option<&'a str>,
}

fn process(
    action: Action,
    mode: Mode,
    key: &str,
    iv: Option<&str>,
    files: &Files,
) -> Result<(), CliError> {
    let input = read_input(files.input)?;
    let output = files.output;

    match action {
        Action::Encrypt => {
            info!("Encrypting {} bytes in {} mode", input.len(), mode);
            let (ciphertext, iv) = des_modes::encrypt(&input, key, &mode.to_string(), iv)?;
            if let Some(iv) = &iv {
                debug!("Using IV {}", iv);
            }
            write_output(output, &render_ciphertext(&ciphertext, iv.as_deref()))?;
        }
        Action::Decrypt => {
            let (header_iv, body) = split_iv_header(&input);
            let iv = iv.or(header_iv.as_deref());
            info!("Decrypting {} hex digits in {} mode", body.trim().len(), mode);
            let plaintext = des_modes::decrypt(&body, key, &mode.to_string(), iv)?;
            write_output(output, &plaintext)?;
        }
    }

    return Ok(());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let modes = ["ecb", "cfb"];

    let matches = App::new("des_modes")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(SubCommand::with_name("encrypt"))
        .subcommand(SubCommand::with_name("decrypt"))
        .arg(
            Arg::with_name("mode")
                .short("m")
                .long("mode")
                .takes_value(true)
                .default_value("ecb")
                .possible_values(&modes)
                .case_insensitive(true)
                .help("ecb or cfb"),
        )
        .arg(
            Arg::with_name("key")
                .short("k")
                .long("key")
                .required(true)
                .takes_value(true)
                .help("Key: 16 hex digits or 8 characters"),
        )
        .arg(
            Arg::with_name("iv")
                .long("iv")
                .takes_value(true)
                .help("CFB IV: 16 hex digits or 8 characters (random when encrypting without one)"),
        )
        .arg(
            Arg::with_name("in")
                .short("i")
                .long("in")
                .takes_value(true)
                .help("Input file (default: stdin)"),
        )
        .arg(
            Arg::with_name("out")
                .short("o")
                .long("out")
                .takes_value(true)
                .help("Output file, must not exist yet (default: stdout)"),
        )
        .get_matches();

    let result = match matches.subcommand_name() {
        Some("encrypt") => run(Action::Encrypt, &matches),
        Some("decrypt") => run(Action::Decrypt, &matches),
        _ => unreachable!("clap requires a subcommand"),
    };

    match result {
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
        Ok(_) => {
            debug!("Success!");
            return Ok(());
        }
    };
}
