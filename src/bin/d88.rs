/// Interactive D88 console application

use dez80::Instruction;

use d88manager::map::draw_sector_map;
use d88manager::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::path::PathBuf;

/// Command completer for the REPL
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                "boot",
                "dasm",
                "disassemble",
                "exit",
                "flatten",
                "help",
                "info",
                "load",
                "map",
                "open",
                "quit",
                "read-sector",
                "rename",
                "save",
                "sectors",
                "set-type",
                "tracks",
            ],
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only complete the first word (command name)
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Console settings, read once at start-up
#[derive(Debug, Clone)]
struct Config {
    /// Where the REPL history lives
    history_path: Option<PathBuf>,
    /// Bytes shown by read-sector before truncating
    hex_dump_limit: usize,
    /// Fill window used by rename
    title_fill: TitleFill,
}

impl Config {
    const DEFAULT_HEX_DUMP_LIMIT: usize = 256;

    fn from_env() -> Self {
        let hex_dump_limit = std::env::var("D88_HEXDUMP_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::DEFAULT_HEX_DUMP_LIMIT);

        let title_fill = match std::env::var("D88_LEGACY_RENAME") {
            Ok(v) if !v.is_empty() && v != "0" => TitleFill::Legacy,
            _ => TitleFill::Field,
        };

        Self {
            history_path: history_path(),
            hex_dump_limit,
            title_fill,
        }
    }
}

/// Get the path to the history file
fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".d88manager_history");
        p
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_env();
    log::debug!("{:?}", config);

    println!("=== D88Manager ===");
    println!("Interactive console for exploring D88 format disk images.");
    println!("Type 'help' for available commands\n");

    let mut rl = match Editor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create editor: {}", e);
            std::process::exit(1);
        }
    };
    rl.set_helper(Some(CommandCompleter::new()));

    if let Some(ref path) = config.history_path {
        let _ = rl.load_history(path);
    }

    let mut image: Option<D88Image> = None;

    loop {
        let input = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                save_history(&mut rl, &config);
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let _ = rl.add_history_entry(input);

        let parts = parse_command_line(input);
        if parts.is_empty() {
            continue;
        }
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "help" => print_help(),
            "quit" | "exit" => {
                if image.as_ref().is_some_and(|img| img.is_changed()) {
                    println!("Warning: unsaved changes discarded.");
                }
                save_history(&mut rl, &config);
                println!("Goodbye!");
                break;
            }
            "open" | "load" => {
                if parts.len() < 2 {
                    println!("Usage: open <path>");
                    continue;
                }
                match D88Image::open(&parts[1]) {
                    Ok(img) => {
                        println!("Opened: {} ({})", parts[1], img.title());
                        image = Some(img);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            _ => {
                let Some(ref mut img) = image else {
                    if is_known_command(&command) {
                        println!("No image loaded. Use 'open <path>' first.");
                    } else {
                        println!("Unknown command: {}. Type 'help' for available commands.", command);
                    }
                    continue;
                };
                run_image_command(img, &command, &parts[1..], &config);
            }
        }
    }
}

fn save_history(rl: &mut Editor<CommandCompleter, rustyline::history::DefaultHistory>, config: &Config) {
    if let Some(ref path) = config.history_path {
        let _ = rl.save_history(path);
    }
}

fn is_known_command(command: &str) -> bool {
    CommandCompleter::new()
        .commands
        .iter()
        .any(|&known| known == command)
}

/// Commands that need a loaded image
fn run_image_command(image: &mut D88Image, command: &str, args: &[String], config: &Config) {
    match command {
        "info" => print_info(image),
        "tracks" => list_tracks(image),
        "sectors" => match args.first() {
            Some(arg) => match arg.parse::<usize>() {
                Ok(index) => list_sectors_on_track(image, index),
                Err(_) => println!("Usage: sectors [track]"),
            },
            None => list_all_sectors(image),
        },
        "read-sector" => {
            if args.len() < 2 {
                println!("Usage: read-sector <track> <record>");
                return;
            }
            let (Ok(index), Some(record)) = (args[0].parse::<usize>(), parse_hex_or_dec(&args[1]))
            else {
                println!("Usage: read-sector <track> <record>");
                return;
            };
            match image.track(index) {
                Some(Ok(track)) => match track.get_sector(record) {
                    Some(sector) => {
                        let data = sector.data();
                        println!(
                            "Track {} sector {} [{}] ({} bytes, {}):",
                            index,
                            record,
                            sector.id(),
                            data.len(),
                            sector.header.status
                        );
                        print_hex_dump(data, config.hex_dump_limit);
                    }
                    None => println!("Sector {} not found on track {}.", record, index),
                },
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("Track {} is not in use.", index),
            }
        }
        "boot" => match image.boot_sector() {
            Ok(boot) => {
                println!("Boot sector: track {} [{}] ({} bytes)", boot.track, boot.id, boot.data.len());
                if boot.fingerprint.is_bootable() {
                    let names: Vec<String> =
                        boot.fingerprint.platforms.iter().map(|p| p.to_string()).collect();
                    println!("Platform: {}", names.join(", "));
                } else {
                    println!("Platform: Unknown");
                }
                println!("Reason: {}", boot.fingerprint.reason);
                if let Some(ref label) = boot.fingerprint.label {
                    println!("Label: {}", label);
                }
                if let Some(ref e) = boot.fingerprint.label_error {
                    println!("Label: ({})", e);
                }
                print_hex_dump(&boot.data, config.hex_dump_limit);
            }
            Err(e) => println!("Error: {}", e),
        },
        "disassemble" | "dasm" => {
            if args.is_empty() {
                match image.boot_sector() {
                    Ok(boot) => {
                        println!("Boot sector: track {} [{}]", boot.track, boot.id);
                        disassemble_z80(&boot.data);
                    }
                    Err(e) => println!("Error: {}", e),
                }
                return;
            }
            let record = args.get(1).and_then(|s| parse_hex_or_dec(s));
            let Ok(index) = args[0].parse::<usize>() else {
                println!("Usage: disassemble [track] [record]");
                return;
            };
            match image.track(index) {
                Some(Ok(track)) => {
                    let sector = match record {
                        Some(record) => track.get_sector(record),
                        None => track.get_sector_by_index(0),
                    };
                    match sector {
                        Some(sector) => {
                            println!("Track {} [{}]", index, sector.id());
                            disassemble_z80(sector.data());
                        }
                        None => println!("Sector not found on track {}.", index),
                    }
                }
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("Track {} is not in use.", index),
            }
        }
        "map" => draw_sector_map(image),
        "flatten" => {
            let Some(path) = args.first() else {
                println!("Usage: flatten <path>");
                return;
            };
            match image.save_flat(path) {
                Ok(flat) => {
                    println!(
                        "Wrote {} bytes ({} of {} tracks) to {}",
                        flat.data.len(),
                        flat.tracks_written,
                        flat.tracks_in_use,
                        path
                    );
                    print_warnings(&flat.warnings);
                }
                Err(e) => println!("Error: {}", e),
            }
        }
        "set-type" => {
            let Some(media_type) = args.first().and_then(|s| MediaType::parse(s)) else {
                println!("Usage: set-type <2D|2DD|2HD|1D|1DD|0xNN>");
                return;
            };
            match image.set_media_type(media_type) {
                Ok(()) => println!("Media type set to {}", media_type),
                Err(e) => println!("Error: {}", e),
            }
        }
        "rename" => {
            if args.is_empty() {
                println!("Usage: rename <title>");
                return;
            }
            let title = args.join(" ");
            match image.rename_with(&title, config.title_fill) {
                Ok(()) => println!("Title set to \"{}\"", image.title()),
                Err(e) => println!("Error: {}", e),
            }
        }
        "save" => {
            let path = match args.first() {
                Some(path) => path.clone(),
                None => match image.filename() {
                    Some(name) => name.to_string(),
                    None => {
                        println!("Usage: save <path>");
                        return;
                    }
                },
            };
            match image.save(&path) {
                Ok(()) => println!("Saved to {}", path),
                Err(e) => println!("Error: {}", e),
            }
        }
        _ => println!("Unknown command: {}. Type 'help' for available commands.", command),
    }
}

/// Parse command line input, respecting quoted strings
fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
            }
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn print_help() {
    println!("Available commands:");
    println!("  open <path>                    - Open a disk image file (use quotes for paths with spaces)");
    println!("  info                           - Show disk information");
    println!("  tracks                         - List all tracks");
    println!("  sectors [track]                - List sectors (all or one track)");
    println!("  read-sector <track> <record>   - Read and display a sector");
    println!("  boot                           - Show the boot sector and guess the platform");
    println!("  disassemble [track] [record]   - Disassemble Z80 code (boot sector by default) (dasm)");
    println!("  map                            - Visual sector map (white=ok, red=error, yellow=deleted)");
    println!("  flatten <path>                 - Write a raw sector dump");
    println!("  set-type <2D|2DD|2HD|1D|1DD>   - Change the media type (or a raw value like 0x20)");
    println!("  rename <title>                 - Change the disk title");
    println!("  save [path]                    - Save image to file (use quotes for paths with spaces)");
    println!("  help                           - Show this help");
    println!("  quit, exit                     - Exit");
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        println!("Warning: {}", warning);
    }
}

fn print_info(image: &D88Image) {
    if let Some(filename) = image.filename() {
        println!("Filename: {}", filename);
    }
    match image.info() {
        Ok(info) => print!("{}", info),
        Err(e) => println!("Error: {}", e),
    }
    println!("Changed: {}", if image.is_changed() { "Yes" } else { "No" });
}

fn list_tracks(image: &D88Image) {
    let info = match image.info() {
        Ok(info) => info,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    println!(
        "{:<6} {:<10} {:<5} {:<5} {:<8} {:<8} {:<10} {:<8} {:<6}",
        "Track", "Offset", "Cyl", "Head", "Sectors", "Size", "Data Size", "Density", "Errors"
    );
    println!("{}", "-".repeat(76));

    for track in &info.tracks {
        let size = track
            .sector_size
            .map_or("Mixed".to_string(), |s| s.to_string());
        let density = track.density.map_or("-", |d| d.label());
        println!(
            "{:<6} 0x{:<8X} {:<5} {:<5} {:<8} {:<8} {:<10} {:<8} {:<6}",
            track.index,
            track.origin,
            track.cylinder,
            track.head,
            track.sector_count,
            size,
            track.data_size,
            density,
            track.error_sectors
        );
    }

    print_warnings(&info.warnings);
}

fn print_sector_header() {
    println!(
        "{:<6} {:<5} {:<5} {:<6} {:<12} {:<8} {:<8} {:<10} {:<12}",
        "Sector", "Cyl", "Head", "ID", "Size", "Density", "Status", "Data Size", "Content"
    );
    println!("{}", "-".repeat(80));
}

fn print_sector_rows(track: &Track<'_>) {
    for (idx, sector) in track.sectors().iter().enumerate() {
        let id = sector.id();
        let size = format!("{} ({})", id.size_code, sector.data().len());
        let density = sector.header.density().map_or("?", |d| d.label());
        let content = if sector.is_deleted() {
            format!("{} (deleted)", sector.content())
        } else {
            sector.content().to_string()
        };
        println!(
            "{:<6} {:<5} {:<5} {:<6} {:<12} {:<8} {:<8} {:<10} {:<12}",
            idx,
            id.cylinder,
            id.head,
            id.record,
            size,
            density,
            sector.header.status.to_string(),
            sector.recorded_size(),
            content
        );
    }
}

fn list_sectors_on_track(image: &D88Image, index: usize) {
    match image.track(index) {
        Some(Ok(track)) => {
            print_sector_header();
            print_sector_rows(&track);
        }
        Some(Err(e)) => println!("Error: {}", e),
        None => println!("Track {} is not in use.", index),
    }
}

fn list_all_sectors(image: &D88Image) {
    let (tracks, warnings) = image.tracks();
    for track in &tracks {
        println!("\nTrack {}:", track.index);
        print_sector_header();
        print_sector_rows(track);
    }
    print_warnings(&warnings);
}

fn print_hex_dump(data: &[u8], max_bytes: usize) {
    let len = data.len().min(max_bytes);

    for (i, chunk) in data[..len].chunks(16).enumerate() {
        print!("{:04X}: ", i * 16);

        for (j, byte) in chunk.iter().enumerate() {
            print!("{:02X} ", byte);
            if j == 7 {
                print!(" ");
            }
        }

        // Pad if less than 16 bytes
        for j in chunk.len()..16 {
            print!("   ");
            if j == 7 {
                print!(" ");
            }
        }

        print!(" |");

        for byte in chunk {
            let c = if (32..127).contains(byte) {
                *byte as char
            } else {
                '.'
            };
            print!("{}", c);
        }

        println!("|");
    }

    if data.len() > max_bytes {
        println!("... ({} more bytes)", data.len() - max_bytes);
    }
}

fn parse_hex_or_dec(s: &str) -> Option<u8> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

fn disassemble_z80(data: &[u8]) {
    let mut slice: &[u8] = data;
    let mut address: usize = 0;

    while !slice.is_empty() {
        let start_len = slice.len();

        match Instruction::decode_one(&mut slice) {
            Ok(instruction) => {
                let bytes_consumed = start_len - slice.len();
                let bytes: Vec<String> = data[address..address + bytes_consumed]
                    .iter()
                    .map(|b| format!("{:02X}", b))
                    .collect();

                println!("{:04X}  {:<12} {}", address, bytes.join(" "), instruction);

                address += bytes_consumed;
            }
            Err(_) => {
                // Invalid or truncated instruction, show as data byte
                let byte = data[address];
                println!("{:04X}  {:02X}           DB {:02X}h", address, byte, byte);
                address += 1;
                slice = &data[address..];
            }
        }
    }
}
