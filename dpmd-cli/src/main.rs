// Command-line interface for dpmd
//
// This binary converts DesignPlus pages to tagged text and back, and checks tagged text
// before it is imported.
//
// The core capabilities use the dpmd-babel crate; this crate only reads files, applies the
// configuration and prints results.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  dpmd <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  dpmd convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  dpmd validate <input>                  - Check tagged text balance
//  dpmd export <page.html> [-o <file>]    - Saved page to tagged text
//  dpmd import <page.html> <text>         - Tagged text into a saved page
//  dpmd --list-formats                    - List available formats
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format.
// Example:
//  dpmd page.html --to tagged --extra-flatten-accordions

mod page;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use dpmd_babel::formats::tagged::validator;
use dpmd_babel::formats::{HtmlFormat, TaggedFormat};
use dpmd_babel::{export_page, import_page, FormatRegistry, PageOptions};
use dpmd_config::{DpmdConfig, Loader};
use log::debug;
use page::FileHost;
use std::collections::HashMap;
use std::fs;

const SUBCOMMANDS: &[&str] = &["convert", "validate", "export", "import", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = i + 1 < args.len() && !args[i + 1].starts_with('-');

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg(name: &'static str, help: &'static str, index: usize) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .index(index)
        .value_hint(ValueHint::FilePath)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn title_arg() -> Arg {
    Arg::new("title")
        .long("title")
        .value_name("PREFIX: TITLE")
        .help("Page title overriding the header line of tagged text")
        .value_hint(ValueHint::Other)
}

fn build_cli() -> Command {
    Command::new("dpmd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert DesignPlus pages to tagged text and back")
        .long_about(
            "dpmd converts the HTML of DesignPlus pages to a line-oriented tagged text that can\n\
            be edited in any text editor, and converts edited text back to page HTML.\n\n\
            Commands:\n  \
            - convert:  Transform between formats (html, tagged, treeviz, json)\n  \
            - validate: Check that tagged text is balanced\n  \
            - export:   Saved page to tagged text\n  \
            - import:   Tagged text into a saved page\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            dpmd page.html --to tagged                  # Page to tagged text (stdout)\n  \
            dpmd page.md --to html -o page.html         # Tagged text to page HTML\n  \
            dpmd page.html --to treeviz                 # Inspect the component tree\n  \
            dpmd validate page.md                       # Check before importing",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a dpmd.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between formats (default command)")
                .long_about(
                    "Convert between formats.\n\n\
                    Supported formats:\n  \
                    - html:    DesignPlus page HTML (.html, .htm)\n  \
                    - tagged:  Tagged text (.md, .markdown, .txt)\n  \
                    - treeviz: Component tree view (output only)\n  \
                    - json:    Component tree as JSON (.json)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(input_arg("input", "Input file path", 1))
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(output_arg())
                .arg(title_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Check that tagged text is balanced")
                .long_about(
                    "Check tagged text the way import does before converting it.\n\n\
                    Prints 'ok' for balanced text. Otherwise prints the offending line\n\
                    and its number, and exits with status 1.",
                )
                .arg(input_arg("input", "Tagged text file", 1)),
        )
        .subcommand(
            Command::new("export")
                .about("Export a saved page as tagged text")
                .arg(input_arg("page", "Saved page HTML", 1))
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("import")
                .about("Replace the content of a saved page with converted tagged text")
                .long_about(
                    "Validate the tagged text, convert it to page HTML and write it over the\n\
                    page file. Nothing is written when the text fails validation.",
                )
                .arg(input_arg("page", "Saved page HTML (rewritten)", 1))
                .arg(input_arg("text", "Tagged text file", 2))
                .arg(title_arg()),
        )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A leading file path means the convert subcommand was left out
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let to = required(sub_matches, "to");
            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => match registry_from_config(&config).detect_format_from_filename(input) {
                    Some(detected) => detected,
                    None => {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    }
                },
            };
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let title = sub_matches.get_one::<String>("title").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, title, &extra_params, &config);
        }
        Some(("validate", sub_matches)) => {
            handle_validate_command(required(sub_matches, "input"));
        }
        Some(("export", sub_matches)) => {
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_export_command(required(sub_matches, "page"), output, &config);
        }
        Some(("import", sub_matches)) => {
            let title = sub_matches.get_one::<String>("title").cloned();
            handle_import_command(
                required(sub_matches, "page"),
                required(sub_matches, "text"),
                title,
                &config,
            );
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Value of an argument clap already enforces as required.
fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    match matches.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: missing argument '{name}'");
            std::process::exit(2);
        }
    }
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn write_output(output: Option<&str>, text: &str) {
    match output {
        Some(path) => fs::write(path, text).unwrap_or_else(|e| {
            eprintln!("Error writing file '{path}': {e}");
            std::process::exit(1);
        }),
        None => print!("{text}"),
    }
}

/// Formats configured from the loaded configuration.
fn registry_from_config(config: &DpmdConfig) -> FormatRegistry {
    let options = PageOptions::from(config);
    let mut registry = FormatRegistry::with_defaults();
    registry.register(TaggedFormat::new(options.tagged));
    registry.register(HtmlFormat::new(options.html));
    registry
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    title: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &DpmdConfig,
) {
    let registry = registry_from_config(config);

    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_file(input);

    let mut parse_options = HashMap::new();
    if let Some(title) = title {
        parse_options.insert("title".to_string(), title.to_string());
    }
    let doc = registry
        .parse_with_options(&source, from, &parse_options)
        .unwrap_or_else(|e| {
            eprintln!("Parse error: {e}");
            std::process::exit(1);
        });
    debug!("{input}: {} top-level components", doc.children.len());

    // Serialize (format-specific parameters allowed via --extra-*)
    let text = registry
        .serialize_with_options(&doc, to, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    write_output(output, &text);
}

/// Handle the validate command
fn handle_validate_command(input: &str) {
    let source = read_file(input);
    match validator::validate(&source) {
        Ok(()) => println!("ok"),
        Err(err) => {
            eprintln!("{input}: {err}");
            std::process::exit(1);
        }
    }
}

/// Handle the export command
fn handle_export_command(page: &str, output: Option<&str>, config: &DpmdConfig) {
    let host = open_host(page, None);
    let text = export_page(&host, &PageOptions::from(config)).unwrap_or_else(|e| {
        eprintln!("Export error: {e}");
        std::process::exit(1);
    });
    write_output(output, &text);
}

/// Handle the import command
fn handle_import_command(page: &str, text_path: &str, title: Option<String>, config: &DpmdConfig) {
    let text = read_file(text_path);
    let mut host = open_host(page, title);
    import_page(&mut host, &text, &PageOptions::from(config)).unwrap_or_else(|e| {
        eprintln!("Import error: {e}");
        std::process::exit(1);
    });
    host.save().unwrap_or_else(|e| {
        eprintln!("Error writing file '{page}': {e}");
        std::process::exit(1);
    });
}

fn open_host(page: &str, title: Option<String>) -> FileHost {
    FileHost::open(page, title).unwrap_or_else(|e| {
        eprintln!("Error reading file '{page}': {e}");
        std::process::exit(1);
    })
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available formats:\n");
    for format_name in registry.list_formats() {
        let Ok(format) = registry.get(&format_name) else {
            continue;
        };
        let direction = match (format.supports_parsing(), format.supports_serialization()) {
            (true, true) => "in/out",
            (true, false) => "in",
            (false, true) => "out",
            (false, false) => "-",
        };
        println!(
            "  {:<8} {:<7} {}",
            format_name,
            direction,
            format.description()
        );
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> DpmdConfig {
    let loader = Loader::new().with_optional_file("dpmd.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Move extras that have a configuration key into the configuration, so
/// export and import see them too. Remaining extras go to the formats.
fn apply_config_overrides(config: &mut DpmdConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("accordion-heuristic") {
        config.accordion.enabled = parse_bool_arg("accordion-heuristic", &raw);
    }
    if let Some(raw) = extra_params.remove("flatten-accordions") {
        config.tagged.flatten_accordions = parse_bool_arg("flatten-accordions", &raw);
    }
    if let Some(raw) = extra_params.remove("indent") {
        match raw.parse::<usize>() {
            Ok(width) => config.tagged.indent_string = " ".repeat(width),
            Err(_) => {
                eprintln!("Invalid indent width '{raw}' for --extra-indent");
                std::process::exit(1);
            }
        }
    }
    if let Some(raw) = take_override(extra_params, &["viewport-height", "viewport-height-px"]) {
        match raw.parse::<usize>() {
            Ok(px) => config.accordion.viewport_height_px = px,
            Err(_) => {
                eprintln!("Invalid pixel value '{raw}' for --extra-viewport-height");
                std::process::exit(1);
            }
        }
    }

    if let Some(url) = take_override(extra_params, &["banner-url", "banner"]) {
        config.html.banner_image_url = url;
    }
    if let Some(raw) = extra_params.remove("trailing-spacer") {
        config.html.trailing_spacer = parse_bool_arg("trailing-spacer", &raw);
    }
    if let Some(url) = extra_params.remove("base-url") {
        config.html.base_url = url;
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
