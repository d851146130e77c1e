use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the formats registered by FormatRegistry::with_defaults
// We need to duplicate this here since build scripts can't access the library
const FORMATS: &[&str] = &["html", "json", "tagged", "treeviz"];

fn file_arg(name: &'static str, index: usize) -> Arg {
    Arg::new(name)
        .required(true)
        .index(index)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let formats = clap::builder::PossibleValuesParser::new(FORMATS);
    let mut cmd = Command::new("dpmd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert DesignPlus pages to tagged text and back")
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("convert")
                .arg(file_arg("input", 1))
                .arg(Arg::new("from").long("from").value_parser(formats.clone()))
                .arg(Arg::new("to").long("to").value_parser(formats))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("title").long("title")),
        )
        .subcommand(Command::new("validate").arg(file_arg("input", 1)))
        .subcommand(
            Command::new("export").arg(file_arg("page", 1)).arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .subcommand(
            Command::new("import")
                .arg(file_arg("page", 1))
                .arg(file_arg("text", 2))
                .arg(Arg::new("title").long("title")),
        );

    generate_to(Bash, &mut cmd, "dpmd", &outdir)?;
    generate_to(Zsh, &mut cmd, "dpmd", &outdir)?;
    generate_to(Fish, &mut cmd, "dpmd", &outdir)?;

    Ok(())
}
