use std::{
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
};

use asm15::{error::Error, listing, output::Output, Pass, Source};
use color_print::cprintln;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Source files, with or without the `.as` suffix
    #[clap(required = true)]
    input: Vec<String>,

    /// Write output files into this directory instead of next to the source
    #[clap(short, long)]
    out_dir: Option<PathBuf>,

    /// Dump the assembled image
    #[clap(short, long)]
    dump: bool,
}

fn main() -> ExitCode {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("asm15 Assembler");

    let mut ok = true;
    for input in &args.input {
        match process(input, &args) {
            Ok(done) => ok &= done,
            Err(e) => {
                cprintln!("<r,s>error</>: {}", e);
                if let Some(source) = std::error::Error::source(&e) {
                    cprintln!("  <blue>caused by</>: {}", source);
                }
                ok = false;
            }
        }
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Assemble one file. `Ok(false)` means the source had errors.
fn process(input: &str, args: &Args) -> Result<bool, Error> {
    let base = input.strip_suffix(".as").unwrap_or(input);
    let path = format!("{}.as", base);
    cprintln!("<s>{}</>", path);

    let source = Source::read(&path)?;

    let ctx = match asm15::translate(&source) {
        Ok(ctx) => {
            println!("  1. First pass");
            println!("  2. Second pass");
            ctx
        }
        Err(failure) => {
            match failure.pass {
                Pass::First => println!("  1. First pass"),
                Pass::Second => {
                    println!("  1. First pass");
                    println!("  2. Second pass");
                }
            }
            for diag in &failure.diags {
                diag.print(&source.path, &source.lines);
            }
            cprintln!("  <r>{} error(s), no output written</>", failure.diags.len());
            return Ok(false);
        }
    };

    println!("  3. Write output");
    let base = match &args.out_dir {
        Some(dir) => dir.join(Path::new(base).file_name().unwrap_or_default()),
        None => PathBuf::from(base),
    };
    for (file, text) in Output::render(&ctx).files(&base) {
        println!("  > {}", file.display());
        write_file(&file, text)?;
    }

    if args.dump {
        listing::print_dump(&source, &ctx);
    }
    Ok(true)
}

fn write_file(path: &Path, text: &str) -> Result<(), Error> {
    let name = path.display().to_string();
    let mut file = std::fs::File::create(path).map_err(|e| Error::FileCreate(name.clone(), e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| Error::FileWrite(name, e))
}
