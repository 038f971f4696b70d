use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Build and check BIOS and flash boot images.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append the CRC-32 trailer the BIOS checks itself against.
    Seal {
        input: PathBuf,
        /// Defaults to `<input>.sealed`.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Prefix an application with the flash boot header.
    Flash {
        input: PathBuf,
        /// Defaults to `<input>.flash`.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Check a sealed BIOS image, or a flash boot image with `--flash`.
    Verify {
        input: PathBuf,
        #[arg(long)]
        flash: bool,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Seal { input, output } => {
            let sealed = mkbios::seal(&mkbios::read(&input)?);
            let output = mkbios::output_path(&input, output, "sealed");
            mkbios::write(&output, &sealed)?;
            println!("{}: {} bytes", output.display(), sealed.len());
        }
        Command::Flash { input, output } => {
            let image = mkbios::flash_image(&mkbios::read(&input)?)?;
            let output = mkbios::output_path(&input, output, "flash");
            mkbios::write(&output, &image)?;
            println!("{}: {} bytes", output.display(), image.len());
        }
        Command::Verify { input, flash } => {
            let bytes = mkbios::read(&input)?;
            let crc = if flash {
                mkbios::verify_flash(&bytes)?
            } else {
                mkbios::verify_sealed(&bytes)?
            };
            println!("CRC passed ({:08x})", crc);
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("mkbios: {:#}", e);
        std::process::exit(1);
    }
}
