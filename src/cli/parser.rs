// src/cli/parser.rs
use clap::Parser;

use crate::cli::commands::Command;

/// vmforge bootable disk image builder
#[derive(Parser)]
#[command(
    name = "vmforge",
    version = env!("CARGO_PKG_VERSION"),
    author = "Bit Jumper Studio",
    about = "Create a bootable disk image from a boot sector and a service binary",
    long_about = r#"
vmforge
=======

Create a bootable disk image for a service binary.

The image is one 512-byte boot sector followed by the service binary, padded
to a whole number of sectors. The boot sector is patched with the service's
size in sectors and its entry point, read from the service's ELF header.

32-bit services must embed a multiboot header in a '.multiboot' section; the
header is decoded and checksum-verified before anything is written. 64-bit
services are accepted as-is, with the low 32 bits of their entry point
patched into the boot sector.
"#
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }
}
