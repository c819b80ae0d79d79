// src/cli/commands.rs
use std::path::PathBuf;

use clap::{Args, Subcommand};
use colored::*;
use serde::Serialize;

use crate::bin_utils;
use crate::builder::{BuildConfig, BuildReport, ImageBuilder};
use crate::elf::{self, ElfClass};
use crate::error::BuildError;
use crate::loader;
use crate::multiboot::MultibootHeader;

/// Main command enum
#[derive(Subcommand)]
pub enum Command {
    /// Build a bootable disk image from a service binary
    Build(BuildArgs),

    /// Inspect a service binary without building an image
    Inspect(InspectArgs),

    /// Show version information
    Version,
}

/// Build command arguments
#[derive(Args)]
pub struct BuildArgs {
    /// Service binary (ELF32 or ELF64)
    #[arg(value_name = "SERVICE")]
    pub service: PathBuf,

    /// Boot sector binary (defaults to the installed bootloader)
    #[arg(value_name = "BOOTLOADER")]
    pub bootloader: Option<PathBuf>,

    /// Output image file (defaults to <service>.img)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite the service area with a deterministic test pattern
    #[arg(long)]
    pub test: bool,
}

/// Inspect command arguments
#[derive(Args)]
pub struct InspectArgs {
    /// Service binary to inspect
    #[arg(value_name = "SERVICE")]
    pub binary: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Command executor trait
pub trait CommandExecutor {
    fn execute(&self, verbose: bool) -> Result<(), BuildError>;
}

impl CommandExecutor for Command {
    fn execute(&self, verbose: bool) -> Result<(), BuildError> {
        match self {
            Command::Build(args) => args.execute(verbose),
            Command::Inspect(args) => args.execute(verbose),
            Command::Version => {
                crate::cli::print_version();
                Ok(())
            }
        }
    }
}

impl CommandExecutor for BuildArgs {
    fn execute(&self, verbose: bool) -> Result<(), BuildError> {
        let config = BuildConfig {
            bootloader: self
                .bootloader
                .clone()
                .unwrap_or_else(bin_utils::default_bootloader),
            // Test mode implies verbose output.
            verbose: verbose || self.test,
            test_mode: self.test,
        };
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| ImageBuilder::default_output(&self.service));

        println!();
        println!("{}", "╔══════════════════════════════════════════╗".cyan());
        println!("{}", "║           BUILDING DISK IMAGE            ║".cyan().bold());
        println!("{}", "╚══════════════════════════════════════════╝".cyan());
        println!();
        println!(
            "{}: {}",
            "Service".blue(),
            self.service.display().to_string().white()
        );
        println!(
            "{}: {}",
            "Bootloader".blue(),
            config.bootloader.display().to_string().white()
        );
        println!(
            "{}: {}",
            "Output".blue(),
            output.display().to_string().white()
        );
        println!();

        let report = ImageBuilder::new(config).build(&self.service, &output)?;
        print_build_report(&report);
        Ok(())
    }
}

fn print_build_report(report: &BuildReport) {
    println!();
    println!("{}", "┌────────────────────────────────────────────┐".green());
    println!("{}", "│             IMAGE INFORMATION              │".green().bold());
    println!("{}", "├────────────────────────────────────────────┤".green());
    println!(
        "│ {:<12} {:30} │",
        "File:".blue(),
        report.image_path.display().to_string().white()
    );
    println!(
        "│ {:<12} {:30} │",
        "Size:".blue(),
        format!("{} bytes", report.bytes_written).green()
    );
    println!(
        "│ {:<12} {:30} │",
        "Sectors:".blue(),
        format!("1 boot + {} service", report.service_sectors).white()
    );
    println!(
        "│ {:<12} {:30} │",
        "Class:".blue(),
        report.class.to_string().white()
    );
    println!(
        "│ {:<12} {:30} │",
        "Entry:".blue(),
        format!("{:#x}", report.entry_point).yellow()
    );
    println!("{}", "└────────────────────────────────────────────┘".green());
    println!();
}

/// What `inspect --json` prints.
#[derive(Serialize)]
struct InspectReport {
    binary: PathBuf,
    class: ElfClass,
    entry_point: u64,
    multiboot: Option<MultibootHeader>,
}

impl CommandExecutor for InspectArgs {
    fn execute(&self, _verbose: bool) -> Result<(), BuildError> {
        let bytes = loader::read_binary(&self.binary)?;
        let info = elf::inspect(&bytes)?;

        let multiboot = match &info.multiboot_section {
            Some(section) => {
                let header = MultibootHeader::decode(section)?;
                header.validate()?;
                Some(header)
            }
            None => None,
        };

        if self.json {
            let report = InspectReport {
                binary: self.binary.clone(),
                class: info.class,
                entry_point: info.entry,
                multiboot,
            };
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
            return Ok(());
        }

        println!();
        println!("{}", "┌────────────────────────────────────────────┐".cyan());
        println!("{}", "│              SERVICE BINARY                │".cyan().bold());
        println!("{}", "├────────────────────────────────────────────┤".cyan());
        println!(
            "│ {:<12} {:30} │",
            "File:".blue(),
            self.binary.display().to_string().white()
        );
        println!(
            "│ {:<12} {:30} │",
            "Class:".blue(),
            info.class.to_string().white()
        );
        println!(
            "│ {:<12} {:30} │",
            "Entry:".blue(),
            format!("{:#x}", info.entry).yellow()
        );

        if let Some(header) = &multiboot {
            println!("{}", "├────────────────────────────────────────────┤".cyan());
            println!("{}", "│             MULTIBOOT HEADER               │".cyan().bold());
            println!("{}", "├────────────────────────────────────────────┤".cyan());
            let rows = [
                ("Magic:", header.magic),
                ("Flags:", header.flags),
                ("Checksum:", header.checksum),
                ("Header addr:", header.header_addr),
                ("Load start:", header.load_addr),
                ("Load end:", header.load_end_addr),
                ("BSS end:", header.bss_end_addr),
                ("Entry addr:", header.entry_addr),
            ];
            for (label, value) in rows {
                println!(
                    "│ {:<12} {:30} │",
                    label.blue(),
                    format!("{:#010x}", value).white()
                );
            }
            println!(
                "│ {:<12} {:30} │",
                "Valid:".blue(),
                "magic and checksum verified".green()
            );
        }

        println!("{}", "└────────────────────────────────────────────┘".cyan());
        println!();

        Ok(())
    }
}
