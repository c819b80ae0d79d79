// src/cli/mod.rs
pub mod commands;
pub mod parser;

use std::env;

use colored::*;
use commands::CommandExecutor;

use crate::error::BuildError;

pub fn run() -> Result<(), BuildError> {
    let cli = parser::Cli::parse();

    // VERBOSE=<anything non-empty> forces verbose output on.
    let env_verbose = env::var("VERBOSE").map(|v| !v.is_empty()).unwrap_or(false);
    let verbose = cli.verbose || env_verbose;

    match cli.command {
        Some(command) => command.execute(verbose),
        None => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    // Fixed width for the box
    let box_width = 60;
    let separator = "─".repeat(box_width - 2); // -2 for border characters

    println!();
    println!("┌{}┐", separator.cyan());

    // Center the title
    let title = "VMFORGE";
    let title_padding = (box_width - 2 - title.len()) / 2;
    println!(
        "│{}{}{}│",
        " ".repeat(title_padding),
        title.cyan().bold(),
        " ".repeat(box_width - 2 - title.len() - title_padding)
    );

    println!("├{}┤", separator.cyan());

    // Description lines
    print_box_line("Create a bootable disk image from a boot sector", box_width, Color::White, false);
    print_box_line("and an ELF service binary.", box_width, Color::White, false);
    print_box_line("", box_width, Color::White, false);

    // USAGE section
    print_box_line("USAGE:", box_width, Color::Yellow, true);
    print_box_line("  vmforge <COMMAND> [OPTIONS]", box_width, Color::White, false);
    print_box_line("", box_width, Color::White, false);

    // COMMANDS section
    print_box_line("COMMANDS:", box_width, Color::Yellow, true);
    print_box_line("  build       Build a bootable disk image", box_width, Color::White, false);
    print_box_line("  inspect     Inspect a service binary", box_width, Color::White, false);
    print_box_line("  version     Show version information", box_width, Color::White, false);
    print_box_line("", box_width, Color::White, false);

    // EXAMPLES section
    print_box_line("EXAMPLES:", box_width, Color::Yellow, true);
    print_box_line("  vmforge build my_service", box_width, Color::Green, false);
    print_box_line("  vmforge build my_service boot.bin -o disk.img", box_width, Color::Green, false);
    print_box_line("  vmforge inspect my_service --json", box_width, Color::Green, false);
    print_box_line("", box_width, Color::White, false);

    // Footer
    print_box_line("Use '--help' with any command for detailed information.", box_width, Color::Blue, false);

    println!("└{}┘", separator.cyan());
    println!();
}

fn print_box_line(text: &str, box_width: usize, color: Color, bold: bool) {
    let padded_text = if text.is_empty() {
        " ".repeat(box_width - 2)
    } else {
        format!(" {:<width$}", text, width = box_width - 3)
    };

    let mut colored_text = padded_text.color(color);
    if bold {
        colored_text = colored_text.bold();
    }

    println!("│{}│", colored_text);
}

pub fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    let box_width = 60;
    let separator = "─".repeat(box_width - 2);

    println!();
    println!("┌{}┐", separator.cyan());

    // Center the title
    let title = format!("VMFORGE v{}", version);
    let title_padding = (box_width - 2 - title.len()) / 2;
    println!(
        "│{}{}{}│",
        " ".repeat(title_padding),
        title.cyan().bold(),
        " ".repeat(box_width - 2 - title.len() - title_padding)
    );

    println!("├{}┤", separator.cyan());

    print_box_line("Bootable disk image builder for ELF services.", box_width, Color::White, false);
    print_box_line("", box_width, Color::White, false);

    print_box_line("FEATURES:", box_width, Color::Yellow, true);

    let features = [
        "• 512-byte boot sector with patched boot parameters",
        "• 32-bit ELF services with multiboot verification",
        "• 64-bit ELF services (entry truncated to 32 bits)",
        "• Sector-aligned raw images, zero padded",
        "• Deterministic test-pattern images",
        "• JSON inspection reports",
    ];

    for feature in features.iter() {
        print_box_line(&format!("  {}", feature), box_width, Color::Green, false);
    }
    print_box_line("", box_width, Color::White, false);

    print_box_line("IMAGE LAYOUT:", box_width, Color::Yellow, true);
    print_box_line("  sector 0: boot sector (sector count at 4,", box_width, Color::White, false);
    print_box_line("            entry point at 8)", box_width, Color::White, false);
    print_box_line("  sector 1+: service binary, zero padded", box_width, Color::White, false);
    print_box_line("", box_width, Color::White, false);

    print_box_line("AUTHORS: Bit Jumper Studio", box_width, Color::Blue, false);
    print_box_line("LICENSE: MIT", box_width, Color::Blue, false);

    println!("└{}┘", separator.cyan());
    println!();
}
