// src/elf.rs
//! ELF format inspection.
//!
//! The service binary is only ever examined through explicit fixed-offset,
//! little-endian decode functions. Nothing here reinterprets the input
//! buffer as a header struct, and a malformed header offset surfaces as
//! `FormatError::Truncated` rather than a panic.

use std::fmt;

use serde::Serialize;

use crate::error::FormatError;

/// `\x7FELF`
const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

const EI_CLASS: usize = 4;
const ELFCLASS32: u8 = 1;
const ELFCLASS64: u8 = 2;

/// Offset of `e_entry` in both the 32- and 64-bit primary headers.
const E_ENTRY: usize = 24;

// ELF32 primary-header fields used for the section walk.
const E_SHOFF: usize = 32;
const E_SHENTSIZE: usize = 46;
const E_SHNUM: usize = 48;
const E_SHSTRNDX: usize = 50;

// ELF32 section-header fields.
const SH_NAME: usize = 0;
const SH_OFFSET: usize = 16;
const SH_SIZE: usize = 20;

/// Section that must carry the multiboot header in 32-bit services.
pub const MULTIBOOT_SECTION: &str = ".multiboot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElfClass {
    Elf32,
    Elf64,
}

impl fmt::Display for ElfClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElfClass::Elf32 => write!(f, "32-bit ELF"),
            ElfClass::Elf64 => write!(f, "64-bit ELF"),
        }
    }
}

/// What the inspector learned about a service binary.
#[derive(Debug)]
pub struct ElfInfo {
    pub class: ElfClass,
    pub entry: u64,
    /// Raw bytes of the `.multiboot` section. Present only for 32-bit
    /// services; 64-bit services skip the section lookup entirely.
    pub multiboot_section: Option<Vec<u8>>,
}

/// Classify a service binary and extract its boot-relevant fields.
///
/// 32-bit binaries must carry a `.multiboot` section; its absence is a
/// build-fatal `FormatError::MissingSection`.
pub fn inspect(binary: &[u8]) -> Result<ElfInfo, FormatError> {
    if binary.len() < ELF_MAGIC.len() || binary[..ELF_MAGIC.len()] != ELF_MAGIC {
        return Err(FormatError::NotExecutable);
    }

    let class = *binary
        .get(EI_CLASS)
        .ok_or(FormatError::Truncated("e_ident"))?;

    match class {
        ELFCLASS32 => {
            let entry = read_u32(binary, E_ENTRY, "e_entry")? as u64;
            let section = find_section(binary, MULTIBOOT_SECTION)?
                .ok_or(FormatError::MissingSection(MULTIBOOT_SECTION))?;
            Ok(ElfInfo {
                class: ElfClass::Elf32,
                entry,
                multiboot_section: Some(section),
            })
        }
        ELFCLASS64 => {
            let entry = read_u64(binary, E_ENTRY, "e_entry")?;
            Ok(ElfInfo {
                class: ElfClass::Elf64,
                entry,
                multiboot_section: None,
            })
        }
        other => Err(FormatError::UnsupportedClass(other)),
    }
}

/// Walk the ELF32 section-header table looking for a section named `name`
/// and return a copy of its bytes.
fn find_section(binary: &[u8], name: &str) -> Result<Option<Vec<u8>>, FormatError> {
    let shoff = read_u32(binary, E_SHOFF, "e_shoff")? as usize;
    let shentsize = read_u16(binary, E_SHENTSIZE, "e_shentsize")? as usize;
    let shnum = read_u16(binary, E_SHNUM, "e_shnum")? as usize;
    let shstrndx = read_u16(binary, E_SHSTRNDX, "e_shstrndx")? as usize;

    if shnum == 0 || shentsize < SH_SIZE + 4 {
        return Ok(None);
    }
    if shstrndx >= shnum {
        return Err(FormatError::Truncated("e_shstrndx"));
    }

    let strtab = section_bytes(binary, shdr_base(shoff, shentsize, shstrndx)?)?;

    for index in 0..shnum {
        let base = shdr_base(shoff, shentsize, index)?;
        let name_offset = read_u32(binary, base + SH_NAME, "sh_name")? as usize;
        if section_name(strtab, name_offset) == Some(name) {
            return Ok(Some(section_bytes(binary, base)?.to_vec()));
        }
    }

    Ok(None)
}

fn shdr_base(shoff: usize, shentsize: usize, index: usize) -> Result<usize, FormatError> {
    index
        .checked_mul(shentsize)
        .and_then(|o| shoff.checked_add(o))
        .ok_or(FormatError::Truncated("section header table"))
}

/// The byte range a section header points at.
fn section_bytes(binary: &[u8], shdr: usize) -> Result<&[u8], FormatError> {
    let offset = read_u32(binary, shdr + SH_OFFSET, "sh_offset")? as usize;
    let size = read_u32(binary, shdr + SH_SIZE, "sh_size")? as usize;
    let end = offset
        .checked_add(size)
        .ok_or(FormatError::Truncated("section bounds"))?;
    binary
        .get(offset..end)
        .ok_or(FormatError::Truncated("section data"))
}

/// NUL-terminated name starting at `offset` in the string table.
fn section_name(strtab: &[u8], offset: usize) -> Option<&str> {
    let tail = strtab.get(offset..)?;
    let end = tail.iter().position(|&b| b == 0)?;
    std::str::from_utf8(&tail[..end]).ok()
}

fn read_u16(bytes: &[u8], offset: usize, what: &'static str) -> Result<u16, FormatError> {
    bytes
        .get(offset..offset + 2)
        .map(|s| u16::from_le_bytes([s[0], s[1]]))
        .ok_or(FormatError::Truncated(what))
}

fn read_u32(bytes: &[u8], offset: usize, what: &'static str) -> Result<u32, FormatError> {
    bytes
        .get(offset..offset + 4)
        .map(|s| u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
        .ok_or(FormatError::Truncated(what))
}

fn read_u64(bytes: &[u8], offset: usize, what: &'static str) -> Result<u64, FormatError> {
    bytes
        .get(offset..offset + 8)
        .map(|s| {
            let mut field = [0u8; 8];
            field.copy_from_slice(s);
            u64::from_le_bytes(field)
        })
        .ok_or(FormatError::Truncated(what))
}
