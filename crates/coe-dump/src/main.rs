use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use std::fmt::Write as _;
use std::path::Path;

use hex2coe_rs::hexfile::render_hex;
use hex2coe_rs::NOP_WORD;

use coe_dump::{load_coe, read_u8, read_u32, summarize, Image};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect Xilinx COE block memory files", long_about=None)]
struct Cli {
    /// Input COE path
    #[arg(value_name = "COEFILE")]
    input: String,
    /// Word treated as unused when summarizing or re-exporting (hex or dec)
    #[arg(long, value_parser = parse_u32, default_value_t = NOP_WORD)]
    fill: u32,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Radix, depth and occupancy
    Info {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List words in a byte range [start, end)
    Range {
        /// Start byte address (hex or dec)
        start: String,
        /// End byte address (hex or dec, exclusive)
        end: String,
        /// Show the little-endian bytes of each word
        #[arg(long)]
        show_bytes: bool,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
    /// Write the raw little-endian byte image
    Bin {
        #[arg(long, value_name = "FILE")]
        out: String,
    },
    /// Write the image back as an @-addressed hex listing
    Hex {
        #[arg(long, value_name = "FILE")]
        out: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

fn render_range(img: &Image, start: u32, end: u32, show_bytes: bool) -> String {
    let mut buf = String::new();
    // listing is word granular
    let mut addr = start & !3;
    while addr < end {
        let Some(word) = read_u32(img, addr) else {
            let _ = writeln!(buf, "{addr:#010x}: <oob>");
            break;
        };
        if show_bytes {
            let _ = write!(buf, "{addr:#010x}: ");
            for i in 0..4 {
                let _ = write!(buf, "{:02x} ", read_u8(img, addr + i).unwrap_or(0));
            }
            let _ = writeln!(buf, "  {word:08x}");
        } else {
            let _ = writeln!(buf, "{addr:#010x}: {word:08x}");
        }
        addr = addr.wrapping_add(4);
    }
    buf
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let img = load_coe(Path::new(&cli.input), cli.fill)?;

    match cli.cmd {
        Command::Info { format } => {
            let s = summarize(&img);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&s)?),
                OutputFormat::Text => {
                    println!("radix      : {}", s.radix);
                    println!("depth      : {} words ({} bytes)", s.depth, s.bytes);
                    println!("fill       : {:#010x}", s.fill);
                    println!("used words : {}", s.non_fill_words);
                    match s.last_non_fill {
                        Some(a) => println!("last used  : {a:#010x}"),
                        None => println!("last used  : -"),
                    }
                }
            }
        }
        Command::Range { start, end, show_bytes, out } => {
            let start = parse_u32(&start)?;
            let end = parse_u32(&end)?;
            anyhow::ensure!(end >= start, "end must be >= start");
            let buf = render_range(&img, start, end, show_bytes);
            if let Some(path) = out { std::fs::write(path, buf)?; } else { print!("{}", buf); }
        }
        Command::Bin { out } => {
            std::fs::write(&out, img.mem.to_le_bytes())?;
        }
        Command::Hex { out } => {
            std::fs::write(&out, render_hex(&img.mem))?;
        }
    }

    Ok(())
}
