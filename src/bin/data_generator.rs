use clap::{Parser, ValueEnum};
use rand::Rng;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

const DOMAINS: [&str; 8] = [
    "gmail.com",
    "yahoo.com",
    "outlook.com",
    "example.com",
    "protonmail.com",
    "aol.com",
    "mail.com",
    "icloud.com",
];

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// A handful of popular domains picked at random
    Random,
    /// A distinct domain per row
    Unique,
}

#[derive(Parser)]
#[command(about = "Generate a synthetic customers CSV")]
struct Args {
    #[arg(
        short,
        long,
        default_value_t = 1_000_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    rows: u64,

    #[arg(short, long, default_value = "samples/customers.csv")]
    output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Mode::Random)]
    mode: Mode,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(&args.output)?);

    writeln!(writer, "first_name,last_name,email,gender,ip_address")?;

    let mut rng = rand::rng();
    for i in 0..args.rows {
        match args.mode {
            Mode::Random => {
                let domain = DOMAINS[rng.random_range(0..DOMAINS.len())];
                let gender = ["Male", "Female"][rng.random_range(0..2)];
                let ip: [u8; 4] = rng.random();
                writeln!(
                    writer,
                    "First{i},Last{i},user{i}@{domain},{gender},{}.{}.{}.{}",
                    ip[0], ip[1], ip[2], ip[3]
                )?;
            }
            Mode::Unique => {
                let gender = ["Male", "Female"][(i % 2) as usize];
                writeln!(
                    writer,
                    "First{i},Last{i},user{i}@domain{i}.com,{gender},{}.{}.{}.{}",
                    i % 256,
                    (i / 256) % 256,
                    (i / 65_536) % 256,
                    (i / 16_777_216) % 256
                )?;
            }
        }
    }

    writer.flush()?;
    println!("Sample CSV generated: {} ({} rows)", args.output.display(), args.rows);
    Ok(())
}
