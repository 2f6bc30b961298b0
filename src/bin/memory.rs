use std::path::PathBuf;

use domain_counter::DomainCounter;

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: memory <file.csv>")?;

    let _profiler = dhat::Profiler::new_heap();

    let report = DomainCounter::new().count(&path)?;
    println!(
        "{} rows, {} distinct domains",
        report.rows_scanned,
        report.ranked.len()
    );

    println!("Memory benchmark finished. See dhat-heap.json for details");
    Ok(())
}
