use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use picos_core::io::rawseq::RawSeqReader;

#[derive(Args)]
pub struct InfoArgs {
    /// Recorded raw sequence file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let reader = RawSeqReader::open(&args.file)?;
    let info = reader.info(&args.file);

    println!("File:        {}", info.filename.display());
    println!("Frames:      {}", info.total_frames);
    println!("Dimensions:  {}x{}", info.width, info.height);

    if info.recorded_at_us > 0 {
        let secs = (info.recorded_at_us / 1_000_000) as i64;
        if let Some(ts) = chrono::DateTime::from_timestamp(secs, 0) {
            println!("Recorded:    {}", ts.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }

    let frame_bytes = reader.header.frame_byte_size();
    let total_mb = (frame_bytes * info.total_frames) as f64 / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    Ok(())
}
