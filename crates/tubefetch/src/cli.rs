use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tubefetch")]
#[command(author, version, about = "Download a video as MP4 or its audio as MP3", long_about = None)]
pub struct Cli {
    /// Video page URL
    pub url: Option<String>,

    /// Download audio only, transcoded to MP3
    #[arg(short, long)]
    pub audio: bool,

    /// Video quality: highest, 2160p, 1440p, 1080p, 720p, 480p, 360p
    #[arg(short, long, default_value = "1080p")]
    pub quality: String,

    /// Directory the finished file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Print the available quality tiers and exit
    #[arg(long)]
    pub list_qualities: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
