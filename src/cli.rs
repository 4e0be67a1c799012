use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Web form that shows the transcript of a YouTube video as its summary",
    version
)]
pub struct Cli {
    /// Address to listen on, e.g. 127.0.0.1:5000
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Preferred transcript language (repeat for more, in priority order)
    #[arg(short, long = "lang")]
    pub lang: Vec<String>,

    /// Timeout in seconds for requests to YouTube
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Config file to read instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show config and listen address on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
