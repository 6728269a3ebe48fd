use clap::Parser;
use log::info;

/// Command Line Interpretation - uses the external CLAP crate.
/// (Define version and about here.)
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "bunzip2, a streaming decompressor for bzip2 files",
    long_about = None)]
pub struct BzOpts {
    /// Files to decompress. Reads stdin and writes stdout when empty.
    pub files: Vec<String>,

    /// Write output to the terminal
    #[clap(short = 'c', long = "stdout")]
    pub stdout: bool,

    /// Test compressed file integrity without writing output
    #[clap(short = 't', long = "test")]
    pub test: bool,

    /// Keep (don't delete) input files
    #[clap(short = 'k', long = "keep")]
    pub keep: bool,

    /// Overwrite existing output files
    #[clap(short = 'f', long = "force")]
    pub force: bool,

    /// Sets verbosity. -v shows very little, -vvvv is chatty
    #[clap(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse the command line and set the log level it asks for.
pub fn bzopts_init() -> BzOpts {
    let opts = BzOpts::parse();

    match opts.verbose {
        0 => log::set_max_level(log::LevelFilter::Error),
        1 => log::set_max_level(log::LevelFilter::Warn),
        2 => log::set_max_level(log::LevelFilter::Info),
        3 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    };

    info!("---- Bunzip2 Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    match opts.files.len() {
        0 => info!("Reading from stdin"),
        n => info!("Decompressing {} file(s)", n),
    }
    if opts.test {
        info!("Testing integrity only, no output will be written");
    }
    if opts.force {
        info!("Forcing file overwriting");
    }
    if opts.keep {
        info!("Keeping input files");
    }
    info!("---- Bunzip2 Initialization End ----\n");

    opts
}
