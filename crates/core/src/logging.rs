//! Console logging setup
//!
//! Two channels: information (always shown) and debug (verbose only). Output is plain
//! line-oriented text without timestamps or level prefixes, since it is read by people
//! watching a build.

use tracing::level_filters::LevelFilter;

/// Install the global console subscriber.
///
/// Safe to call more than once; only the first call takes effect.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_writer(std::io::stdout)
        .try_init();
}
