use std::path::PathBuf;

#[derive(clap::Args, Clone, Debug)]
pub struct Config {
    /// Port to listen on
    #[arg(env = "PORT", default_value_t = 9081)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "LISTEN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Derive book details from a volumes document instead of the built-in record
    #[arg(
        long,
        env = "ENABLE_EXTERNAL_BOOK_SERVICE",
        default_value_t = false,
        action = clap::ArgAction::Set
    )]
    pub enable_external_book_service: bool,

    /// Volumes document read when the external source is enabled
    #[arg(long, env = "BOOK_VOLUMES_FILE", default_value = "book.json")]
    pub book_volumes_file: PathBuf,
}
