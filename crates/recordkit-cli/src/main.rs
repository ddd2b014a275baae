//! The `recordkit` command-line tool.
//!
//! ```bash
//! recordkit orm
//! recordkit record --json '{"name": "Ada", "year_born": 1815}'
//! recordkit --settings recordkit.toml singleton
//! ```

use std::io;

fn main() {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = recordkit_cli::run(std::env::args_os(), &mut out) {
        match err.downcast_ref::<clap::Error>() {
            Some(clap_err) => clap_err.exit(),
            None => {
                eprintln!("Error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}
