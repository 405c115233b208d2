use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use log::error;
use structopt::StructOpt;

use crate::dns::cloudflare::Cloudflare;
use crate::error::{terminal_message, UpdateError};
use crate::runlog::RunLog;

mod config;
mod dns;
mod error;
mod run;
mod runlog;
#[cfg(test)]
mod testserver;
mod wan;

const RUST_BACKTRACE: &str = "RUST_BACKTRACE";

#[derive(StructOpt, Debug)]
pub(crate) struct CfDynDns {
    /// Verbosity of output, 1 occurrence for debug, 2 occurrences for trace
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: usize,
    /// Path to the YAML configuration file
    #[structopt(short, long, default_value = "cf-dyn-dns.yml")]
    pub config: PathBuf,
}

fn main() -> color_eyre::Result<()> {
    if std::env::var_os(RUST_BACKTRACE).is_none() {
        std::env::set_var(RUST_BACKTRACE, "1");
    }

    let args: CfDynDns = CfDynDns::from_args();

    color_eyre::install()?;
    stderrlog::new()
        .verbosity(args.verbose + 2)
        .init()
        .wrap_err("Failed to initialize logging")?;

    match update(&args) {
        Ok(()) => Ok(()),
        Err(err) => {
            error!("{}", terminal_message(&err));
            Err(err.into())
        }
    }
}

fn update(args: &CfDynDns) -> Result<(), UpdateError> {
    let settings = config::load(&args.config)?;
    let mut runlog = RunLog::open(&settings.logging)?;
    if settings.logging.syslog {
        runlog.warn("Syslog mirroring is not supported, ignoring logging.syslog");
    }

    let wan = wan::resolve(&settings)?;
    let cloudflare = Cloudflare::new(&settings.cloudflare_email, &settings.cloudflare_auth_key);
    run::run(&settings, &cloudflare, &wan, &mut runlog)
}
