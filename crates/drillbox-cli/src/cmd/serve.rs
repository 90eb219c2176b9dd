//! Serve subcommand - webhook receiver and roster routes

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (e.g. 127.0.0.1:8000)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// JSON journal of received characters
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Notification feed file
    #[arg(long)]
    pub notification_file: Option<PathBuf>,

    /// URL pinged after each webhook
    #[arg(long, conflicts_with = "no_notify")]
    pub notify_url: Option<String>,

    /// Do not ping any notifier
    #[arg(long)]
    pub no_notify: bool,
}

pub fn run(args: ServeArgs, config: &Config) -> Result<()> {
    let mut server = config.server_config();
    if let Some(bind) = args.bind {
        server.bind = bind;
    }
    if let Some(path) = args.log_file {
        server.log_file = path;
    }
    if let Some(path) = args.notification_file {
        server.notification_file = path;
    }
    if let Some(url) = args.notify_url {
        server.notify_url = Some(url);
    }
    if args.no_notify {
        server.notify_url = None;
    }

    drillbox_core::SHARED_RUNTIME.block_on(drillbox_roster::serve(server))
}
