pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bosh-sd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "BOSH service discovery for Prometheus", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to a YAML configuration file")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Publish target groups periodically until interrupted")]
    Run,
    #[command(about = "Run a single collection cycle")]
    Once {
        #[arg(long, help = "Print the scrape gauges after the cycle")]
        print_metrics: bool,
    },
}

/// Flags that override the configuration file
#[derive(Args, Debug, Default)]
pub struct Overrides {
    #[arg(
        long = "filter.deployments",
        value_delimiter = ',',
        global = true,
        help = "Comma separated deployments to filter",
    )]
    pub deployments: Option<Vec<String>>,

    #[arg(
        long = "filter.azs",
        value_delimiter = ',',
        global = true,
        help = "Comma separated AZs to filter",
    )]
    pub azs: Option<Vec<String>>,

    #[arg(
        long = "filter.cidrs",
        value_delimiter = ',',
        global = true,
        help = "Comma separated CIDR ranges to select instance IPs from",
    )]
    pub cidrs: Option<Vec<String>>,

    #[arg(
        long = "filter.processes",
        value_delimiter = ',',
        global = true,
        help = "Comma separated process names or patterns to filter",
    )]
    pub processes: Option<Vec<String>>,

    #[arg(
        long = "bosh.max-queued-tasks",
        global = true,
        help = "Skip cycles while more tasks than this are queued (0 disables)",
    )]
    pub queued_task_limit: Option<usize>,

    #[arg(long = "bosh.inventory", global = true, help = "Path to the director inventory file")]
    pub inventory_path: Option<PathBuf>,

    #[arg(
        long = "sd.filename",
        global = true,
        help = "Target groups file to write; its file name is the ConfigMap key",
    )]
    pub sd_filename: Option<PathBuf>,

    #[arg(
        long = "sd.configmap",
        global = true,
        help = "Publish to this ConfigMap instead of a file",
    )]
    pub sd_configmap: Option<String>,

    #[arg(
        long = "sd.configmap-namespace",
        global = true,
        help = "Namespace of the target groups ConfigMap [default: default]",
    )]
    pub sd_configmap_namespace: Option<String>,

    #[arg(long = "interval", global = true, help = "Seconds between collection cycles")]
    pub interval_secs: Option<u64>,
}
