use dsc_server::{ConnectorServer, DEFAULT_CONFIG_PATH};

#[derive(clap::Parser)]
#[command(name = "dsc-server", about = "Runs a dataspace connector")]
struct Args {
    /// Configuration file; `DSC__`-prefixed environment variables override it.
    #[arg(long, env = "DSC_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = <Args as clap::Parser>::parse();

    ConnectorServer::new()
        .with_config_path(args.config)
        .with_json_logs(args.log_json)
        .run()
        .await
}
