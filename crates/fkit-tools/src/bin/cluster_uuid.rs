//! Prints the cluster UUID (the UID of the kube-system namespace)

use fkit_tools::{cluster::ClusterClient, logging, ToolsConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = ToolsConfig::from_env();
    let client = ClusterClient::in_cluster(&config)?;

    println!("{}", client.cluster_uuid().await?);
    Ok(())
}
