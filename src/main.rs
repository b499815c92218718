mod config;
mod dashboard;
mod dataset;
mod figure;
mod options;
mod pairing;
mod server;
mod types;

use anyhow::{Context, Result};
use tracing::{Level, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Carrega a configuração antes do logging para saber o nível
    let config: config::Config = config::Config::load()?;

    let level = if config.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();
    info!("Configuração carregada: {:?}", config);

    // Tabela carregada uma vez; erro de leitura ou de timestamp encerra o processo
    let table = dataset::EventTable::load(&config.data_file)
        .with_context(|| format!("falha ao carregar {}", config.data_file.display()))?;
    if table.is_empty() {
        warn!("Nenhum evento encontrado em {}", config.data_file.display());
    }

    let dashboard = dashboard::Dashboard::new(table);
    server::run_server(dashboard, &config.bind_address()).await
}
