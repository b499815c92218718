use config as config_crate;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuração do dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Caminho do CSV com os eventos de start/stop.
    pub data_file: PathBuf,
    /// Endereço de bind do servidor HTTP.
    pub host: String,
    /// Porta do servidor HTTP.
    pub port: u16,
    /// Ativa logs em nível debug.
    pub debug: bool,
}

impl Config {
    /// Defaults, depois `config.{toml,yaml,json}` (opcional), depois variáveis `VM_TIMELINE_*`.
    pub fn load() -> anyhow::Result<Self> {
        let settings = config_crate::Config::builder()
            .set_default("data_file", "data.csv")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8050)?
            .set_default("debug", false)?
            .add_source(config_crate::File::with_name("config").required(false))
            .add_source(config_crate::Environment::with_prefix("VM_TIMELINE"))
            .build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port deve ser maior que zero".into());
        }
        if self.data_file.as_os_str().is_empty() {
            return Err("data_file não pode ser vazio".into());
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
