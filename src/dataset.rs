//! dataset.rs — Carga do log de eventos de VM (CSV) em memória
//!
//! A tabela é carregada uma única vez e depois só é lida.

use crate::types::{EventRecord, Operation, VmEvent};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Formato fixo de `EventTimestampIST`: dia primeiro, ponto separando hora e minuto.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H.%M";

/// Erros fatais de carga do CSV.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("não foi possível abrir {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Linha malformada ou coluna obrigatória ausente.
    #[error("erro lendo CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("timestamp inválido na linha {row}: {value:?} (esperado DD-MM-YYYY HH.MM)")]
    Timestamp {
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Converte `EventTimestampIST` para `NaiveDateTime`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
}

/// Tabela imutável de eventos, na ordem do arquivo.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    events: Vec<VmEvent>,
}

impl EventTable {
    pub fn new(events: Vec<VmEvent>) -> Self {
        Self { events }
    }

    /// Carrega o CSV do disco.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        info!(
            "Log de eventos carregado de {}: {} linhas, {} VMs, {} RGs",
            path.display(),
            table.len(),
            table.vm_names().len(),
            table.rg_names().len()
        );
        Ok(table)
    }

    /// Lê o CSV de qualquer fonte. Qualquer timestamp inválido aborta a carga inteira.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
        let mut events = Vec::new();

        for (index, record) in rdr.deserialize::<EventRecord>().enumerate() {
            let record = record?;
            let timestamp = parse_timestamp(&record.event_timestamp_ist).map_err(|source| {
                DatasetError::Timestamp {
                    row: index + 1,
                    value: record.event_timestamp_ist.clone(),
                    source,
                }
            })?;
            events.push(VmEvent {
                operation: Operation::from(record.operation_name.as_str()),
                vm_name: record.vm_name,
                rg: record.rg,
                timestamp,
            });
        }

        let starts = events.iter().filter(|e| e.operation == Operation::Start).count();
        let stops = events.iter().filter(|e| e.operation == Operation::Stop).count();
        debug!(
            "CSV parseado: {} eventos ({} start, {} stop, {} outros)",
            events.len(),
            starts,
            stops,
            events.len() - starts - stops
        );

        Ok(Self { events })
    }

    pub fn events(&self) -> &[VmEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Nomes de VM distintos, na ordem em que aparecem no arquivo.
    pub fn vm_names(&self) -> Vec<&str> {
        distinct(self.events.iter().map(|e| e.vm_name.as_str()))
    }

    /// Nomes de RG distintos, na ordem em que aparecem no arquivo.
    pub fn rg_names(&self) -> Vec<&str> {
        distinct(self.events.iter().map(|e| e.rg.as_str()))
    }

    /// Eventos de uma operação específica, filtrados opcionalmente por RG e VM (igualdade exata).
    pub fn select<'a>(
        &'a self,
        operation: &'a Operation,
        rg: Option<&'a str>,
        vm: Option<&'a str>,
    ) -> impl Iterator<Item = &'a VmEvent> + 'a {
        self.events
            .iter()
            .filter(move |e| &e.operation == operation)
            .filter(move |e| rg.is_none_or(|rg| e.rg == rg))
            .filter(move |e| vm.is_none_or(|vm| e.vm_name == vm))
    }
}

/// Remove duplicados preservando a ordem da primeira ocorrência.
pub(crate) fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    names.filter(|name| seen.insert(*name)).collect()
}
