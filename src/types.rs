use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Valor de `OperationName` que marca o início de uma VM.
pub const START_OPERATION: &str = "start vm";
/// Valor de `OperationName` que marca a parada de uma VM.
pub const STOP_OPERATION: &str = "stop vm";

/// Linha crua do CSV, exatamente como vem do arquivo.
///
/// Colunas extras são ignoradas pelo leitor; as quatro abaixo são obrigatórias.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "VMName")]
    pub vm_name: String,
    #[serde(rename = "RG")]
    pub rg: String,
    #[serde(rename = "OperationName")]
    pub operation_name: String,
    #[serde(rename = "EventTimestampIST")]
    pub event_timestamp_ist: String,
}

/// Tipo de operação registrada no log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Start,
    Stop,
    /// Qualquer outra operação (ignorada no pareamento).
    Other(String),
}

impl From<&str> for Operation {
    fn from(name: &str) -> Self {
        // Comparação exata, sem normalizar caixa ou espaços
        match name {
            START_OPERATION => Operation::Start,
            STOP_OPERATION => Operation::Stop,
            other => Operation::Other(other.to_string()),
        }
    }
}

/// Evento de VM já com timestamp parseado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmEvent {
    pub vm_name: String,
    pub rg: String,
    pub timestamp: NaiveDateTime,
    pub operation: Operation,
}

/// Ação de uma linha de segmento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
}

/// Linha da tabela de segmentos pronta para plotagem.
///
/// `timestamp == None` indica um sentinela de lacuna.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentRow {
    pub vm_name: String,
    pub rg: String,
    pub timestamp: Option<NaiveDateTime>,
    pub action: Action,
}

impl SegmentRow {
    pub fn is_gap(&self) -> bool {
        self.timestamp.is_none()
    }
}

/// Opção de dropdown (label/value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new(name: &str) -> Self {
        Self {
            label: name.to_string(),
            value: name.to_string(),
        }
    }
}

/// Seleção atual dos dois dropdowns do dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub rg: Option<String>,
    #[serde(default)]
    pub vm: Option<String>,
}

impl Selection {
    /// Dropdown limpo chega como string vazia; trata como "sem seleção".
    pub fn normalized(self) -> Self {
        Self {
            rg: self.rg.filter(|s| !s.is_empty()),
            vm: self.vm.filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_matches_exact_names_only() {
        assert_eq!(Operation::from("start vm"), Operation::Start);
        assert_eq!(Operation::from("stop vm"), Operation::Stop);
        assert_eq!(
            Operation::from("Start VM"),
            Operation::Other("Start VM".to_string())
        );
        assert_eq!(
            Operation::from("deallocate vm"),
            Operation::Other("deallocate vm".to_string())
        );
    }

    #[test]
    fn empty_selection_values_become_none() {
        let selection = Selection {
            rg: Some(String::new()),
            vm: Some("vm1".to_string()),
        }
        .normalized();
        assert_eq!(selection.rg, None);
        assert_eq!(selection.vm.as_deref(), Some("vm1"));
    }

    #[test]
    fn action_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Action::Start).unwrap(), "\"start\"");
        assert_eq!(serde_json::to_string(&Action::Stop).unwrap(), "\"stop\"");
    }
}
