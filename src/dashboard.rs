//! dashboard.rs — Contexto da aplicação e despacho das interações do usuário
//!
//! Cada mudança em um dropdown vira uma chamada de função pura sobre a tabela
//! carregada. Quem hospeda o dashboard decide quando chamar cada uma.

use crate::dataset::EventTable;
use crate::figure::Figure;
use crate::options;
use crate::pairing;
use crate::types::{DropdownOption, Selection};
use tracing::debug;

/// Cabeçalho da página.
pub const PAGE_HEADING: &str = "VM Start-Stop Events Graph";

/// Contexto explícito: a tabela carregada na inicialização, somente leitura.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: EventTable,
}

/// Estado inicial da página: opções dos dois dropdowns e o gráfico sem filtros.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub rg_options: Vec<DropdownOption>,
    pub vm_options: Vec<DropdownOption>,
    pub figure: Figure,
}

impl Dashboard {
    pub fn new(table: EventTable) -> Self {
        Self { table }
    }

    pub fn rg_options(&self) -> Vec<DropdownOption> {
        options::rg_options(&self.table)
    }

    /// RG mudou: recalcula as opções de VM.
    pub fn on_rg_change(&self, selected_rg: Option<&str>) -> Vec<DropdownOption> {
        let options = options::vm_options(&self.table, selected_rg);
        debug!("RG selecionado {:?}: {} VMs disponíveis", selected_rg, options.len());
        options
    }

    /// Qualquer dropdown mudou: recalcula o gráfico.
    pub fn on_selection_change(&self, selection: &Selection) -> Figure {
        let rows = pairing::build_segments(
            &self.table,
            selection.rg.as_deref(),
            selection.vm.as_deref(),
        );
        let figure = Figure::from_segments(&rows);
        debug!(
            "Gráfico recalculado para {:?}: {} traces",
            selection,
            figure.traces.len()
        );
        figure
    }

    pub fn initial_view(&self) -> DashboardView {
        DashboardView {
            rg_options: self.rg_options(),
            vm_options: self.on_rg_change(None),
            figure: self.on_selection_change(&Selection::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
VMName,RG,OperationName,EventTimestampIST
vm1,RG1,start vm,01-01-2024 10.00
vm1,RG1,stop vm,01-01-2024 11.00
vm1,RG1,start vm,02-01-2024 09.00
vm1,RG1,stop vm,02-01-2024 10.00
vm2,RG2,start vm,01-01-2024 08.00
vm2,RG2,stop vm,01-01-2024 12.00
vm3,RG2,start vm,01-01-2024 08.00
";

    fn dashboard() -> Dashboard {
        Dashboard::new(EventTable::from_reader(SAMPLE.as_bytes()).unwrap())
    }

    fn selection(rg: Option<&str>, vm: Option<&str>) -> Selection {
        Selection {
            rg: rg.map(str::to_string),
            vm: vm.map(str::to_string),
        }
    }

    #[test]
    fn initial_view_shows_everything() {
        let view = dashboard().initial_view();
        assert_eq!(view.rg_options.len(), 2);
        assert_eq!(view.vm_options.len(), 3);
        // vm3 não tem stop, então não gera trace
        let labels: Vec<&str> = view.figure.traces.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["vm1 (RG1)", "vm2 (RG2)"]);
        // dois pares reais + um par sentinela
        assert_eq!(view.figure.traces[0].x.len(), 6);
    }

    #[test]
    fn rg_change_narrows_vm_options() {
        let options = dashboard().on_rg_change(Some("RG2"));
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["vm2", "vm3"]);
    }

    #[test]
    fn vm_selection_yields_single_trace() {
        let figure = dashboard().on_selection_change(&selection(None, Some("vm2")));
        assert_eq!(figure.traces.len(), 1);
        assert_eq!(figure.traces[0].label, "vm2 (RG2)");
    }

    #[test]
    fn vm_without_complete_pair_yields_no_trace() {
        let figure = dashboard().on_selection_change(&selection(None, Some("vm3")));
        assert!(figure.traces.is_empty());
    }

    #[test]
    fn mismatched_rg_and_vm_yield_empty_figure() {
        let figure = dashboard().on_selection_change(&selection(Some("RG1"), Some("vm2")));
        assert!(figure.traces.is_empty());
    }
}
