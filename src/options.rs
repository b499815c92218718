//! options.rs — Opções dos dropdowns de RG e VM

use crate::dataset::{EventTable, distinct};
use crate::types::DropdownOption;

/// Todos os RGs do log, na ordem de primeira aparição.
pub fn rg_options(table: &EventTable) -> Vec<DropdownOption> {
    table.rg_names().into_iter().map(DropdownOption::new).collect()
}

/// VMs visíveis para o RG selecionado, ou todas se nenhum RG foi escolhido.
pub fn vm_options(table: &EventTable, selected_rg: Option<&str>) -> Vec<DropdownOption> {
    let names = table
        .events()
        .iter()
        .filter(|e| selected_rg.is_none_or(|rg| e.rg == rg))
        .map(|e| e.vm_name.as_str());
    distinct(names).into_iter().map(DropdownOption::new).collect()
}
