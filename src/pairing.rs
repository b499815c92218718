//! pairing.rs — Pareamento start/stop por VM e inserção de sentinelas de lacuna
//!
//! O i-ésimo start de uma VM é pareado com o i-ésimo stop, cada lista ordenada
//! por timestamp de forma independente. Não há casamento causal entre eventos.

use crate::dataset::EventTable;
use crate::types::{Action, Operation, SegmentRow, VmEvent};
use tracing::debug;

/// Constrói a tabela de segmentos para a seleção de RG/VM dada.
///
/// Percorre todas as VMs da tabela completa (não só as filtradas); VMs sem
/// eventos após o filtro simplesmente não geram linhas.
pub fn build_segments(table: &EventTable, rg: Option<&str>, vm: Option<&str>) -> Vec<SegmentRow> {
    let start_op = Operation::Start;
    let stop_op = Operation::Stop;
    let starts: Vec<&VmEvent> = table.select(&start_op, rg, vm).collect();
    let stops: Vec<&VmEvent> = table.select(&stop_op, rg, vm).collect();

    let mut rows = Vec::new();
    for vm_name in table.vm_names() {
        let vm_starts = sorted_for_vm(&starts, vm_name);
        let vm_stops = sorted_for_vm(&stops, vm_name);
        pair_vm_events(vm_name, &vm_starts, &vm_stops, &mut rows);
    }

    debug!(
        "Segmentos recalculados (rg={:?}, vm={:?}): {} linhas, {} sentinelas",
        rg,
        vm,
        rows.len(),
        rows.iter().filter(|r| r.is_gap()).count()
    );
    rows
}

/// Eventos de uma VM ordenados por timestamp (ordenação estável).
fn sorted_for_vm<'a>(events: &[&'a VmEvent], vm_name: &str) -> Vec<&'a VmEvent> {
    let mut out: Vec<&VmEvent> = events
        .iter()
        .copied()
        .filter(|e| e.vm_name == vm_name)
        .collect();
    out.sort_by_key(|e| e.timestamp);
    out
}

/// Zip posicional de starts e stops, truncado na lista mais curta.
fn pair_vm_events(vm_name: &str, starts: &[&VmEvent], stops: &[&VmEvent], rows: &mut Vec<SegmentRow>) {
    for (i, (start, stop)) in starts.iter().zip(stops.iter()).enumerate() {
        if i > 0 {
            let previous_stop = stops[i - 1];
            // Datas diferentes entre o stop anterior e o start atual quebram a linha
            if start.timestamp.date() != previous_stop.timestamp.date() {
                rows.push(row(vm_name, &previous_stop.rg, None, Action::Stop));
                rows.push(row(vm_name, &start.rg, None, Action::Start));
            }
        }
        rows.push(row(vm_name, &start.rg, Some(start.timestamp), Action::Start));
        rows.push(row(vm_name, &stop.rg, Some(stop.timestamp), Action::Stop));
    }
}

fn row(vm_name: &str, rg: &str, timestamp: Option<chrono::NaiveDateTime>, action: Action) -> SegmentRow {
    SegmentRow {
        vm_name: vm_name.to_string(),
        rg: rg.to_string(),
        timestamp,
        action,
    }
}
