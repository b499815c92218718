//! figure.rs — Agrupamento dos segmentos em traces por VM e montagem do gráfico plotly

use crate::types::SegmentRow;
use chrono::NaiveDateTime;
use plotly::common::{Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};

pub const FIGURE_TITLE: &str = "VM Start-Stop Events";
pub const X_AXIS_TITLE: &str = "Timestamp";
pub const Y_AXIS_TITLE: &str = "VM Name";

/// Linha de vida de uma VM: eixo x temporal, eixo y categórico constante.
#[derive(Debug, Clone, PartialEq)]
pub struct VmTrace {
    pub vm_name: String,
    /// `"VMName (RG)"`, usando o RG da primeira linha da VM.
    pub label: String,
    pub x: Vec<Option<NaiveDateTime>>,
}

impl VmTrace {
    pub fn y(&self) -> Vec<String> {
        vec![self.label.clone(); self.x.len()]
    }
}

/// Gráfico completo, independente do formato de saída.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub traces: Vec<VmTrace>,
}

impl Figure {
    /// Agrupa as linhas por VM, na ordem de primeira aparição.
    pub fn from_segments(rows: &[SegmentRow]) -> Self {
        let mut traces: Vec<VmTrace> = Vec::new();
        for row in rows {
            match traces.iter_mut().find(|t| t.vm_name == row.vm_name) {
                Some(trace) => trace.x.push(row.timestamp),
                None => traces.push(VmTrace {
                    vm_name: row.vm_name.clone(),
                    label: format!("{} ({})", row.vm_name, row.rg),
                    x: vec![row.timestamp],
                }),
            }
        }
        Self { traces }
    }

    /// Converte para `plotly::Plot`. Timestamps nulos viram `null` e quebram a linha.
    pub fn to_plot(&self) -> Plot {
        let mut plot = Plot::new();
        for trace in &self.traces {
            let scatter = Scatter::new(trace.x.clone(), trace.y())
                .mode(Mode::LinesMarkers)
                .name(trace.label.as_str());
            plot.add_trace(scatter);
        }
        plot.set_layout(
            Layout::new()
                .title(Title::new(FIGURE_TITLE))
                .x_axis(Axis::new().title(Title::new(X_AXIS_TITLE)))
                .y_axis(Axis::new().title(Title::new(Y_AXIS_TITLE))),
        );
        plot
    }

    /// JSON no formato `{data, layout}` consumido pelo plotly.js.
    pub fn to_json(&self) -> String {
        self.to_plot().to_json()
    }
}
