use std::collections::BTreeMap;

use eframe::egui::{Stroke, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points};

use crate::data::model::CellValue;
use crate::state::AppState;

const BOX_WIDTH: f64 = 0.6;

// ---------------------------------------------------------------------------
// Distribution plot (central panel)
// ---------------------------------------------------------------------------

/// Box plot of the chosen variable per (dimension, country) pair, coloured
/// by country, with every point overlaid.
pub fn distribution_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let (Some(variable), Some(dimension)) = (&state.variable, state.dimension) else {
        return;
    };

    // One x slot per group; labels are looked up by slot for the axis.
    let labels: Vec<String> = state
        .distribution
        .iter()
        .map(|g| format!("{} ({})", g.dimension_value, g.label))
        .collect();

    // Boxes and points are bucketed by country so the legend lists countries.
    let mut boxes: BTreeMap<&CellValue, Vec<BoxElem>> = BTreeMap::new();
    let mut points: BTreeMap<&CellValue, Vec<[f64; 2]>> = BTreeMap::new();
    for (slot, group) in state.distribution.iter().enumerate() {
        let x = slot as f64;
        let color = state.color_map.color_for(&group.label);
        if let Some(s) = group.summary {
            let elem = BoxElem::new(
                x,
                BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
            )
            .name(&labels[slot])
            .box_width(BOX_WIDTH)
            .whisker_width(BOX_WIDTH / 2.0)
            .fill(color.linear_multiply(0.25))
            .stroke(Stroke::new(1.5, color));
            boxes.entry(&group.label).or_default().push(elem);
        }
        points
            .entry(&group.label)
            .or_default()
            .extend(group.values.iter().map(|&v| [x, v]));
    }

    let axis_labels = labels.clone();
    Plot::new("distribution_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label(dimension)
        .y_axis_label(variable.as_str())
        .x_axis_formatter(move |mark: GridMark, _range| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > f64::EPSILON || slot < 0.0 {
                return String::new();
            }
            axis_labels.get(slot as usize).cloned().unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (label, elems) in boxes {
                let color = state.color_map.color_for(label);
                plot_ui.box_plot(BoxPlot::new(elems).name(label.to_string()).color(color));
            }
            for (label, pts) in points {
                let color = state.color_map.color_for(label);
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .name(label.to_string())
                        .color(color.linear_multiply(0.6))
                        .radius(1.5),
                );
            }
        });
}
