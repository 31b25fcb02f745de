//! Plain-text result tables.

use curvetracer::{AngleRow, NoIntersectionPolicy, VoxelSample};

/// `Label  Value` table, one row per trajectory point.
pub fn sample_table(samples: &[VoxelSample]) -> String {
    let rows = samples
        .iter()
        .map(|s| [s.label.clone().unwrap_or_default(), format!("{}", s.value)])
        .collect::<Vec<_>>();
    render(["Label", "Value"], &rows)
}

/// `Model  Entry Angle (Degrees)` table, one row per structure.
pub fn angle_table(rows: &[AngleRow], policy: NoIntersectionPolicy) -> String {
    let rows = rows
        .iter()
        .map(|r| {
            let angle = r
                .angle
                .resolve(policy)
                .map_or_else(|| "-".to_string(), |d| format!("{d:.6}"));
            [r.name.clone(), angle]
        })
        .collect::<Vec<_>>();
    render(["Model", "Entry Angle (Degrees)"], &rows)
}

fn render(header: [&str; 2], rows: &[[String; 2]]) -> String {
    let width = rows
        .iter()
        .map(|r| r[0].chars().count())
        .chain(std::iter::once(header[0].len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<width$}  {}\n", header[0], header[1]);
    for [left, right] in rows {
        out.push_str(&format!("{left:<width$}  {right}\n"));
    }
    out
}
