use serde_json::json;

use crate::codec::binary;
use crate::error::{LayoutError, Result};
use crate::geometry::{Rect, Size};
use crate::layout::{
    BLANK_CUSTOM_ID, COLUMNS_ID, CanvasLayout, FOCUS_ID, GRID_ID, GridLayout, LayoutBody,
    LayoutKind, LayoutModel, PERCENT_SCALE, PRIORITY_GRID_ID, ROWS_ID,
};
use crate::logging::{LogLevel, Logger, TARGET_GENERATOR, emit, json_kv};
use crate::settings::EditorConfig;

use super::priority::PRIORITY_GRID_BLOBS;

// The pure builders below treat zone counts under one as one.

/// Split 100% into `count` tracks of `floor(10000 / count)`, handing the
/// remainder out one unit at a time from the first track so the sum is
/// exactly [`PERCENT_SCALE`].
///
/// Tracks are therefore not all equal when `count` does not divide 10000:
/// three tracks are `[3334, 3333, 3333]`, not three of `3333`. Uniform
/// floored tracks would leave the grid a few units short of the work area.
pub fn split_percents(count: usize) -> Vec<i32> {
    if count == 0 {
        return Vec::new();
    }
    let count_i = count as i32;
    let base = PERCENT_SCALE / count_i;
    let remainder = (PERCENT_SCALE - base * count_i) as usize;
    (0..count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Cascade of `zone_count` copies of a 60% rectangle, each shifted right and
/// down from the previous one. Later zones sit on top.
pub fn focus_zones(zone_count: i32, reference: Size) -> Vec<Rect> {
    let width = f64::from(reference.width);
    let height = f64::from(reference.height);
    let mut zone = Rect::new(
        (width * 0.1) as i32,
        (height * 0.1) as i32,
        (width * 0.6) as i32,
        (height * 0.6) as i32,
    );
    let (dx, dy) = if zone_count <= 1 {
        (0, 0)
    } else {
        (
            (width * 0.2) as i32 / (zone_count - 1),
            (height * 0.2) as i32 / (zone_count - 1),
        )
    };

    let mut zones = Vec::with_capacity(zone_count.max(0) as usize);
    for _ in 0..zone_count {
        zones.push(zone);
        zone.x += dx;
        zone.y += dy;
    }
    zones
}

pub fn columns_layout(zone_count: i32) -> GridLayout {
    let zone_count = zone_count.max(1);
    GridLayout::from_parts_unchecked(
        1,
        zone_count,
        vec![PERCENT_SCALE],
        split_percents(zone_count as usize),
        vec![(0..zone_count).collect()],
    )
}

pub fn rows_layout(zone_count: i32) -> GridLayout {
    let zone_count = zone_count.max(1);
    GridLayout::from_parts_unchecked(
        zone_count,
        1,
        split_percents(zone_count as usize),
        vec![PERCENT_SCALE],
        (0..zone_count).map(|i| vec![i]).collect(),
    )
}

/// Near-square `(rows, columns)` for `zone_count` zones.
pub fn grid_dimensions(zone_count: i32) -> (i32, i32) {
    let zone_count = zone_count.max(1);
    let mut rows = 1;
    while zone_count / rows >= rows {
        rows += 1;
    }
    rows -= 1;
    let columns = (zone_count + rows - 1) / rows;
    (rows, columns)
}

/// Balanced grid. Cells are numbered from the bottom-right corner, walking
/// each column bottom to top and columns right to left; once the last zone
/// index is reached the remaining cells join it.
pub fn grid_layout(zone_count: i32) -> GridLayout {
    let zone_count = zone_count.max(1);
    let (rows, columns) = grid_dimensions(zone_count);
    let mut cell_child_map = vec![vec![0; columns as usize]; rows as usize];

    let mut index = 0;
    for column in (0..columns as usize).rev() {
        for row in (0..rows as usize).rev() {
            cell_child_map[row][column] = index;
            index += 1;
            if index == zone_count {
                index -= 1;
            }
        }
    }

    GridLayout::from_parts_unchecked(
        rows,
        columns,
        split_percents(rows as usize),
        split_percents(columns as usize),
        cell_child_map,
    )
}

/// Hand-tuned layout for up to eleven zones, the balanced grid beyond that.
pub fn priority_grid_layout(zone_count: i32) -> Result<GridLayout> {
    if zone_count < 1 {
        return Err(LayoutError::InvalidZoneCount(zone_count));
    }
    match usize::try_from(zone_count - 1)
        .ok()
        .and_then(|i| PRIORITY_GRID_BLOBS.get(i))
    {
        Some(blob) => Ok(binary::decode_grid(blob)?),
        None => Ok(grid_layout(zone_count)),
    }
}

/// Owns the five built-in layouts (plus the blank custom placeholder) and
/// regenerates them for a zone count and reference frame.
///
/// Regeneration is deterministic and replaces all previous geometry.
#[derive(Debug)]
pub struct DefaultLayoutGenerator {
    reference: Size,
    zone_count: i32,
    focus: LayoutModel,
    columns: LayoutModel,
    rows: LayoutModel,
    grid: LayoutModel,
    priority_grid: LayoutModel,
    blank_custom: LayoutModel,
    logger: Option<Logger>,
}

impl DefaultLayoutGenerator {
    pub fn new(reference: Size, zone_count: i32) -> Result<Self> {
        let mut generator = Self {
            reference,
            zone_count: 0,
            focus: LayoutModel::canvas("Focus", CanvasLayout::new(reference)).with_id(FOCUS_ID),
            columns: LayoutModel::grid("Columns", GridLayout::default()).with_id(COLUMNS_ID),
            rows: LayoutModel::grid("Rows", GridLayout::default()).with_id(ROWS_ID),
            grid: LayoutModel::grid("Grid", GridLayout::default()).with_id(GRID_ID),
            priority_grid: LayoutModel::grid("Priority Grid", GridLayout::default())
                .with_id(PRIORITY_GRID_ID),
            blank_custom: LayoutModel::canvas("Create new custom", CanvasLayout::new(reference))
                .with_id(BLANK_CUSTOM_ID),
            logger: None,
        };
        generator.update(zone_count)?;
        Ok(generator)
    }

    /// Generator over the configured work area and zone count, with the
    /// configured built-in selected. A custom active kind selects nothing.
    pub fn from_config(config: &EditorConfig) -> Result<Self> {
        let mut generator = Self::new(config.work_area.size(), config.settings.zone_count)?;
        generator.select(config.active_kind);
        Ok(generator)
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn reference(&self) -> Size {
        self.reference
    }

    pub fn zone_count(&self) -> i32 {
        self.zone_count
    }

    /// Recompute every built-in layout for `zone_count` zones.
    pub fn update(&mut self, zone_count: i32) -> Result<()> {
        if zone_count < 1 {
            return Err(LayoutError::InvalidZoneCount(zone_count));
        }

        if self.focus.as_canvas().is_none() {
            return Err(LayoutError::BodyMismatch {
                name: self.focus.name().to_string(),
                expected: "canvas",
            });
        }
        if let Some(LayoutBody::Canvas(canvas)) = self.focus.body_mut() {
            canvas.clear_zones();
            for zone in focus_zones(zone_count, canvas.reference()) {
                canvas.add_zone(zone);
            }
        }
        self.columns.replace_grid(columns_layout(zone_count))?;
        self.rows.replace_grid(rows_layout(zone_count))?;
        let grid = grid_layout(zone_count);
        let priority = priority_grid_layout(zone_count)?;
        let (rows, columns) = (grid.rows(), grid.columns());
        self.grid.replace_grid(grid)?;
        self.priority_grid.replace_grid(priority)?;
        self.zone_count = zone_count;

        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            TARGET_GENERATOR,
            "layouts_regenerated",
            [
                json_kv("zone_count", zone_count),
                json_kv("grid", json!([rows, columns])),
            ],
        );
        Ok(())
    }

    /// Built-ins in picker order: Focus, Columns, Rows, Grid, Priority Grid.
    pub fn models(&self) -> [&LayoutModel; 5] {
        [
            &self.focus,
            &self.columns,
            &self.rows,
            &self.grid,
            &self.priority_grid,
        ]
    }

    pub fn model(&self, kind: LayoutKind) -> Option<&LayoutModel> {
        match kind {
            LayoutKind::Focus => Some(&self.focus),
            LayoutKind::Columns => Some(&self.columns),
            LayoutKind::Rows => Some(&self.rows),
            LayoutKind::Grid => Some(&self.grid),
            LayoutKind::PriorityGrid => Some(&self.priority_grid),
            LayoutKind::Custom => None,
        }
    }

    pub fn model_mut(&mut self, kind: LayoutKind) -> Option<&mut LayoutModel> {
        match kind {
            LayoutKind::Focus => Some(&mut self.focus),
            LayoutKind::Columns => Some(&mut self.columns),
            LayoutKind::Rows => Some(&mut self.rows),
            LayoutKind::Grid => Some(&mut self.grid),
            LayoutKind::PriorityGrid => Some(&mut self.priority_grid),
            LayoutKind::Custom => None,
        }
    }

    pub fn blank_custom(&self) -> &LayoutModel {
        &self.blank_custom
    }

    /// Mark `kind` as the selected built-in and clear the others.
    pub fn select(&mut self, kind: LayoutKind) {
        for candidate in LayoutKind::BUILT_INS {
            if let Some(model) = self.model_mut(candidate) {
                model.set_selected(candidate == kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::text;
    use crate::logging::MemorySink;
    use std::sync::{Arc, Mutex};

    #[test]
    fn grid_packing_bounds_hold() {
        for n in 1..=200 {
            let (rows, columns) = grid_dimensions(n);
            assert!(rows * columns >= n, "n={n}");
            assert!(rows * columns - n < rows, "n={n}");
        }
        assert_eq!(grid_dimensions(1), (1, 1));
        assert_eq!(grid_dimensions(2), (1, 2));
        assert_eq!(grid_dimensions(4), (2, 2));
        assert_eq!(grid_dimensions(5), (2, 3));
        assert_eq!(grid_dimensions(10), (3, 4));
    }

    #[test]
    fn grid_fill_order_is_reproducible() {
        assert_eq!(grid_layout(3).cell_child_map(), &[vec![2, 1, 0]]);
        assert_eq!(grid_layout(5).cell_child_map(), &[vec![4, 3, 1], vec![4, 2, 0]]);
        assert_eq!(
            grid_layout(7).cell_child_map(),
            &[vec![6, 5, 3, 1], vec![6, 4, 2, 0]]
        );
        assert_eq!(grid_layout(7).child_count(), 7);
    }

    #[test]
    fn percents_sum_to_scale_for_every_layout() {
        for n in 1..=64 {
            let layouts = [
                columns_layout(n),
                rows_layout(n),
                grid_layout(n),
                priority_grid_layout(n).unwrap(),
            ];
            for grid in &layouts {
                assert_eq!(grid.row_percents().iter().sum::<i32>(), PERCENT_SCALE, "n={n}");
                assert_eq!(grid.column_percents().iter().sum::<i32>(), PERCENT_SCALE, "n={n}");
                assert_eq!(grid.cell_child_map().len(), grid.rows() as usize);
                assert!(grid.cell_child_map().iter().all(|r| r.len() == grid.columns() as usize));
            }
        }
    }

    #[test]
    fn columns_and_rows_are_transposes() {
        let columns = columns_layout(3);
        let rows = rows_layout(3);
        assert_eq!(columns.column_percents(), &[3334, 3333, 3333]);
        assert_eq!(columns.cell_child_map(), &[vec![0, 1, 2]]);
        assert_eq!(rows.row_percents(), columns.column_percents());
        assert_eq!(rows.cell_child_map(), &[vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn single_focus_zone_is_the_template() {
        let zones = focus_zones(1, Size::new(1000, 800));
        assert_eq!(zones, vec![Rect::new(100, 80, 600, 480)]);
    }

    #[test]
    fn focus_zones_step_by_truncated_offset() {
        let zones = focus_zones(4, Size::new(1000, 1000));
        let xs: Vec<i32> = zones.iter().map(|z| z.x).collect();
        assert_eq!(xs, vec![100, 166, 232, 298]);
        assert!(zones.iter().all(|z| z.width == 600 && z.height == 600));
    }

    #[test]
    fn priority_blobs_survive_text_round_trip() {
        for n in 1..=11 {
            let grid = priority_grid_layout(n).unwrap();
            assert_eq!(grid.child_count(), n as usize);
            let model = LayoutModel::grid("Priority Grid", grid.clone());
            let value: serde_json::Value =
                serde_json::from_str(&text::encode_layout(&model).unwrap()).unwrap();
            let decoded = text::decode_entry(value).unwrap();
            assert_eq!(decoded.as_grid(), Some(&grid), "n={n}");
        }
    }

    #[test]
    fn large_priority_grid_is_an_independent_copy_of_grid() {
        let mut generator = DefaultLayoutGenerator::new(Size::new(1920, 1080), 12).unwrap();
        assert_eq!(
            generator.model(LayoutKind::PriorityGrid).unwrap().as_grid(),
            generator.model(LayoutKind::Grid).unwrap().as_grid()
        );

        if let Some(LayoutBody::Grid(grid)) =
            generator.model_mut(LayoutKind::PriorityGrid).unwrap().body_mut()
        {
            grid.merge_cells(0, 1);
        }
        let plain = generator.model(LayoutKind::Grid).unwrap().as_grid().unwrap();
        assert_eq!(plain, &grid_layout(12));
    }

    #[test]
    fn regeneration_is_idempotent_and_replaces_state() {
        let mut generator = DefaultLayoutGenerator::new(Size::new(1000, 1000), 5).unwrap();
        generator.update(2).unwrap();
        let focus = generator.model(LayoutKind::Focus).unwrap().as_canvas().unwrap().clone();
        assert_eq!(focus.zones().len(), 2);
        generator.update(2).unwrap();
        assert_eq!(generator.model(LayoutKind::Focus).unwrap().as_canvas(), Some(&focus));
        assert_eq!(generator.zone_count(), 2);
    }

    #[test]
    fn zero_zones_is_rejected() {
        assert!(matches!(
            DefaultLayoutGenerator::new(Size::new(10, 10), 0),
            Err(LayoutError::InvalidZoneCount(0))
        ));
    }

    #[test]
    fn focus_with_grid_body_fails_like_the_grid_built_ins() {
        let mut generator = DefaultLayoutGenerator::new(Size::new(100, 100), 2).unwrap();
        if let Some(body) = generator.model_mut(LayoutKind::Focus).unwrap().body_mut() {
            *body = LayoutBody::Grid(GridLayout::default());
        }
        assert!(matches!(
            generator.update(3),
            Err(LayoutError::BodyMismatch { expected: "canvas", .. })
        ));
        assert_eq!(generator.zone_count(), 2);

        let mut generator = DefaultLayoutGenerator::new(Size::new(100, 100), 2).unwrap();
        if let Some(body) = generator.model_mut(LayoutKind::Rows).unwrap().body_mut() {
            *body = LayoutBody::Canvas(CanvasLayout::new(Size::new(100, 100)));
        }
        assert!(matches!(
            generator.update(3),
            Err(LayoutError::BodyMismatch { expected: "grid", .. })
        ));
    }

    #[test]
    fn from_config_uses_work_area_count_and_active_kind() {
        let mut config = EditorConfig::default();
        config.work_area = Rect::new(0, 0, 1000, 500);
        config.settings.zone_count = 5;
        config.active_kind = LayoutKind::PriorityGrid;

        let generator = DefaultLayoutGenerator::from_config(&config).unwrap();
        assert_eq!(generator.reference(), Size::new(1000, 500));
        assert_eq!(generator.zone_count(), 5);
        let selected: Vec<_> = generator.models().iter().map(|m| m.is_selected()).collect();
        assert_eq!(selected, vec![false, false, false, false, true]);

        config.active_kind = LayoutKind::Custom;
        let generator = DefaultLayoutGenerator::from_config(&config).unwrap();
        assert!(generator.models().iter().all(|m| !m.is_selected()));
    }

    #[test]
    fn uneven_splits_favor_leading_tracks() {
        assert_eq!(split_percents(3), vec![3334, 3333, 3333]);
        assert_eq!(split_percents(7), vec![1429, 1429, 1429, 1429, 1428, 1428, 1428]);
        assert_eq!(split_percents(4), vec![2500; 4]);
    }

    #[test]
    fn regeneration_notifies_grid_dimension_changes_and_logs() {
        let sink = MemorySink::new();
        let mut generator = DefaultLayoutGenerator::new(Size::new(1000, 1000), 3)
            .unwrap()
            .with_logger(Logger::new(sink.clone()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        generator
            .model_mut(LayoutKind::Columns)
            .unwrap()
            .subscribe(move |p| recorder.lock().unwrap().push(p.name()));

        generator.update(3).unwrap();
        generator.update(4).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["Columns"]);
        assert_eq!(sink.messages().len(), 2);
    }

    #[test]
    fn built_ins_keep_reserved_ids() {
        let mut generator = DefaultLayoutGenerator::new(Size::new(800, 600), 3).unwrap();
        let kinds: Vec<_> = generator.models().iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, LayoutKind::BUILT_INS.to_vec());
        assert_eq!(generator.blank_custom().assigned_id(), Some(BLANK_CUSTOM_ID));

        generator.select(LayoutKind::Rows);
        let selected: Vec<_> = generator.models().iter().map(|m| m.is_selected()).collect();
        assert_eq!(selected, vec![false, false, true, false, false]);
    }
}
