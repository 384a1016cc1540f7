use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LayoutError, Result};
use crate::geometry::{Rect, Size};
use crate::registry::IdAllocator;

use super::canvas::CanvasLayout;
use super::grid::GridLayout;

/// Numeric layout identifier; zero means "not yet assigned".
pub type LayoutId = u16;

pub const UNASSIGNED_ID: LayoutId = 0;
pub const FOCUS_ID: LayoutId = 0xFFFF;
pub const ROWS_ID: LayoutId = 0xFFFE;
pub const COLUMNS_ID: LayoutId = 0xFFFD;
pub const GRID_ID: LayoutId = 0xFFFC;
pub const PRIORITY_GRID_ID: LayoutId = 0xFFFB;
pub const BLANK_CUSTOM_ID: LayoutId = 0xFFFA;
/// Lowest id reserved for built-in layouts. Auto-assigned ids stay below it.
pub const FIRST_RESERVED_ID: LayoutId = BLANK_CUSTOM_ID;

/// Which family a layout belongs to, derived from its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    Focus,
    Columns,
    Rows,
    Grid,
    PriorityGrid,
    Custom,
}

impl LayoutKind {
    pub const BUILT_INS: [LayoutKind; 5] = [
        LayoutKind::Focus,
        LayoutKind::Columns,
        LayoutKind::Rows,
        LayoutKind::Grid,
        LayoutKind::PriorityGrid,
    ];

    pub fn from_id(id: LayoutId) -> Self {
        match id {
            FOCUS_ID => LayoutKind::Focus,
            COLUMNS_ID => LayoutKind::Columns,
            ROWS_ID => LayoutKind::Rows,
            GRID_ID => LayoutKind::Grid,
            PRIORITY_GRID_ID => LayoutKind::PriorityGrid,
            _ => LayoutKind::Custom,
        }
    }

    /// Map the editor's positional layout index onto a kind. Unknown values
    /// fall back to Focus.
    pub fn from_arg_index(index: i32) -> Self {
        match index {
            1 => LayoutKind::Columns,
            2 => LayoutKind::Rows,
            3 => LayoutKind::Grid,
            4 => LayoutKind::PriorityGrid,
            5 => LayoutKind::Custom,
            _ => LayoutKind::Focus,
        }
    }

    pub fn reserved_id(self) -> Option<LayoutId> {
        match self {
            LayoutKind::Focus => Some(FOCUS_ID),
            LayoutKind::Columns => Some(COLUMNS_ID),
            LayoutKind::Rows => Some(ROWS_ID),
            LayoutKind::Grid => Some(GRID_ID),
            LayoutKind::PriorityGrid => Some(PRIORITY_GRID_ID),
            LayoutKind::Custom => None,
        }
    }

    /// Name written into the active-zoneset descriptor.
    pub fn type_name(self) -> &'static str {
        match self {
            LayoutKind::Focus => "focus",
            LayoutKind::Columns => "columns",
            LayoutKind::Rows => "rows",
            LayoutKind::Grid => "grid",
            LayoutKind::PriorityGrid => "priority-grid",
            LayoutKind::Custom => "custom",
        }
    }

    pub fn is_custom(self) -> bool {
        self == LayoutKind::Custom
    }
}

/// Observable properties of a layout model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Name,
    IsSelected,
    ReferenceWidth,
    ReferenceHeight,
    Zones,
    Rows,
    Columns,
}

impl Property {
    pub fn name(self) -> &'static str {
        match self {
            Property::Name => "Name",
            Property::IsSelected => "IsSelected",
            Property::ReferenceWidth => "ReferenceWidth",
            Property::ReferenceHeight => "ReferenceHeight",
            Property::Zones => "Zones",
            Property::Rows => "Rows",
            Property::Columns => "Columns",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type SubscriptionId = u64;

type Callback = Arc<dyn Fn(Property) + Send + Sync>;

/// Subscription list delivering one call per changed property.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: SubscriptionId,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(Property) + Send + Sync + 'static,
    {
        self.next_id += 1;
        self.subscribers.push((self.next_id, Arc::new(callback)));
        self.next_id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        before != self.subscribers.len()
    }

    pub fn notify(&self, property: Property) {
        for (_, callback) in &self.subscribers {
            callback(property);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Concrete geometry owned by a layout model.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutBody {
    Canvas(CanvasLayout),
    Grid(GridLayout),
}

impl LayoutBody {
    pub fn type_name(&self) -> &'static str {
        match self {
            LayoutBody::Canvas(_) => "canvas",
            LayoutBody::Grid(_) => "grid",
        }
    }
}

/// Named layout with identity, selection state and an optional body.
#[derive(Debug)]
pub struct LayoutModel {
    id: LayoutId,
    uuid: Option<Uuid>,
    name: String,
    is_selected: bool,
    body: Option<LayoutBody>,
    notifier: ChangeNotifier,
}

impl LayoutModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            uuid: None,
            name: name.into(),
            is_selected: false,
            body: None,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn canvas(name: impl Into<String>, canvas: CanvasLayout) -> Self {
        Self::new(name).with_body(LayoutBody::Canvas(canvas))
    }

    pub fn grid(name: impl Into<String>, grid: GridLayout) -> Self {
        Self::new(name).with_body(LayoutBody::Grid(grid))
    }

    pub fn with_body(mut self, body: LayoutBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_id(mut self, id: LayoutId) -> Self {
        self.id = id;
        self
    }

    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    /// Id without assigning one.
    pub fn assigned_id(&self) -> Option<LayoutId> {
        (self.id != UNASSIGNED_ID).then_some(self.id)
    }

    /// Id of this model, drawing a fresh one from `ids` on first access.
    /// Once assigned it never changes.
    pub fn id(&mut self, ids: &mut IdAllocator) -> Result<LayoutId> {
        if self.id == UNASSIGNED_ID {
            self.id = ids.next_id()?;
        }
        Ok(self.id)
    }

    pub fn kind(&self) -> LayoutKind {
        LayoutKind::from_id(self.id)
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    /// Uppercase hyphenated uuid; the nil uuid when none is set.
    pub fn uuid_upper(&self) -> String {
        self.uuid
            .unwrap_or_else(Uuid::nil)
            .hyphenated()
            .to_string()
            .to_uppercase()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.name != name {
            self.name = name;
            self.notifier.notify(Property::Name);
        }
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        if self.is_selected != selected {
            self.is_selected = selected;
            self.notifier.notify(Property::IsSelected);
        }
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(Property) + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn body(&self) -> Option<&LayoutBody> {
        self.body.as_ref()
    }

    /// Direct body access. Mutations made here do not notify subscribers.
    pub fn body_mut(&mut self) -> Option<&mut LayoutBody> {
        self.body.as_mut()
    }

    pub fn as_canvas(&self) -> Option<&CanvasLayout> {
        match &self.body {
            Some(LayoutBody::Canvas(canvas)) => Some(canvas),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&GridLayout> {
        match &self.body {
            Some(LayoutBody::Grid(grid)) => Some(grid),
            _ => None,
        }
    }

    fn canvas_mut(&mut self) -> Result<&mut CanvasLayout> {
        match &mut self.body {
            Some(LayoutBody::Canvas(canvas)) => Ok(canvas),
            _ => Err(LayoutError::BodyMismatch {
                name: self.name.clone(),
                expected: "canvas",
            }),
        }
    }

    pub fn set_reference_width(&mut self, width: i32) -> Result<()> {
        if self.canvas_mut()?.set_reference_width(width) {
            self.notifier.notify(Property::ReferenceWidth);
        }
        Ok(())
    }

    pub fn set_reference_height(&mut self, height: i32) -> Result<()> {
        if self.canvas_mut()?.set_reference_height(height) {
            self.notifier.notify(Property::ReferenceHeight);
        }
        Ok(())
    }

    pub fn add_zone(&mut self, zone: Rect) -> Result<()> {
        self.canvas_mut()?.add_zone(zone);
        self.notifier.notify(Property::Zones);
        Ok(())
    }

    pub fn remove_zone_at(&mut self, index: usize) -> Result<Option<Rect>> {
        let removed = self.canvas_mut()?.remove_zone_at(index);
        if removed.is_some() {
            self.notifier.notify(Property::Zones);
        }
        Ok(removed)
    }

    /// Replace the grid body, notifying `Rows`/`Columns` when they change.
    pub fn replace_grid(&mut self, grid: GridLayout) -> Result<()> {
        let current = match &mut self.body {
            Some(LayoutBody::Grid(current)) => current,
            _ => {
                return Err(LayoutError::BodyMismatch {
                    name: self.name.clone(),
                    expected: "grid",
                });
            }
        };
        let rows_changed = current.rows() != grid.rows();
        let columns_changed = current.columns() != grid.columns();
        *current = grid;
        if rows_changed {
            self.notifier.notify(Property::Rows);
        }
        if columns_changed {
            self.notifier.notify(Property::Columns);
        }
        Ok(())
    }

    /// Zone rectangles of the body laid out over `area`, in zone order.
    pub fn zone_rects(&self, area: Size) -> Vec<Rect> {
        match &self.body {
            Some(LayoutBody::Canvas(canvas)) => canvas.zone_rects(area),
            Some(LayoutBody::Grid(grid)) => grid.zone_rects(area),
            None => Vec::new(),
        }
    }

    /// Independent copy for an editing session: same name and geometry, a
    /// fresh uuid, an unassigned id, not selected and no subscribers.
    pub fn duplicate(&self) -> LayoutModel {
        LayoutModel {
            id: UNASSIGNED_ID,
            uuid: Some(Uuid::new_v4()),
            name: self.name.clone(),
            is_selected: false,
            body: self.body.clone(),
            notifier: ChangeNotifier::new(),
        }
    }
}
