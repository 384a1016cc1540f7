use crate::geometry::{Rect, Size};

/// Free-form layout: independent rectangles in a reference coordinate frame.
///
/// Zone order is significant; later zones take precedence where they overlap.
/// Changing the reference frame does not rescale existing zones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanvasLayout {
    reference: Size,
    zones: Vec<Rect>,
}

impl CanvasLayout {
    pub fn new(reference: Size) -> Self {
        Self {
            reference,
            zones: Vec::new(),
        }
    }

    pub fn with_zones(reference: Size, zones: Vec<Rect>) -> Self {
        Self { reference, zones }
    }

    pub fn reference(&self) -> Size {
        self.reference
    }

    pub fn reference_width(&self) -> i32 {
        self.reference.width
    }

    pub fn reference_height(&self) -> i32 {
        self.reference.height
    }

    pub fn zones(&self) -> &[Rect] {
        &self.zones
    }

    pub fn set_reference_width(&mut self, width: i32) -> bool {
        if self.reference.width == width {
            return false;
        }
        self.reference.width = width;
        true
    }

    pub fn set_reference_height(&mut self, height: i32) -> bool {
        if self.reference.height == height {
            return false;
        }
        self.reference.height = height;
        true
    }

    pub fn add_zone(&mut self, zone: Rect) {
        self.zones.push(zone);
    }

    pub fn remove_zone_at(&mut self, index: usize) -> Option<Rect> {
        (index < self.zones.len()).then(|| self.zones.remove(index))
    }

    pub(crate) fn clear_zones(&mut self) {
        self.zones.clear();
    }

    /// Zones rescaled from the reference frame onto `area`. A degenerate
    /// reference frame leaves the zones untouched.
    pub fn zone_rects(&self, area: Size) -> Vec<Rect> {
        if self.reference.width <= 0 || self.reference.height <= 0 || self.reference == area {
            return self.zones.clone();
        }
        let sx = |v: i32| scale(v, area.width, self.reference.width);
        let sy = |v: i32| scale(v, area.height, self.reference.height);
        self.zones
            .iter()
            .map(|z| Rect::new(sx(z.x), sy(z.y), sx(z.width), sy(z.height)))
            .collect()
    }
}

fn scale(value: i32, target: i32, reference: i32) -> i32 {
    (i64::from(value) * i64::from(target) / i64::from(reference)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_change_keeps_zones() {
        let mut canvas = CanvasLayout::with_zones(Size::new(100, 100), vec![Rect::new(10, 10, 50, 50)]);
        assert!(canvas.set_reference_width(200));
        assert!(!canvas.set_reference_width(200));
        assert_eq!(canvas.zones(), &[Rect::new(10, 10, 50, 50)]);
    }

    #[test]
    fn zone_rects_rescale_to_area() {
        let canvas = CanvasLayout::with_zones(
            Size::new(1000, 500),
            vec![Rect::new(100, 50, 500, 250), Rect::new(0, 0, 1000, 500)],
        );
        let rects = canvas.zone_rects(Size::new(2000, 1000));
        assert_eq!(rects, vec![Rect::new(200, 100, 1000, 500), Rect::new(0, 0, 2000, 1000)]);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut canvas = CanvasLayout::new(Size::new(10, 10));
        canvas.add_zone(Rect::new(0, 0, 5, 5));
        assert_eq!(canvas.remove_zone_at(1), None);
        assert_eq!(canvas.remove_zone_at(0), Some(Rect::new(0, 0, 5, 5)));
        assert!(canvas.zones().is_empty());
    }
}
