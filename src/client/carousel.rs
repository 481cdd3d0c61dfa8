use std::ops::Range;

pub const MOBILE_BREAKPOINT: u32 = 768;

pub fn slides_per_view(viewport_width: u32) -> usize {
    if viewport_width < MOBILE_BREAKPOINT {
        1
    } else {
        2
    }
}

/// Chart carousel: items grouped into slides sized by viewport width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    items: usize,
    per_view: usize,
    current: usize,
}

impl Carousel {
    pub fn new(items: usize, viewport_width: u32) -> Self {
        Self {
            items,
            per_view: slides_per_view(viewport_width),
            current: 0,
        }
    }

    pub fn per_view(&self) -> usize {
        self.per_view
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total_slides(&self) -> usize {
        self.items.div_ceil(self.per_view)
    }

    pub fn next(&mut self) {
        let total = self.total_slides();
        if total > 0 {
            self.current = (self.current + 1) % total;
        }
    }

    pub fn prev(&mut self) {
        let total = self.total_slides();
        if total > 0 {
            self.current = (self.current + total - 1) % total;
        }
    }

    /// Jumps to a slide; out-of-range indexes are ignored.
    pub fn go_to(&mut self, slide: usize) {
        if slide < self.total_slides() {
            self.current = slide;
        }
    }

    pub fn resize(&mut self, viewport_width: u32) {
        self.per_view = slides_per_view(viewport_width);
        let total = self.total_slides();
        if self.current >= total {
            self.current = total.saturating_sub(1);
        }
    }

    /// Item indexes on the current slide.
    pub fn visible_range(&self) -> Range<usize> {
        let start = (self.current * self.per_view).min(self.items);
        let end = (start + self.per_view).min(self.items);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slides_per_view() {
        assert_eq!(slides_per_view(375), 1);
        assert_eq!(slides_per_view(767), 1);
        assert_eq!(slides_per_view(768), 2);
        assert_eq!(slides_per_view(1440), 2);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut carousel = Carousel::new(7, 1024);
        assert_eq!(carousel.total_slides(), 4);

        carousel.prev();
        assert_eq!(carousel.current(), 3);
        assert_eq!(carousel.visible_range(), 6..7);

        carousel.next();
        assert_eq!(carousel.current(), 0);
        assert_eq!(carousel.visible_range(), 0..2);

        carousel.go_to(9);
        assert_eq!(carousel.current(), 0);
        carousel.go_to(2);
        assert_eq!(carousel.visible_range(), 4..6);
    }

    #[test]
    fn test_resize_clamps_current_slide() {
        let mut carousel = Carousel::new(7, 400);
        assert_eq!(carousel.total_slides(), 7);
        carousel.go_to(6);

        carousel.resize(1200);
        assert_eq!(carousel.total_slides(), 4);
        assert_eq!(carousel.current(), 3);

        carousel.resize(500);
        assert_eq!(carousel.current(), 3);
        assert_eq!(carousel.visible_range(), 3..4);
    }

    #[test]
    fn test_empty_carousel() {
        let mut carousel = Carousel::new(0, 1024);
        assert_eq!(carousel.total_slides(), 0);
        carousel.next();
        carousel.prev();
        assert_eq!(carousel.current(), 0);
        assert_eq!(carousel.visible_range(), 0..0);
    }
}
