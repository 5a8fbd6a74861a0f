//! Index arithmetic behind the site's sliders.

/// A fixed set of slides with one active index. Empty carousels stay at 0 and ignore moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Carousel { len, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Advances one slide, wrapping from the last back to the first.
    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
        self.current
    }

    /// Steps back one slide, wrapping from the first to the last.
    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
        self.current
    }

    /// Jumps to `index`, clamped to the last slide.
    pub fn go_to(&mut self, index: usize) -> usize {
        if self.len > 0 {
            self.current = index.min(self.len - 1);
        }
        self.current
    }
}

/// A horizontally scrolling strip that stops at both ends instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrack {
    position: f64,
    step: f64,
    max_scroll: f64,
}

impl ScrollTrack {
    pub fn new(step: f64, max_scroll: f64) -> Self {
        ScrollTrack {
            position: 0.0,
            step: step.max(0.0),
            max_scroll: max_scroll.max(0.0),
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn scroll_next(&mut self) -> f64 {
        self.position = (self.position + self.step).min(self.max_scroll);
        self.position
    }

    pub fn scroll_prev(&mut self) -> f64 {
        self.position = (self.position - self.step).max(0.0);
        self.position
    }

    pub fn at_start(&self) -> bool {
        self.position <= 0.0
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.max_scroll
    }

    /// Re-measures after a resize, keeping the position inside the new bounds.
    pub fn resize(&mut self, step: f64, max_scroll: f64) {
        self.step = step.max(0.0);
        self.max_scroll = max_scroll.max(0.0);
        self.position = self.position.min(self.max_scroll);
    }
}

pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved right to left; show the next slide.
    Next,
    /// Finger moved left to right; show the previous slide.
    Prev,
}

pub fn detect_swipe(start_x: f64, end_x: f64, threshold: f64) -> Option<Swipe> {
    let diff = start_x - end_x;
    if diff.abs() <= threshold {
        None
    } else if diff > 0.0 {
        Some(Swipe::Next)
    } else {
        Some(Swipe::Prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_and_prev_wrap_around() {
        let mut c = Carousel::new(3);
        assert_eq!(c.prev(), 2);
        assert_eq!(c.next(), 0);
        assert_eq!(c.next(), 1);
        assert_eq!(c.next(), 2);
        assert_eq!(c.next(), 0);
    }

    #[test]
    fn go_to_clamps() {
        let mut c = Carousel::new(4);
        assert_eq!(c.go_to(2), 2);
        assert_eq!(c.go_to(99), 3);
    }

    #[test]
    fn empty_carousel_is_inert() {
        let mut c = Carousel::new(0);
        assert!(c.is_empty());
        assert_eq!(c.next(), 0);
        assert_eq!(c.prev(), 0);
        assert_eq!(c.go_to(5), 0);
    }

    #[test]
    fn scroll_track_stops_at_the_ends() {
        let mut t = ScrollTrack::new(300.0, 700.0);
        assert!(t.at_start());
        assert_eq!(t.scroll_next(), 300.0);
        assert_eq!(t.scroll_next(), 600.0);
        assert_eq!(t.scroll_next(), 700.0);
        assert!(t.at_end());
        assert_eq!(t.scroll_prev(), 400.0);

        t.resize(300.0, 200.0);
        assert_eq!(t.position(), 200.0);
    }

    #[test]
    fn swipe_needs_to_clear_threshold() {
        assert_eq!(detect_swipe(200.0, 180.0, DEFAULT_SWIPE_THRESHOLD), None);
        assert_eq!(detect_swipe(200.0, 100.0, DEFAULT_SWIPE_THRESHOLD), Some(Swipe::Next));
        assert_eq!(detect_swipe(100.0, 200.0, DEFAULT_SWIPE_THRESHOLD), Some(Swipe::Prev));
    }
}
