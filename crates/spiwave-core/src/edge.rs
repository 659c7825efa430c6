/// Edge flags for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub rose: bool,
    pub fell: bool,
}

/// Oversamples a line and compares each sample against the previous tick's.
///
/// An edge is reported on the first tick the new level is observed, so
/// detection lags the physical transition by at most one tick. Two
/// transitions inside one tick period are not seen.
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, level: bool) -> Edges {
        let edges = Edges {
            rose: level && !self.last,
            fell: !level && self.last,
        };
        self.last = level;
        edges
    }

    /// Level seen on the previous tick.
    pub fn last(&self) -> bool {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_transition_once() {
        let mut det = EdgeDetector::new();
        let levels = [false, true, true, false, false, true];
        let edges: Vec<Edges> = levels.iter().map(|&l| det.sample(l)).collect();

        assert_eq!(edges[0], Edges::default());
        assert_eq!(edges[1], Edges { rose: true, fell: false });
        assert_eq!(edges[2], Edges::default());
        assert_eq!(edges[3], Edges { rose: false, fell: true });
        assert_eq!(edges[4], Edges::default());
        assert_eq!(edges[5], Edges { rose: true, fell: false });
        assert!(det.last());
    }

    #[test]
    fn memory_starts_low() {
        let mut det = EdgeDetector::new();
        assert!(!det.sample(false).fell);
    }
}
