use glam::IVec2;

/// An axis-aligned rectangle of integer lattice points.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Extent2i {
    pub minimum: IVec2,
    pub shape: IVec2,
}

impl Extent2i {
    pub fn from_min_and_shape(minimum: IVec2, shape: IVec2) -> Self {
        Self {
            minimum,
            shape: shape.max(IVec2::ZERO),
        }
    }

    /// A `least_upper_bound` below `minimum` gives an empty extent. The shape saturates at `i32::MAX`.
    pub fn from_min_and_lub(minimum: IVec2, least_upper_bound: IVec2) -> Self {
        let span = |min: i32, lub: i32| (i64::from(lub) - i64::from(min)).clamp(0, i64::from(i32::MAX)) as i32;
        Self::from_min_and_shape(
            minimum,
            IVec2::new(
                span(minimum.x, least_upper_bound.x),
                span(minimum.y, least_upper_bound.y),
            ),
        )
    }

    /// Both `minimum` and `max` are inclusive. A `max` of `i32::MAX` is treated as exclusive.
    pub fn from_min_and_max(minimum: IVec2, max: IVec2) -> Self {
        Self::from_min_and_lub(
            minimum,
            IVec2::new(max.x.saturating_add(1), max.y.saturating_add(1)),
        )
    }

    /// Saturates at `i32::MAX`.
    pub fn least_upper_bound(&self) -> IVec2 {
        IVec2::new(
            self.minimum.x.saturating_add(self.shape.x),
            self.minimum.y.saturating_add(self.shape.y),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.shape.x <= 0 || self.shape.y <= 0
    }

    pub fn contains(&self, p: IVec2) -> bool {
        let lub = self.least_upper_bound();
        p.cmpge(self.minimum).all() && p.cmplt(lub).all()
    }

    pub fn intersection(&self, other: &Self) -> Self {
        let minimum = self.minimum.max(other.minimum);
        let lub = self.least_upper_bound().min(other.least_upper_bound());
        Self::from_min_and_lub(minimum, lub)
    }

    /// Iterates over every point with X in the outer loop and Y in the inner loop.
    pub fn iter2(&self) -> impl Iterator<Item = IVec2> {
        let min = self.minimum;
        let lub = self.least_upper_bound();
        (min.x..lub.x).flat_map(move |x| (min.y..lub.y).map(move |y| IVec2::new(x, y)))
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
