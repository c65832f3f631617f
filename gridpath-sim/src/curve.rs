use gridpath_core::models::Position;

use crate::status::Tick;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Datum {
    tick: Tick,
    value: Position,
}

fn datum_before(d1: &Datum, d2: &Datum) -> bool {
    d1.tick < d2.tick
}

/// Tick-keyed piecewise-linear curve over entity positions.
///
/// Data stay sorted by tick; adding at an existing tick replaces that datum.
#[derive(Debug, Clone, Default)]
pub struct LinearCurve {
    data: Vec<Datum>,
}

impl LinearCurve {
    pub fn new() -> LinearCurve {
        LinearCurve::default()
    }

    pub fn add(&mut self, tick: Tick, value: Position) {
        let d = Datum { tick, value };
        match self.data.binary_search_by_key(&tick, |x| x.tick) {
            Ok(i) => self.data[i] = d,
            Err(i) => self.data.insert(i, d),
        }
    }

    /// Linearly interpolated value at `tick`. Queries before the first datum
    /// clamp to the first value, queries after the last to the last.
    pub fn get(&self, tick: Tick) -> Position {
        let Some(first) = self.data.first() else {
            return Position::default();
        };
        if tick <= first.tick {
            return first.value;
        }
        let last = self.data[self.data.len() - 1];
        if tick >= last.tick {
            return last.value;
        }

        let i = match self.data.binary_search_by_key(&tick, |x| x.tick) {
            Ok(i) => return self.data[i].value,
            Err(i) => i,
        };
        let (a, b) = (self.data[i - 1], self.data[i]);
        debug_assert!(datum_before(&a, &b));
        let t = (tick - a.tick) as f64 / (b.tick - a.tick) as f64;
        Position {
            x: a.value.x + (b.value.x - a.value.x) * t,
            y: a.value.y + (b.value.y - a.value.y) * t,
        }
    }

    /// Drops every datum at `tick` or later and appends the replacement
    /// segment. Used when a re-plan supersedes previously committed
    /// waypoints.
    pub fn replace_tail(&mut self, tick: Tick, segment: &[(Tick, Position)]) {
        self.data.retain(|d| d.tick < tick);
        for (t, v) in segment {
            self.add(*t, *v);
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
