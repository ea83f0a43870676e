/// Occupancy of `(day, sub_row)` cells across a whole grid range.
#[derive(Debug, Clone)]
pub(crate) struct Occupancy {
    rows: usize,
    cells: Vec<bool>,
}

impl Occupancy {
    pub(crate) fn new(days: usize, rows: usize) -> Self {
        Self {
            rows,
            cells: vec![false; days * rows],
        }
    }

    fn index(&self, day: usize, row: usize) -> usize {
        day * self.rows + row
    }

    /// Lowest sub-row whose cells for `days` are all free.
    pub(crate) fn first_free(&self, days: std::ops::Range<usize>) -> Option<usize> {
        (0..self.rows).find(|&row| {
            days.clone()
                .all(|day| !self.cells[self.index(day, row)])
        })
    }

    pub(crate) fn occupy(&mut self, days: std::ops::Range<usize>, row: usize) {
        for day in days {
            let index = self.index(day, row);
            self.cells[index] = true;
        }
    }
}
