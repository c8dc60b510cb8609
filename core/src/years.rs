//! Year sets read from the model's set files.
//!
//! A year file is a CSV whose first row lists the modeled years in solve
//! order. Only that row is used. Years are parsed to integers up front so
//! every later comparison is numeric.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::error::YearSetError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSet {
    years: Vec<i32>,
}

impl YearSet {
    pub fn new(years: Vec<i32>) -> Self {
        Self { years }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, YearSetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| YearSetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file).map_err(|e| match e {
            YearSetError::Empty(_) => YearSetError::Empty(path.display().to_string()),
            other => other,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, YearSetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let Some(first) = rdr.records().next() else {
            return Err(YearSetError::Empty("<reader>".to_string()));
        };
        let record = first?;

        let mut years = Vec::with_capacity(record.len());
        for (column, cell) in record.iter().enumerate() {
            // trailing commas leave empty cells behind
            if cell.is_empty() {
                continue;
            }
            let year = cell
                .parse::<i32>()
                .map_err(|_| YearSetError::InvalidYear {
                    column,
                    value: cell.to_string(),
                })?;
            years.push(year);
        }

        if years.is_empty() {
            return Err(YearSetError::Empty("<reader>".to_string()));
        }
        Ok(Self { years })
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Years inside the closed interval `[start, end]`, in file order.
    pub fn eligible(&self, start: i32, end: i32) -> Vec<i32> {
        self.years
            .iter()
            .copied()
            .filter(|y| (start..=end).contains(y))
            .collect()
    }
}

impl From<Vec<i32>> for YearSet {
    fn from(years: Vec<i32>) -> Self {
        Self::new(years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn reads_only_the_first_row() {
        let set = YearSet::from_reader("2010,2012,2014\n1,2,3\n".as_bytes()).unwrap();
        assert_eq!(set.years(), &[2010, 2012, 2014]);
    }

    #[test]
    fn tolerates_whitespace_and_trailing_comma() {
        let set = YearSet::from_reader(" 2020 , 2030,\n".as_bytes()).unwrap();
        assert_eq!(set.years(), &[2020, 2030]);
    }

    #[test]
    fn rejects_non_numeric_cells() {
        let err = YearSet::from_reader("2020,20x0\n".as_bytes()).unwrap_err();
        match err {
            YearSetError::InvalidYear { column, value } => {
                assert_eq!(column, 1);
                assert_eq!(value, "20x0");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            YearSet::from_reader("".as_bytes()),
            Err(YearSetError::Empty(_))
        ));
    }

    #[test]
    fn filter_is_numeric_not_lexicographic() {
        // "10" < "9" as strings; numerically 9 < 10
        let set = YearSet::new(vec![8, 9, 10, 11, 100]);
        assert_eq!(set.eligible(9, 11), vec![9, 10, 11]);
    }

    #[test]
    fn filter_bounds_are_inclusive_and_keep_file_order() {
        let set = YearSet::new(vec![2026, 2020, 2024, 2022]);
        assert_eq!(set.eligible(2022, 2026), vec![2026, 2024, 2022]);
        assert!(set.eligible(2000, 2010).is_empty());
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("modeledyears.csv");
        assert!(matches!(
            YearSet::from_path(&missing),
            Err(YearSetError::Open { .. })
        ));

        let mut file = std::fs::File::create(&missing).unwrap();
        writeln!(file, "2040,2045,2050").unwrap();
        assert_eq!(YearSet::from_path(&missing).unwrap().len(), 3);
    }
}
