// src/table.rs
use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, ArrayRef, BooleanArray},
    compute::filter_record_batch,
    datatypes::{Field, FieldRef, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::filters::City;

/// Column names of the trip table.
pub mod col {
    pub const ID: &str = "ID";
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    pub const TRIP_DURATION: &str = "Trip Duration";
    pub const START_STATION: &str = "Start Station";
    pub const END_STATION: &str = "End Station";
    pub const USER_TYPE: &str = "User Type";
    pub const GENDER: &str = "Gender";
    pub const BIRTH_YEAR: &str = "Birth Year";

    // derived
    pub const MONTH: &str = "month";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const START_HOUR: &str = "start_hour";
    pub const TRIP: &str = "Trip";
}

/// One city's trips, already restricted to the selected month and day.
#[derive(Debug, Clone)]
pub struct TripTable {
    city: City,
    batch: RecordBatch,
}

impl TripTable {
    pub fn new(city: City, batch: RecordBatch) -> Self {
        Self { city, batch }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    /// Column `name`, downcast to its concrete array type.
    pub fn column_as<T: Array + 'static>(&self, name: &str) -> Result<&T> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| anyhow!("column `{}` not in table", name))?
            .as_any()
            .downcast_ref::<T>()
            .with_context(|| format!("column `{}` has unexpected type", name))
    }

    /// Add `array` as column `name`, replacing any column already called that.
    pub fn set_column(&mut self, name: &str, array: ArrayRef) -> Result<()> {
        let schema = self.batch.schema();
        let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
        let mut columns = self.batch.columns().to_vec();
        let field = Arc::new(Field::new(name, array.data_type().clone(), true));

        match schema.index_of(name) {
            Ok(idx) => {
                fields[idx] = field;
                columns[idx] = array;
            }
            Err(_) => {
                fields.push(field);
                columns.push(array);
            }
        }

        self.batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
            .with_context(|| format!("setting column `{}`", name))?;
        Ok(())
    }

    /// Keep the rows where `mask` is true.
    pub fn filter(&self, mask: &BooleanArray) -> Result<Self> {
        let batch = filter_record_batch(&self.batch, mask).context("filtering trip table")?;
        Ok(Self::new(self.city, batch))
    }

    /// Rows `offset..offset + len`, clamped to the table.
    pub fn slice(&self, offset: usize, len: usize) -> RecordBatch {
        let offset = offset.min(self.num_rows());
        let len = len.min(self.num_rows() - offset);
        self.batch.slice(offset, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};

    fn small_table() -> TripTable {
        let schema = Schema::new(vec![Field::new(col::ID, arrow::datatypes::DataType::Int64, true)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(Int64Array::from(vec![10, 11, 12])) as ArrayRef],
        )
        .unwrap();
        TripTable::new(City::Chicago, batch)
    }

    #[test]
    fn test_set_column_appends_then_replaces() -> Result<()> {
        let mut t = small_table();
        assert!(!t.has_column(col::TRIP));

        t.set_column(col::TRIP, Arc::new(StringArray::from(vec!["a", "b", "c"])))?;
        assert_eq!(t.batch().num_columns(), 2);
        assert_eq!(t.column_as::<StringArray>(col::TRIP)?.value(2), "c");

        t.set_column(col::TRIP, Arc::new(StringArray::from(vec!["x", "y", "z"])))?;
        assert_eq!(t.batch().num_columns(), 2);
        assert_eq!(t.column_as::<StringArray>(col::TRIP)?.value(0), "x");
        Ok(())
    }

    #[test]
    fn test_set_column_rejects_wrong_length() {
        let mut t = small_table();
        let res = t.set_column(col::TRIP, Arc::new(StringArray::from(vec!["a"])));
        assert!(res.is_err());
    }

    #[test]
    fn test_column_as_errors() {
        let t = small_table();
        assert!(t.column_as::<Int64Array>(col::ID).is_ok());
        assert!(t.column_as::<StringArray>(col::ID).is_err());
        assert!(t.column_as::<Int64Array>(col::GENDER).is_err());
    }

    #[test]
    fn test_filter_and_slice() -> Result<()> {
        let t = small_table();
        let kept = t.filter(&BooleanArray::from(vec![true, false, true]))?;
        let ids = kept.column_as::<Int64Array>(col::ID)?;
        assert_eq!(ids.values().to_vec(), vec![10, 12]);

        assert_eq!(t.slice(1, 5).num_rows(), 2);
        assert_eq!(t.slice(7, 5).num_rows(), 0);
        Ok(())
    }
}
