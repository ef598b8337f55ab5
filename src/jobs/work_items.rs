use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::exchange::{
    records::{
        BloodPressureMeasurementRecord, FoodItemRecord, MealFoodItemRecord, MealRecord,
        PersonRecord, PlannedMealRecord, WeightMeasurementRecord,
    },
    Importable,
};

/// Suffix of the file name a meal export hands to its chained meal/food
/// item relationship export.
pub const FOOD_ITEMS_SUFFIX: &str = "FoodItems";

/// Descriptor of one unit of background work.
///
/// Every work item carries a human readable job name and is serialised as
/// the parameters of the status record created when it runs. Uploaded import
/// content is never part of those parameters.
pub trait WorkItem: Serialize + Send + Sync + 'static {
    /// Name stamped on items submitted through the API.
    const JOB_NAME: &'static str;

    fn job_name(&self) -> &str;

    fn set_job_name(&mut self, name: impl Into<String>);
}

/// Work item carrying raw CSV content for one record type.
pub trait ImportWorkItem: WorkItem {
    type Record: Importable;

    fn content(&self) -> &str;
}

macro_rules! work_item {
    (
        $(#[$meta:meta])*
        $name:ident => $job_name:literal {
            $( $(#[$field_meta:meta])* pub $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default)]
            pub job_name: String,
            $( $(#[$field_meta])* pub $field: $ty, )*
        }

        impl WorkItem for $name {
            const JOB_NAME: &'static str = $job_name;

            fn job_name(&self) -> &str {
                if self.job_name.is_empty() {
                    Self::JOB_NAME
                } else {
                    &self.job_name
                }
            }

            fn set_job_name(&mut self, name: impl Into<String>) {
                self.job_name = name.into();
            }
        }
    };
}

macro_rules! import_work_item {
    ($(#[$meta:meta])* $name:ident => $job_name:literal, $record:ty) => {
        work_item! {
            $(#[$meta])*
            $name => $job_name {
                #[serde(skip_serializing)]
                pub content: String,
            }
        }

        impl ImportWorkItem for $name {
            type Record = $record;

            fn content(&self) -> &str {
                &self.content
            }
        }
    };
}

work_item! {
    /// Export every person.
    PersonExport => "Person Export" {
        pub file_name: String,
    }
}

work_item! {
    /// Export one person's weight measurements, optionally bounded by date.
    WeightMeasurementExport => "Weight Measurement Export" {
        pub person_id: i32,
        #[serde(default)]
        pub from: Option<NaiveDateTime>,
        #[serde(default)]
        pub to: Option<NaiveDateTime>,
        pub file_name: String,
    }
}

work_item! {
    /// Export one person's blood pressure measurements, optionally bounded by date.
    BloodPressureMeasurementExport => "Blood Pressure Measurement Export" {
        pub person_id: i32,
        #[serde(default)]
        pub from: Option<NaiveDateTime>,
        #[serde(default)]
        pub to: Option<NaiveDateTime>,
        pub file_name: String,
    }
}

work_item! {
    FoodItemExport => "Food Item Export" {
        pub file_name: String,
    }
}

work_item! {
    /// Export every meal, then chain an export of the meal/food item
    /// relationships.
    MealExport => "Meal Export" {
        pub file_name: String,
    }
}

work_item! {
    MealFoodItemExport => "Meal Food Item Export" {
        pub file_name: String,
    }
}

work_item! {
    /// Export one person's planned meals, optionally bounded by date.
    PlannedMealExport => "Planned Meal Export" {
        pub person_id: i32,
        #[serde(default)]
        pub from: Option<NaiveDateTime>,
        #[serde(default)]
        pub to: Option<NaiveDateTime>,
        pub file_name: String,
    }
}

import_work_item!(PersonImport => "Person Import", PersonRecord);
import_work_item!(
    WeightMeasurementImport => "Weight Measurement Import",
    WeightMeasurementRecord
);
import_work_item!(
    BloodPressureMeasurementImport => "Blood Pressure Measurement Import",
    BloodPressureMeasurementRecord
);
import_work_item!(FoodItemImport => "Food Item Import", FoodItemRecord);
import_work_item!(MealImport => "Meal Import", MealRecord);
import_work_item!(MealFoodItemImport => "Meal Food Item Import", MealFoodItemRecord);
import_work_item!(PlannedMealImport => "Planned Meal Import", PlannedMealRecord);

work_item! {
    /// Recompute the nutritional totals of every meal.
    RecalculateMealNutrition => "Meal Nutritional Value Recalculation" {}
}

work_item! {
    /// Delete a person's planned meals scheduled before the cutoff day.
    PurgePlannedMeals => "Planned Meal Purge" {
        pub person_id: i32,
        #[serde(default)]
        pub cutoff: Option<NaiveDateTime>,
    }
}

/// Derive the name of a file produced alongside `file_name` by inserting
/// `-{suffix}` before its extension.
pub fn dependent_file_name(file_name: &str, suffix: &str) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();

    let mut name = format!("{}-{}", stem, suffix);
    if let Some(extension) = path.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy());
    }

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(name).to_string_lossy().into_owned()
        }
        _ => name,
    }
}
