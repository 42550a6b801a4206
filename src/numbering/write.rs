use anyhow::Result;

use super::format::{numbered_name, ItemNumber};
use crate::error::NumberingError;
use crate::model::work_item::{CustomField, FieldType, WorkItem};
use crate::providers::{FieldValue, TaskSource};

/// Where the computed number ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    CustomField { field_name: String },
    Name,
}

impl Strategy {
    pub fn needs_custom_fields(&self) -> bool {
        matches!(self, Strategy::CustomField { .. })
    }
}

/// A single write, fully resolved and validated, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Field {
        task_id: String,
        field_id: String,
        value: FieldValue,
    },
    Rename {
        task_id: String,
        name: String,
    },
}

impl Update {
    pub async fn apply<S: TaskSource + ?Sized>(&self, source: &S) -> Result<()> {
        match self {
            Update::Field {
                task_id,
                field_id,
                value,
            } => source.set_custom_field(task_id, field_id, value).await,
            Update::Rename { task_id, name } => source.rename_task(task_id, name).await,
        }
    }
}

/// Coerce the number into what the field type accepts.
///
/// Number fields get an integer when the value is whole, a float otherwise, and the raw
/// string if it does not parse. Everything else is sent as text.
pub fn coerce_value(field_type: &FieldType, raw: &str) -> FieldValue {
    if *field_type != FieldType::Number {
        return FieldValue::Text(raw.to_string());
    }
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
            FieldValue::Integer(n as i64)
        }
        Ok(n) if n.is_finite() => FieldValue::Float(n),
        _ => FieldValue::Text(raw.to_string()),
    }
}

/// Build the write for a custom field, refusing select-style fields with fixed options.
pub fn field_update(
    item: &WorkItem,
    field: &CustomField,
    number: ItemNumber,
) -> Result<Update, NumberingError> {
    if field.is_constrained() {
        return Err(NumberingError::ConstrainedField {
            field: field.name.clone(),
            field_type: field.field_type.clone(),
        });
    }
    Ok(Update::Field {
        task_id: item.id.clone(),
        field_id: field.id.clone(),
        value: coerce_value(&field.field_type, &number.to_string()),
    })
}

pub fn rename_update(item: &WorkItem, number: ItemNumber) -> Update {
    Update::Rename {
        task_id: item.id.clone(),
        name: numbered_name(number, &item.name),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::work_item::TypeConfig;
    use crate::numbering::hierarchy::tests::item;

    fn field(field_type: FieldType, options: Vec<serde_json::Value>) -> CustomField {
        CustomField {
            id: "fld-1".into(),
            name: "PM.Prio".into(),
            field_type,
            type_config: TypeConfig { options },
            value: None,
        }
    }

    #[test]
    fn number_field_coercion() {
        assert_eq!(coerce_value(&FieldType::Number, "10"), FieldValue::Integer(10));
        assert_eq!(coerce_value(&FieldType::Number, "10.5"), FieldValue::Float(10.5));
        assert_eq!(
            coerce_value(&FieldType::Number, "abc"),
            FieldValue::Text("abc".into())
        );
        assert_eq!(coerce_value(&FieldType::Number, "20.0"), FieldValue::Integer(20));
    }

    #[test]
    fn non_finite_numbers_fall_back_to_text() {
        assert_eq!(
            coerce_value(&FieldType::Number, "NaN"),
            FieldValue::Text("NaN".into())
        );
        assert_eq!(
            coerce_value(&FieldType::Number, "inf"),
            FieldValue::Text("inf".into())
        );
    }

    #[test]
    fn text_fields_always_get_strings() {
        assert_eq!(
            coerce_value(&FieldType::Text, "10"),
            FieldValue::Text("10".into())
        );
        assert_eq!(
            coerce_value(&FieldType::ShortText, "10.1"),
            FieldValue::Text("10.1".into())
        );
    }

    #[test]
    fn task_number_on_number_field_is_float() {
        let task = item("B", "Design", Some("A"), 0.0);
        let update = field_update(
            &task,
            &field(FieldType::Number, vec![]),
            ItemNumber::Task {
                epic: 10,
                position: 1,
            },
        )
        .unwrap();
        assert_eq!(
            update,
            Update::Field {
                task_id: "B".into(),
                field_id: "fld-1".into(),
                value: FieldValue::Float(10.1),
            }
        );
    }

    #[test]
    fn constrained_field_is_refused() {
        let epic = item("A", "Launch", None, 0.0);
        let options = vec![json!({"id": "o1", "name": "10"}), json!({"id": "o2", "name": "20"})];
        for number in [
            ItemNumber::Epic(10),
            ItemNumber::Task {
                epic: 10,
                position: 3,
            },
        ] {
            let err = field_update(&epic, &field(FieldType::DropDown, options.clone()), number)
                .unwrap_err();
            assert!(matches!(err, NumberingError::ConstrainedField { .. }));
            let msg = err.to_string();
            assert!(msg.contains("predefined options"));
            assert!(msg.contains("different custom field"));
        }
    }

    #[test]
    fn rename_strips_old_number() {
        let task = item("C", "20.7. Build", Some("A"), 1.0);
        let update = rename_update(
            &task,
            ItemNumber::Task {
                epic: 10,
                position: 2,
            },
        );
        assert_eq!(
            update,
            Update::Rename {
                task_id: "C".into(),
                name: "10.2. Build".into(),
            }
        );
    }
}
