//! Field translation and validation, run as explicit middleware before an
//! action body executes. Each field descriptor names the parameter map it
//! reads from, its type, and its constraints; failures surface as
//! [`ApiError::Validation`] naming the offending field.

use crate::endpoint::ActionInput;
use crate::error::ApiError;
use regex::Regex;
use serde_json::Value;

/// Which request parameter map a field is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgType {
    UrlParams,
    QueryArgs,
    BodyArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    Uuid,
    DateTime,
    List,
    Dict,
}

/// Declarative description of one action parameter.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub arg_type: ArgType,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub allowed: Option<Vec<Value>>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl FieldSpec {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
            arg_type: ArgType::BodyArgs,
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            allowed: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn uuid(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Uuid)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::List)
    }

    pub fn dict(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Dict)
    }

    pub fn arg(mut self, arg_type: ArgType) -> Self {
        self.arg_type = arg_type;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn allowed<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.allowed = Some(values.into_iter().collect());
        self
    }

    pub fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    pub fn maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }
}

/// Translate and type-check the raw parameter maps against the field
/// descriptors, writing translated values back in place. Required fields
/// must be present and non-null in their map.
pub fn translate_and_validate(
    mut input: ActionInput,
    fields: &[FieldSpec],
) -> Result<ActionInput, ApiError> {
    for field in fields {
        let map = match field.arg_type {
            ArgType::UrlParams => &mut input.url_params,
            ArgType::QueryArgs => &mut input.query_args,
            ArgType::BodyArgs => &mut input.body_args,
        };
        let raw = map.get(&field.name).cloned();
        match raw {
            None | Some(Value::Null) => {
                if field.required {
                    return Err(validation_error(field, "is required"));
                }
            }
            Some(value) => {
                let translated = translate(field, value)?;
                check_constraints(field, &translated)?;
                map.insert(field.name.clone(), translated);
            }
        }
    }
    Ok(input)
}

fn validation_error(field: &FieldSpec, message: impl Into<String>) -> ApiError {
    ApiError::Validation {
        field: field.name.clone(),
        message: message.into(),
    }
}

fn translate(field: &FieldSpec, value: Value) -> Result<Value, ApiError> {
    Ok(match field.kind {
        FieldKind::String => match value {
            Value::String(s) => Value::String(s),
            Value::Number(n) => Value::String(n.to_string()),
            other => {
                return Err(validation_error(
                    field,
                    format!("must be a string, got {}", type_name(&other)),
                ))
            }
        },
        FieldKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Value::Number(n),
            Value::String(s) => {
                let parsed: i64 = s
                    .trim()
                    .parse()
                    .map_err(|_| validation_error(field, "must be an integer"))?;
                Value::Number(parsed.into())
            }
            _ => return Err(validation_error(field, "must be an integer")),
        },
        FieldKind::Float => {
            let parsed = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .ok_or_else(|| validation_error(field, "must be a number"))?;
            serde_json::Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| validation_error(field, "must be a finite number"))?
        }
        FieldKind::Boolean => match value {
            Value::Bool(b) => Value::Bool(b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Value::Bool(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Value::Bool(false),
            _ => return Err(validation_error(field, "must be a boolean")),
        },
        FieldKind::Uuid => {
            let s = value
                .as_str()
                .ok_or_else(|| validation_error(field, "must be a UUID string"))?;
            let parsed = uuid::Uuid::parse_str(s)
                .map_err(|_| validation_error(field, "must be a valid UUID"))?;
            Value::String(parsed.to_string())
        }
        FieldKind::DateTime => {
            let s = value
                .as_str()
                .ok_or_else(|| validation_error(field, "must be an RFC 3339 datetime string"))?;
            let parsed = chrono::DateTime::parse_from_rfc3339(s)
                .map_err(|_| validation_error(field, "must be a valid RFC 3339 datetime"))?;
            Value::String(parsed.to_rfc3339())
        }
        FieldKind::List => match value {
            Value::Array(items) => Value::Array(items),
            _ => return Err(validation_error(field, "must be a list")),
        },
        FieldKind::Dict => match value {
            Value::Object(map) => Value::Object(map),
            _ => return Err(validation_error(field, "must be an object")),
        },
    })
}

fn check_constraints(field: &FieldSpec, value: &Value) -> Result<(), ApiError> {
    let length = match value {
        Value::String(s) => Some(s.len()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    };
    if let (Some(max), Some(len)) = (field.max_length, length) {
        if len > max {
            return Err(validation_error(
                field,
                format!("must be at most {} long", max),
            ));
        }
    }
    if let (Some(min), Some(len)) = (field.min_length, length) {
        if len < min {
            return Err(validation_error(
                field,
                format!("must be at least {} long", min),
            ));
        }
    }
    if let Some(ref pattern) = field.pattern {
        let re = Regex::new(pattern)
            .map_err(|_| validation_error(field, "has an invalid pattern constraint"))?;
        if let Some(s) = value.as_str() {
            if !re.is_match(s) {
                return Err(validation_error(field, "does not match required pattern"));
            }
        }
    }
    if let Some(ref allowed) = field.allowed {
        if !allowed.iter().any(|a| value_eq(value, a)) {
            return Err(validation_error(
                field,
                format!(
                    "must be one of: {:?}",
                    allowed.iter().take(5).collect::<Vec<_>>()
                ),
            ));
        }
    }
    if let Some(min) = field.minimum {
        if let Some(n) = value.as_f64() {
            if n < min {
                return Err(validation_error(field, format!("must be at least {}", min)));
            }
        }
    }
    if let Some(max) = field.maximum {
        if let Some(n) = value.as_f64() {
            if n > max {
                return Err(validation_error(field, format!("must be at most {}", max)));
            }
        }
    }
    Ok(())
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input_with_body(body: Value) -> ActionInput {
        ActionInput {
            body_args: body.as_object().unwrap().clone(),
            ..ActionInput::default()
        }
    }

    fn expect_validation(result: Result<ActionInput, ApiError>, expected_field: &str) {
        match result.unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, expected_field),
            other => panic!("expected Validation, got {other}"),
        }
    }

    #[test]
    fn required_field_missing_names_the_field() {
        let fields = [FieldSpec::string("item").required()];
        expect_validation(translate_and_validate(input_with_body(json!({})), &fields), "item");
    }

    #[test]
    fn optional_field_may_be_absent() {
        let fields = [FieldSpec::string("note")];
        let out = translate_and_validate(input_with_body(json!({})), &fields).unwrap();
        assert!(out.body_args.is_empty());
    }

    #[test]
    fn integer_strings_are_translated() {
        let fields = [FieldSpec::integer("count").arg(ArgType::QueryArgs)];
        let input = ActionInput {
            query_args: json!({"count": "42"}).as_object().unwrap().clone(),
            ..ActionInput::default()
        };
        let out = translate_and_validate(input, &fields).unwrap();
        assert_eq!(out.query_args["count"], json!(42));
    }

    #[test]
    fn non_numeric_integer_fails() {
        let fields = [FieldSpec::integer("count")];
        expect_validation(
            translate_and_validate(input_with_body(json!({"count": "many"})), &fields),
            "count",
        );
    }

    #[test]
    fn boolean_strings_are_translated() {
        let fields = [FieldSpec::boolean("active")];
        let out =
            translate_and_validate(input_with_body(json!({"active": "True"})), &fields).unwrap();
        assert_eq!(out.body_args["active"], json!(true));
    }

    #[test]
    fn pattern_and_length_constraints_apply() {
        let fields = [FieldSpec::string("code").pattern("^[A-Z]{3}$")];
        assert!(translate_and_validate(input_with_body(json!({"code": "ABC"})), &fields).is_ok());
        expect_validation(
            translate_and_validate(input_with_body(json!({"code": "abc"})), &fields),
            "code",
        );

        let fields = [FieldSpec::string("name").max_length(3)];
        expect_validation(
            translate_and_validate(input_with_body(json!({"name": "toolong"})), &fields),
            "name",
        );
    }

    #[test]
    fn allowed_values_compare_numerically() {
        let fields = [FieldSpec::integer("size").allowed([json!(1), json!(2)])];
        assert!(translate_and_validate(input_with_body(json!({"size": 2})), &fields).is_ok());
        expect_validation(
            translate_and_validate(input_with_body(json!({"size": 3})), &fields),
            "size",
        );
    }

    #[test]
    fn minimum_and_maximum_bounds_apply() {
        let fields = [FieldSpec::float("price").minimum(0.0).maximum(10.0)];
        assert!(translate_and_validate(input_with_body(json!({"price": 9.5})), &fields).is_ok());
        expect_validation(
            translate_and_validate(input_with_body(json!({"price": -1.0})), &fields),
            "price",
        );
    }

    #[test]
    fn uuid_and_datetime_kinds_validate() {
        let fields = [FieldSpec::uuid("id")];
        assert!(translate_and_validate(
            input_with_body(json!({"id": "550e8400-e29b-41d4-a716-446655440000"})),
            &fields,
        )
        .is_ok());
        expect_validation(
            translate_and_validate(input_with_body(json!({"id": "not-a-uuid"})), &fields),
            "id",
        );

        let fields = [FieldSpec::datetime("created_at")];
        assert!(translate_and_validate(
            input_with_body(json!({"created_at": "2026-08-30T12:00:00Z"})),
            &fields,
        )
        .is_ok());
        expect_validation(
            translate_and_validate(
                input_with_body(json!({"created_at": "yesterday"})),
                &fields,
            ),
            "created_at",
        );
    }
}
